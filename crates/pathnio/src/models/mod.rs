//! Canonical schemas for the backend's resources.
//!
//! Every consumer shares these types. Response decoding is lenient: unknown
//! fields are ignored, optional fields default, and status-like strings
//! accept the backend's varying spellings (`"In Progress"`, `in_progress`).

use serde::{Deserialize, Deserializer, Serialize};

/// Declares a string-backed enum with a catch-all `Other` variant.
///
/// Parsing goes through [`normalize_token`]; serialization emits the
/// canonical snake_case spelling.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* #[doc = concat!("`", $wire, "`")] $variant, )+
            /// A value this client does not know about.
            Other(String),
        }

        impl $name {
            /// Canonical wire spelling.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Other(raw) => raw.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match $crate::models::normalize_token(&raw).as_str() {
                    $( $wire => Self::$variant, )+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

mod account;
mod billing;
mod fleet;
mod settings;
mod support;

pub use account::{
    CompanyRegistration, Credentials, DriverRegistration, NewUser, PasswordChange, Profile,
    ProfileUpdate, TokenPair, User, UserAccount, UserUpdate,
};
pub use billing::{NewSubscription, Plan, Subscription, SubscriptionStatus};
pub use fleet::{
    CompanyRef, Driver, Expense, ExpenseCategory, ExpenseStatus, NewExpense, NewTrip,
    NewVehicle, Trip, TripStatus, Vehicle, VehicleStatus,
};
pub use settings::{BackupSchedule, MeasurementUnits, SiteSettings, SiteSettingsUpdate};
pub use support::{
    Alert, AlertLevel, ContactMessage, NewTicket, Ticket, TicketCategory, TicketPriority,
    TicketReply, TicketStatus,
};

/// A list response: either a bare JSON array or a paginated envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    /// `[ ... ]`
    Bare(Vec<T>),
    /// `{ "count": n, "next": url, "previous": url, "results": [ ... ] }`
    Page {
        /// Items on this page.
        results: Vec<T>,
        /// Total number of items across all pages.
        #[serde(default)]
        count: Option<u64>,
        /// URL of the next page.
        #[serde(default)]
        next: Option<String>,
        /// URL of the previous page.
        #[serde(default)]
        previous: Option<String>,
    },
}

impl<T> Listing<T> {
    /// The items, regardless of envelope.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Page { results: items, .. } => items,
        }
    }

    /// Whether more pages are available.
    #[must_use]
    pub fn has_next(&self) -> bool {
        matches!(self, Self::Page { next: Some(_), .. })
    }
}

/// Resolve a profile photo reference to an absolute URL.
///
/// Absolute URLs pass through; `/media/...` paths are served by the backend
/// origin; anything else is returned as given.
#[must_use]
pub fn resolve_media_url(origin: &str, photo: &str) -> String {
    if photo.starts_with("http://") || photo.starts_with("https://") {
        photo.to_string()
    } else if photo.starts_with("/media/") {
        format!("{}{photo}", origin.trim_end_matches('/'))
    } else {
        photo.to_string()
    }
}

/// Lowercase and fold spaces and dashes to `_`.
fn normalize_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Accept a JSON number or a numeric string (DRF serializes decimals as strings).
pub(crate) fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .replace(',', "")
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {s}"))),
    }
}

/// Accept a string or a number and keep it as text (foreign keys vs. names).
pub(crate) fn de_opt_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Float(n)) => Some(n.to_string()),
        Some(Raw::Text(s)) if s.is_empty() => None,
        Some(Raw::Text(s)) => Some(s),
    })
}
