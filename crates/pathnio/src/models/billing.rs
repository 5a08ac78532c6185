//! Subscription plans and purchased subscriptions.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::de_amount;

/// A plan offered for purchase. Prices are in Toman.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Catalog key.
    pub id: i64,
    /// Display name, also the purchase key.
    pub name: String,
    /// Monthly price in Toman.
    #[serde(deserialize_with = "de_amount")]
    pub price: f64,
    /// One-line pitch.
    #[serde(default)]
    pub description: String,
    /// Included features.
    #[serde(default)]
    pub features: Vec<String>,
}

impl Plan {
    /// The built-in catalog shown when the backend does not publish plans.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        let plan = |id, name: &str, price, description: &str, features: &[&str]| Self {
            id,
            name: name.to_string(),
            price,
            description: description.to_string(),
            features: features.iter().map(|f| (*f).to_string()).collect(),
        };
        vec![
            plan(
                1,
                "Basic",
                4_900_000.0,
                "For small teams and startups. 1 vehicle, 5 drivers.",
                &["1 Vehicle", "5 Drivers", "Basic Reports"],
            ),
            plan(
                2,
                "Pro",
                9_900_000.0,
                "For growing businesses. 5 vehicles, 20 drivers.",
                &["5 Vehicles", "20 Drivers", "Advanced Reports", "Priority Support"],
            ),
            plan(
                3,
                "Enterprise",
                19_900_000.0,
                "For large fleets. Unlimited vehicles and drivers.",
                &[
                    "Unlimited Vehicles",
                    "Unlimited Drivers",
                    "Custom Reports",
                    "Dedicated Support",
                ],
            ),
        ]
    }

    /// Look a plan up by name, ignoring case.
    #[must_use]
    pub fn find(plans: &[Self], name: &str) -> Option<Self> {
        plans
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
    }
}

string_enum! {
    /// State of a purchased subscription.
    pub enum SubscriptionStatus {
        Active => "active",
        Expired => "expired",
        Cancelled => "cancelled",
    }
}

/// A subscription owned by the signed-in company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Primary key.
    pub id: i64,
    /// Plan name.
    pub plan: String,
    /// Lifecycle status.
    pub status: SubscriptionStatus,
    /// First day covered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    /// Last day covered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Price paid in Toman.
    #[serde(default, deserialize_with = "de_amount")]
    pub price: f64,
}

impl Subscription {
    /// Days until `end`, negative once expired. `None` without an end date.
    #[must_use]
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.end.map(|end| (end - today).num_days())
    }

    /// Renewal is offered for anything that is not active.
    #[must_use]
    pub fn can_renew(&self) -> bool {
        self.status != SubscriptionStatus::Active
    }

    /// Only active subscriptions can be cancelled.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Whether the subscription is active and not past its end date.
    #[must_use]
    pub fn is_current(&self) -> bool {
        let today = Utc::now().date_naive();
        self.status == SubscriptionStatus::Active
            && self.days_remaining(today).map_or(true, |d| d >= 0)
    }
}

/// Body for buying a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubscription {
    /// Plan name to buy.
    pub plan: String,
}
