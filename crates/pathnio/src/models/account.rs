//! Users, credentials, profile, and registration payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A backend user account as returned by `auth/users/me/` and the admin list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Primary key.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Company the user manages, when they are a company account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Photo URL or `/media/...` path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    /// Staff flag.
    #[serde(default)]
    pub is_staff: bool,
    /// Superuser flag.
    #[serde(default)]
    pub is_superuser: bool,
    /// Fleet manager flag.
    #[serde(default)]
    pub is_manager: bool,
    /// Account creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<DateTime<Utc>>,
}

impl User {
    /// Name to show: full name when set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }

    /// Whether the account may use the admin endpoints.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// Fields for creating a user from the admin view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Initial password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Staff flag.
    pub is_staff: bool,
}

/// Partial update of a user; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// New phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Grant or revoke staff access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
}

impl UserUpdate {
    /// True when the update would send an empty body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Username and password for the token endpoint.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plain-text password; never logged.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Tokens issued by the login endpoint.
///
/// The JWT view returns `access`/`refresh`; the token-auth view returns a
/// single `auth_token`, which is accepted as the access token.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Bearer token sent with every request.
    #[serde(alias = "auth_token")]
    pub access: String,
    /// Refresh token, stored but never exchanged by this client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

impl TokenPair {
    /// Build a token pair.
    #[must_use]
    pub fn new(access: impl Into<String>, refresh: Option<String>) -> Self {
        Self {
            access: access.into(),
            refresh,
        }
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &self.refresh.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// The signed-in account's profile (`accounts/profile/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Manager or driver name.
    #[serde(default)]
    pub full_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Company address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Preferred UI language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Account creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<DateTime<Utc>>,
    /// Backend role such as `manager` or `driver`.
    #[serde(default)]
    pub role: String,
    /// Company name for company accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Photo URL or `/media/...` path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

/// Editable company-profile fields (`accounts/company/me/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// Manager name shown on the company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_full_name: Option<String>,
    /// Company phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Company address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Preferred UI language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ProfileUpdate {
    /// True when the update would send an empty body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of the password-change endpoint.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordChange {
    /// Current password.
    pub old_password: String,
    /// Replacement password.
    pub new_password: String,
}

impl PasswordChange {
    /// Minimum accepted length for a new password.
    pub const MIN_LENGTH: usize = 6;

    /// Local checks before contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the change is not acceptable.
    pub fn validate(&self, confirmation: &str) -> std::result::Result<(), String> {
        if self.old_password.is_empty() || self.new_password.is_empty() {
            return Err("current and new password are required".to_string());
        }
        if self.new_password != confirmation {
            return Err("new passwords do not match".to_string());
        }
        if self.new_password.chars().count() < Self::MIN_LENGTH {
            return Err(format!(
                "password must be at least {} characters",
                Self::MIN_LENGTH
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}

/// The nested `user` object of the registration payloads.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Initial password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Payload for `accounts/register/company/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRegistration {
    /// Login account.
    pub user: UserAccount,
    /// Registered company name.
    pub company_name: String,
    /// Manager name.
    pub manager_full_name: String,
    /// Company phone.
    pub phone: String,
    /// Company address.
    #[serde(default)]
    pub address: String,
}

/// Payload for `accounts/register/driver/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRegistration {
    /// Login account.
    pub user: UserAccount,
    /// Driver name.
    pub full_name: String,
    /// Mobile number, also the default username.
    pub mobile: String,
    /// Plate of the vehicle the driver brings.
    pub plate_number: String,
    /// Vehicle type, e.g. `truck`.
    #[serde(default)]
    pub vehicle_type: String,
    /// Company primary key, when the driver joins an existing company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<i64>,
}

impl DriverRegistration {
    /// Build a registration the way the sign-up form does: the mobile number
    /// doubles as username and seeds a placeholder email.
    #[must_use]
    pub fn from_mobile(
        full_name: impl Into<String>,
        mobile: impl Into<String>,
        plate_number: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let mobile = mobile.into();
        Self {
            user: UserAccount {
                username: mobile.clone(),
                email: format!("{mobile}@driver.com"),
                password: Some(password.into()),
            },
            full_name: full_name.into(),
            mobile,
            plate_number: plate_number.into(),
            vehicle_type: String::new(),
            company: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_decodes_minimal_payload() {
        let user: User = serde_json::from_str(r#"{"id": 1, "username": "admin"}"#).unwrap();
        assert_eq!(user.display_name(), "admin");
        assert!(!user.is_admin());
        assert!(user.date_joined.is_none());
    }

    #[test]
    fn test_user_decodes_full_payload() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 3,
            "username": "sara",
            "email": "sara@example.com",
            "full_name": "Sara Ahmadi",
            "is_staff": true,
            "is_superuser": false,
            "is_manager": true,
            "date_joined": "2024-07-01T10:00:00Z",
            "last_login": null
        }))
        .unwrap();
        assert_eq!(user.display_name(), "Sara Ahmadi");
        assert!(user.is_admin());
        assert!(user.date_joined.is_some());
    }

    #[test]
    fn test_token_pair_accepts_auth_token() {
        let tokens: TokenPair = serde_json::from_str(r#"{"auth_token": "xyz"}"#).unwrap();
        assert_eq!(tokens.access, "xyz");
        assert!(tokens.refresh.is_none());

        let tokens: TokenPair =
            serde_json::from_str(r#"{"access": "a", "refresh": "r"}"#).unwrap();
        assert_eq!(tokens.refresh.as_deref(), Some("r"));
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let tokens = TokenPair::new("secret-access", Some("secret-refresh".to_string()));
        let creds = Credentials {
            username: "u".to_string(),
            password: "hunter2".to_string(),
        };
        let dbg = format!("{tokens:?} {creds:?}");
        assert!(!dbg.contains("secret-access"));
        assert!(!dbg.contains("secret-refresh"));
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn test_password_change_validation() {
        let change = PasswordChange {
            old_password: "old-pass".to_string(),
            new_password: "new-pass".to_string(),
        };
        assert!(change.validate("new-pass").is_ok());
        assert_eq!(
            change.validate("other").unwrap_err(),
            "new passwords do not match"
        );

        let short = PasswordChange {
            old_password: "old".to_string(),
            new_password: "abc".to_string(),
        };
        assert!(short.validate("abc").unwrap_err().contains("at least 6"));

        let empty = PasswordChange {
            old_password: String::new(),
            new_password: "abcdef".to_string(),
        };
        assert!(empty.validate("abcdef").is_err());
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            phone: Some("0912".to_string()),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"phone": "0912"})
        );
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_driver_registration_from_mobile() {
        let reg = DriverRegistration::from_mobile("Amir", "0912100000", "12A345-IR", "pw123456");
        let json = serde_json::to_value(&reg).unwrap();
        assert_eq!(json["user"]["username"], "0912100000");
        assert_eq!(json["user"]["email"], "0912100000@driver.com");
        assert_eq!(json["plate_number"], "12A345-IR");
        assert!(json.get("company").is_none());
    }
}
