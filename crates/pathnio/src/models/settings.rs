//! Dashboard preferences stored by the backend.

use serde::{Deserialize, Serialize};

string_enum! {
    /// How often the backend backs up company data.
    pub enum BackupSchedule {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
        Never => "never",
    }
}

string_enum! {
    /// Unit system for distances and fuel.
    pub enum MeasurementUnits {
        Metric => "metric",
        Imperial => "imperial",
    }
}

impl Default for BackupSchedule {
    fn default() -> Self {
        Self::Weekly
    }
}

impl Default for MeasurementUnits {
    fn default() -> Self {
        Self::Metric
    }
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_date_format() -> String {
    "YYYY-MM-DD".to_string()
}

fn enabled() -> bool {
    true
}

/// Site-wide settings. Every field has a default so partial documents decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// UI theme.
    #[serde(default = "default_theme")]
    pub theme: String,
    /// UI language.
    #[serde(default = "default_language")]
    pub language: String,
    /// Email notifications enabled.
    #[serde(default = "enabled")]
    pub email_notifications: bool,
    /// SMS notifications enabled.
    #[serde(default)]
    pub sms_notifications: bool,
    /// Push notifications enabled.
    #[serde(default = "enabled")]
    pub push_notifications: bool,
    /// Backup frequency.
    #[serde(default)]
    pub backup_schedule: BackupSchedule,
    /// Date display format.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Unit system.
    #[serde(default)]
    pub measurement_units: MeasurementUnits,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            language: default_language(),
            email_notifications: true,
            sms_notifications: false,
            push_notifications: true,
            backup_schedule: BackupSchedule::default(),
            date_format: default_date_format(),
            measurement_units: MeasurementUnits::default(),
        }
    }
}

/// Partial update; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettingsUpdate {
    /// UI theme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// UI language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Email notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
    /// SMS notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_notifications: Option<bool>,
    /// Push notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,
    /// Backup frequency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_schedule: Option<BackupSchedule>,
    /// Date display format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    /// Unit system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_units: Option<MeasurementUnits>,
}

impl SiteSettingsUpdate {
    /// Whether the update would send nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set a field by its wire name, as the `settings set` command does.
    ///
    /// # Errors
    ///
    /// Returns a message for unknown keys or values that do not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let flag = || {
            parse_flag(value).ok_or_else(|| format!("expected on/off for {key}, got '{value}'"))
        };
        match key {
            "theme" => self.theme = Some(value.to_string()),
            "language" => self.language = Some(value.to_string()),
            "email_notifications" => self.email_notifications = Some(flag()?),
            "sms_notifications" => self.sms_notifications = Some(flag()?),
            "push_notifications" => self.push_notifications = Some(flag()?),
            "backup_schedule" => self.backup_schedule = Some(BackupSchedule::from(value)),
            "date_format" => self.date_format = Some(value.to_string()),
            "measurement_units" => self.measurement_units = Some(MeasurementUnits::from(value)),
            other => return Err(format!("unknown setting '{other}'")),
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
