//! Rendering command results as plain text, aligned tables or JSON.

use serde::Serialize;

use super::OutputFormat;
use crate::models::{
    Alert, Driver, Expense, Plan, Profile, SiteSettings, Subscription, Ticket, Trip, User,
    Vehicle,
};

/// A record that can be shown as one table row.
pub trait Tabular {
    /// Column headers.
    fn headers() -> &'static [&'static str];

    /// Cell values, one per header.
    fn row(&self) -> Vec<String>;
}

/// Render a list of records.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_list<T: Tabular + Serialize>(
    items: &[T],
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(items),
        OutputFormat::Table => Ok(table(T::headers(), items.iter().map(Tabular::row))),
        OutputFormat::Plain => Ok(items
            .iter()
            .map(|item| item.row().join("  "))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render one record. Table and plain formats show one `field: value` line
/// per column.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_one<T: Tabular + Serialize>(
    item: &T,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(item),
        OutputFormat::Table | OutputFormat::Plain => {
            Ok(key_values(T::headers().iter().copied().zip(item.row())))
        }
    }
}

/// Render any serializable value: JSON as is, otherwise top-level fields as
/// `key: value` lines.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_value<T: Serialize>(value: &T, format: OutputFormat) -> serde_json::Result<String> {
    let json = serde_json::to_value(value)?;
    match (format, json) {
        (OutputFormat::Json, json) => serde_json::to_string_pretty(&json),
        (_, serde_json::Value::Object(map)) => Ok(key_values(
            map.iter().map(|(k, v)| (k.as_str(), scalar(v))),
        )),
        (_, other) => Ok(scalar(&other)),
    }
}

/// Align `key: value` lines.
pub fn key_values<'a>(pairs: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let pairs: Vec<_> = pairs.into_iter().collect();
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{:width$}  {v}", format!("{k}:"), width = width + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lay out rows under headers with columns padded to their widest cell.
pub fn table(headers: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let rows: Vec<Vec<String>> = rows.into_iter().collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![
        line(headers.iter().map(|h| (*h).to_uppercase()).collect()),
        line(widths.iter().map(|w| "-".repeat(*w)).collect()),
    ];
    out.extend(rows.into_iter().map(line));
    out.join("\n")
}

fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn opt(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

fn amount(value: f64) -> String {
    format!("{value:.0}")
}

impl Tabular for User {
    fn headers() -> &'static [&'static str] {
        &["id", "username", "name", "email", "company", "staff"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.display_name().to_string(),
            opt(Some(&self.email)),
            opt(self.company_name.as_deref()),
            if self.is_admin() { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl Tabular for Profile {
    fn headers() -> &'static [&'static str] {
        &["name", "email", "phone", "company", "role", "language", "address", "photo"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            opt(Some(&self.full_name)),
            opt(Some(&self.email)),
            opt(Some(&self.phone)),
            opt(self.company_name.as_deref()),
            opt(Some(&self.role)),
            opt(self.language.as_deref()),
            opt(self.address.as_deref()),
            opt(self.profile_photo.as_deref()),
        ]
    }
}

impl Tabular for Driver {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "mobile", "plate", "vehicle", "company"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            opt(Some(&self.full_name)),
            opt(Some(&self.mobile)),
            opt(Some(&self.plate_number)),
            opt(self.vehicle_type.as_deref()),
            self.company
                .as_ref()
                .map_or_else(|| "-".to_string(), crate::models::CompanyRef::label),
        ]
    }
}

impl Tabular for Vehicle {
    fn headers() -> &'static [&'static str] {
        &["id", "plate", "type", "driver", "status", "capacity", "trips"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.plate_number.clone(),
            opt(Some(&self.vehicle_type)),
            opt(self.driver.as_deref()),
            self.status.to_string(),
            opt(self.capacity.as_deref()),
            self.total_trips.to_string(),
        ]
    }
}

impl Tabular for Trip {
    fn headers() -> &'static [&'static str] {
        &["id", "driver", "vehicle", "from", "to", "start", "status", "distance"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            opt(self.driver.as_deref()),
            opt(self.vehicle.as_deref()),
            opt(Some(&self.origin)),
            opt(Some(&self.destination)),
            opt(self.start.as_deref()),
            self.status.to_string(),
            opt(self.distance.as_deref()),
        ]
    }
}

impl Tabular for Expense {
    fn headers() -> &'static [&'static str] {
        &["id", "date", "category", "amount", "vehicle", "status", "description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.map_or_else(|| "-".to_string(), |d| d.to_string()),
            self.category.to_string(),
            amount(self.amount),
            opt(self.vehicle.as_deref()),
            self.status.to_string(),
            opt(Some(&self.description)),
        ]
    }
}

impl Tabular for Subscription {
    fn headers() -> &'static [&'static str] {
        &["id", "plan", "status", "start", "end", "price"]
    }

    fn row(&self) -> Vec<String> {
        let date = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
        vec![
            self.id.to_string(),
            self.plan.clone(),
            self.status.to_string(),
            date(self.start),
            date(self.end),
            amount(self.price),
        ]
    }
}

impl Tabular for Plan {
    fn headers() -> &'static [&'static str] {
        &["plan", "price", "features"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), amount(self.price), self.features.join(", ")]
    }
}

impl Tabular for Alert {
    fn headers() -> &'static [&'static str] {
        &["level", "title", "time", "details"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.level.to_string(),
            self.title.clone(),
            opt(Some(&self.time)),
            opt(Some(&self.desc)),
        ]
    }
}

impl Tabular for Ticket {
    fn headers() -> &'static [&'static str] {
        &["id", "subject", "status", "priority", "category", "created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.subject.clone(),
            self.status.to_string(),
            self.priority.to_string(),
            self.category.to_string(),
            self.created_at
                .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
        ]
    }
}

impl Tabular for SiteSettings {
    fn headers() -> &'static [&'static str] {
        &[
            "theme",
            "language",
            "email_notifications",
            "sms_notifications",
            "push_notifications",
            "backup_schedule",
            "date_format",
            "measurement_units",
        ]
    }

    fn row(&self) -> Vec<String> {
        let flag = |on: bool| if on { "on" } else { "off" }.to_string();
        vec![
            self.theme.clone(),
            self.language.clone(),
            flag(self.email_notifications),
            flag(self.sms_notifications),
            flag(self.push_notifications),
            self.backup_schedule.to_string(),
            self.date_format.clone(),
            self.measurement_units.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicles() -> Vec<Vehicle> {
        serde_json::from_value(serde_json::json!([
            {"id": 1, "plate_number": "12A345-IR", "vehicle_type": "Truck", "status": "Active", "total_trips": 3},
            {"id": 22, "plate_number": "B", "status": "offline"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_table_aligns_columns() {
        let out = render_list(&vehicles(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID  PLATE"));
        assert!(lines[1].starts_with("--  ---------"));
        assert!(lines[2].starts_with("1   12A345-IR  Truck"));
        assert!(lines[3].contains("offline"));
    }

    #[test]
    fn test_plain_is_one_line_per_item() {
        let out = render_list(&vehicles(), OutputFormat::Plain).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.starts_with("1  12A345-IR  Truck  -  active"));
    }

    #[test]
    fn test_json_list() {
        let out = render_list(&vehicles(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[1]["status"], "offline");
    }

    #[test]
    fn test_render_one_key_values() {
        let plans = Plan::catalog();
        let out = render_one(&plans[0], OutputFormat::Plain).unwrap();
        assert!(out.starts_with("plan:      Basic"));
        assert!(out.contains("price:     4900000"));
    }

    #[test]
    fn test_render_value_object() {
        let out = render_value(
            &serde_json::json!({"state": "authenticated", "user": null}),
            OutputFormat::Table,
        )
        .unwrap();
        assert!(out.contains("state:  authenticated"));
        assert!(out.contains("user:   -"));
    }

    #[test]
    fn test_empty_table_has_headers() {
        let out = render_list::<Ticket>(&[], OutputFormat::Table).unwrap();
        assert_eq!(out.lines().count(), 2);
    }
}
