//! Support tickets, the public contact form, and dashboard alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    /// Where a ticket stands.
    pub enum TicketStatus {
        Open => "open",
        Answered => "answered",
        Closed => "closed",
        Pending => "pending",
    }
}

string_enum! {
    /// How urgent a ticket is.
    pub enum TicketPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

string_enum! {
    /// What a ticket is about.
    pub enum TicketCategory {
        Technical => "technical",
        Billing => "billing",
        Feature => "feature",
        Bug => "bug",
        General => "general",
    }
}

impl Default for TicketPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Default for TicketCategory {
    fn default() -> Self {
        Self::General
    }
}

/// A support ticket and its latest reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Primary key.
    pub id: i64,
    /// Short summary.
    pub subject: String,
    /// Current status.
    pub status: TicketStatus,
    /// Opening message.
    #[serde(default)]
    pub message: String,
    /// Latest staff reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Urgency.
    #[serde(default)]
    pub priority: TicketPriority,
    /// Topic.
    #[serde(default)]
    pub category: TicketCategory,
    /// Staff member handling it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Ticket {
    /// Open and answered tickets still need attention.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.status, TicketStatus::Open | TicketStatus::Answered)
    }
}

/// Body for opening a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    /// Short summary.
    pub subject: String,
    /// Problem description.
    pub message: String,
    /// Topic.
    #[serde(default)]
    pub category: TicketCategory,
    /// Urgency.
    #[serde(default)]
    pub priority: TicketPriority,
}

/// Body for replying to a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketReply {
    /// Reply text.
    pub message: String,
}

/// Body of the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Optional subject line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Message body.
    pub message: String,
}

string_enum! {
    /// Severity of a dashboard alert.
    pub enum AlertLevel {
        Info => "info",
        Success => "success",
        Warning => "warning",
        Error => "error",
    }
}

/// A notification on the alerts page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Primary key, when persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Severity.
    #[serde(rename = "type", alias = "level")]
    pub level: AlertLevel,
    /// Headline.
    pub title: String,
    /// Details.
    #[serde(default, alias = "description")]
    pub desc: String,
    /// Server-formatted age, e.g. `"10 min ago"`.
    #[serde(default)]
    pub time: String,
}

impl Alert {
    /// Errors are flagged urgent.
    #[must_use]
    pub fn is_urgent(&self) -> bool {
        self.level == AlertLevel::Error
    }
}
