//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands. Global flags
//! (`-c`, `-v`, `-q`, `-o`) are reserved by the root parser.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Username (prompted for when omitted)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password. Prefer `PATHNIO_PASSWORD` or the prompt: flags end up in
    /// shell history, and the prompt echoes what is typed
    #[arg(short, long, env = "PATHNIO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Password change arguments.
#[derive(Debug, Args)]
pub struct PasswordCommand {
    /// Current password (prompted for when omitted; the prompt echoes)
    #[arg(long, env = "PATHNIO_PASSWORD", hide_env_values = true)]
    pub old: Option<String>,

    /// New password, at least 6 characters (prompted for when omitted)
    #[arg(long, env = "PATHNIO_NEW_PASSWORD", hide_env_values = true)]
    pub new: Option<String>,

    /// Repeat of the new password (defaults to --new when it is given)
    #[arg(long)]
    pub confirm: Option<String>,
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the profile
    Show,

    /// Update profile fields
    Update {
        /// Manager's full name
        #[arg(long)]
        name: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
        /// Address
        #[arg(long)]
        address: Option<String>,
        /// Interface language (`en`, `fa`)
        #[arg(long)]
        language: Option<String>,
    },

    /// Upload a profile photo
    Photo {
        /// Image file to upload
        path: PathBuf,
    },
}

/// Registration commands.
#[derive(Debug, Subcommand)]
pub enum RegisterCommand {
    /// Register a company account
    Company {
        /// Login name
        #[arg(long)]
        username: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Password. Flags end up in shell history; prefer `PATHNIO_NEW_PASSWORD`
        #[arg(long, env = "PATHNIO_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        /// Company name
        #[arg(long)]
        company_name: String,
        /// Manager's full name
        #[arg(long)]
        manager: String,
        /// Phone number
        #[arg(long)]
        phone: String,
        /// Address
        #[arg(long, default_value = "")]
        address: String,
    },

    /// Register a driver account; the mobile number becomes the username
    Driver {
        /// Driver's full name
        #[arg(long)]
        full_name: String,
        /// Mobile number
        #[arg(long)]
        mobile: String,
        /// Plate number of the driver's vehicle
        #[arg(long)]
        plate: String,
        /// Password. Flags end up in shell history; prefer `PATHNIO_NEW_PASSWORD`
        #[arg(long, env = "PATHNIO_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        /// Vehicle type
        #[arg(long)]
        vehicle_type: Option<String>,
        /// Company to join, by id
        #[arg(long)]
        company: Option<i64>,
    },
}

/// User administration commands.
#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List all users
    List,

    /// Create a user
    Create {
        /// Login name
        #[arg(long)]
        username: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Initial password. Flags end up in shell history; prefer
        /// `PATHNIO_NEW_PASSWORD`
        #[arg(long, env = "PATHNIO_NEW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Full name
        #[arg(long)]
        full_name: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
        /// Company name
        #[arg(long)]
        company_name: Option<String>,
        /// Grant staff rights
        #[arg(long)]
        staff: bool,
    },

    /// Update a user
    Update {
        /// User id
        id: i64,
        /// Login name
        #[arg(long)]
        username: Option<String>,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
        /// Full name
        #[arg(long)]
        full_name: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
        /// Company name
        #[arg(long)]
        company_name: Option<String>,
        /// Staff rights (true/false)
        #[arg(long)]
        staff: Option<bool>,
    },

    /// Delete a user
    Delete {
        /// User id
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Driver commands.
#[derive(Debug, Subcommand)]
pub enum DriversCommand {
    /// List drivers
    List,
    /// Show one driver
    Show {
        /// Driver id
        id: i64,
    },
}

/// Vehicle commands.
#[derive(Debug, Subcommand)]
pub enum VehiclesCommand {
    /// List vehicles
    List {
        /// Only vehicles in this status
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one vehicle
    Show {
        /// Vehicle id
        id: i64,
    },

    /// Register a vehicle
    Create {
        /// Plate number
        #[arg(long)]
        plate: String,
        /// Vehicle type (Truck, Van, ...)
        #[arg(long = "type")]
        vehicle_type: String,
        /// Assigned driver
        #[arg(long)]
        driver: Option<String>,
        /// Initial status
        #[arg(long, default_value = "active")]
        status: String,
        /// Load capacity
        #[arg(long)]
        capacity: Option<String>,
        /// Colour
        #[arg(long)]
        color: Option<String>,
    },
}

/// Trip commands.
#[derive(Debug, Subcommand)]
pub enum TripsCommand {
    /// List trips
    List {
        /// Only trips in this status
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one trip
    Show {
        /// Trip id
        id: i64,
    },

    /// Schedule a trip
    Create {
        /// Driver
        #[arg(long)]
        driver: String,
        /// Vehicle
        #[arg(long)]
        vehicle: String,
        /// Starting point
        #[arg(long)]
        origin: String,
        /// Destination
        #[arg(long)]
        destination: String,
        /// Departure time
        #[arg(long)]
        start: Option<String>,
        /// Arrival time
        #[arg(long)]
        end: Option<String>,
        /// Initial status
        #[arg(long, default_value = "scheduled")]
        status: String,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Expense commands.
#[derive(Debug, Subcommand)]
pub enum ExpensesCommand {
    /// List expenses
    List {
        /// Only expenses in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one expense
    Show {
        /// Expense id
        id: i64,
    },

    /// Record an expense
    Create {
        /// Amount in Toman
        #[arg(long)]
        amount: f64,
        /// Category (fuel, maintenance, toll, repair, insurance)
        #[arg(long)]
        category: String,
        /// What the expense was for
        #[arg(long)]
        description: String,
        /// Driver
        #[arg(long)]
        driver: Option<String>,
        /// Vehicle
        #[arg(long)]
        vehicle: Option<String>,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Payment method
        #[arg(long)]
        payment_method: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Subscription commands.
#[derive(Debug, Subcommand)]
pub enum SubscriptionsCommand {
    /// List the company's subscriptions
    List,

    /// Show available plans
    Plans,

    /// Buy a plan
    Buy {
        /// Plan name (Basic, Pro, Enterprise)
        plan: String,
    },

    /// Renew a subscription
    Renew {
        /// Subscription id
        id: i64,
    },

    /// Cancel a subscription
    Cancel {
        /// Subscription id
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Alerts command arguments.
#[derive(Debug, Args)]
pub struct AlertsCommand {
    /// Only alerts of this level (info, success, warning, error)
    #[arg(long)]
    pub level: Option<String>,
}

/// Support ticket commands.
#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// List tickets
    List {
        /// Search subject and message
        #[arg(short, long)]
        search: Option<String>,
        /// Only tickets in this status (`all` for every status)
        #[arg(long)]
        status: Option<String>,
    },

    /// Open a ticket
    Create {
        /// Subject line
        #[arg(long)]
        subject: String,
        /// Message body
        #[arg(long)]
        message: String,
        /// Category (technical, billing, feature, bug, general)
        #[arg(long, default_value = "general")]
        category: String,
        /// Priority (low, medium, high, urgent)
        #[arg(long, default_value = "medium")]
        priority: String,
    },

    /// Reply to a ticket
    Reply {
        /// Ticket id
        id: i64,
        /// Reply text
        #[arg(long)]
        message: String,
    },
}

/// Contact form arguments.
#[derive(Debug, Args)]
pub struct ContactCommand {
    /// Your name
    #[arg(long)]
    pub name: String,

    /// Reply address
    #[arg(long)]
    pub email: String,

    /// Subject line
    #[arg(long)]
    pub subject: Option<String>,

    /// Message body
    #[arg(long)]
    pub message: String,
}

/// Site settings commands.
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the settings
    Show,

    /// Change settings, e.g. `theme=dark sms_notifications=on`
    Set {
        /// `key=value` pairs
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,
    },
}

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Skip the expense breakdown
    #[arg(long)]
    pub no_expenses: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

impl OutputFormat {
    /// Parse the `output.format` config value. Unknown values fall back to
    /// the default.
    #[must_use]
    pub fn from_config(value: &str) -> Self {
        Self::from_str(value, true).unwrap_or_default()
    }
}

/// Split a `key=value` argument.
///
/// # Errors
///
/// Returns a message when the argument has no `=` or an empty key.
pub fn parse_pair(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
