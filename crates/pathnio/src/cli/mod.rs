//! Command-line interface for pathnio.
//!
//! This module provides the CLI structure for the `pathnio` binary. Command
//! handlers live in `main.rs`; rendering helpers live in [`output`].

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    parse_pair, AlertsCommand, ConfigCommand, ContactCommand, DriversCommand, ExpensesCommand,
    LoginCommand, OutputFormat, PasswordCommand, ProfileCommand, RegisterCommand,
    SettingsCommand, SubscriptionsCommand, SummaryCommand, TicketsCommand, TripsCommand,
    UsersCommand, VehiclesCommand,
};

/// pathnio - Manage a Pathnio fleet from the terminal
///
/// Signs in to the Pathnio backend, keeps the session on disk, and exposes
/// drivers, vehicles, trips, expenses, subscriptions and support tickets as
/// subcommands.
#[derive(Debug, Parser)]
#[command(name = "pathnio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format (defaults to `output.format` from the config)
    #[arg(short = 'o', long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Keep the session in memory only, for this invocation
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session
    Login(LoginCommand),

    /// Sign out and clear the stored session
    Logout,

    /// Show backend and session status
    Status,

    /// Show the signed-in user
    Whoami,

    /// View or edit the company profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Change the signed-in user's password
    Password(PasswordCommand),

    /// Register a new company or driver account
    #[command(subcommand)]
    Register(RegisterCommand),

    /// Administer users
    #[command(subcommand)]
    Users(UsersCommand),

    /// List and inspect drivers
    #[command(subcommand)]
    Drivers(DriversCommand),

    /// List, inspect and register vehicles
    #[command(subcommand)]
    Vehicles(VehiclesCommand),

    /// List, inspect and schedule trips
    #[command(subcommand)]
    Trips(TripsCommand),

    /// List, inspect and record expenses
    #[command(subcommand)]
    Expenses(ExpensesCommand),

    /// Manage subscriptions and browse plans
    #[command(subcommand)]
    Subscriptions(SubscriptionsCommand),

    /// Show dashboard alerts
    Alerts(AlertsCommand),

    /// Work with support tickets
    #[command(subcommand)]
    Tickets(TicketsCommand),

    /// Send a message through the contact form
    Contact(ContactCommand),

    /// View or change site settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Summarize drivers, vehicles, trips and expenses
    Summary(SummaryCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// The output format: the flag if given, else the configured default.
    #[must_use]
    pub fn output_format(&self, configured: &str) -> OutputFormat {
        self.output
            .unwrap_or_else(|| OutputFormat::from_config(configured))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "pathnio");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["pathnio", "-q", "status"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["pathnio", "status"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["pathnio", "-v", "status"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["pathnio", "-vv", "status"]).verbosity(), Verbosity::Trace);
    }

    fn password_arg(path: &[&str], id: &str) -> clap::Arg {
        let mut cmd = Cli::command();
        for name in path {
            cmd = cmd.find_subcommand(name).unwrap().clone();
        }
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == id)
            .unwrap()
            .clone();
        arg
    }

    #[test]
    fn test_password_args_read_env_and_warn() {
        for (path, id, var) in [
            (&["login"][..], "password", "PATHNIO_PASSWORD"),
            (&["password"][..], "old", "PATHNIO_PASSWORD"),
            (&["password"][..], "new", "PATHNIO_NEW_PASSWORD"),
            (&["register", "company"][..], "password", "PATHNIO_NEW_PASSWORD"),
            (&["register", "driver"][..], "password", "PATHNIO_NEW_PASSWORD"),
            (&["users", "create"][..], "password", "PATHNIO_NEW_PASSWORD"),
        ] {
            let arg = password_arg(path, id);
            assert_eq!(arg.get_env().and_then(|v| v.to_str()), Some(var), "{path:?}");
            assert!(arg.is_hide_env_values_set(), "{path:?}");
        }

        let login = password_arg(&["login"], "password");
        let help = login
            .get_long_help()
            .or(login.get_help())
            .map(ToString::to_string)
            .unwrap_or_default();
        assert!(help.contains("shell history"));
    }

    #[test]
    fn test_password_change_flags_optional() {
        let cli = parse(&["pathnio", "password", "--confirm", "secret9"]);
        match cli.command {
            Command::Password(cmd) => assert_eq!(cmd.confirm.as_deref(), Some("secret9")),
            _ => panic!("expected password command"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["pathnio", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["pathnio", "drivers", "list", "-o", "json", "--ephemeral"]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(cli.ephemeral);
    }

    #[test]
    fn test_output_format_falls_back_to_config() {
        let cli = parse(&["pathnio", "status"]);
        assert_eq!(cli.output_format("plain"), OutputFormat::Plain);
        assert_eq!(cli.output_format("json"), OutputFormat::Json);

        let cli = parse(&["pathnio", "-o", "table", "status"]);
        assert_eq!(cli.output_format("json"), OutputFormat::Table);
    }

    #[test]
    fn test_parse_login() {
        let cli = parse(&["pathnio", "login", "-u", "fleetmgr"]);
        match cli.command {
            Command::Login(cmd) => assert_eq!(cmd.username.as_deref(), Some("fleetmgr")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_resource_subcommands() {
        assert!(matches!(
            parse(&["pathnio", "vehicles", "show", "4"]).command,
            Command::Vehicles(VehiclesCommand::Show { id: 4 })
        ));
        assert!(matches!(
            parse(&["pathnio", "subscriptions", "renew", "9"]).command,
            Command::Subscriptions(SubscriptionsCommand::Renew { id: 9 })
        ));
        assert!(matches!(
            parse(&["pathnio", "users", "delete", "3", "--yes"]).command,
            Command::Users(UsersCommand::Delete { id: 3, yes: true })
        ));
        assert!(matches!(
            parse(&["pathnio", "config", "path"]).command,
            Command::Config(ConfigCommand::Path)
        ));
    }

    #[test]
    fn test_parse_tickets_list_filters() {
        let cli = parse(&[
            "pathnio", "tickets", "list", "--search", "gps", "--status", "open",
        ]);
        match cli.command {
            Command::Tickets(TicketsCommand::List { search, status }) => {
                assert_eq!(search.as_deref(), Some("gps"));
                assert_eq!(status.as_deref(), Some("open"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["pathnio"]).is_err());
    }
}
