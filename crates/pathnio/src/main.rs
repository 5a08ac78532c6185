//! `pathnio` - CLI for the Pathnio fleet-management API
//!
//! This binary signs in to the backend, keeps the session on disk, and maps
//! each resource to a subcommand.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use tracing::debug;

use pathnio::api;
use pathnio::cli::output::{key_values, render_list, render_one, render_value, Tabular};
use pathnio::cli::{
    parse_pair, AlertsCommand, Cli, Command, ConfigCommand, ContactCommand, DriversCommand,
    ExpensesCommand, LoginCommand, OutputFormat, PasswordCommand, ProfileCommand,
    RegisterCommand, SettingsCommand, SubscriptionsCommand, SummaryCommand, TicketsCommand,
    TripsCommand, UsersCommand, VehiclesCommand,
};
use pathnio::models::{
    AlertLevel, CompanyRegistration, ContactMessage, Credentials, DriverRegistration,
    ExpenseCategory, NewExpense, NewTicket, NewTrip, NewUser, NewVehicle, PasswordChange, Plan,
    ProfileUpdate, SiteSettingsUpdate, TicketCategory, TicketPriority, TicketReply, TripStatus,
    UserAccount, UserUpdate, VehicleStatus,
};
use pathnio::stats::{filter_tickets, FleetSummary, TicketCounts, TicketFilter};
use pathnio::{
    init_logging, ApiClient, Config, Error, LogNavigator, Session, SessionState, SqliteStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let result = run(&cli).await;
    if let Err(err) = &result {
        if matches!(err.downcast_ref::<Error>(), Some(Error::Unauthorized)) {
            eprintln!("Your session has ended. Run `pathnio login` to sign in again.");
        }
    }
    result
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    // Config commands report on the configuration itself, so they run before
    // it is validated
    if let Command::Config(cmd) = &cli.command {
        return handle_config(cli, cmd);
    }

    let config = Config::load_from(cli.config.clone())?;
    let format = cli.output_format(&config.output.format);
    let client = connect(cli, &config)?;

    match &cli.command {
        Command::Login(cmd) => handle_login(&client, cmd, format).await,
        Command::Logout => {
            api::auth::logout(&client).await?;
            println!("Logged out.");
            Ok(())
        }
        Command::Status => handle_status(&client, &config, cli.ephemeral, format).await,
        Command::Whoami => handle_whoami(&client, format).await,
        Command::Profile(cmd) => handle_profile(&client, cmd, format).await,
        Command::Password(cmd) => handle_password(&client, cmd).await,
        Command::Register(cmd) => handle_register(&client, cmd, format).await,
        Command::Users(cmd) => handle_users(&client, cmd, format).await,
        Command::Drivers(cmd) => handle_drivers(&client, cmd, format).await,
        Command::Vehicles(cmd) => handle_vehicles(&client, cmd, format).await,
        Command::Trips(cmd) => handle_trips(&client, cmd, format).await,
        Command::Expenses(cmd) => handle_expenses(&client, cmd, format).await,
        Command::Subscriptions(cmd) => handle_subscriptions(&client, cmd, format).await,
        Command::Alerts(cmd) => handle_alerts(&client, cmd, format).await,
        Command::Tickets(cmd) => handle_tickets(&client, cmd, format).await,
        Command::Contact(cmd) => handle_contact(&client, cmd).await,
        Command::Settings(cmd) => handle_settings(&client, cmd, format).await,
        Command::Summary(cmd) => handle_summary(&client, cmd, format).await,
        Command::Config(cmd) => handle_config(cli, cmd),
    }
}

/// Open the session and build the client.
fn connect(cli: &Cli, config: &Config) -> anyhow::Result<ApiClient> {
    let session = if cli.ephemeral {
        Session::in_memory()
    } else {
        let path = config.session_store_path();
        let store = SqliteStore::open(&path)
            .with_context(|| format!("opening session store {}", path.display()))?;
        Session::new(Arc::new(store))
    };
    Ok(ApiClient::from_config(config, session, Arc::new(LogNavigator))?)
}

fn print(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}

fn print_list<T: Tabular + Serialize>(items: &[T], format: OutputFormat) -> anyhow::Result<()> {
    if items.is_empty() && format != OutputFormat::Json {
        println!("Nothing to show.");
        return Ok(());
    }
    print(&render_list(items, format)?);
    Ok(())
}

fn print_one<T: Tabular + Serialize>(item: &T, format: OutputFormat) -> anyhow::Result<()> {
    print(&render_one(item, format)?);
    Ok(())
}

/// Ask on stderr and read one line from stdin.
fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{label}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{question} [y/N]"))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn require_login(client: &ApiClient) -> anyhow::Result<()> {
    if client.session().state()? == SessionState::Anonymous {
        return Err(Error::NotLoggedIn.into());
    }
    Ok(())
}

async fn handle_login(
    client: &ApiClient,
    cmd: &LoginCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let username = match &cmd.username {
        Some(u) => u.clone(),
        None => prompt("Username")?,
    };
    let password = match &cmd.password {
        Some(p) => p.clone(),
        None => prompt("Password (input is visible)")?,
    };
    if username.is_empty() || password.is_empty() {
        bail!("username and password are required");
    }

    let user = api::auth::login(client, &Credentials { username, password }).await?;
    if format == OutputFormat::Json {
        print_one(&user, format)
    } else {
        println!("Logged in as {}.", user.display_name());
        Ok(())
    }
}

async fn handle_status(
    client: &ApiClient,
    config: &Config,
    ephemeral: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let state = client.session().state()?;
    let user = client.session().user()?;
    let token = match state {
        SessionState::Anonymous => "none",
        SessionState::Authenticated => match api::auth::verify_token(client).await {
            Ok(true) => "valid",
            Ok(false) => "rejected",
            Err(e) if e.is_unauthorized() => "rejected",
            Err(e) => {
                debug!("Token check failed: {e}");
                "unverified"
            }
        },
    };

    let store = if ephemeral {
        "memory".to_string()
    } else {
        config.session_store_path().display().to_string()
    };
    let status = serde_json::json!({
        "api": client.base().to_string(),
        "session": state.to_string(),
        "token": token,
        "user": user.as_ref().map(|u| u.username.clone()),
        "store": store,
    });
    print(&render_value(&status, format)?);
    Ok(())
}

async fn handle_whoami(client: &ApiClient, format: OutputFormat) -> anyhow::Result<()> {
    require_login(client)?;
    let user = api::auth::refresh_user(client).await?;
    print_one(&user, format)
}

async fn handle_profile(
    client: &ApiClient,
    cmd: &ProfileCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    require_login(client)?;
    let profile = match cmd {
        ProfileCommand::Show => api::profile::fetch(client).await?,
        ProfileCommand::Update {
            name,
            phone,
            address,
            language,
        } => {
            let changes = ProfileUpdate {
                manager_full_name: name.clone(),
                phone: phone.clone(),
                address: address.clone(),
                language: language.clone(),
            };
            if changes.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            api::profile::update(client, &changes).await?
        }
        ProfileCommand::Photo { path } => api::profile::upload_photo(client, path).await?,
    };
    print_one(&profile, format)
}

async fn handle_password(client: &ApiClient, cmd: &PasswordCommand) -> anyhow::Result<()> {
    require_login(client)?;
    let old_password = match &cmd.old {
        Some(p) => p.clone(),
        None => prompt("Current password (input is visible)")?,
    };
    let new_password = match &cmd.new {
        Some(p) => p.clone(),
        None => prompt("New password (input is visible)")?,
    };
    let confirmation = match (&cmd.confirm, &cmd.new) {
        (Some(c), _) => c.clone(),
        (None, Some(_)) => new_password.clone(),
        (None, None) => prompt("Repeat new password")?,
    };
    let change = PasswordChange {
        old_password,
        new_password,
    };
    change
        .validate(&confirmation)
        .map_err(anyhow::Error::msg)?;
    api::auth::change_password(client, &change).await?;
    println!("Password changed.");
    Ok(())
}

async fn handle_register(
    client: &ApiClient,
    cmd: &RegisterCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let created = match cmd {
        RegisterCommand::Company {
            username,
            email,
            password,
            company_name,
            manager,
            phone,
            address,
        } => {
            let registration = CompanyRegistration {
                user: UserAccount {
                    username: username.clone(),
                    email: email.clone(),
                    password: Some(password.clone()),
                },
                company_name: company_name.clone(),
                manager_full_name: manager.clone(),
                phone: phone.clone(),
                address: address.clone(),
            };
            api::auth::register_company(client, &registration).await?
        }
        RegisterCommand::Driver {
            full_name,
            mobile,
            plate,
            password,
            vehicle_type,
            company,
        } => {
            let mut registration =
                DriverRegistration::from_mobile(full_name, mobile, plate, password);
            if let Some(vehicle_type) = vehicle_type {
                registration.vehicle_type.clone_from(vehicle_type);
            }
            registration.company = *company;
            api::auth::register_driver(client, &registration).await?
        }
    };

    if format == OutputFormat::Json {
        print(&render_value(&created, format)?);
    } else {
        println!("Registration submitted. Sign in with `pathnio login`.");
    }
    Ok(())
}

async fn handle_users(
    client: &ApiClient,
    cmd: &UsersCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    require_login(client)?;
    match cmd {
        UsersCommand::List => print_list(&api::users::list(client).await?, format),
        UsersCommand::Create {
            username,
            email,
            password,
            full_name,
            phone,
            company_name,
            staff,
        } => {
            let user = NewUser {
                username: username.clone(),
                email: email.clone(),
                password: password.clone(),
                full_name: full_name.clone(),
                phone: phone.clone(),
                company_name: company_name.clone(),
                is_staff: *staff,
            };
            print_one(&api::users::create(client, &user).await?, format)
        }
        UsersCommand::Update {
            id,
            username,
            email,
            full_name,
            phone,
            company_name,
            staff,
        } => {
            let changes = UserUpdate {
                username: username.clone(),
                email: email.clone(),
                full_name: full_name.clone(),
                phone: phone.clone(),
                company_name: company_name.clone(),
                is_staff: *staff,
            };
            if changes.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            print_one(&api::users::update(client, *id, &changes).await?, format)
        }
        UsersCommand::Delete { id, yes } => {
            if !*yes && !confirm(&format!("Delete user {id}?"))? {
                println!("Cancelled.");
                return Ok(());
            }
            api::users::delete(client, *id).await?;
            println!("Deleted user {id}.");
            Ok(())
        }
    }
}

async fn handle_drivers(
    client: &ApiClient,
    cmd: &DriversCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    require_login(client)?;
    match cmd {
        DriversCommand::List => print_list(&api::fleet::list_drivers(client).await?, format),
        DriversCommand::Show { id } => {
            print_one(&api::fleet::get_driver(client, *id).await?, format)
        }
    }
}

async fn handle_vehicles(
    client: &ApiClient,
    cmd: &VehiclesCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    require_login(client)?;
    match cmd {
        VehiclesCommand::List { status } => {
            let mut vehicles = api::fleet::list_vehicles(client).await?;
            if let Some(status) = status.as_deref().map(VehicleStatus::from) {
                vehicles.retain(|v| v.status == status);
            }
            print_list(&vehicles, format)
        }
        VehiclesCommand::Show { id } => {
            print_one(&api::fleet::get_vehicle(client, *id).await?, format)
        }
        VehiclesCommand::Create {
            plate,
            vehicle_type,
            driver,
            status,
            capacity,
            color,
        } => {
            let vehicle = NewVehicle {
                plate_number: plate.clone(),
                vehicle_type: vehicle_type.clone(),
                driver: driver.clone(),
                status: VehicleStatus::from(status.as_str()),
                capacity: capacity.clone(),
                color: color.clone(),
            };
            print_one(&api::fleet::create_vehicle(client, &vehicle).await?, format)
        }
    }
}

async fn handle_trips(
    client: &ApiClient,
    cmd: &TripsCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    require_login(client)?;
    match cmd {
        TripsCommand::List { status } => {
            let mut trips = api::fleet::list_trips(client).await?;
            if let Some(status) = status.as_deref().map(TripStatus::from) {
                trips.retain(|t| t.status == status);
            }
            print_list(&trips, format)
        }
        TripsCommand::Show { id } => print_one(&api::fleet::get_trip(client, *id).await?, format),
        TripsCommand::Create {
            driver,
            vehicle,
            origin,
            destination,
            start,
            end,
            status,
            notes,
        } => {
            let trip = NewTrip {
                driver: driver.clone(),
                vehicle: vehicle.clone(),
                origin: origin.clone(),
                destination: destination.clone(),
                start: start.clone(),
                end: end.clone(),
                status: TripStatus::from(status.as_str()),
                notes: notes.clone(),
            };
            print_one(&api::fleet::create_trip(client, &trip).await?, format)
        }
    }
}

async fn handle_expenses(
    client: &ApiClient,
    cmd: &ExpensesCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    require_login(client)?;
    match cmd {
        ExpensesCommand::List { category } => {
            let mut expenses = api::fleet::list_expenses(client).await?;
            if let Some(category) = category.as_deref().map(ExpenseCategory::from) {
                expenses.retain(|e| e.category == category);
            }
            print_list(&expenses, format)
        }
        ExpensesCommand::Show { id } => {
            print_one(&api::fleet::get_expense(client, *id).await?, format)
        }
        ExpensesCommand::Create {
            amount,
            category,
            description,
            driver,
            vehicle,
            date,
            payment_method,
            notes,
        } => {
            if *amount <= 0.0 {
                bail!("amount must be positive");
            }
            let expense = NewExpense {
                amount: *amount,
                category: ExpenseCategory::from(category.as_str()),
                description: description.clone(),
                driver: driver.clone(),
                vehicle: vehicle.clone(),
                date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                payment_method: payment_method.clone(),
                notes: notes.clone(),
            };
            print_one(&api::fleet::create_expense(client, &expense).await?, format)
        }
    }
}

async fn handle_subscriptions(
    client: &ApiClient,
    cmd: &SubscriptionsCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if let SubscriptionsCommand::Plans = cmd {
        return print_list(&Plan::catalog(), format);
    }

    require_login(client)?;
    match cmd {
        SubscriptionsCommand::Plans => Ok(()),
        SubscriptionsCommand::List => print_list(&api::billing::list(client).await?, format),
        SubscriptionsCommand::Buy { plan } => {
            let catalog = Plan::catalog();
            let Some(plan) = Plan::find(&catalog, plan) else {
                bail!("unknown plan '{plan}'; see `pathnio subscriptions plans`");
            };
            print_one(&api::billing::buy(client, &plan.name).await?, format)
        }
        SubscriptionsCommand::Renew { id } => {
            api::billing::renew(client, *id).await?;
            println!("Renewed subscription {id}.");
            Ok(())
        }
        SubscriptionsCommand::Cancel { id, yes } => {
            if !*yes && !confirm(&format!("Cancel subscription {id}?"))? {
                println!("Kept subscription {id}.");
                return Ok(());
            }
            api::billing::cancel(client, *id).await?;
            println!("Cancelled subscription {id}.");
            Ok(())
        }
    }
}

async fn handle_alerts(
    client: &ApiClient,
    cmd: &AlertsCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    require_login(client)?;
    let mut alerts = api::support::list_alerts(client).await?;
    if let Some(level) = cmd.level.as_deref().map(AlertLevel::from) {
        alerts.retain(|a| a.level == level);
    }
    print_list(&alerts, format)
}

async fn handle_tickets(
    client: &ApiClient,
    cmd: &TicketsCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    require_login(client)?;
    match cmd {
        TicketsCommand::List { search, status } => {
            let tickets = api::support::list_tickets(client).await?;
            let filter = TicketFilter::new(search.as_deref(), status.as_deref());
            let shown: Vec<_> = filter_tickets(&tickets, &filter)
                .into_iter()
                .cloned()
                .collect();
            print_list(&shown, format)?;

            if format != OutputFormat::Json {
                let counts = TicketCounts::from_tickets(&tickets);
                println!(
                    "\n{} tickets, {} open, {} closed",
                    counts.total, counts.open, counts.closed
                );
            }
            Ok(())
        }
        TicketsCommand::Create {
            subject,
            message,
            category,
            priority,
        } => {
            let ticket = NewTicket {
                subject: subject.clone(),
                message: message.clone(),
                category: TicketCategory::from(category.as_str()),
                priority: TicketPriority::from(priority.as_str()),
            };
            print_one(&api::support::create_ticket(client, &ticket).await?, format)
        }
        TicketsCommand::Reply { id, message } => {
            let reply = TicketReply {
                message: message.clone(),
            };
            api::support::reply(client, *id, &reply).await?;
            println!("Replied to ticket {id}.");
            Ok(())
        }
    }
}

async fn handle_contact(client: &ApiClient, cmd: &ContactCommand) -> anyhow::Result<()> {
    let message = ContactMessage {
        name: cmd.name.clone(),
        email: cmd.email.clone(),
        subject: cmd.subject.clone(),
        message: cmd.message.clone(),
    };
    api::support::contact(client, &message).await?;
    println!("Message sent.");
    Ok(())
}

async fn handle_settings(
    client: &ApiClient,
    cmd: &SettingsCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    require_login(client)?;
    let settings = match cmd {
        SettingsCommand::Show => api::settings::get(client).await?,
        SettingsCommand::Set { pairs } => {
            let mut changes = SiteSettingsUpdate::default();
            for raw in pairs {
                let (key, value) = parse_pair(raw).map_err(anyhow::Error::msg)?;
                changes.set(key, value).map_err(anyhow::Error::msg)?;
            }
            api::settings::update(client, &changes).await?
        }
    };
    print_one(&settings, format)
}

async fn handle_summary(
    client: &ApiClient,
    cmd: &SummaryCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    require_login(client)?;
    let (drivers, vehicles, trips, expenses) = tokio::try_join!(
        api::fleet::list_drivers(client),
        api::fleet::list_vehicles(client),
        api::fleet::list_trips(client),
        async {
            if cmd.no_expenses {
                Ok(Vec::new())
            } else {
                api::fleet::list_expenses(client).await
            }
        },
    )?;
    let summary = FleetSummary::from_parts(&drivers, &vehicles, &trips, &expenses);

    if format == OutputFormat::Json {
        print(&render_value(&summary, format)?);
        return Ok(());
    }

    let counts = |map: &std::collections::BTreeMap<String, usize>| {
        map.iter()
            .map(|(k, v)| format!("{k} {v}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut lines = vec![
        ("drivers", summary.drivers.to_string()),
        (
            "vehicles",
            format!("{} ({})", summary.vehicles, counts(&summary.vehicles_by_status)),
        ),
        (
            "trips",
            format!("{} ({})", summary.trips, counts(&summary.trips_by_status)),
        ),
    ];
    if !cmd.no_expenses {
        lines.push((
            "expenses",
            format!(
                "{} totalling {:.0} Toman, {} pending",
                summary.expenses, summary.expense_total, summary.pending_expenses
            ),
        ));
        for (category, total) in &summary.expense_by_category {
            lines.push(("", format!("{category}: {total:.0}")));
        }
    }
    print(&key_values(lines));
    Ok(())
}

fn handle_config(cli: &Cli, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = Config::load_from(cli.config.clone())?;
            let format = cli.output_format(&config.output.format);
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Configuration:");
                println!("  API:");
                println!("    Base URL: {}", config.api.base_url);
                println!("    Timeout: {}s", config.api.timeout_secs);
                println!("    User agent: {}", config.api.user_agent);
                println!("  Session:");
                println!("    Store: {}", config.session_store_path().display());
                println!("    Login path: {}", config.session.login_path);
                println!("  Output:");
                println!("    Format: {}", config.output.format);
            }
        }
        ConfigCommand::Path => {
            let path = cli.config.clone().unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .clone()
                .or_else(|| cli.config.clone())
                .unwrap_or_else(Config::default_config_path);
            match Config::load_from(Some(path.clone())) {
                Ok(_) => println!("Configuration is valid: {}", path.display()),
                Err(e) => bail!("{}: {e}", path.display()),
            }
        }
    }
    Ok(())
}
