use std::fs;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Parser;
use colored::*;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use donor_portal::cli::{Cli, Command, PortalSettings, PromiseCommand, TripCommand};
use donor_portal::metadata::{PKG_NAME, PKG_VERSION};
use donor_portal::promises::{NewPromise, Promise, PromiseStatus, PromiseUpdate};
use donor_portal::tenant::{
    DirectoryConfigSource, HttpConfigSource, StaticConfigSource, TenantConfigSource,
};
use donor_portal::trips::{ChecklistItemUpdate, NewChecklistItem, NewTrip, Trip, TripStatus, TripUpdate};
use donor_portal::{FileBackend, KeyValueStore, Portal, PortalError, TenantKey};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    cli.settings.validate()?;

    if let Command::Version = cli.command {
        println!("{PKG_NAME} {PKG_VERSION}");
        return Ok(());
    }

    let mut portal = open_portal(&cli.settings)?;
    run(&mut portal, cli.command)
}

fn open_store(settings: &PortalSettings) -> KeyValueStore {
    if settings.ephemeral {
        return KeyValueStore::in_memory();
    }
    let Some(path) = settings.storage_path() else {
        warn!("no home directory found, changes will not be saved");
        return KeyValueStore::unavailable();
    };
    match FileBackend::open(path.clone()) {
        Ok(backend) => {
            debug!(path = %path.display(), "storage opened");
            KeyValueStore::new(backend)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "storage unavailable, changes will not be saved");
            KeyValueStore::unavailable()
        }
    }
}

fn config_source(settings: &PortalSettings) -> Box<dyn TenantConfigSource> {
    if let Some(url) = &settings.tenant_config_url {
        return Box::new(HttpConfigSource::new(url));
    }
    match settings.resolved_tenant_config_dir() {
        Some(dir) => Box::new(DirectoryConfigSource::new(dir)),
        None => Box::new(StaticConfigSource::new()),
    }
}

fn open_portal(settings: &PortalSettings) -> CliResult<Portal> {
    let default_tenant = TenantKey::parse(&settings.default_tenant)?;
    Ok(Portal::open(
        open_store(settings),
        config_source(settings),
        default_tenant,
    ))
}

fn run(portal: &mut Portal, command: Command) -> CliResult<()> {
    match command {
        Command::Tenants => {
            let current = portal.registry().current_tenant().as_str();
            for key in portal.registry().available_tenants() {
                if *key == current {
                    println!("{} {}", "*".green(), key.bold());
                } else {
                    println!("  {key}");
                }
            }
        }
        Command::Switch { key } => {
            let config = portal.switch_tenant(&key)?;
            println!("{}", format!("Switched to {key} ({})", config.name).green());
        }
        Command::Login { email, password } => {
            let state = portal.login(&email, &password)?;
            if let Some(user) = state.user {
                println!(
                    "{}",
                    format!(
                        "Logged in as {} ({}) on {}",
                        user.display_name(),
                        user.role,
                        user.tenant_key
                    )
                    .green()
                );
            }
        }
        Command::Logout => {
            portal.logout();
            println!("{}", "Logged out".green());
        }
        Command::Whoami => {
            let tenant = portal.registry().current_tenant();
            match portal.session().current_user() {
                Some(user) => println!(
                    "{} <{}> {} on {tenant}",
                    user.display_name().bold(),
                    user.email,
                    user.role
                ),
                None => println!("{} (tenant {tenant})", "Not logged in".yellow()),
            }
        }
        Command::Trips(command) => {
            let email = portal.require(&[])?.email.clone();
            run_trips(portal, command, &email)?;
        }
        Command::Promises(command) => {
            let email = portal.require(&[])?.email.clone();
            run_promises(portal, command, &email)?;
        }
        Command::Version => println!("{PKG_NAME} {PKG_VERSION}"),
    }
    Ok(())
}

fn run_trips(portal: &mut Portal, command: TripCommand, user_email: &str) -> CliResult<()> {
    let trips = portal.trips_mut();
    match command {
        TripCommand::List { status } => {
            let listed = match status {
                Some(status) => trips.filter_by_status(status),
                None => trips.list().to_vec(),
            };
            if listed.is_empty() {
                println!("{}", "No trips".yellow());
            }
            listed.iter().for_each(print_trip);
        }
        TripCommand::Show { id } => {
            let trip = trips
                .get_by_id(&id)
                .ok_or_else(|| PortalError::TripNotFound(id.clone()))?;
            println!("{}", serde_json::to_string_pretty(trip)?);
        }
        TripCommand::Create {
            title,
            destination,
            start,
            end,
            description,
            status,
        } => {
            let trip = trips.create(NewTrip {
                description,
                status,
                created_by: user_email.to_string(),
                ..NewTrip::new(title, destination, midnight(start), midnight(end))
            });
            println!("{} {}", "Created trip".green(), trip.id.bold());
        }
        TripCommand::UpdateStatus { id, status } => {
            let trip = trips.update(
                &id,
                TripUpdate {
                    status: Some(status),
                    ..TripUpdate::default()
                },
            )?;
            print_trip(&trip);
        }
        TripCommand::Delete { id } => {
            trips.delete(&id);
            println!("{}", format!("Deleted trip {id}").green());
        }
        TripCommand::AddItem {
            trip_id,
            title,
            description,
            category,
            priority,
            due,
        } => {
            let trip = trips.add_checklist_item(
                &trip_id,
                NewChecklistItem {
                    description,
                    due_date: due.map(midnight),
                    ..NewChecklistItem::new(title, category, priority)
                },
            )?;
            if let Some(item) = trip.checklist.last() {
                println!("{} {}", "Added item".green(), item.id.bold());
            }
        }
        TripCommand::Check {
            trip_id,
            item_id,
            undo,
        } => {
            let trip = trips.update_checklist_item(
                &trip_id,
                &item_id,
                ChecklistItemUpdate::completed(!undo),
            )?;
            println!(
                "{} {}/{} done ({}%)",
                trip.title.bold(),
                trip.completed_count(),
                trip.checklist.len(),
                trip.progress_percentage()
            );
        }
    }
    Ok(())
}

fn run_promises(portal: &mut Portal, command: PromiseCommand, user_email: &str) -> CliResult<()> {
    let promises = portal.promises_mut();
    match command {
        PromiseCommand::List { status, category } => {
            let listed = match (status, category) {
                (None, None) => promises.list().to_vec(),
                (Some(status), None) => promises.filter_by_status(status),
                (None, Some(category)) => promises.filter_by_category(category),
                (Some(status), Some(category)) => {
                    promises.filter(|p| p.status == status && p.category == category)
                }
            };
            if listed.is_empty() {
                println!("{}", "No promises".yellow());
            }
            listed.iter().for_each(print_promise);
        }
        PromiseCommand::Create {
            title,
            category,
            description,
            amount,
            currency,
            due,
            notes,
        } => {
            let promise = promises.create(NewPromise {
                description,
                amount,
                currency,
                due_date: due.map(midnight),
                notes,
                created_by: user_email.to_string(),
                ..NewPromise::new(title, category)
            });
            println!("{} {}", "Created promise".green(), promise.id.bold());
        }
        PromiseCommand::UpdateStatus { id, status } => {
            let promise = promises.update(&id, PromiseUpdate::status(status))?;
            print_promise(&promise);
        }
        PromiseCommand::Fulfil { id, notes } => {
            let promise = promises.mark_as_fulfilled(&id, notes)?;
            print_promise(&promise);
        }
        PromiseCommand::Delete { id } => {
            promises.delete(&id);
            println!("{}", format!("Deleted promise {id}").green());
        }
        PromiseCommand::ExportCsv { output } => {
            let csv = promises.export_csv();
            match output {
                Some(path) => {
                    fs::write(&path, csv)?;
                    println!(
                        "{}",
                        format!("Exported {} promises to {}", promises.len(), path.display())
                            .green()
                    );
                }
                None => println!("{csv}"),
            }
        }
    }
    Ok(())
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn print_trip(trip: &Trip) {
    let status = match trip.status {
        TripStatus::Planning => trip.status.as_str().yellow(),
        TripStatus::Active => trip.status.as_str().cyan(),
        TripStatus::Completed => trip.status.as_str().green(),
    };
    println!(
        "{}  {}  {}  {} to {}  [{status}]  {}%",
        trip.id.dimmed(),
        trip.title.bold(),
        trip.destination,
        trip.start_date.format("%Y-%m-%d"),
        trip.end_date.format("%Y-%m-%d"),
        trip.progress_percentage()
    );
}

fn print_promise(promise: &Promise) {
    let status = match promise.status {
        PromiseStatus::Pending => promise.status.as_str().yellow(),
        PromiseStatus::InProgress => promise.status.as_str().cyan(),
        PromiseStatus::Fulfilled => promise.status.as_str().green(),
        PromiseStatus::Cancelled => promise.status.as_str().red(),
    };
    let amount = match (promise.amount, promise.currency.as_deref()) {
        (Some(amount), Some(currency)) => format!("  {amount} {currency}"),
        (Some(amount), None) => format!("  {amount}"),
        _ => String::new(),
    };
    println!(
        "{}  {}  {}  [{status}]{amount}",
        promise.id.dimmed(),
        promise.title.bold(),
        promise.category
    );
}
