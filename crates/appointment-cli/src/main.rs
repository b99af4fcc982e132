//! `appt` CLI: validate, book, and report on customer appointments stored in
//! a JSON dataset.
//!
//! ## Usage
//!
//! ```sh
//! # Would 09:00-10:00 Los Angeles time be accepted?
//! appt --store data.json --zone America/Los_Angeles check --start "2026-03-16 09:00" --end "2026-03-16 10:00"
//!
//! # Book it
//! appt --store data.json add --customer 1 --contact 2 --user 1 \
//!     --title Kickoff --description "Project kickoff" --type "Planning Session" \
//!     --location Phoenix --start "2026-03-16 09:00" --end "2026-03-16 10:00"
//!
//! # Move an existing appointment
//! appt --store data.json update --id 3 --start "2026-03-17 09:00" --end "2026-03-17 10:00"
//!
//! # Add a customer, then change their phone number
//! appt --store data.json divisions --country 1
//! appt --store data.json customer add --name "Ada Lane" --address "12 Elm St" \
//!     --postal-code 85001 --phone 555-0199 --division 2
//! appt --store data.json customer update --id 4 --phone 555-0200
//!
//! # Selectable picker times for a day
//! appt --zone Asia/Tokyo slots --date 2026-03-16
//!
//! # Reports as JSON
//! appt --store data.json report monthly
//!
//! # Business hours as seen from a zone
//! appt --zone Europe/London hours --date 2026-03-16
//! ```
//!
//! Policy settings come from `--config <file>` and the `APPT_*` environment
//! variables. Set `RUST_LOG=debug` to see each validation step on stderr.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use appointment_engine::config::{parse_zone, PolicyConfig};
use appointment_engine::directory::Directory;
use appointment_engine::file_store::{with_file_store, FileStore};
use appointment_engine::model::{
    Appointment, AppointmentDraft, AppointmentId, Contact, ContactId, CountryId, Customer,
    CustomerDraft, CustomerId, Division, DivisionId, UserId,
};
use appointment_engine::report::{
    contact_schedules, division_bookings, monthly_type_counts, upcoming, Period,
};
use appointment_engine::{
    list_selectable_ends, list_selectable_starts, AppointmentStore, BusinessHours, DirectoryStore,
    ScheduleError, Scheduler, StoreError,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "appt",
    version,
    about = "Validate and book customer appointments within business hours"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON dataset holding appointments and reference tables
    #[arg(long, global = true, default_value = "appointments.json")]
    store: PathBuf,

    /// JSON business-hours policy (defaults: America/New_York, 08:00, 14h, 10min)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Zone times are entered and shown in (falls back to $TZ, then UTC)
    #[arg(long, global = true)]
    zone: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an interval could be saved, without saving it
    Check {
        #[arg(long, value_parser = parse_datetime)]
        start: NaiveDateTime,
        #[arg(long, value_parser = parse_datetime)]
        end: NaiveDateTime,
        /// Id of the appointment being edited
        #[arg(long)]
        exclude: Option<i64>,
    },
    /// Validate and store a new appointment
    Add(AddArgs),
    /// Validate and store changes to an appointment
    Update(UpdateArgs),
    /// Remove an appointment
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Remove a customer and all of their appointments
    DeleteCustomer {
        #[arg(long)]
        id: i64,
    },
    /// Add or edit customer records
    Customer {
        #[command(subcommand)]
        action: CustomerCommand,
    },
    /// List first-level divisions and their countries as JSON
    Divisions {
        /// Only divisions in this country
        #[arg(long)]
        country: Option<i64>,
    },
    /// List appointments as JSON
    List {
        #[arg(long, conflicts_with = "contact")]
        customer: Option<i64>,
        #[arg(long)]
        contact: Option<i64>,
        /// Only appointments starting within the next week or month
        #[arg(long, value_enum)]
        within: Option<Window>,
    },
    /// Selectable start and end times for one business day
    Slots {
        /// Home-zone date of the shift (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Print report data as JSON
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
    },
    /// Check a user name and password
    Login {
        #[arg(long)]
        user: String,
        #[arg(long)]
        password: String,
    },
    /// Show the business-hours window in the viewer and home zones
    Hours {
        /// Home-zone date of the shift (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    customer: i64,
    #[arg(long)]
    contact: i64,
    #[arg(long)]
    user: i64,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long = "type")]
    appointment_type: String,
    #[arg(long)]
    location: String,
    #[arg(long, value_parser = parse_datetime)]
    start: NaiveDateTime,
    #[arg(long, value_parser = parse_datetime)]
    end: NaiveDateTime,
}

/// Only the given fields change; everything else keeps its stored value.
#[derive(Args)]
struct UpdateArgs {
    #[arg(long)]
    id: i64,
    #[arg(long)]
    customer: Option<i64>,
    #[arg(long)]
    contact: Option<i64>,
    #[arg(long)]
    user: Option<i64>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long = "type")]
    appointment_type: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long, value_parser = parse_datetime)]
    start: Option<NaiveDateTime>,
    #[arg(long, value_parser = parse_datetime)]
    end: Option<NaiveDateTime>,
}

#[derive(Subcommand)]
enum CustomerCommand {
    /// Store a new customer
    Add(CustomerArgs),
    /// Change fields of an existing customer
    Update(CustomerEditArgs),
}

#[derive(Args)]
struct CustomerArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    postal_code: String,
    #[arg(long)]
    phone: String,
    /// First-level division id (see `appt divisions`)
    #[arg(long)]
    division: i64,
}

/// Only the given fields change.
#[derive(Args)]
struct CustomerEditArgs {
    #[arg(long)]
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    division: Option<i64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Window {
    Week,
    Month,
}

impl From<Window> for Period {
    fn from(window: Window) -> Self {
        match window {
            Window::Week => Period::Week,
            Window::Month => Period::Month,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    /// Appointment counts by type and month
    Monthly,
    /// Each contact's appointments
    Contacts,
    /// Appointment counts by first-level division
    Divisions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger();

    let viewer = viewer_zone(cli.zone.as_deref())?;
    let hours = load_policy(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            start,
            end,
            exclude,
        } => {
            let store = open_store(&cli.store)?;
            let scheduler = Scheduler::new(store, hours, viewer);
            scheduler
                .check(start, end, exclude.map(AppointmentId))
                .map_err(explain)?;
            println!("OK: {} - {} can be saved", start, end);
        }
        Commands::Add(args) => {
            let created = with_file_store(&cli.store, |store| -> Result<_, ScheduleError> {
                let draft = build_draft(store, args)?;
                Scheduler::new(&mut *store, hours, viewer).create(draft)
            })
            .map_err(explain)?;
            print_json(&created)?;
        }
        Commands::Update(args) => {
            let updated = with_file_store(&cli.store, |store| -> Result<_, ScheduleError> {
                let id = AppointmentId(args.id);
                let current = store
                    .get(id)?
                    .ok_or(ScheduleError::UnknownAppointment(id))?;
                let edited = apply_edits(store, current, args)?;
                Scheduler::new(&mut *store, hours, viewer).update(edited)
            })
            .map_err(explain)?;
            print_json(&updated)?;
        }
        Commands::Delete { id } => {
            let removed = with_file_store(&cli.store, |store| {
                Scheduler::new(store, hours, viewer).delete(AppointmentId(id))
            })
            .map_err(explain)?;
            println!(
                "Appointment {} ({}) was cancelled",
                removed.id, removed.appointment_type
            );
        }
        Commands::DeleteCustomer { id } => {
            let removed = with_file_store(&cli.store, |store| {
                Scheduler::new(store, hours, viewer).delete_customer(CustomerId(id))
            })
            .map_err(explain_customer)?;
            println!(
                "Customer {} was deleted along with {} appointment(s)",
                id, removed
            );
        }
        Commands::Customer { action } => {
            let saved = with_file_store(&cli.store, |store| -> Result<_, ScheduleError> {
                match action {
                    CustomerCommand::Add(args) => {
                        let draft = CustomerDraft {
                            name: args.name,
                            address: args.address,
                            postal_code: args.postal_code,
                            phone: args.phone,
                            division_id: DivisionId(args.division),
                        };
                        Scheduler::new(store, hours, viewer).create_customer(draft)
                    }
                    CustomerCommand::Update(args) => {
                        let id = CustomerId(args.id);
                        let current = store
                            .customers()?
                            .into_iter()
                            .find(|c| c.id == id)
                            .ok_or(ScheduleError::UnknownCustomer(id))?;
                        let edited = apply_customer_edits(current, args);
                        Scheduler::new(store, hours, viewer).update_customer(edited)
                    }
                }
            })
            .map_err(explain_customer)?;
            print_json(&saved)?;
        }
        Commands::Divisions { country } => {
            let store = open_store(&cli.store)?;
            let directory = Directory::load(&store).map_err(unavailable)?;
            let divisions: Vec<&Division> = match country {
                Some(country) => directory.divisions_in(CountryId(country)).collect(),
                None => directory.divisions().collect(),
            };
            let rows: Vec<serde_json::Value> = divisions
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "id": d.id,
                        "name": d.name,
                        "country": directory.division_country(d.id).map(|c| c.name.as_str()),
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        Commands::List {
            customer,
            contact,
            within,
        } => {
            let store = open_store(&cli.store)?;
            let mut appointments = match (customer, contact) {
                (Some(customer), _) => store.list_by_customer(CustomerId(customer)),
                (None, Some(contact)) => store.list_by_contact(ContactId(contact)),
                (None, None) => store.list(),
            }
            .map_err(unavailable)?;
            if let Some(window) = within {
                let now = Utc::now().with_timezone(&viewer).naive_local();
                appointments = upcoming(&appointments, now, window.into());
            }
            print_json(&appointments)?;
        }
        Commands::Slots { date } => {
            let starts = list_selectable_starts(&hours, viewer, date);
            let ends = list_selectable_ends(&hours, viewer, date);
            print_json(&serde_json::json!({
                "zone": viewer.name(),
                "starts": starts.as_slice(),
                "ends": ends.as_slice(),
            }))?;
        }
        Commands::Report { kind } => {
            let store = open_store(&cli.store)?;
            let appointments = store.list().map_err(unavailable)?;
            match kind {
                ReportKind::Monthly => print_json(&monthly_type_counts(&appointments))?,
                ReportKind::Contacts => {
                    let directory = Directory::load(&store).map_err(unavailable)?;
                    let schedules =
                        contact_schedules(&directory, &store).map_err(unavailable)?;
                    print_json(&schedules)?
                }
                ReportKind::Divisions => {
                    let directory = Directory::load(&store).map_err(unavailable)?;
                    print_json(&division_bookings(&directory, &appointments))?
                }
            }
        }
        Commands::Login { user, password } => {
            let store = open_store(&cli.store)?;
            let directory = Directory::load(&store).map_err(unavailable)?;
            match directory.authenticate(&user, &password) {
                Some(found) => {
                    info!(user = %user, "login succeeded");
                    println!("Welcome, {} (user {})", found.name, found.id);
                }
                None => {
                    warn!(user = %user, "login failed");
                    bail!("Invalid username or password");
                }
            }
        }
        Commands::Hours { date } => {
            let date = date
                .unwrap_or_else(|| Utc::now().with_timezone(&hours.home_zone()).date_naive());
            println!("{}", hours.describe(viewer, date));
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logger() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(e) = installed {
        warn!(error = %e, "tracing subscriber already installed");
    }
}

/// `--zone`, then `$TZ`, then UTC. A bad flag is an error; a bad `$TZ` is not.
fn viewer_zone(flag: Option<&str>) -> Result<Tz> {
    if let Some(name) = flag {
        return parse_zone(name).context("Invalid --zone");
    }
    match env::var("TZ") {
        Ok(name) => Ok(parse_zone(&name).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring TZ, using UTC");
            Tz::UTC
        })),
        Err(_) => Ok(Tz::UTC),
    }
}

fn load_policy(path: Option<&Path>) -> Result<BusinessHours> {
    let config = match path {
        Some(path) => PolicyConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => PolicyConfig::default(),
    };
    config
        .with_env()
        .context("Invalid APPT_* environment override")?
        .into_policy()
        .context("Invalid business-hours policy")
}

fn open_store(path: &Path) -> Result<FileStore> {
    FileStore::open(path).map_err(unavailable)
}

/// Attach the headline a user sees first: fix the form, or try again later.
fn explain(err: ScheduleError) -> anyhow::Error {
    with_headline(err, "Appointment rejected")
}

fn explain_customer(err: ScheduleError) -> anyhow::Error {
    with_headline(err, "Customer rejected")
}

fn unavailable(err: StoreError) -> anyhow::Error {
    explain(ScheduleError::StoreUnavailable(err))
}

fn with_headline(err: ScheduleError, rejected: &'static str) -> anyhow::Error {
    let headline = if err.is_user_error() {
        rejected
    } else {
        "Appointment store unavailable, try again later"
    };
    anyhow::Error::new(err).context(headline)
}

fn build_draft(store: &FileStore, args: AddArgs) -> Result<AppointmentDraft, ScheduleError> {
    let directory = Directory::load(store)?;
    check_references(&directory, CustomerId(args.customer), UserId(args.user))?;
    let contact = find_contact(&directory, ContactId(args.contact))?;
    Ok(AppointmentDraft {
        customer_id: CustomerId(args.customer),
        contact_id: contact.id,
        contact_name: contact.name.clone(),
        user_id: UserId(args.user),
        title: args.title,
        description: args.description,
        appointment_type: args.appointment_type,
        location: args.location,
        start: args.start,
        end: args.end,
    })
}

fn apply_edits(
    store: &FileStore,
    mut current: Appointment,
    args: UpdateArgs,
) -> Result<Appointment, ScheduleError> {
    let directory = Directory::load(store)?;
    check_references(
        &directory,
        args.customer.map_or(current.customer_id, CustomerId),
        args.user.map_or(current.user_id, UserId),
    )?;
    if let Some(contact) = args.contact {
        let contact = find_contact(&directory, ContactId(contact))?;
        current.contact_id = contact.id;
        current.contact_name = contact.name.clone();
    }
    if let Some(customer) = args.customer {
        current.customer_id = CustomerId(customer);
    }
    if let Some(user) = args.user {
        current.user_id = UserId(user);
    }
    if let Some(title) = args.title {
        current.title = title;
    }
    if let Some(description) = args.description {
        current.description = description;
    }
    if let Some(appointment_type) = args.appointment_type {
        current.appointment_type = appointment_type;
    }
    if let Some(location) = args.location {
        current.location = location;
    }
    if let Some(start) = args.start {
        current.start = start;
    }
    if let Some(end) = args.end {
        current.end = end;
    }
    Ok(current)
}

fn apply_customer_edits(mut current: Customer, args: CustomerEditArgs) -> Customer {
    if let Some(name) = args.name {
        current.name = name;
    }
    if let Some(address) = args.address {
        current.address = address;
    }
    if let Some(postal_code) = args.postal_code {
        current.postal_code = postal_code;
    }
    if let Some(phone) = args.phone {
        current.phone = phone;
    }
    if let Some(division) = args.division {
        current.division_id = DivisionId(division);
    }
    current
}

fn check_references(
    directory: &Directory,
    customer: CustomerId,
    user: UserId,
) -> Result<(), ScheduleError> {
    if directory.customer(customer).is_none() {
        return Err(ScheduleError::UnknownCustomer(customer));
    }
    if directory.user(user).is_none() {
        return Err(ScheduleError::UnknownUser(user));
    }
    Ok(())
}

fn find_contact(
    directory: &Directory,
    id: ContactId,
) -> Result<&Contact, ScheduleError> {
    directory.contact(id).ok_or(ScheduleError::UnknownContact(id))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn parse_datetime(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DD HH:MM, got '{}'", raw))
}
