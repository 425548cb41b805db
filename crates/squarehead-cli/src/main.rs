//! squarehead - duty scheduling and reminders for a square-dance club.
//!
//! Administers the member roster, generates squarehead schedules for club
//! nights and sends the reminder mail, either on demand or as a daemon.

mod commands;
mod daemon;
mod render;
mod sender;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use squarehead_core::{MemberId, MemberStatus, ScheduleId};
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use commands::members::{MemberEdit, NewMember};
use commands::{date_or_today, parse_date_arg, Context};

#[derive(Parser)]
#[command(name = "squarehead", version, about = "Square-dance club squarehead scheduling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the member roster
    #[command(subcommand)]
    Members(MembersCommand),
    /// Create and generate duty schedules
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    /// Override a single night's assignment
    #[command(subcommand)]
    Assignment(AssignmentCommand),
    /// Club settings used by the reminder job
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Preview or send duty reminders
    #[command(subcommand)]
    Reminders(RemindersCommand),
    /// Run the reminder job every day until interrupted
    Daemon,
}

#[derive(Subcommand)]
enum MembersCommand {
    /// List all members
    List,
    /// Add a member
    Add(AddMemberArgs),
    /// Change a member's name or email
    Edit {
        id: MemberId,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Remove a member, clearing any partner or friend links to them
    Remove { id: MemberId },
    /// Change a member's status (assignable, exempt, booster, loa)
    SetStatus { id: MemberId, status: MemberStatus },
    /// Pair two members as partners
    Pair { id: MemberId, partner: MemberId },
    /// Clear a member's partner
    Unpair { id: MemberId },
    /// Set or clear the member someone prefers to serve with
    SetFriend {
        id: MemberId,
        /// Leave out to clear the preference
        friend: Option<MemberId>,
    },
}

#[derive(Args)]
struct AddMemberArgs {
    first_name: String,
    last_name: String,
    email: String,
    #[arg(long, default_value = "assignable")]
    status: MemberStatus,
    #[arg(long)]
    partner: Option<MemberId>,
    #[arg(long)]
    friend: Option<MemberId>,
}

#[derive(Subcommand)]
enum ScheduleCommand {
    /// Create an empty schedule covering a date range
    Create {
        name: String,
        /// First date (YYYY-MM-DD)
        from: String,
        /// Last date, inclusive (YYYY-MM-DD)
        to: String,
    },
    /// List schedules with their fill status
    List,
    /// Fill a schedule's club nights from the rotation
    Generate {
        id: ScheduleId,
        /// Print the proposal without saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show a schedule's assignments
    Show { id: ScheduleId },
}

#[derive(Subcommand)]
enum AssignmentCommand {
    /// Set the squareheads for one night
    Set {
        schedule: ScheduleId,
        /// Dance date (YYYY-MM-DD)
        date: String,
        #[arg(long)]
        first: Option<MemberId>,
        #[arg(long)]
        second: Option<MemberId>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show current settings
    Show,
    /// Set reminder offsets in days, e.g. "14,7,3,1"
    SetOffsets { offsets: String },
    /// Set the club name used in reminder mail
    SetClubName { name: String },
}

#[derive(Subcommand)]
enum RemindersCommand {
    /// Show the reminders due on a date without sending
    Preview {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Send the reminders due on a date
    Send {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Print messages instead of queueing them; the send log is untouched
        #[arg(long)]
        dry_run: bool,
    },
}

type FileLayer = fmt::Layer<Registry, DefaultFields, Format, NonBlocking>;
type FileLogging = reload::Handle<Option<FileLayer>, Registry>;

/// Subscriber writing to stderr, with an empty slot for a log file layer.
fn subscriber(filter: EnvFilter) -> (impl tracing::Subscriber + Send + Sync, FileLogging) {
    let (file_layer, handle) = reload::Layer::new(None);
    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr));
    (subscriber, handle)
}

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing() -> FileLogging {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (subscriber, handle) = subscriber(filter);
    subscriber.init();
    handle
}

/// Starts writing a daily rolling log file in `dir` as well.
fn add_file_logging(handle: &FileLogging, dir: &Path) -> Result<WorkerGuard> {
    let appender = tracing_appender::rolling::daily(dir, "squarehead.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    handle.reload(Some(fmt::layer().with_ansi(false).with_writer(writer)))?;
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let file_logging = init_tracing();
    let ctx = Context::load()?;

    let _guard = match cli.command {
        Command::Daemon => Some(add_file_logging(&file_logging, ctx.store.dir())?),
        _ => None,
    };
    info!(data_dir = %ctx.store.dir().display(), "squarehead starting");

    match cli.command {
        Command::Members(cmd) => match cmd {
            MembersCommand::List => commands::members::list(&ctx),
            MembersCommand::Add(args) => commands::members::add(
                &ctx,
                NewMember {
                    first_name: args.first_name,
                    last_name: args.last_name,
                    email: args.email,
                    status: args.status,
                    partner: args.partner,
                    friend: args.friend,
                },
            ),
            MembersCommand::Edit {
                id,
                first_name,
                last_name,
                email,
            } => commands::members::edit(
                &ctx,
                id,
                MemberEdit {
                    first_name,
                    last_name,
                    email,
                },
            ),
            MembersCommand::Remove { id } => commands::members::remove(&ctx, id),
            MembersCommand::SetStatus { id, status } => commands::members::set_status(&ctx, id, status),
            MembersCommand::Pair { id, partner } => commands::members::set_partner(&ctx, id, Some(partner)),
            MembersCommand::Unpair { id } => commands::members::set_partner(&ctx, id, None),
            MembersCommand::SetFriend { id, friend } => commands::members::set_friend(&ctx, id, friend),
        },
        Command::Schedule(cmd) => match cmd {
            ScheduleCommand::Create { name, from, to } => {
                commands::schedule::create(&ctx, &name, parse_date_arg(&from)?, parse_date_arg(&to)?)
            }
            ScheduleCommand::List => commands::schedule::list(&ctx),
            ScheduleCommand::Generate { id, dry_run } => commands::schedule::generate(&ctx, id, dry_run),
            ScheduleCommand::Show { id } => commands::schedule::show(&ctx, id),
        },
        Command::Assignment(AssignmentCommand::Set {
            schedule,
            date,
            first,
            second,
            notes,
        }) => commands::schedule::assign(&ctx, schedule, parse_date_arg(&date)?, first, second, notes),
        Command::Settings(cmd) => match cmd {
            SettingsCommand::Show => commands::settings::show(&ctx),
            SettingsCommand::SetOffsets { offsets } => commands::settings::set_offsets(&ctx, &offsets),
            SettingsCommand::SetClubName { name } => commands::settings::set_club_name(&ctx, &name),
        },
        Command::Reminders(cmd) => match cmd {
            RemindersCommand::Preview { date } => commands::reminders::preview(&ctx, date_or_today(date.as_deref())?),
            RemindersCommand::Send { date, dry_run } => {
                let report = commands::reminders::send(&ctx, date_or_today(date.as_deref())?, dry_run)?;
                if !report.failed.is_empty() {
                    anyhow::bail!("{} reminder(s) failed to send", report.failed.len());
                }
                Ok(())
            }
        },
        Command::Daemon => daemon::run(ctx).await,
    }
}
