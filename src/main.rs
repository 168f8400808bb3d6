use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vestline::cli::{handle_document_command, handle_grant_command, handle_sweep_command};
use vestline::clock::SystemClock;
use vestline::config::{paths::PortalPaths, settings::Settings};
use vestline::models::{Role, UserId};
use vestline::storage::Storage;

#[derive(Parser)]
#[command(
    name = "vestline",
    version,
    about = "RSU vesting engine and encrypted document vault",
    long_about = "Vestline computes and stores RSU vesting schedules, runs the daily \
                  vesting and reminder sweeps, and keeps investor documents \
                  encrypted at rest."
)]
struct Cli {
    /// Role to act as (admin_edit, admin_view, board_member, shareholder).
    /// Editing needs admin_edit.
    #[arg(long, global = true, env = "VESTLINE_ROLE", default_value = "shareholder")]
    role: String,

    /// User ID recorded on uploads and document access
    #[arg(long, global = true, env = "VESTLINE_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Grant and vesting schedule commands
    #[command(subcommand)]
    Grant(vestline::cli::GrantCommands),

    /// Daily vesting and reminder sweeps
    #[command(subcommand)]
    Sweep(vestline::cli::SweepCommands),

    /// Encrypted document vault commands
    #[command(subcommand, alias = "doc")]
    Document(vestline::cli::DocumentCommands),

    /// Show recent audit log entries
    Audit {
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_env("VESTLINE_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let paths = PortalPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all().context("failed to load stored data")?;

    let role: Role = cli.role.parse()?;
    let user = match cli.user.as_deref() {
        Some(id) => id
            .parse::<UserId>()
            .with_context(|| format!("invalid user ID '{}'", id))?,
        None => UserId::from_uuid(uuid::Uuid::nil()),
    };

    match cli.command {
        Some(Commands::Grant(cmd)) => {
            handle_grant_command(&storage, &SystemClock, role, cmd)?;
        }
        Some(Commands::Sweep(cmd)) => {
            handle_sweep_command(&storage, &settings, &SystemClock, cmd)?;
        }
        Some(Commands::Document(cmd)) => {
            handle_document_command(&storage, &settings, role, user, cmd)?;
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing Vestline at: {}", paths.base_dir().display());
            vestline::storage::init::initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Vesting sweeps are disabled until enabled in {}", paths.settings_file().display());
        }
        Some(Commands::Config) => {
            println!("Vestline Configuration");
            println!("======================");
            println!("Base directory:      {}", paths.base_dir().display());
            println!("Data directory:      {}", paths.data_dir().display());
            println!("Documents directory: {}", paths.documents_dir().display());
            println!("Outbox:              {}", paths.outbox_file().display());
            println!();
            println!("Settings:");
            println!("  Auto vesting:          {}", settings.vesting.enable_auto_vesting);
            println!("  Pre-vest reminders:    {}", settings.vesting.enable_pre_vest_notifications);
            println!("  Reminder lead (days):  {}", settings.vesting.pre_vest_lead_days);
            println!("  Max upload (bytes):    {}", settings.documents.max_file_size);
        }
        None => {
            println!("Vestline - RSU vesting engine and document vault");
            println!();
            println!("Run 'vestline --help' for usage information.");
        }
    }

    Ok(())
}
