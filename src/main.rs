mod commands;

use std::path::PathBuf;

use anyhow::Result;
use calmail_core::classify::Intent;
use calmail_core::config::CalmailConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "calmail")]
#[command(about = "Turn calendar invitation emails into events in a local calendar")]
struct Cli {
    /// Show debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every unhandled thread in the mailbox
    Run {
        /// Mailbox directory (defaults to mailbox_dir from the config)
        #[arg(short, long)]
        mailbox: Option<PathBuf>,

        /// Calendar directory (defaults to calendar_dir from the config)
        #[arg(short, long)]
        calendar: Option<PathBuf>,
    },
    /// Show what an invitation file contains
    Parse {
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply a single invitation file to the calendar
    Apply {
        /// create, update or delete
        intent: Intent,

        file: PathBuf,

        #[arg(short, long)]
        calendar: Option<PathBuf>,
    },
    /// List calendar events
    Events {
        /// First day to show (YYYY-MM-DD, default today)
        #[arg(long)]
        from: Option<String>,

        /// Last day to show (YYYY-MM-DD, default a week from the first)
        #[arg(long)]
        to: Option<String>,

        #[arg(short, long)]
        calendar: Option<PathBuf>,
    },
    /// Show config path and effective settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run { mailbox, calendar } => {
            let config = CalmailConfig::load()?;
            let mailbox = mailbox.unwrap_or_else(|| config.mailbox_path());
            let calendar = calendar.unwrap_or_else(|| config.calendar_path());
            commands::run::run(&config, &mailbox, &calendar)
        }
        Commands::Parse { file, json } => commands::parse::run(&file, json),
        Commands::Apply {
            intent,
            file,
            calendar,
        } => {
            let config = CalmailConfig::load()?;
            let calendar = calendar.unwrap_or_else(|| config.calendar_path());
            commands::apply::run(&config, intent, &file, &calendar)
        }
        Commands::Events { from, to, calendar } => {
            let calendar = match calendar {
                Some(dir) => dir,
                None => CalmailConfig::load()?.calendar_path(),
            };
            commands::events::run(&calendar, from.as_deref(), to.as_deref())
        }
        Commands::Config => commands::config::run(),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
