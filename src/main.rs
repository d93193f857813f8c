//! Publish Notifier CLI
//!
//! Validates a deployment's notifier configuration and fires test
//! notifications without going through the content repository.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use publish_notifier::{
    ActorName, DispatchCycle, DispatchOutcome, NotifierBuilder, Settings, SkipReason,
    WorkspaceClassification, WorkspaceRef,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "pubnotify")]
#[command(about = "Send email and Slack notifications for workspace publishes")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/publish-notifier/config.json)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print the channel summary
    CheckConfig,
    /// Dispatch a notification for a synthetic publish event
    Send {
        /// Target workspace name
        #[arg(long)]
        workspace: String,
        /// Workspace classification: personal, internal or public
        #[arg(long, default_value = "internal")]
        classification: String,
        /// Actor display name
        #[arg(long, default_value = "unknown")]
        actor: String,
        /// Print what would be sent without calling any transport
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    // Log level via RUST_LOG, default info. Logs go to stderr so stdout
    // stays clean for command output.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("publish_notifier=info,pubnotify=info"));
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(Settings::default_path)
        .context("Cannot determine the config file location")?;
    let settings = Settings::from_file(&config_path)?;

    match cli.command {
        Commands::CheckConfig => check_config(&settings),
        Commands::Send {
            workspace,
            classification,
            actor,
            dry_run,
        } => send(settings, &workspace, &classification, &actor, dry_run),
    }
}

fn check_config(settings: &Settings) -> Result<()> {
    settings.validate()?;

    println!("Configuration OK");
    if settings.email.enabled {
        println!(
            "  email: enabled, {} recipient(s), sender {}",
            settings.email.notify_emails.len(),
            settings.email.sender_address
        );
    } else {
        println!("  email: disabled");
    }
    if settings.slack.enabled {
        println!("  slack: enabled, {} target(s)", settings.slack.post_to.len());
    } else {
        println!("  slack: disabled");
    }
    println!(
        "  notify on public workspace: {}",
        settings.notify.public_workspace
    );
    Ok(())
}

fn send(
    settings: Settings,
    workspace: &str,
    classification: &str,
    actor: &str,
    dry_run: bool,
) -> Result<()> {
    let classification = parse_classification(classification)?;
    let dispatcher = NotifierBuilder::new(settings).dry_run(dry_run).build()?;

    let workspace = WorkspaceRef::new(workspace, classification);
    let actor = ActorName::new(actor);
    let mut cycle = DispatchCycle::new();

    match dispatcher.notify(&workspace, &actor, &mut cycle)? {
        DispatchOutcome::Skipped(SkipReason::Declined) => {
            println!("No notification: this workspace does not qualify");
        }
        DispatchOutcome::Skipped(SkipReason::AlreadyNotified) => {
            println!("No notification: cycle already produced one");
        }
        DispatchOutcome::Dispatched(reports) => {
            for report in reports {
                println!(
                    "{}: {} sent, {} failed",
                    report.channel,
                    report.sent_count(),
                    report.failed_count()
                );
            }
        }
    }
    Ok(())
}

fn parse_classification(value: &str) -> Result<WorkspaceClassification> {
    match value {
        "personal" => Ok(WorkspaceClassification::Personal),
        "internal" => Ok(WorkspaceClassification::Internal),
        "public" => Ok(WorkspaceClassification::Public),
        other => bail!("Unknown classification `{other}` (expected personal, internal or public)"),
    }
}
