//! CLI entrypoint for conclave
//!
//! Wires the layers together with dependency injection. `check` validates
//! and prints the effective configuration; `demo` runs a scripted
//! submission/vote/close round against the console messenger so the whole
//! pipeline can be watched locally.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use conclave_application::{
    AuditLog, CastVoteOutcome, NoAudit, PanelConfig, SubmitEntryInput, SubmitEntryUseCase,
    VotingCoordinator,
};
use conclave_domain::{MediaKind, MediaRef, UserId, VoteValue};
use conclave_infrastructure::{ConfigLoader, ConsoleMessenger, JsonlAuditLog, SqliteReviewStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conclave", about = "Panel-based media review with threshold voting")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate configuration and print the effective panel
    Check,
    /// Run a scripted submission/vote/close round against the console messenger
    Demo {
        /// Database path (defaults to the configured store path)
        #[arg(long)]
        db: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    match cli.command {
        Command::Check => {
            ConfigLoader::print_config_sources();
            println!();

            match config.panel_config() {
                Ok(panel) => {
                    println!("Panel: {} reviewer(s)", panel.panel().len());
                    println!(
                        "Threshold: {} ({} vote(s) required before closure)",
                        panel.rule().threshold(),
                        panel.required_votes()
                    );
                    println!("Store: {}", config.store.path);
                    match &config.store.audit_path {
                        Some(path) => println!("Audit trail: {}", path),
                        None => println!("Audit trail: disabled"),
                    }
                }
                Err(e) => bail!("invalid panel configuration: {e}"),
            }
            Ok(())
        }
        Command::Demo { db } => {
            // A panel is optional for the demo; fall back to a synthetic one.
            let panel = config.panel_config().unwrap_or_else(|_| {
                PanelConfig::new(
                    vec![UserId::new(1001), UserId::new(1002), UserId::new(1003)],
                    0.5,
                )
                .expect("demo panel is valid")
            });

            let db_path = db.unwrap_or_else(|| config.store.path.clone());
            let audit: Arc<dyn AuditLog> = match &config.store.audit_path {
                Some(path) => match JsonlAuditLog::open(path) {
                    Some(log) => Arc::new(log),
                    None => Arc::new(NoAudit),
                },
                None => Arc::new(NoAudit),
            };

            run_demo(&db_path, panel, audit).await
        }
    }
}

/// Scripted round: submit, two approvals, close.
async fn run_demo(db_path: &str, panel: PanelConfig, audit: Arc<dyn AuditLog>) -> Result<()> {
    let store = Arc::new(
        SqliteReviewStore::open(db_path)
            .await
            .with_context(|| format!("opening review store at {db_path}"))?,
    );
    let messenger = Arc::new(ConsoleMessenger::new());

    let reviewers: Vec<UserId> = panel.panel().iter().collect();
    // Enough unanimous approvals to clear the participation floor.
    let voters = panel.required_votes().max(1);
    if voters > reviewers.len() {
        bail!("the demo needs at least {voters} reviewers on the panel");
    }

    let submit = SubmitEntryUseCase::new(Arc::clone(&store), Arc::clone(&messenger), panel.clone())
        .with_audit(Arc::clone(&audit));
    let coordinator = VotingCoordinator::new(Arc::clone(&store), Arc::clone(&messenger), panel)
        .with_audit(audit);

    info!("Demo: submitting an entry to a {}-member panel", reviewers.len());
    let outcome = submit
        .execute(SubmitEntryInput {
            submitter: UserId::new(42),
            username: Some("demo".to_string()),
            caption: Some("demo entry".to_string()),
            media: MediaRef::new("demo-media"),
            kind: MediaKind::Image,
        })
        .await?;
    let entry = outcome.entry;
    println!(
        "Submitted entry {} ({} of {} copies delivered)",
        entry.id,
        outcome.delivered,
        reviewers.len()
    );

    for reviewer in reviewers.iter().take(voters) {
        match coordinator
            .cast_vote(entry.id, *reviewer, VoteValue::Approve)
            .await?
        {
            CastVoteOutcome::Recorded { tally, verdict, .. } => println!(
                "{} approved: tally {}/{}, decidable: {}",
                reviewer,
                tally.approve,
                tally.reject,
                verdict.is_decidable()
            ),
            CastVoteOutcome::NoOp => println!("{} repeated their vote", reviewer),
        }
    }

    let closed = coordinator.close_voting(entry.id, reviewers[0]).await?;
    println!(
        "Voting closed: {} ({} approve, {} reject)",
        closed.status, closed.tally.approve, closed.tally.reject
    );

    Ok(())
}
