//! CLI for release-watch.
//!
//! Polls an upstream repository for new releases, classifies how disruptive
//! each one is and posts an alert to a chat webhook.

use clap::Parser;
use release_watch::{ConfigOverrides, CycleSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Release Watch - Alert on breaking changes in upstream releases.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository to watch, as `owner/name`.
    #[arg(long, env = "RELEASE_WATCH_REPOSITORY")]
    repository: Option<String>,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Slack incoming webhook URL.
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: Option<String>,

    /// Seconds to sleep between cycles.
    #[arg(long, env = "CHECK_INTERVAL")]
    interval_secs: Option<u64>,

    /// Number of recent releases fetched per cycle.
    #[arg(long, env = "RELEASE_WATCH_FETCH_COUNT")]
    fetch_count: Option<u8>,

    /// Path of the seen-release state file.
    #[arg(long, env = "RELEASE_WATCH_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Handlebars template for the alert text.
    #[arg(long, env = "RELEASE_WATCH_MESSAGE_TEMPLATE")]
    message_template: Option<PathBuf>,

    /// Path to the config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Print alerts instead of posting them and leave the state file untouched.
    #[arg(long)]
    dry_run: bool,

    /// Run a single cycle and exit.
    #[arg(long)]
    once: bool,
}

impl Args {
    fn into_overrides(self) -> (ConfigOverrides, PathBuf) {
        let overrides = ConfigOverrides {
            repository: self.repository,
            github_token: self.github_token,
            webhook_url: self.webhook_url,
            interval_secs: self.interval_secs,
            fetch_count: self.fetch_count,
            state_file: self.state_file,
            message_template: self.message_template,
            dry_run: self.dry_run,
            once: self.once,
        };
        (overrides, self.config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    dotenv::dotenv().ok();
    init_tracing();

    // Explicitly install aws-lc-rs as the default crypto provider for rustls
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();
    let once = args.once;

    match run(args).await {
        Ok(Some(summary)) if once => {
            print_summary(&summary);
            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Ok(_) => ExitCode::from(0),
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with `RUST_LOG` filtering, defaulting to `info`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<Option<CycleSummary>, RunnerError> {
    let (overrides, config_path) = args.into_overrides();
    let config = RunnerConfig::load(overrides, &config_path)?;
    let runner = Runner::new(config)?;
    Ok(runner.run(shutdown_signal()).await)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl-C");
}

/// Prints the summary of a `--once` run.
fn print_summary(summary: &CycleSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    if summary.fetch_failed {
        println!("  Fetch failed, nothing processed");
        return;
    }
    println!("  Releases fetched: {}", summary.releases_fetched);
    println!("  New releases: {}", summary.releases_unseen);
    println!("  Alerts sent: {}", summary.notified);
    println!("  Alerts failed: {}", summary.failed);
    println!("  Unclassified: {}", summary.degraded);
    if summary.persist_failures > 0 {
        println!("  State file write failures: {}", summary.persist_failures);
    }
}
