//! # tally-daemon
//!
//! Daemon binary — loads configuration, obtains an authenticated calendar
//! session (running the one-time console login flow if no tokens are
//! stored), and drives the reconciliation engine forever (or once, with
//! `--once`).

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tally_auth::{ClientCredentials, OAuthSession};
use tally_calendar::GoogleCalendar;
use tally_core::SystemClock;
use tally_engine::EngineConfig;
use tracing_subscriber::EnvFilter;

/// Calendar budget reconciliation daemon.
#[derive(Parser, Debug)]
#[command(name = "tally-daemon", about = "Calendar budget reconciliation daemon")]
struct Cli {
    /// Path to the settings file (defaults to `~/.tally/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Path to the OAuth client credentials JSON.
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Path to the stored token file.
    #[arg(long)]
    token: Option<PathBuf>,

    /// Calendar to operate on (overrides settings).
    #[arg(long)]
    calendar_id: Option<String>,

    /// Run a single reconciliation pass and exit.
    #[arg(long)]
    once: bool,
}

/// Resolve the data directory (`~/.tally`).
fn data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".tally")
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// One-time console authorization: print the consent URL, read the pasted
/// code, exchange it, persist the tokens.
async fn interactive_login(credentials: &ClientCredentials, token_path: &Path) -> Result<()> {
    let url = tally_auth::authorize_url(credentials);
    println!("Open this link in your browser, approve access, then paste the authorization code:\n\n{url}\n");
    print!("Authorization code: ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut code = String::new();
    let _ = std::io::stdin()
        .read_line(&mut code)
        .context("failed to read authorization code")?;
    let code = code.trim();
    if code.is_empty() {
        anyhow::bail!("no authorization code entered");
    }

    let client = reqwest::Client::new();
    let tokens = tally_auth::exchange_code(&client, credentials, code)
        .await
        .context("authorization code exchange failed")?;
    tally_auth::save_tokens(token_path, &tokens).context("failed to persist tokens")?;
    println!("Authorization complete; tokens saved to {}", token_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Settings first: the log level lives there. Configuration problems
    // (unrecognized policy, unknown zone, out-of-range day) are fatal here.
    let settings_path = args
        .settings
        .unwrap_or_else(tally_settings::settings_path);
    let mut settings = tally_settings::load_settings_from_path(&settings_path)
        .context("failed to load settings")?;
    if let Some(calendar_id) = args.calendar_id {
        settings.calendar_id = calendar_id;
    }

    init_tracing(&settings.log_level);

    let config = EngineConfig::from_settings(&settings)
        .context("failed to build engine configuration")?;
    tracing::info!(
        policy = ?config.placement_policy,
        pay_date_day = config.pay_date_day,
        time_zone = %config.time_zone,
        tick_minutes = settings.tick_interval_minutes,
        calendar_id = %settings.calendar_id,
        "starting tally daemon"
    );

    // Authenticated session: stored tokens, or the one-time login flow.
    let credentials_path = args
        .credentials
        .unwrap_or_else(|| data_dir().join("credentials.json"));
    let credentials = ClientCredentials::load(&credentials_path)
        .with_context(|| format!("failed to load credentials from {}", credentials_path.display()))?;
    let token_path = args
        .token
        .unwrap_or_else(|| tally_auth::token_file_path(&data_dir()));
    if tally_auth::load_tokens(&token_path).is_none() {
        interactive_login(&credentials, &token_path).await?;
    }

    let session = Arc::new(OAuthSession::new(credentials, token_path));
    let store = GoogleCalendar::new(settings.calendar_id.clone(), session);
    let clock = SystemClock;

    if args.once {
        let summary = tally_engine::run_once(&store, &clock, &config)
            .await
            .context("reconciliation pass failed")?;
        tracing::info!(periods = summary.periods.len(), "single pass complete");
        return Ok(());
    }

    tally_engine::run(Arc::new(store), Arc::new(clock), config).await;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
