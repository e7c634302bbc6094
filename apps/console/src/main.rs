//! # Gestock Console
//!
//! Terminal entry point. Runs one command against the backend and exits.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging ─── tracing-subscriber, RUST_LOG or default      │
//! │  2. Load Configuration ─── gestock.toml + GESTOCK_* env overrides       │
//! │  3. Open Session Storage ─ session.json in the platform data dir        │
//! │  4. Restore Session ────── token + user from a previous login           │
//! │  5. Parse & Run Command ── print the result or the error message        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;

use std::process::ExitCode;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gestock_client::{ApiClient, AppStore, AuthStore, ClientConfig, SessionStorage, TenantAdmin};

use crate::commands::{Command, Context, USAGE};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let ctx = match build_context().await {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    match commands::run(&ctx, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default `info,gestock=debug`. Logs go to stderr
/// so command output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gestock=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn build_context() -> gestock_client::ClientResult<Context> {
    let config = ClientConfig::load_or_default(None);
    info!(api_url = %config.api_url(), "Configuration loaded");

    let storage = SessionStorage::from_config(&config)?;
    debug!(path = ?storage.path(), "Session storage opened");

    let auth = AuthStore::new(&config, storage.clone())?;
    auth.restore().await;

    let api = ApiClient::new(&config, storage.clone())?;
    Ok(Context {
        auth,
        store: AppStore::new(api.clone()),
        tenants: TenantAdmin::new(api),
        storage,
    })
}
