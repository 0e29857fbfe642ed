//! Invoice Dashboard Binary
//!
//! Connects to the ledger-backed API, routes the logged-in session to its
//! role dashboard, and logs the dashboard summary every time the polled
//! collection changes.
//!
//! # Usage
//!
//! ```bash
//! INVOICE_BASE_URL=http://localhost:8080/api cargo run --bin invoice-dashboard
//! ```
//!
//! # Environment Variables
//!
//! * `INVOICE_BASE_URL` - REST API root (default: http://localhost:8080/api)
//! * `INVOICE_POLL_INTERVAL_SECS` - Dashboard refresh interval (default: 5)
//! * `INVOICE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! * `INVOICE_TOAST_DURATION_MS` - Toast visibility (default: 3000)
//! * `INVOICE_REPEAT_FAILURE_WINDOW_SECS` - Collapse identical failures (default: 0, off)
//! * `INVOICE_BEARER_TOKEN` - Bearer token for the API
//! * `INVOICE_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interface_client::{Client, ClientConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env().context("loading INVOICE_* configuration")?;
    init_tracing(&config.log_level);

    tracing::info!(
        base_url = %config.base_url,
        poll_interval_secs = config.poll_interval_secs,
        "Starting invoice dashboard"
    );

    let client = Client::connect(&config)?;
    let mut dashboard = client.mount_for_session().await?;
    let role = dashboard.role();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, unmounting dashboard");
                break;
            }
            changed = dashboard.changed() => {
                if !changed {
                    break;
                }
                let summary = dashboard.summary(Utc::now());
                for card in summary.cards() {
                    tracing::info!(role = %role, title = card.title, value = %card.value, "Dashboard card");
                }
            }
        }
    }

    dashboard.unmount().await;
    tracing::info!("Dashboard shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
