//! Cupid Sync Main Entry Point
//!
//! Syncs hotel content, reviews or translations from the Cupid API into
//! PostgreSQL, either for a single hotel (`HOTEL_ID`) or for the configured
//! batch of hotels.

use cupid_sync::{Dependencies, SyncSetupError};
use dotenv::dotenv;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), SyncSetupError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("cupid_sync=info,cupid_repository=info,cupid_client=info,cupid_cache=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| SyncSetupError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "cupid-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| SyncSetupError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "cupid-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), SyncSetupError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting Cupid data sync");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    if let Some(hotel_id) = deps.hotel_id {
        info!(hotel_id, kind = %deps.kind, "Syncing single hotel");

        return match deps.orchestrator.sync_hotel(hotel_id, deps.kind).await {
            Ok(records) => {
                info!(hotel_id, records, "Hotel synced successfully");
                Ok(())
            }
            Err(e) => {
                error!(hotel_id, error = %e, stage = %e.stage(), "Hotel sync failed");
                Err(e.into())
            }
        };
    }

    // Dropping the batch on shutdown rolls back the unit in flight
    tokio::select! {
        summary = deps.orchestrator.run_batch(deps.kind) => {
            if !summary.all_succeeded() {
                warn!(
                    failed = summary.failed,
                    total = summary.total(),
                    "Some hotels failed to sync, re-run with SYNC_HOTEL_IDS to retry them"
                );
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Received shutdown signal, stopping batch sync");
        }
    }

    Ok(())
}
