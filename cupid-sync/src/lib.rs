//! # Cupid Sync
//!
//! Pulls hotel data from the Cupid API and persists it into the store.
//!
//! ## Architecture
//!
//! Each unit of work is one hotel and one data kind:
//!
//! 1. **Fetch**: the raw payload is requested through a [`cupid_client::CupidFetcher`]
//! 2. **Parse**: the body is decoded by the `cupid_shared` parsers
//! 3. **Persist**: the parsed entities go to a [`cupid_repository::HotelRepository`]
//!
//! The [`SyncOrchestrator`] drives single-hotel runs and sequential batch
//! runs, isolating per-hotel failures and pacing calls to the API.
//!
//! ## Modules
//!
//! - [`config`]: Sync configuration and dependency initialization
//! - [`orchestrator`]: Single-hotel and batch sync
//! - [`errors`]: Error types for a sync unit

pub mod config;
pub mod errors;
pub mod orchestrator;

pub use config::{Dependencies, SyncConfig, SyncKind};
pub use errors::{SyncError, SyncStage};
pub use orchestrator::{BatchSummary, SyncOrchestrator};

use thiserror::Error;

/// Errors that can occur while setting up or running the sync binary.
#[derive(Error, Debug)]
pub enum SyncSetupError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A single-hotel sync failed.
    #[error("Sync error: {0}")]
    SyncError(#[from] SyncError),
}

impl SyncSetupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
