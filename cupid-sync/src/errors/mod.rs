//! Error types for a sync unit.

use std::fmt;
use std::time::Duration;

use cupid_client::CupidError;
use cupid_repository::RepositoryError;
use cupid_shared::{HotelId, ParseError};
use thiserror::Error;

/// Where a (hotel, kind) unit of work currently is.
///
/// A unit moves `Idle → Fetching → Parsing → Persisting → Done`, or ends in
/// `Failed` from any of the working stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Idle,
    Fetching,
    Parsing,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Errors that abort a single sync unit.
///
/// None of them stop a batch: the orchestrator counts the hotel as failed
/// and moves on.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The API call failed or returned a non-2xx status.
    #[error("Fetch error: {0}")]
    Fetch(#[from] CupidError),

    /// The body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The store rejected the write. The transaction was rolled back.
    #[error("Persist error: {0}")]
    Persist(#[from] RepositoryError),

    /// The unit did not finish within its deadline.
    #[error("Timed out after {after:?} while {stage}")]
    Timeout { stage: SyncStage, after: Duration },

    /// Every language of a translations sync failed.
    #[error("No translations could be fetched for hotel {0}")]
    NoTranslations(HotelId),
}

impl SyncError {
    /// The stage the unit was in when it failed.
    pub fn stage(&self) -> SyncStage {
        match self {
            Self::Fetch(_) | Self::NoTranslations(_) => SyncStage::Fetching,
            Self::Parse(_) => SyncStage::Parsing,
            Self::Persist(_) => SyncStage::Persisting,
            Self::Timeout { stage, .. } => *stage,
        }
    }

    /// Whether re-running the unit later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_retryable(),
            Self::Parse(_) => false,
            Self::Persist(e) => !e.is_not_found(),
            Self::Timeout { .. } | Self::NoTranslations(_) => true,
        }
    }
}
