use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{null_as_default, HotelId};

/// A guest review of a hotel.
///
/// Reviews live outside the property graph: they are replaced per hotel by
/// their own sync and only reference the hotel by its external id. The
/// field aliases accept the Cupid reviews payload directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Review {
    /// Internal row id; zero until the review has been stored.
    #[serde(alias = "review_id")]
    pub id: i64,
    pub hotel_id: HotelId,
    #[serde(alias = "name", deserialize_with = "null_as_default")]
    pub reviewer_name: String,
    #[serde(alias = "average_score", deserialize_with = "null_as_default")]
    pub rating: i32,
    #[serde(alias = "headline", deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(alias = "language", deserialize_with = "null_as_default")]
    pub language_code: String,
    #[serde(alias = "date", deserialize_with = "null_as_default")]
    pub review_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub helpful_votes: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub embedding_status: EmbeddingStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Lifecycle of a review's embedding vector.
///
/// Moved by the embedding pipeline; the sync only ever writes `Pending`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl EmbeddingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EmbeddingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(other.to_string()),
        }
    }
}
