//! # Cupid Repository
//! Persistence for the Cupid hotel content graph.
//!
//! Provides the [`HotelRepository`] contract, a PostgreSQL implementation
//! that writes each property graph inside one transaction, and an in-memory
//! implementation with the same replace semantics for tests and local runs.
//!
//! ```ignore
//! use cupid_repository::RepositorySource;
//!
//! // Development: in-memory store
//! let repository = RepositorySource::memory().into_repository().await?;
//!
//! // Production: PostgreSQL
//! let repository = RepositorySource::postgres("postgres://...", 25)
//!     .into_repository()
//!     .await?;
//! ```
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

pub use errors::RepositoryError;
pub use interfaces::HotelRepository;
pub use memory::InMemoryHotelRepository;
pub use postgres::PostgresHotelRepository;

/// Configuration for the persistence backend.
#[derive(Debug, Clone)]
pub enum RepositorySource {
    /// Keep everything in process memory.
    Memory,

    /// Use PostgreSQL.
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

impl RepositorySource {
    pub fn memory() -> Self {
        Self::Memory
    }

    pub fn postgres(database_url: impl Into<String>, max_connections: u32) -> Self {
        Self::Postgres {
            database_url: database_url.into(),
            max_connections,
        }
    }

    /// Build the repository. For PostgreSQL this connects and applies any
    /// pending migrations.
    pub async fn into_repository(self) -> Result<Arc<dyn HotelRepository>, RepositoryError> {
        match self {
            Self::Memory => Ok(Arc::new(InMemoryHotelRepository::new())),
            Self::Postgres {
                database_url,
                max_connections,
            } => {
                let repository =
                    PostgresHotelRepository::connect(&database_url, max_connections).await?;
                repository.migrate().await?;
                Ok(Arc::new(repository))
            }
        }
    }
}

/// Collapses rows sharing the `(entity_type, entity_id, language_code,
/// field_name)` key, keeping the last occurrence in the position of the first.
pub(crate) fn dedupe_translations(
    translations: &[cupid_shared::Translation],
) -> Vec<&cupid_shared::Translation> {
    use std::collections::HashMap;

    let mut positions = HashMap::new();
    let mut rows: Vec<&cupid_shared::Translation> = Vec::with_capacity(translations.len());
    for translation in translations {
        let key = (
            translation.entity_type,
            translation.entity_id,
            translation.language_code.as_str(),
            translation.field_name.as_str(),
        );
        match positions.get(&key) {
            Some(&index) => rows[index] = translation,
            None => {
                positions.insert(key, rows.len());
                rows.push(translation);
            }
        }
    }
    rows
}
