//! Orchestrator for the Cupid sync.
//!
//! Runs one (hotel, kind) unit at a time: fetch, parse, persist. A batch is
//! the same unit repeated over the configured hotel list, sequentially and
//! with a pause between API calls.

use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, instrument, warn};

use cupid_cache::ReviewCache;
use cupid_client::{Bytes, CupidFetcher, HeaderMap, HeaderValue, Method};
use cupid_repository::HotelRepository;
use cupid_shared::{parse_property_for, parse_reviews, parse_translations, HotelId, Translation};

use crate::config::{SyncConfig, SyncKind};
use crate::errors::{SyncError, SyncStage};

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub kind: SyncKind,
    pub succeeded: usize,
    pub failed: usize,
    /// Hotels to retry in a later run, in batch order.
    pub failed_ids: Vec<HotelId>,
}

impl BatchSummary {
    fn new(kind: SyncKind) -> Self {
        Self {
            kind,
            succeeded: 0,
            failed: 0,
            failed_ids: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Drives hotel syncs against the Cupid API and the store.
///
/// The orchestrator:
/// - Fetches one endpoint per unit and classifies the response
/// - Parses the body before anything is written
/// - Hands the parsed entities to the repository, one transaction per unit
/// - Bounds every unit by a deadline
/// - Drops the cached reviews of a hotel once its reviews are replaced
pub struct SyncOrchestrator {
    fetcher: Arc<dyn CupidFetcher>,
    repository: Arc<dyn HotelRepository>,
    review_cache: Option<Arc<dyn ReviewCache>>,
    config: SyncConfig,
    headers: HeaderMap,
}

impl SyncOrchestrator {
    /// Create a new orchestrator with the default configuration.
    pub fn new(fetcher: Arc<dyn CupidFetcher>, repository: Arc<dyn HotelRepository>) -> Self {
        Self::with_config(fetcher, repository, SyncConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        fetcher: Arc<dyn CupidFetcher>,
        repository: Arc<dyn HotelRepository>,
        config: SyncConfig,
    ) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));
        if let Some(api_key) = &config.api_key {
            headers.insert("x-api-key", api_key.clone());
        }

        Self {
            fetcher,
            repository,
            review_cache: None,
            config,
            headers,
        }
    }

    /// Invalidate this cache's entry for a hotel after its reviews are synced.
    pub fn with_review_cache(mut self, cache: Arc<dyn ReviewCache>) -> Self {
        self.review_cache = Some(cache);
        self
    }

    /// Sync one hotel for one data kind.
    ///
    /// Returns the number of records stored. A fetch or parse failure leaves
    /// the store untouched. If the deadline expires the in-flight work is
    /// dropped, which rolls back any open transaction.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn sync_hotel(&self, hotel_id: HotelId, kind: SyncKind) -> Result<usize, SyncError> {
        let mut stage = SyncStage::Idle;
        let deadline = self.config.unit_timeout;

        let outcome = timeout(deadline, self.run_unit(hotel_id, kind, &mut stage)).await;
        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(SyncError::Timeout {
                stage,
                after: deadline,
            }),
        };

        match &result {
            Ok(records) => {
                debug!(hotel_id, records, stage = %SyncStage::Done, "Sync unit finished");
            }
            Err(e) => {
                debug!(
                    hotel_id,
                    failed_while = %e.stage(),
                    stage = %SyncStage::Failed,
                    "Sync unit failed"
                );
            }
        }

        result
    }

    /// Sync every configured hotel, one after another.
    ///
    /// A failing hotel is logged and counted; the batch always runs to the
    /// end of the list.
    #[instrument(skip(self), fields(kind = %kind, batch_size = self.config.hotel_ids.len()))]
    pub async fn run_batch(&self, kind: SyncKind) -> BatchSummary {
        info!("Starting batch sync");

        let mut summary = BatchSummary::new(kind);
        let total = self.config.hotel_ids.len();

        for (index, &hotel_id) in self.config.hotel_ids.iter().enumerate() {
            if index > 0 {
                sleep(self.config.request_delay).await;
            }

            match self.sync_hotel(hotel_id, kind).await {
                Ok(records) => {
                    summary.succeeded += 1;
                    info!(
                        hotel_id,
                        records,
                        progress = %format!("{}/{}", index + 1, total),
                        "Hotel synced"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    summary.failed_ids.push(hotel_id);
                    error!(
                        hotel_id,
                        error = %e,
                        stage = %e.stage(),
                        retryable = e.is_retryable(),
                        "Failed to sync hotel"
                    );
                }
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            failed_ids = ?summary.failed_ids,
            "Batch sync completed: {} successful, {} failed",
            summary.succeeded,
            summary.failed
        );

        summary
    }

    async fn run_unit(
        &self,
        hotel_id: HotelId,
        kind: SyncKind,
        stage: &mut SyncStage,
    ) -> Result<usize, SyncError> {
        match kind {
            SyncKind::Content => self.sync_content(hotel_id, stage).await,
            SyncKind::Reviews => self.sync_reviews(hotel_id, stage).await,
            SyncKind::Translations => self.sync_translations(hotel_id, stage).await,
        }
    }

    async fn sync_content(
        &self,
        hotel_id: HotelId,
        stage: &mut SyncStage,
    ) -> Result<usize, SyncError> {
        *stage = SyncStage::Fetching;
        let body = self.fetch(&format!("/v3.0/property/{}", hotel_id)).await?;

        *stage = SyncStage::Parsing;
        let property = parse_property_for(&body, hotel_id)?;

        *stage = SyncStage::Persisting;
        let records = 1 + property.rooms.len();
        self.repository.store_property(&property).await?;

        Ok(records)
    }

    async fn sync_reviews(
        &self,
        hotel_id: HotelId,
        stage: &mut SyncStage,
    ) -> Result<usize, SyncError> {
        *stage = SyncStage::Fetching;
        let path = format!("/v3.0/property/reviews/{}/{}", hotel_id, self.config.review_count);
        let body = self.fetch(&path).await?;

        // A blank body carries no data; only an explicit empty list clears.
        if body.iter().all(u8::is_ascii_whitespace) {
            info!(hotel_id, "Empty reviews response, keeping stored reviews");
            return Ok(0);
        }

        *stage = SyncStage::Parsing;
        let mut reviews = parse_reviews(&body)?;
        for review in &mut reviews {
            review.hotel_id = hotel_id;
        }

        *stage = SyncStage::Persisting;
        self.repository.store_reviews(hotel_id, &reviews).await?;

        if let Some(cache) = &self.review_cache {
            if let Err(e) = cache.delete(hotel_id).await {
                warn!(hotel_id, error = %e, "Failed to invalidate cached reviews");
            }
        }

        Ok(reviews.len())
    }

    /// Fetches every configured language and stores the union in one call.
    /// A language that fails is skipped; the unit fails only if all do.
    async fn sync_translations(
        &self,
        hotel_id: HotelId,
        stage: &mut SyncStage,
    ) -> Result<usize, SyncError> {
        let mut translations: Vec<Translation> = Vec::new();
        let mut fetched_languages = 0usize;

        for (index, language) in self.config.languages.iter().enumerate() {
            if index > 0 {
                sleep(self.config.request_delay).await;
            }

            *stage = SyncStage::Fetching;
            let path = format!("/v3.0/property/{}/lang/{}", hotel_id, language);
            let body = match self.fetch(&path).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(hotel_id, language = %language, error = %e, "Failed to fetch translations");
                    continue;
                }
            };

            *stage = SyncStage::Parsing;
            match parse_translations(&body, language) {
                Ok(rows) => {
                    debug!(hotel_id, language = %language, rows = rows.len(), "Fetched translations");
                    fetched_languages += 1;
                    translations.extend(rows.into_iter().map(|mut t| {
                        t.hotel_id = hotel_id;
                        t
                    }));
                }
                Err(e) => {
                    warn!(hotel_id, language = %language, error = %e, "Failed to parse translations");
                }
            }
        }

        if fetched_languages == 0 {
            return Err(SyncError::NoTranslations(hotel_id));
        }

        // An empty list would clear every language of the hotel, including
        // ones that were not fetched in this run.
        if translations.is_empty() {
            info!(hotel_id, "No translated fields returned, nothing to store");
            return Ok(0);
        }

        *stage = SyncStage::Persisting;
        self.repository
            .store_translations(hotel_id, &translations)
            .await?;

        Ok(translations.len())
    }

    async fn fetch(&self, path: &str) -> Result<Bytes, SyncError> {
        let body = self.fetcher.fetch(Method::GET, path, &self.headers).await?;
        Ok(body)
    }
}
