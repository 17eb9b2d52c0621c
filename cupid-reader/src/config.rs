//! Configuration types for the HotelReader.

use std::env;
use std::time::Duration;

pub const DEFAULT_REVIEW_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;
pub const DEFAULT_LANGUAGES: [&str; 3] = ["fr", "es", "en"];

/// Configuration for the [`HotelReader`](crate::HotelReader).
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// How long a repopulated review list stays cached.
    pub review_ttl: Duration,
    /// Page size used when the caller gives none or a non-positive one.
    pub default_limit: i64,
    /// Upper bound on the page size.
    pub max_limit: i64,
    /// Language codes translations can be requested in.
    pub languages: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            review_ttl: DEFAULT_REVIEW_TTL,
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl ReaderConfig {
    /// Defaults, with `REVIEW_CACHE_TTL_SECS` overriding the review TTL when
    /// it holds a positive number of seconds.
    pub fn from_env() -> Self {
        let config = Self::default();
        match parse_ttl_secs(env::var("REVIEW_CACHE_TTL_SECS").ok().as_deref()) {
            Some(ttl) => config.with_review_ttl(ttl),
            None => config,
        }
    }

    pub fn with_review_ttl(mut self, review_ttl: Duration) -> Self {
        self.review_ttl = review_ttl;
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    /// Resolves a requested page size against the defaults and the cap.
    pub fn resolve_limit(&self, requested: Option<i64>) -> i64 {
        match requested {
            Some(limit) if limit > 0 => limit.min(self.max_limit),
            _ => self.default_limit,
        }
    }

    pub fn supports_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }
}

fn parse_ttl_secs(raw: Option<&str>) -> Option<Duration> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
