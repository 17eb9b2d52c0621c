//! Sync configuration.
//!
//! [`SyncConfig`] carries everything the orchestrator needs to know about a
//! run: which hotels, which languages, how to pace and bound the calls, and
//! the API key. [`Dependencies`] builds it from the environment.

mod dependencies;

pub use dependencies::Dependencies;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use cupid_client::{HeaderValue, InvalidHeaderValue};
use cupid_shared::HotelId;

/// Hotels synced by a batch run when no override is configured.
pub const DEFAULT_HOTEL_IDS: [HotelId; 100] = [
    1641879, 317597, 1202743, 1037179, 1154868, 1270324, 1305326, 1617655, 1975211, 2017823,
    1503950, 1033299, 378772, 1563003, 1085875, 828917, 830417, 838887, 1702062, 1144294,
    1738870, 898052, 906450, 906467, 2241195, 1244595, 1277032, 956026, 957111, 152896,
    896868, 982911, 986491, 986622, 988544, 989315, 989544, 990223, 990341, 990370,
    990490, 990609, 990629, 1259611, 991819, 992027, 992851, 993851, 994085, 994333,
    994495, 994903, 995227, 995787, 996977, 1186578, 999444, 1000017, 1000051, 1198750,
    1001100, 1001296, 1001402, 1002200, 1003142, 1004288, 1006404, 1006602, 1006810, 1006887,
    1007101, 1007269, 1007466, 1011203, 1011644, 1011945, 1012047, 1012140, 1012944, 1023527,
    1013529, 1013584, 1014383, 1015094, 1016591, 1016611, 1017019, 1017039, 1017044, 1018030,
    1018130, 1018251, 1018402, 1018946, 1019473, 1020332, 1020335, 1020386, 1021856, 1022380,
];

/// Languages fetched by a translations sync.
pub const DEFAULT_LANGUAGES: [&str; 3] = ["fr", "es", "en"];

/// Pause between consecutive calls to the API.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Deadline for one (hotel, kind) unit, fetch and store included.
pub const DEFAULT_UNIT_TIMEOUT: Duration = Duration::from_secs(15);

/// Number of reviews requested per hotel.
pub const DEFAULT_REVIEW_COUNT: u32 = 100;

/// The data kind a sync unit fetches and stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncKind {
    Content,
    Reviews,
    Translations,
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Content => "content",
            Self::Reviews => "reviews",
            Self::Translations => "translations",
        };
        f.write_str(name)
    }
}

impl FromStr for SyncKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "content" => Ok(Self::Content),
            "reviews" => Ok(Self::Reviews),
            "translations" => Ok(Self::Translations),
            other => Err(format!(
                "unknown sync endpoint '{}', expected content, reviews or translations",
                other
            )),
        }
    }
}

/// Configuration for a [`SyncOrchestrator`](crate::SyncOrchestrator).
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Hotels visited by a batch run, in order.
    pub hotel_ids: Vec<HotelId>,
    /// Languages fetched by a translations sync.
    pub languages: Vec<String>,
    /// Pause between consecutive API calls within a run.
    pub request_delay: Duration,
    /// Deadline for one (hotel, kind) unit.
    pub unit_timeout: Duration,
    pub review_count: u32,
    /// Sent as `x-api-key`. Marked sensitive so it never shows up in logs.
    pub api_key: Option<HeaderValue>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            hotel_ids: DEFAULT_HOTEL_IDS.to_vec(),
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            request_delay: DEFAULT_REQUEST_DELAY,
            unit_timeout: DEFAULT_UNIT_TIMEOUT,
            review_count: DEFAULT_REVIEW_COUNT,
            api_key: None,
        }
    }
}

impl SyncConfig {
    pub fn with_hotel_ids(mut self, hotel_ids: Vec<HotelId>) -> Self {
        self.hotel_ids = hotel_ids;
        self
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_request_delay(mut self, request_delay: Duration) -> Self {
        self.request_delay = request_delay;
        self
    }

    pub fn with_unit_timeout(mut self, unit_timeout: Duration) -> Self {
        self.unit_timeout = unit_timeout;
        self
    }

    pub fn with_review_count(mut self, review_count: u32) -> Self {
        self.review_count = review_count;
        self
    }

    /// Set the API key. Fails if the key cannot be sent as a header value.
    pub fn with_api_key(mut self, api_key: &str) -> Result<Self, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(api_key)?;
        value.set_sensitive(true);
        self.api_key = Some(value);
        Ok(self)
    }
}

/// Parses a comma separated list of hotel ids, ignoring blank entries.
pub(crate) fn parse_hotel_ids(raw: &str) -> Result<Vec<HotelId>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HotelId>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| format!("invalid hotel id '{}'", s))
        })
        .collect()
}

/// Parses a comma separated list of language codes, lowercased.
pub(crate) fn parse_languages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();

        assert_eq!(config.hotel_ids.len(), 100);
        assert_eq!(config.hotel_ids[0], 1641879);
        assert_eq!(config.hotel_ids[99], 1022380);
        assert_eq!(config.languages, vec!["fr", "es", "en"]);
        assert_eq!(config.request_delay, Duration::from_millis(100));
        assert_eq!(config.unit_timeout, Duration::from_secs(15));
        assert_eq!(config.review_count, 100);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_sync_kind_round_trip() {
        for kind in [SyncKind::Content, SyncKind::Reviews, SyncKind::Translations] {
            assert_eq!(kind.to_string().parse::<SyncKind>().unwrap(), kind);
        }
        assert_eq!(" Reviews ".parse::<SyncKind>().unwrap(), SyncKind::Reviews);
        assert!("photos".parse::<SyncKind>().is_err());
    }

    #[test]
    fn test_api_key_is_sensitive() {
        let config = SyncConfig::default().with_api_key("secret-key").unwrap();
        let key = config.api_key.as_ref().unwrap();

        assert!(key.is_sensitive());
        assert!(!format!("{:?}", config).contains("secret-key"));

        assert!(SyncConfig::default().with_api_key("bad\nkey").is_err());
    }

    #[test]
    fn test_parse_hotel_ids() {
        assert_eq!(parse_hotel_ids("1, 2,,3 ").unwrap(), vec![1, 2, 3]);
        assert!(parse_hotel_ids("").unwrap().is_empty());
        assert!(parse_hotel_ids("1,abc").is_err());
        assert!(parse_hotel_ids("-5").is_err());
    }

    #[test]
    fn test_parse_languages() {
        assert_eq!(parse_languages("FR, es ,,en"), vec!["fr", "es", "en"]);
    }
}
