use futures_util::stream::BoxStream;
use serde_json::{Map, Value};

use crate::query_validator::SearchWindow;

/// Lazy, single-pass sequence of raw site records produced by one search call
pub type RawSiteStream = BoxStream<'static, Result<RawSiteRecord, SearchFailure>>;

/// Search implementation behind a provider.
///
/// Each call to [`SearchCapability::search`] starts a fresh search; the stream
/// must yield an error instead of ending early when the upstream site fails.
pub trait SearchCapability: Send + Sync {
    /// Searches the given scopes for campsite nights available inside the window
    fn search(&self, query: CampsiteQuery) -> RawSiteStream;
}

/// What a capability is asked to search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampsiteQuery {
    /// Dates to search
    pub window: SearchWindow,
    /// Recreation area / facility ids in the provider's numbering; never empty
    pub recreation_areas: Vec<u64>,
}

/// Failures a capability can report while talking to its upstream site
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    /// Request never produced a response
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Upstream asked us to slow down
    #[error("Rate limited by upstream site")]
    RateLimited,

    /// Upstream does not know the requested area or facility
    #[error("Facility or recreation area not found upstream")]
    NotFound,

    /// Any other non-success status
    #[error("HTTP {status} - {body}")]
    UpstreamStatus {
        /// Status code returned
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Response could not be understood
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Window needs more upstream requests than a capability allows
    #[error("Search window spans {months} months; at most {limit} can be searched at once")]
    WindowTooLong {
        /// Months the window touches
        months: usize,
        /// Most months fetched for one search
        limit: usize,
    },
}

impl SearchFailure {
    /// Maps a non-success HTTP status from a reservation site
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => SearchFailure::RateLimited,
            404 => SearchFailure::NotFound,
            status => SearchFailure::UpstreamStatus { status, body },
        }
    }
}

/// One site record as a provider family reports it.
///
/// Families expose different attribute names, so the record is kept as a
/// JSON object. JSON `null` and empty strings read as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSiteRecord(Map<String, Value>);

impl RawSiteRecord {
    /// Empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, returning the record for chaining
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// Sets an attribute only when a value is present
    pub fn with_opt<T: Into<Value>>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    /// Present, non-null, non-empty attribute
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.0.get(name)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            value => Some(value),
        }
    }

    /// First present attribute among `names`
    pub fn first_of<'a>(&'a self, names: &[&'a str]) -> Option<(&'a str, &'a Value)> {
        names
            .iter()
            .find_map(|name| self.get(name).map(|value| (*name, value)))
    }
}
