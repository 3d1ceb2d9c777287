use actix_web::HttpResponse;
use futures_util::future::BoxFuture;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ValidationError;
use crate::query_validator::FacilityIdentifier;
use crate::search::SearchFailure;

/// Campground as a facility directory describes it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campground {
    /// Id to pass as `campground_id` to an availability query
    pub facility_id: String,
    /// Display name
    pub facility_name: String,
    /// Enclosing recreation area name
    pub recreation_area: Option<String>,
    /// Enclosing recreation area id
    pub recreation_area_id: Option<String>,
    /// Nearest city
    pub city: Option<String>,
    /// Two-letter state code
    pub state: Option<String>,
    /// Latitude
    pub latitude: Option<f64>,
    /// Longitude
    pub longitude: Option<f64>,
}

/// Name search over a facility directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampgroundQuery {
    /// Free text matched against campground names
    pub text: String,
    /// Optional upper-case state code
    pub state: Option<String>,
}

/// Facility directory used to find campground ids.
///
/// Futures are `'static` so implementations clone what they need up front.
pub trait CampgroundLookup: Send + Sync {
    /// Campgrounds matching the query, in directory order
    fn search(
        &self,
        query: CampgroundQuery,
    ) -> BoxFuture<'static, Result<Vec<Campground>, SearchFailure>>;

    /// One campground by id; `None` when the directory does not know it
    fn details(
        &self,
        facility_id: u64,
    ) -> BoxFuture<'static, Result<Option<Campground>, SearchFailure>>;
}

/// Answer to a campground name search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampgroundList {
    /// Matches
    pub campgrounds: Vec<Campground>,
    /// `campgrounds.len()`
    pub count: usize,
}

/// Everything a campground lookup can fail with
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CampgroundError {
    /// Search text or state unusable
    #[error("{0}")]
    InvalidQuery(String),

    /// Campground id is not a non-negative integer
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Directory has no such campground
    #[error("Campground not found")]
    NotFound,

    /// Directory request failed
    #[error("Campground lookup failed: {0}")]
    Upstream(#[from] SearchFailure),
}

impl actix_web::ResponseError for CampgroundError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            CampgroundError::InvalidQuery(_) | CampgroundError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            CampgroundError::NotFound => StatusCode::NOT_FOUND,
            CampgroundError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "detail": self.to_string()
        }))
    }
}

/// Searches the directory by name, optionally within one state
pub async fn find_campgrounds(
    lookup: &dyn CampgroundLookup,
    text: &str,
    state: Option<&str>,
) -> Result<CampgroundList, CampgroundError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CampgroundError::InvalidQuery(
            "search_query must not be empty.".to_string(),
        ));
    }

    let state = state
        .map(str::trim)
        .filter(|state| !state.is_empty())
        .map(str::to_uppercase);

    let query = CampgroundQuery {
        text: text.to_string(),
        state,
    };
    let campgrounds = lookup.search(query.clone()).await.map_err(|e| {
        warn!("Campground search for {:?} failed: {}", query.text, e);
        CampgroundError::Upstream(e)
    })?;

    info!(
        "Found {} campgrounds for {:?} (state {:?})",
        campgrounds.len(),
        query.text,
        query.state
    );

    Ok(CampgroundList {
        count: campgrounds.len(),
        campgrounds,
    })
}

/// Looks up one campground by the id availability queries take
pub async fn campground_details(
    lookup: &dyn CampgroundLookup,
    campground_id: &str,
) -> Result<Campground, CampgroundError> {
    let facility = FacilityIdentifier::parse(campground_id)?;

    match lookup.details(facility.id()).await? {
        Some(campground) => Ok(campground),
        None => Err(CampgroundError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use futures_util::FutureExt;

    use super::*;

    fn pines() -> Campground {
        Campground {
            facility_id: "232447".into(),
            facility_name: "UPPER PINES".into(),
            recreation_area: Some("Yosemite National Park".into()),
            recreation_area_id: Some("2991".into()),
            city: None,
            state: Some("CA".into()),
            latitude: Some(37.7364),
            longitude: Some(-119.5647),
        }
    }

    /// Knows one campground and remembers the last search
    #[derive(Default)]
    struct OneCampground {
        last_query: Mutex<Option<CampgroundQuery>>,
    }

    impl CampgroundLookup for OneCampground {
        fn search(
            &self,
            query: CampgroundQuery,
        ) -> BoxFuture<'static, Result<Vec<Campground>, SearchFailure>> {
            let found = if "upper pines".contains(&query.text.to_lowercase()) {
                vec![pines()]
            } else {
                vec![]
            };
            *self.last_query.lock().unwrap() = Some(query);
            async move { Ok(found) }.boxed()
        }

        fn details(
            &self,
            facility_id: u64,
        ) -> BoxFuture<'static, Result<Option<Campground>, SearchFailure>> {
            let found = (facility_id == 232447).then(pines);
            async move { Ok(found) }.boxed()
        }
    }

    struct Offline;

    impl CampgroundLookup for Offline {
        fn search(
            &self,
            _query: CampgroundQuery,
        ) -> BoxFuture<'static, Result<Vec<Campground>, SearchFailure>> {
            async { Err(SearchFailure::RateLimited) }.boxed()
        }

        fn details(
            &self,
            _facility_id: u64,
        ) -> BoxFuture<'static, Result<Option<Campground>, SearchFailure>> {
            async { Err(SearchFailure::Transport("connection refused".into())) }.boxed()
        }
    }

    #[tokio::test]
    async fn test_search_trims_and_normalizes_state() {
        let lookup = OneCampground::default();

        let list = find_campgrounds(&lookup, "  pines ", Some(" ca")).await.unwrap();

        assert_eq!(list.count, 1);
        assert_eq!(list.campgrounds, vec![pines()]);
        assert_eq!(
            lookup.last_query.lock().unwrap().clone(),
            Some(CampgroundQuery {
                text: "pines".into(),
                state: Some("CA".into()),
            })
        );
    }

    #[tokio::test]
    async fn test_blank_search_is_rejected() {
        let err = find_campgrounds(&OneCampground::default(), "   ", None)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "search_query must not be empty.");
    }

    #[tokio::test]
    async fn test_details() {
        let lookup = OneCampground::default();

        assert_eq!(campground_details(&lookup, "232447").await.unwrap(), pines());
        assert_eq!(
            campground_details(&lookup, "1").await.unwrap_err(),
            CampgroundError::NotFound
        );
        assert_eq!(
            campground_details(&lookup, "pines").await.unwrap_err(),
            CampgroundError::Validation(ValidationError::InvalidFacilityId {
                value: "pines".into()
            })
        );
    }

    #[tokio::test]
    async fn test_directory_failures_are_bad_gateway() {
        let err = find_campgrounds(&Offline, "pines", None).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.to_string(),
            "Campground lookup failed: Rate limited by upstream site"
        );

        let err = campground_details(&Offline, "1").await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
