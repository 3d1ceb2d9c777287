use serde::Serialize;
use tracing::info;

use crate::catalog::ProviderCatalog;
use crate::dispatcher::dispatch;
use crate::error::AvailabilityError;
use crate::normalizer::{AvailableSite, normalize};
use crate::query_validator::{DATE_FORMAT, SearchWindow, validate};

/// Raw availability query as received from a caller
#[derive(Debug, Clone, Default)]
pub struct AvailabilityRequest<'a> {
    /// Free-form provider name; `None` or blank selects the default provider
    pub provider: Option<&'a str>,
    /// Facility / recreation area id
    pub campground_id: &'a str,
    /// `YYYY-MM-DD`
    pub start_date: &'a str,
    /// `YYYY-MM-DD`
    pub end_date: &'a str,
}

/// Echo of the dates searched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchWindowEcho {
    /// ISO 8601 start date
    pub start_date: String,
    /// ISO 8601 end date
    pub end_date: String,
}

impl From<SearchWindow> for SearchWindowEcho {
    fn from(window: SearchWindow) -> Self {
        Self {
            start_date: window.start().format(DATE_FORMAT).to_string(),
            end_date: window.end().format(DATE_FORMAT).to_string(),
        }
    }
}

/// Normalized answer for one availability query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityResult {
    /// Canonical key of the provider that answered
    pub provider: String,
    /// Its display label
    pub provider_label: String,
    /// Facility id exactly as the caller sent it
    pub campground_id: String,
    /// Sites found
    pub available_sites: Vec<AvailableSite>,
    /// `available_sites.len()`
    pub total_available: usize,
    /// Dates searched
    pub search_window: SearchWindowEcho,
}

/// Resolves, validates, searches and normalizes one availability query
pub async fn find_availability(
    catalog: &ProviderCatalog,
    request: AvailabilityRequest<'_>,
) -> Result<AvailabilityResult, AvailabilityError> {
    let descriptor = catalog.resolve(request.provider)?;
    let (window, facility) = validate(request.start_date, request.end_date, request.campground_id)?;

    let records = dispatch(descriptor, window, &facility).await?;
    let available_sites = normalize(&records);

    info!(
        "{} has {} available sites at {} between {} and {}",
        descriptor.label,
        available_sites.len(),
        facility.as_str(),
        window.start(),
        window.end()
    );

    Ok(AvailabilityResult {
        provider: descriptor.key.to_string(),
        provider_label: descriptor.label.to_string(),
        campground_id: facility.as_str().to_string(),
        total_available: available_sites.len(),
        available_sites,
        search_window: window.into(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures_util::StreamExt;
    use futures_util::stream;

    use super::*;
    use crate::error::{ResolveError, ValidationError};
    use crate::search::{CampsiteQuery, RawSiteRecord, RawSiteStream, SearchCapability};

    /// Answers every query with one site per recreation area
    struct OneSitePerArea;

    impl SearchCapability for OneSitePerArea {
        fn search(&self, query: CampsiteQuery) -> RawSiteStream {
            let records = query.recreation_areas.into_iter().map(|area| {
                Ok(RawSiteRecord::new()
                    .with("campsite_id", 7)
                    .with("campsite_title", "Site 7")
                    .with("facility_id", area))
            });
            stream::iter(records.collect::<Vec<_>>()).boxed()
        }
    }

    fn catalog() -> ProviderCatalog {
        ProviderCatalog::standard(|_| Arc::new(OneSitePerArea) as Arc<dyn SearchCapability>)
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_query() {
        let result = find_availability(
            &catalog(),
            AvailabilityRequest {
                provider: Some("rc"),
                campground_id: "718",
                start_date: "2025-07-01",
                end_date: "2025-07-04",
            },
        )
        .await
        .unwrap();

        assert_eq!(result.provider, "reservecalifornia");
        assert_eq!(result.provider_label, "ReserveCalifornia (CA State Parks)");
        assert_eq!(result.campground_id, "718");
        assert_eq!(result.total_available, 1);
        assert_eq!(result.available_sites[0].facility_id, "718");
        assert_eq!(
            result.search_window,
            SearchWindowEcho {
                start_date: "2025-07-01".into(),
                end_date: "2025-07-04".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_inverted_window_rejected_for_default_provider() {
        let err = find_availability(
            &catalog(),
            AvailabilityRequest {
                provider: None,
                campground_id: "2725",
                start_date: "2025-07-04",
                end_date: "2025-07-01",
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err, AvailabilityError::Validation(ValidationError::InvalidWindow));
    }

    #[tokio::test]
    async fn test_provider_resolved_before_validation() {
        let err = find_availability(
            &catalog(),
            AvailabilityRequest {
                provider: Some("zzz"),
                campground_id: "abc",
                start_date: "bad",
                end_date: "bad",
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AvailabilityError::Resolve(ResolveError::UnknownProvider { .. })
        ));
    }
}
