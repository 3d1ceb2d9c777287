use futures_util::TryStreamExt;
use tracing::{debug, warn};

use crate::catalog::ProviderDescriptor;
use crate::error::UpstreamProviderError;
use crate::query_validator::{FacilityIdentifier, SearchWindow};
use crate::search::{CampsiteQuery, RawSiteRecord};

/// Runs the provider's search for one facility and drains the results.
///
/// The first failure the capability reports ends the search and is wrapped
/// with the provider's label.
pub async fn dispatch(
    descriptor: &ProviderDescriptor,
    window: SearchWindow,
    facility: &FacilityIdentifier,
) -> Result<Vec<RawSiteRecord>, UpstreamProviderError> {
    debug!(
        "Searching {} for facility {} from {} to {}",
        descriptor.key,
        facility.id(),
        window.start(),
        window.end()
    );

    let query = CampsiteQuery {
        window,
        recreation_areas: vec![facility.id()],
    };

    let records = descriptor
        .search
        .search(query)
        .try_collect::<Vec<RawSiteRecord>>()
        .await
        .map_err(|e| {
            warn!("Search against {} failed: {}", descriptor.label, e);
            UpstreamProviderError {
                provider_label: descriptor.label.to_string(),
                message: e.to_string(),
            }
        })?;

    debug!("{} returned {} raw records", descriptor.key, records.len());
    Ok(records)
}
