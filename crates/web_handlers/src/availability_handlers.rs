use actix_web::{HttpResponse, Result, web};
use providers::{AvailabilityError, AvailabilityRequest, ProviderCatalog, find_availability};
use serde::Deserialize;

/// Query string of `GET /availability`
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Provider name or alias; the federal system when absent
    pub provider: Option<String>,

    /// Recreation area or campground id in the provider's numbering
    pub campground_id: String,

    /// First night, `YYYY-MM-DD`
    pub start_date: String,

    /// Departure date, `YYYY-MM-DD`
    pub end_date: String,
}

/// Unified availability search across every supported provider.
///
/// Empty values are passed through so the provider is resolved before the
/// dates and id are checked.
pub async fn availability(
    catalog: web::Data<ProviderCatalog>,
    query: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, AvailabilityError> {
    let request = AvailabilityRequest {
        provider: query.provider.as_deref(),
        campground_id: &query.campground_id,
        start_date: &query.start_date,
        end_date: &query.end_date,
    };

    match find_availability(catalog.get_ref(), request).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => {
            log::warn!("Availability query {:?} failed: {}", query, e);
            Err(e)
        }
    }
}
