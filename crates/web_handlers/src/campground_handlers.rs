use actix_web::{HttpResponse, Result, web};
use providers::{CampgroundError, CampgroundLookup, campground_details, find_campgrounds};
use serde::Deserialize;
use validator::Validate;

/// Body of `POST /campgrounds/search`
#[derive(Debug, Deserialize, Validate)]
pub struct CampgroundSearchRequest {
    /// Campground name or location text
    #[validate(length(min = 1, max = 100, message = "search_query must be 1 to 100 characters"))]
    pub search_query: String,

    /// Two-letter state code
    #[validate(length(equal = 2, message = "state must be a two-letter code"))]
    pub state: Option<String>,
}

/// Finds campground ids by name
pub async fn search_campgrounds(
    lookup: web::Data<dyn CampgroundLookup>,
    request: web::Json<CampgroundSearchRequest>,
) -> Result<HttpResponse, CampgroundError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| CampgroundError::InvalidQuery(format!("Validation error: {}", e)))?;

    let list = find_campgrounds(
        lookup.get_ref(),
        &request.search_query,
        request.state.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(list))
}

/// Details for one campground id
pub async fn get_campground(
    lookup: web::Data<dyn CampgroundLookup>,
    path: web::Path<String>,
) -> Result<HttpResponse, CampgroundError> {
    let campground_id = path.into_inner();

    match campground_details(lookup.get_ref(), &campground_id).await {
        Ok(campground) => Ok(HttpResponse::Ok().json(campground)),
        Err(e) => {
            log::warn!("Campground lookup for {:?} failed: {}", campground_id, e);
            Err(e)
        }
    }
}
