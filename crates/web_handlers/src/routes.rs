use actix_web::{HttpResponse, error, web};

use crate::availability_handlers::availability;
use crate::campground_handlers::{get_campground, search_campgrounds};
use crate::provider_handlers::list_providers;
use crate::service_handlers::{health, service_info};

/// Query extraction settings: unreadable query strings answer 400 with a `detail` body
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(serde_json::json!({
            "detail": err.to_string()
        }));
        error::InternalError::from_response(err, response).into()
    })
}

/// JSON body settings: unreadable bodies answer 400 with a `detail` body
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(serde_json::json!({
            "detail": err.to_string()
        }));
        error::InternalError::from_response(err, response).into()
    })
}

/// Registers every public route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config())
        .app_data(json_config())
        .route("/", web::get().to(service_info))
        .route("/health", web::get().to(health))
        .route("/availability", web::get().to(availability))
        .route("/providers", web::get().to(list_providers))
        .route("/campgrounds/search", web::post().to(search_campgrounds))
        .route("/campgrounds/{campground_id}", web::get().to(get_campground));
}
