use actix_web::{HttpResponse, Result};

/// Service banner listing the public endpoints
pub async fn service_info() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": "Campsite Availability API",
        "status": "running",
        "endpoints": [
            "/availability",
            "/providers",
            "/campgrounds/search",
            "/campgrounds/{campground_id}",
            "/health"
        ]
    })))
}

/// Liveness probe
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now()
    })))
}
