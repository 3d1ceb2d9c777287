use actix_web::{HttpResponse, Result, web};
use providers::ProviderCatalog;
use serde::Deserialize;

/// Query string of `GET /providers`
#[derive(Debug, Deserialize)]
pub struct ProvidersQuery {
    /// Case-insensitive filter over key and label
    pub q: Option<String>,
}

/// Lists configured providers for front-end dropdowns and autocomplete
pub async fn list_providers(
    catalog: web::Data<ProviderCatalog>,
    query: web::Query<ProvidersQuery>,
) -> Result<HttpResponse> {
    let providers = catalog.directory(query.q.as_deref());
    log::debug!("Listing {} providers for filter {:?}", providers.len(), query.q);

    Ok(HttpResponse::Ok().json(providers))
}
