use std::sync::Arc;

use log::{info, warn};
use providers::{
    CampgroundLookup, CatalogError, DEFAULT_PROVIDER_KEY, Provider, ProviderCatalog,
    ProviderFamily, SearchCapability,
};
use rec_gov::{RecGovSearch, RidbLookup};
use reqwest::Client;
use use_direct::UseDirectSearch;

use crate::config::ServerConfig;

/// Reasons the provider catalog cannot be assembled at start-up
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    /// Shared HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// A UseDirect provider has no endpoint configured
    #[error("No UseDirect endpoint configured for {0}")]
    MissingEndpoint(&'static str),

    /// Catalog invariants violated
    #[error("Invalid provider catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// HTTP client shared by every upstream search
pub fn upstream_client(config: &ServerConfig) -> Result<Client, StartupError> {
    Ok(Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.upstream_timeout)
        .build()?)
}

fn capability_for(
    provider: Provider,
    client: &Client,
    config: &ServerConfig,
) -> Result<Arc<dyn SearchCapability>, StartupError> {
    match provider.family() {
        ProviderFamily::RecreationDotGov => Ok(Arc::new(RecGovSearch::new(
            client.clone(),
            config.rec_gov_base_url.as_str(),
        ))),
        ProviderFamily::UseDirect => UseDirectSearch::for_provider(client.clone(), provider)
            .map(|search| Arc::new(search) as Arc<dyn SearchCapability>)
            .ok_or(StartupError::MissingEndpoint(provider.key())),
    }
}

/// Builds the provider catalog with live search capabilities
pub fn build_catalog(
    config: &ServerConfig,
    client: &Client,
) -> Result<ProviderCatalog, StartupError> {
    let descriptors = Provider::ALL
        .into_iter()
        .map(|provider| {
            capability_for(provider, client, config).map(|search| provider.descriptor(search))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let catalog = ProviderCatalog::new(descriptors, DEFAULT_PROVIDER_KEY)?;
    info!(
        "🏕️ Provider catalog ready with {} providers",
        catalog.descriptors().len()
    );

    Ok(catalog)
}

/// Campground directory behind `/campgrounds`
pub fn campground_lookup(config: &ServerConfig, client: &Client) -> Arc<dyn CampgroundLookup> {
    if config.ridb_api_key.is_none() {
        warn!("RIDB_API_KEY is not set; campground lookups may be rejected upstream");
    }

    Arc::new(RidbLookup::new(
        client.clone(),
        config.ridb_base_url.as_str(),
        config.ridb_api_key.clone(),
    ))
}
