//! Main entry point for the Campsite Availability API server.
//! This crate wires configuration, logging and provider search capabilities
//! into the HTTP routes.

use actix_web::{App, HttpServer, middleware::Logger, web};

mod capabilities;
mod config;

use capabilities::{build_catalog, campground_lookup, upstream_client};
use config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting campsite availability server...");

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client = match upstream_client(&config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // Provider catalog is built once and shared read-only by every worker
    let catalog = match build_catalog(&config, &client) {
        Ok(catalog) => web::Data::new(catalog),
        Err(e) => {
            log::error!("❌ Failed to build provider catalog: {}", e);
            std::process::exit(1);
        }
    };
    let campgrounds = web::Data::from(campground_lookup(&config, &client));

    let (host, port) = config.bind_address();
    log::info!("🌐 Server will be available at: http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(catalog.clone())
            .app_data(campgrounds.clone())
            .wrap(Logger::default())
            .configure(web_handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
