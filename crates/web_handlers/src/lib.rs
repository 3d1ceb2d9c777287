//! # Web Handlers for the Campsite Availability API
//!
//! This crate provides the HTTP handlers and route table of the service.

/// Service banner and health check
mod service_handlers;
pub use service_handlers::*;

/// Unified availability endpoint
mod availability_handlers;
pub use availability_handlers::*;

/// Campground lookup endpoints
mod campground_handlers;
pub use campground_handlers::*;

/// Provider directory endpoint
mod provider_handlers;
pub use provider_handlers::*;

/// Route registration shared by the server and tests
mod routes;
pub use routes::*;
