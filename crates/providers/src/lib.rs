//! # Providers
//!
//! Provider resolution and result normalization for the unified campsite
//! availability service. A fixed catalog of reservation backends is indexed by
//! key and alias; queries are resolved to one provider, validated, dispatched
//! to that provider's search capability and normalized into one schema.

/// Fixed provider table and its validation
mod catalog;
pub use catalog::*;

/// Name to provider lookup derived from the catalog
mod alias_index;
pub use alias_index::*;

/// Exact and autocomplete provider resolution
mod resolver;

/// Typed parsing of dates and facility ids
mod query_validator;
pub use query_validator::*;

/// Contract every provider search implementation fulfils
mod search;
pub use search::*;

/// Runs a provider search and collects its records
mod dispatcher;
pub use dispatcher::*;

/// Raw record to unified site mapping
mod normalizer;
pub use normalizer::*;

/// Error taxonomy and HTTP mapping
mod error;
pub use error::*;

/// End-to-end availability query
mod availability;
pub use availability::*;

/// Filterable provider listing
mod directory;
pub use directory::*;

/// Campground lookup by name or id
mod campgrounds;
pub use campgrounds::*;
