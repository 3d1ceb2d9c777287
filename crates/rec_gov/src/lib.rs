//! # RecGov
//!
//! This crate provides the search capability for Recreation.gov, the federal
//! reservation system, built on its campground month-availability API, and
//! the campground lookup used to find the ids that API takes.

/// Campsite availability search against Recreation.gov
mod availability_search;
pub use availability_search::*;

/// Campground lookup against the RIDB facility directory
mod facility_search;
pub use facility_search::*;
