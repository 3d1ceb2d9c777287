//! # UseDirect
//!
//! Search capability for the state and county park systems hosted on the
//! UseDirect reservation platform. Every such provider speaks the same RDR
//! grid API from its own host.

/// Grid availability search against a UseDirect RDR host
mod grid_search;
pub use grid_search::*;
