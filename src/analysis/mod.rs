//! Analysis modules.
//!
//! Pure aggregation over the project and story record sets.

pub mod aggregator;

pub use aggregator::*;
