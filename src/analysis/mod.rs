//! Aggregation of child build results.

pub mod aggregator;

pub use aggregator::*;
