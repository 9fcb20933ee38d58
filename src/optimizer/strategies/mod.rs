//! Thermal dispatch strategies
//!
//! - Merit order: greedy loading by ascending cost (see `greedy`)
//! - Exhaustive: enumerates unit commitments, exact for small fleets

pub mod exhaustive;

pub use exhaustive::*;
