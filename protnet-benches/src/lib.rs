//! Benchmark support crate for protnet.
//!
//! Provides seeded synthetic labelings and reduced graphs plus parameter
//! types used by the Criterion benchmarks for the two super-linear
//! operations: the significance loop and the maximum common subgraph search.

pub mod error;
pub mod params;
pub mod synthetic;
