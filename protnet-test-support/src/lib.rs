//! Shared test utilities used across protnet crates.
//!
//! - [`tracing`]: a recording layer for asserting spans and events.
//! - [`ci`]: environment-driven tuning of property-test runs.
//! - [`fixtures`]: small labelings, adjacency matrices, reduced-graph triples
//!   and tree-file text shared by unit, integration and benchmark code.

pub mod ci;
pub mod fixtures;
pub mod tracing;
