//! CLI driver for the remap mapping generator.
//!
//! The `remap` binary loads a type-graph JSON document, runs one analysis
//! pass, renders diagnostics, and writes the generated source units to an
//! output directory. Process-level failures (unreadable input, malformed
//! JSON, unwritable output) are `anyhow` errors at this edge; everything
//! the mapping compiler itself detects arrives as diagnostics.

pub mod args;
pub use args::CliArgs;

pub mod driver;
pub use driver::{PassSummary, run};
