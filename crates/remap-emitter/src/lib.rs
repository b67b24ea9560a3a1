//! Deterministic source emission for the remap mapping generator.
//!
//! Renders validated mapping plans into generated Rust transformation
//! routines: one forward routine per plan, a reverse routine for
//! bidirectional plans, an in-place update routine on request, a dispatch
//! routine for polymorphic base plans, and a pure projection form. Output
//! is grouped into one source unit per target namespace and is stable
//! across passes: identical plans always render to identical text.

pub mod writer;
pub use writer::SourceWriter;

pub mod names;

mod routines;
mod enums;
mod dispatch;
mod projection;

pub mod units;
pub use units::{GeneratedUnit, emit_units};
