//! Common types and utilities for the remap mapping generator.
//!
//! This crate provides foundational types used across all remap crates:
//! - Diagnostics (`Diagnostic`, stable codes, message templates)
//! - Member-name transformation strategies (`NamingStrategy`)
//! - Recursion guarding for nested pair expansion (`PairGuard`)
//! - Centralized limits and thresholds
//! - Stable content hashing for the plan cache

// Diagnostics - categories, codes, message templates
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, format_message};

// Naming strategies for member-name matching
pub mod naming;
pub use naming::NamingStrategy;

// Recursion guarding for nested (source, target) pair expansion
pub mod recursion;
pub use recursion::{GuardEntry, PairGuard};

// Centralized limits and thresholds
pub mod limits;

// Stable content hashing
pub mod hash;
pub use hash::content_hash;
