//! Type graph data model and input contract for the remap mapping generator.
//!
//! This crate owns the read-only reflection of the target program's type
//! graph that the rest of the pipeline analyzes:
//! - Descriptors (`TypeDescriptor`, `MemberDescriptor`, `TypeRef`)
//! - Mapping directives (`MappingDirective`, `DerivedTypePair`, flags, hooks)
//! - The immutable `TypeGraph` snapshot and its builder
//! - The serde document types of the JSON input contract
//!
//! Descriptors are snapshots: once a graph is built nothing in it mutates.
//! A new compilation pass builds a new graph.

pub mod descriptor;
pub use descriptor::{
    GenericParam, MemberDescriptor, Mutability, TypeDescriptor, TypeId, TypeKind, TypeRef,
    Visibility,
};

pub mod directives;
pub use directives::{DerivedTypePair, DirectiveFlags, HookSet, MappingDirective};

pub mod graph;
pub use graph::{TypeGraph, TypeGraphBuilder};

pub mod input;
pub use input::{GraphDocument, LoadError};
