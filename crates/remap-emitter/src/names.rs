//! Naming of generated routines, type references, and unit files.
//!
//! Routine names derive from the bare type names, snake-cased:
//! `map_user_to_user_dto`, `update_user_dto_from_user`,
//! `project_user_to_user_dto`. Emitted type references use the declared
//! bare names verbatim; the generator never renames types it does not own.

use remap_common::NamingStrategy;
use remap_graph::{TypeDescriptor, TypeGraph, TypeId};

pub fn snake(name: &str) -> String {
    NamingStrategy::Underscore.apply(name)
}

/// Forward (and reverse, with the pair swapped) routine name.
pub fn map_routine(graph: &TypeGraph, source: TypeId, target: TypeId) -> String {
    format!(
        "map_{}_to_{}",
        snake(&graph.get(source).name),
        snake(&graph.get(target).name)
    )
}

pub fn update_routine(graph: &TypeGraph, source: TypeId, target: TypeId) -> String {
    format!(
        "update_{}_from_{}",
        snake(&graph.get(target).name),
        snake(&graph.get(source).name)
    )
}

pub fn project_routine(graph: &TypeGraph, source: TypeId, target: TypeId) -> String {
    format!(
        "project_{}_to_{}",
        snake(&graph.get(source).name),
        snake(&graph.get(target).name)
    )
}

/// The type as written in a signature: bare name plus its own generic
/// parameters, e.g. `Wrapper<T>`.
pub fn type_display(descriptor: &TypeDescriptor) -> String {
    if descriptor.generic_params.is_empty() {
        descriptor.name.clone()
    } else {
        let params: Vec<&str> = descriptor
            .generic_params
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        format!("{}<{}>", descriptor.name, params.join(", "))
    }
}

/// The generic parameter list of a routine over `source` and `target`,
/// constraints preserved verbatim, parameters deduplicated by name.
/// Empty string when neither side is generic.
pub fn generic_signature(source: &TypeDescriptor, target: &TypeDescriptor) -> String {
    let mut rendered: Vec<String> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for param in source.generic_params.iter().chain(&target.generic_params) {
        if seen.contains(&param.name.as_str()) {
            continue;
        }
        seen.push(&param.name);
        match &param.constraint {
            Some(constraint) => rendered.push(format!("{}: {}", param.name, constraint)),
            None => rendered.push(param.name.clone()),
        }
    }
    if rendered.is_empty() {
        String::new()
    } else {
        format!("<{}>", rendered.join(", "))
    }
}

/// File name for one namespace grouping: `app.dto` becomes
/// `app_dto_mappings.rs`; the empty namespace becomes `mappings.rs`.
pub fn unit_file_name(namespace: &str) -> String {
    if namespace.is_empty() {
        "mappings.rs".to_string()
    } else {
        format!("{}_mappings.rs", namespace.replace('.', "_"))
    }
}
