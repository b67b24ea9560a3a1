//! The immutable type graph snapshot.
//!
//! `TypeGraph` is the queryable view the mapping compiler works against:
//! a flat type table addressed by `TypeId`, a name index preserving input
//! order, and the normalized directive list. Built once per compilation
//! pass; never mutated afterwards.

use crate::descriptor::{TypeDescriptor, TypeId, TypeRef};
use crate::directives::MappingDirective;
use indexmap::IndexMap;
use tracing::debug;

#[derive(Debug)]
pub struct TypeGraph {
    types: Vec<TypeDescriptor>,
    by_name: IndexMap<String, TypeId>,
    directives: Vec<MappingDirective>,
}

impl TypeGraph {
    pub fn get(&self, id: TypeId) -> &TypeDescriptor {
        &self.types[id.index()]
    }

    /// Look up a type by qualified name.
    pub fn type_named(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Resolve a `Named` ref to its graph type, if declared.
    pub fn resolve(&self, ty: &TypeRef) -> Option<TypeId> {
        match ty {
            TypeRef::Named(name) => self.type_named(name),
            _ => None,
        }
    }

    /// All types, in input order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (TypeId(i as u32), t))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Normalized mapping directives, in extraction order.
    pub fn directives(&self) -> &[MappingDirective] {
        &self.directives
    }

    /// Direct derived types of `base`, in input order.
    pub fn derived_of(&self, base: TypeId) -> Vec<TypeId> {
        let base_name = self.get(base).qualified_name();
        self.iter()
            .filter(|(_, t)| t.base.as_deref() == Some(base_name.as_str()))
            .map(|(id, _)| id)
            .collect()
    }
}

/// Accumulates types and directives, then freezes them into a `TypeGraph`.
///
/// Member `TypeRef`s naming a generic parameter of their declaring type are
/// rewritten to `Param` refs at build time, so downstream code never has to
/// guess whether a name is a type or a parameter.
pub struct TypeGraphBuilder {
    types: Vec<TypeDescriptor>,
    by_name: IndexMap<String, TypeId>,
    directives: Vec<MappingDirective>,
}

impl TypeGraphBuilder {
    pub fn new() -> Self {
        Self {
            types: Vec::new(),
            by_name: IndexMap::new(),
            directives: Vec::new(),
        }
    }

    /// Add a type. Re-adding a qualified name replaces the earlier entry,
    /// which keeps the builder usable for incremental test setups.
    pub fn add_type(&mut self, descriptor: TypeDescriptor) -> TypeId {
        let qualified = descriptor.qualified_name();
        if let Some(&existing) = self.by_name.get(&qualified) {
            self.types[existing.index()] = descriptor;
            return existing;
        }
        let id = TypeId(self.types.len() as u32);
        self.by_name.insert(qualified, id);
        self.types.push(descriptor);
        id
    }

    pub fn add_directive(&mut self, directive: MappingDirective) {
        self.directives.push(directive);
    }

    pub fn build(mut self) -> TypeGraph {
        for descriptor in &mut self.types {
            let params: Vec<String> =
                descriptor.generic_params.iter().map(|p| p.name.clone()).collect();
            if params.is_empty() {
                continue;
            }
            for member in &mut descriptor.members {
                rewrite_params(&mut member.ty, &params);
            }
        }
        debug!(
            types = self.types.len(),
            directives = self.directives.len(),
            "type graph built"
        );
        TypeGraph {
            types: self.types,
            by_name: self.by_name,
            directives: self.directives,
        }
    }
}

fn rewrite_params(ty: &mut TypeRef, params: &[String]) {
    match ty {
        TypeRef::Named(name) if params.iter().any(|p| p == name) => {
            *ty = TypeRef::Param(name.clone());
        }
        TypeRef::List(elem) | TypeRef::Set(elem) => rewrite_params(elem, params),
        _ => {}
    }
}
