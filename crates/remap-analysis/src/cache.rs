//! Content-hash-keyed plan memoization.
//!
//! A directive's plans depend only on the directive itself and the
//! descriptors reachable from its endpoint types, so the cache key is a
//! stable hash over exactly that closure. Re-running a pass with unchanged
//! inputs is a lookup; touching a member on either side (or on any type
//! reachable through nested members) changes the key and forces
//! recomputation. There is no partial invalidation: plans are cheap to
//! rebuild and recomputation is the correctness strategy.

use crate::plan::MappingPlan;
use remap_common::Diagnostic;
use remap_common::hash::ContentHasher;
use remap_graph::{MappingDirective, TypeGraph, TypeId, TypeRef};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Cached result of building one directive: root plan, implicit plans,
/// and the builder's own diagnostics.
#[derive(Clone)]
pub struct CachedDirective {
    pub plans: Vec<Arc<MappingPlan>>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Default)]
pub struct PlanCache {
    entries: FxHashMap<u64, CachedDirective>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: u64) -> Option<&CachedDirective> {
        self.entries.get(&key)
    }

    pub fn insert(&mut self, key: u64, cached: CachedDirective) {
        self.entries.insert(key, cached);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The cache key for one directive: a hash of the directive plus every
/// descriptor reachable from its endpoints, in name order.
pub fn directive_cache_key(graph: &TypeGraph, directive: &MappingDirective) -> u64 {
    let mut roots: Vec<&str> = vec![directive.source.as_str(), directive.target.as_str()];
    for pair in &directive.derived {
        roots.push(pair.source.as_str());
        roots.push(pair.target.as_str());
    }

    let mut reachable = Vec::new();
    let mut seen = FxHashSet::default();
    let mut stack: Vec<TypeId> = roots
        .iter()
        .filter_map(|name| graph.type_named(name))
        .collect();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        reachable.push(id);
        for member in &graph.get(id).members {
            push_named(graph, &member.ty, &mut stack);
        }
    }

    // Name order, so the key is independent of traversal order.
    reachable.sort_by(|a, b| {
        graph
            .get(*a)
            .qualified_name()
            .cmp(&graph.get(*b).qualified_name())
    });

    let mut hasher = ContentHasher::new();
    hasher.write(directive);
    for id in reachable {
        hasher.write(graph.get(id));
    }
    hasher.finish()
}

fn push_named(graph: &TypeGraph, ty: &TypeRef, stack: &mut Vec<TypeId>) {
    match ty {
        TypeRef::Named(_) => {
            if let Some(id) = graph.resolve(ty) {
                stack.push(id);
            }
        }
        TypeRef::List(elem) | TypeRef::Set(elem) => push_named(graph, elem, stack),
        _ => {}
    }
}
