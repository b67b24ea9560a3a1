//! The per-pass analysis driver.
//!
//! A pass takes the immutable graph snapshot and produces every plan plus
//! every diagnostic, deterministically. Plan computation is embarrassingly
//! parallel across directives: each directive touches only the read-only
//! snapshot, so cache misses fan out over a rayon pool and collect back in
//! input order. Nothing here returns an error: one malformed directive
//! becomes diagnostics and never aborts analysis of unrelated types.

use crate::cache::{CachedDirective, PlanCache, directive_cache_key};
use crate::plan::{MappingPlan, PairKey};
use crate::plan_builder::PlanBuilder;
use crate::validate::validate_plan;
use indexmap::IndexMap;
use rayon::prelude::*;
use remap_common::diagnostics::{Diagnostic, codes, format_message, messages};
use remap_graph::TypeGraph;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::debug;

/// One plan with its validation verdict. Invalid plans are kept for
/// inspection and dump output; only valid plans emit.
#[derive(Clone)]
pub struct PlanOutcome {
    pub plan: Arc<MappingPlan>,
    pub valid: bool,
}

pub struct PassOutput {
    pub outcomes: Vec<PlanOutcome>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PassOutput {
    /// Plans cleared for emission, in merge order.
    pub fn valid_plans(&self) -> impl Iterator<Item = &MappingPlan> {
        self.outcomes
            .iter()
            .filter(|o| o.valid)
            .map(|o| o.plan.as_ref())
    }

    /// The valid plan for a pair, if any. The emitter uses this to inline
    /// enum value tables into projections.
    pub fn plan_for(&self, pair: PairKey) -> Option<&MappingPlan> {
        self.outcomes
            .iter()
            .find(|o| o.valid && o.plan.pair() == pair)
            .map(|o| o.plan.as_ref())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// Holds the plan cache across passes. One session per generator instance;
/// a fresh graph snapshot goes through `run_pass` each compilation.
pub struct AnalysisSession {
    cache: PlanCache,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            cache: PlanCache::new(),
        }
    }

    pub fn run_pass(&mut self, graph: &TypeGraph) -> PassOutput {
        let mut diagnostics = Vec::new();

        // Duplicate (source, target) pairs are configuration errors; every
        // instance of a duplicated pair is suppressed.
        let mut pair_counts: FxHashMap<(&str, &str), u32> = FxHashMap::default();
        for directive in graph.directives() {
            *pair_counts
                .entry((directive.source.as_str(), directive.target.as_str()))
                .or_insert(0) += 1;
        }
        let mut reported: FxHashSet<(&str, &str)> = FxHashSet::default();
        let mut active = Vec::new();
        for directive in graph.directives() {
            let key = (directive.source.as_str(), directive.target.as_str());
            if pair_counts[&key] > 1 {
                if reported.insert(key) {
                    diagnostics.push(Diagnostic::error(
                        codes::DUPLICATE_MAPPING_DIRECTIVE,
                        &directive.source,
                        format_message(
                            messages::DUPLICATE_MAPPING_DIRECTIVE,
                            &[&directive.source, &directive.target],
                        ),
                    ));
                }
                continue;
            }
            active.push(directive);
        }

        // Plan computation: cache hits are reused, misses fan out in
        // parallel and collect back in input order.
        let keys: Vec<u64> = active
            .iter()
            .map(|d| directive_cache_key(graph, d))
            .collect();
        let misses: Vec<(usize, u64)> = keys
            .iter()
            .enumerate()
            .filter(|(_, key)| self.cache.get(**key).is_none())
            .map(|(i, key)| (i, *key))
            .collect();
        let computed: Vec<(u64, CachedDirective)> = misses
            .par_iter()
            .map(|&(index, key)| {
                let (plans, builder_diagnostics) =
                    PlanBuilder::new(graph).build_directive(active[index]);
                (
                    key,
                    CachedDirective {
                        plans: plans.into_iter().map(Arc::new).collect(),
                        diagnostics: builder_diagnostics,
                    },
                )
            })
            .collect();
        let recomputed = computed.len();
        for (key, cached) in computed {
            self.cache.insert(key, cached);
        }
        debug!(
            directives = active.len(),
            recomputed,
            cached = active.len() - recomputed,
            "plan computation finished"
        );

        // Merge in directive order: explicit plans first, then implicit
        // plans for pairs no existing routine already covers.
        let bundles: Vec<&CachedDirective> = keys
            .iter()
            .map(|key| self.cache.get(*key).expect("just inserted"))
            .collect();
        for bundle in &bundles {
            diagnostics.extend(bundle.diagnostics.iter().cloned());
        }
        let mut merged: IndexMap<PairKey, Arc<MappingPlan>> = IndexMap::new();
        for bundle in &bundles {
            for plan in bundle.plans.iter().filter(|p| p.is_explicit()) {
                merged.entry(plan.pair()).or_insert_with(|| Arc::clone(plan));
            }
        }
        for bundle in &bundles {
            for plan in bundle.plans.iter().filter(|p| !p.is_explicit()) {
                if covered(&merged, plan.pair()) {
                    continue;
                }
                merged.insert(plan.pair(), Arc::clone(plan));
            }
        }

        // Validation: fail fast per plan, continue across plans.
        let explicit_pairs: FxHashSet<PairKey> = merged
            .values()
            .filter(|p| p.is_explicit())
            .map(|p| p.pair())
            .collect();
        let mut outcomes = Vec::with_capacity(merged.len());
        for plan in merged.into_values() {
            let (valid, plan_diagnostics) = validate_plan(graph, &plan, &explicit_pairs);
            diagnostics.extend(plan_diagnostics);
            outcomes.push(PlanOutcome { plan, valid });
        }

        PassOutput {
            outcomes,
            diagnostics,
        }
    }
}

/// Whether some merged plan already provides the routine for `pair`:
/// either a plan for the pair itself, or the reverse routine of a
/// bidirectional plan for the opposite pair.
fn covered(merged: &IndexMap<PairKey, Arc<MappingPlan>>, pair: PairKey) -> bool {
    if merged.contains_key(&pair) {
        return true;
    }
    merged
        .get(&(pair.1, pair.0))
        .is_some_and(|p| p.directive().bidirectional())
}
