//! Per-directive plan aggregation.
//!
//! A `PlanBuilder` turns one mapping directive into its root plan plus the
//! implicit plans for every nested class-like or enum pair the matcher
//! discovered. Implicit plans use identity naming and no options; they
//! exist so the emitter can call a named routine per pair.
//!
//! Self-referential shapes are safe: a pair already planned is referenced
//! by name instead of re-expanded, and a recursion guard bounds the
//! expansion depth of degenerate graphs.

use crate::enum_matcher::match_values;
use crate::plan::{EnumPlan, MappingPlan, ObjectPlan, PairKey};
use crate::property_matcher::{MatchOutcome, invert, match_members};
use indexmap::IndexMap;
use remap_common::diagnostics::{Diagnostic, codes, format_message, messages};
use remap_common::{GuardEntry, PairGuard, limits};
use remap_graph::{MappingDirective, TypeGraph, TypeId};
use tracing::{debug, warn};

pub struct PlanBuilder<'g> {
    graph: &'g TypeGraph,
    guard: PairGuard<PairKey>,
    planned: IndexMap<PairKey, MappingPlan>,
    diagnostics: Vec<Diagnostic>,
}

impl<'g> PlanBuilder<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self {
            graph,
            guard: PairGuard::new(limits::MAX_NESTED_PAIR_DEPTH),
            planned: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Build the root plan for `directive` plus all implicit plans it
    /// pulls in. Plans come back in discovery order, root first.
    pub fn build_directive(
        mut self,
        directive: &MappingDirective,
    ) -> (Vec<MappingPlan>, Vec<Diagnostic>) {
        let Some(source) = self.resolve_directive_type(&directive.source) else {
            return (Vec::new(), self.diagnostics);
        };
        let Some(target) = self.resolve_directive_type(&directive.target) else {
            return (Vec::new(), self.diagnostics);
        };

        let dispatch = self.resolve_dispatch(directive);
        let root = self.build_root(source, target, directive, dispatch);
        debug!(
            source = %self.graph.get(source).qualified_name(),
            target = %self.graph.get(target).qualified_name(),
            "directive plan built"
        );

        let mut discovered = Vec::new();
        if let MappingPlan::Object(plan) = &root {
            collect_pairs(plan, &mut discovered);
        }
        self.planned.insert((source, target), root);
        for pair in discovered {
            self.expand_pair(pair);
        }

        let plans = self.planned.into_values().collect();
        (plans, self.diagnostics)
    }

    fn resolve_directive_type(&mut self, name: &str) -> Option<TypeId> {
        let resolved = self.graph.type_named(name);
        if resolved.is_none() {
            self.diagnostics.push(Diagnostic::error(
                codes::UNKNOWN_TYPE_IN_DIRECTIVE,
                name,
                format_message(messages::UNKNOWN_TYPE_IN_DIRECTIVE, &[name]),
            ));
        }
        resolved
    }

    fn resolve_dispatch(&mut self, directive: &MappingDirective) -> Vec<PairKey> {
        let mut dispatch = Vec::with_capacity(directive.derived.len());
        for pair in &directive.derived {
            let source = self.resolve_directive_type(&pair.source);
            let target = self.resolve_directive_type(&pair.target);
            if let (Some(source), Some(target)) = (source, target) {
                dispatch.push((source, target));
            }
        }
        dispatch
    }

    fn build_root(
        &mut self,
        source: TypeId,
        target: TypeId,
        directive: &MappingDirective,
        dispatch: Vec<PairKey>,
    ) -> MappingPlan {
        let source_ty = self.graph.get(source);
        let target_ty = self.graph.get(target);

        if source_ty.is_enum() {
            // Value tables are only meaningful for enum pairs; a directive
            // targeting a non-enum gets empty tables and fails validation.
            let values = if target_ty.is_enum() {
                match_values(source_ty, target_ty)
            } else {
                Vec::new()
            };
            let reverse_values = if target_ty.is_enum() && directive.bidirectional() {
                match_values(target_ty, source_ty)
            } else {
                Vec::new()
            };
            return MappingPlan::Enum(EnumPlan {
                source,
                target,
                directive: directive.clone(),
                explicit: true,
                values,
                reverse_values,
            });
        }

        let outcome = if target_ty.is_class_like() {
            match_members(
                self.graph,
                source,
                target,
                directive.strategy,
                directive.flattening(),
                directive.include_private(),
            )
        } else {
            MatchOutcome::default()
        };
        let (reverse_mappings, reverse_unmatched) = if directive.bidirectional() {
            invert(self.graph, source, &outcome)
        } else {
            (Vec::new(), Vec::new())
        };

        MappingPlan::Object(ObjectPlan {
            source,
            target,
            directive: directive.clone(),
            explicit: true,
            mappings: outcome.mappings,
            unmatched: outcome.unmatched,
            fan_in: outcome.fan_in,
            reverse_mappings,
            reverse_unmatched,
            dispatch,
        })
    }

    /// Create the implicit plan for a discovered pair, recursing into the
    /// pairs it discovers in turn. Pairs already planned are left alone:
    /// the routine reference by name is enough.
    fn expand_pair(&mut self, pair: PairKey) {
        if self.planned.contains_key(&pair) {
            return;
        }
        match self.guard.enter(pair) {
            GuardEntry::Entered => {}
            GuardEntry::Revisited => return,
            GuardEntry::DepthExceeded => {
                warn!(depth = self.guard.depth(), "nested pair expansion too deep");
                return;
            }
        }

        let (source, target) = pair;
        let source_ty = self.graph.get(source);
        let target_ty = self.graph.get(target);
        let implicit = MappingDirective::new(source_ty.qualified_name(), target_ty.qualified_name());

        let mut discovered = Vec::new();
        if source_ty.is_enum() && target_ty.is_enum() {
            let values = match_values(source_ty, target_ty);
            self.planned.insert(
                pair,
                MappingPlan::Enum(EnumPlan {
                    source,
                    target,
                    directive: implicit,
                    explicit: false,
                    values,
                    reverse_values: Vec::new(),
                }),
            );
        } else if source_ty.is_class_like() && target_ty.is_class_like() {
            let outcome = match_members(
                self.graph,
                source,
                target,
                implicit.strategy,
                false,
                false,
            );
            let plan = ObjectPlan {
                source,
                target,
                directive: implicit,
                explicit: false,
                mappings: outcome.mappings,
                unmatched: outcome.unmatched,
                fan_in: outcome.fan_in,
                reverse_mappings: Vec::new(),
                reverse_unmatched: Vec::new(),
                dispatch: Vec::new(),
            };
            collect_pairs(&plan, &mut discovered);
            self.planned.insert(pair, MappingPlan::Object(plan));
        }

        for nested in discovered {
            self.expand_pair(nested);
        }
        self.guard.leave(pair);
    }
}

/// Every (source, target) pair an object plan maps through, forward and
/// reverse, in mapping order.
fn collect_pairs(plan: &ObjectPlan, out: &mut Vec<PairKey>) {
    for mapping in plan.mappings.iter().chain(&plan.reverse_mappings) {
        mapping.kind.collect_pairs(out);
    }
}
