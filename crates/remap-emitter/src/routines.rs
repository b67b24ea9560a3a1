//! Object routine emission: forward, reverse, and in-place update bodies,
//! plus the member value expressions shared with the projection form.
//!
//! Construction follows the target shape: a struct literal for the members
//! the plan binds, a `..Default::default()` spread when unmatched or
//! ignored members remain, and mutate-after-construct assignments when a
//! factory hook replaces the literal. Hooks wrap the member copies:
//! `before_map` sees the untouched source, `after_map` sees source and the
//! fully-populated target.

use crate::names;
use crate::writer::SourceWriter;
use remap_analysis::{
    ConversionKind, MappingKind, ObjectPlan, PassOutput, PropertyMapping,
};
use remap_graph::{Mutability, TypeDescriptor, TypeGraph, TypeId};
use rustc_hash::FxHashSet;

pub(crate) struct RoutineEmitter<'a> {
    pub graph: &'a TypeGraph,
    pub output: &'a PassOutput,
    /// When set, enum member mappings render as inline match expressions
    /// (the projection form) instead of routine calls.
    pub inline_enums: bool,
}

impl<'a> RoutineEmitter<'a> {
    /// Emit every routine an object plan asks for. Polymorphic base plans
    /// emit their dispatch routine instead of a member-copy form.
    pub fn emit_object(&self, w: &mut SourceWriter, plan: &ObjectPlan) {
        if !plan.dispatch.is_empty() {
            crate::dispatch::emit_dispatch(self.graph, w, plan);
            return;
        }

        self.emit_forward(w, plan);
        if plan.directive.update_target() {
            self.emit_update(w, plan);
        }
        if plan.directive.bidirectional() {
            self.emit_reverse(w, plan);
        }
        if plan.directive.projection() {
            crate::projection::emit_projection(self, w, plan);
        }
    }

    fn emit_forward(&self, w: &mut SourceWriter, plan: &ObjectPlan) {
        let source_ty = self.graph.get(plan.source);
        let target_ty = self.graph.get(plan.target);
        let name = names::map_routine(self.graph, plan.source, plan.target);

        w.blank_line();
        w.line(&format!(
            "pub fn {name}{}(source: &{}) -> {} {{",
            names::generic_signature(source_ty, target_ty),
            names::type_display(source_ty),
            names::type_display(target_ty),
        ));
        w.increase_indent();

        if let Some(hook) = &plan.directive.hooks.before_map {
            w.line(&format!("{hook}(source);"));
        }

        let factory = plan.directive.hooks.factory.as_deref();
        let after_assigns: Vec<&PropertyMapping> = if factory.is_some() {
            plan.mappings
                .iter()
                .filter(|m| {
                    target_ty.members[m.target_member].mutability == Mutability::Settable
                })
                .collect()
        } else {
            Vec::new()
        };
        let needs_mut =
            plan.directive.hooks.after_map.is_some() || !after_assigns.is_empty();
        let mut_kw = if needs_mut { "mut " } else { "" };

        match factory {
            Some(factory) => {
                w.line(&format!("let {mut_kw}target = {factory}(source);"));
                for &mapping in &after_assigns {
                    let member = &target_ty.members[mapping.target_member].name;
                    let expr = self.value_expr(source_ty, mapping);
                    w.line(&format!("target.{member} = {expr};"));
                }
            }
            None => {
                self.emit_literal(w, source_ty, target_ty, &plan.mappings, mut_kw);
            }
        }

        if let Some(hook) = &plan.directive.hooks.after_map {
            w.line(&format!("{hook}(source, &mut target);"));
        }
        w.line("target");
        w.decrease_indent();
        w.line("}");
    }

    /// Reverse routine: same construction machinery with the roles
    /// swapped. The parameter is the original target shape; hooks and
    /// factories do not apply in reverse.
    fn emit_reverse(&self, w: &mut SourceWriter, plan: &ObjectPlan) {
        let source_ty = self.graph.get(plan.source);
        let target_ty = self.graph.get(plan.target);
        let name = names::map_routine(self.graph, plan.target, plan.source);

        w.blank_line();
        w.line(&format!(
            "pub fn {name}{}(source: &{}) -> {} {{",
            names::generic_signature(target_ty, source_ty),
            names::type_display(target_ty),
            names::type_display(source_ty),
        ));
        w.increase_indent();
        self.emit_literal(w, target_ty, source_ty, &plan.reverse_mappings, "");
        w.line("target");
        w.decrease_indent();
        w.line("}");
    }

    fn emit_update(&self, w: &mut SourceWriter, plan: &ObjectPlan) {
        let source_ty = self.graph.get(plan.source);
        let target_ty = self.graph.get(plan.target);
        let name = names::update_routine(self.graph, plan.source, plan.target);

        w.blank_line();
        w.line(&format!(
            "pub fn {name}{}(target: &mut {}, source: &{}) {{",
            names::generic_signature(source_ty, target_ty),
            names::type_display(target_ty),
            names::type_display(source_ty),
        ));
        w.increase_indent();
        if let Some(hook) = &plan.directive.hooks.before_map {
            w.line(&format!("{hook}(source);"));
        }
        for mapping in &plan.mappings {
            let member = &target_ty.members[mapping.target_member];
            // Constructor-only members cannot change after the fact.
            if member.mutability != Mutability::Settable {
                continue;
            }
            let expr = self.value_expr(source_ty, mapping);
            w.line(&format!("target.{} = {expr};", member.name));
        }
        if let Some(hook) = &plan.directive.hooks.after_map {
            w.line(&format!("{hook}(source, target);"));
        }
        w.decrease_indent();
        w.line("}");
    }

    /// `let target = Write { a: ..., b: ..., ..Default::default() };`
    pub(crate) fn emit_literal(
        &self,
        w: &mut SourceWriter,
        read_ty: &TypeDescriptor,
        write_ty: &TypeDescriptor,
        mappings: &[PropertyMapping],
        mut_kw: &str,
    ) {
        w.line(&format!(
            "let {mut_kw}target = {} {{",
            names::type_display(write_ty)
        ));
        w.increase_indent();
        for mapping in mappings {
            let member = &write_ty.members[mapping.target_member].name;
            let expr = self.value_expr(read_ty, mapping);
            w.line(&format!("{member}: {expr},"));
        }
        let mapped: FxHashSet<usize> = mappings.iter().map(|m| m.target_member).collect();
        if (0..write_ty.members.len()).any(|i| !mapped.contains(&i)) {
            w.line("..Default::default()");
        }
        w.decrease_indent();
        w.line("};");
    }

    // =========================================================================
    // Member value expressions
    // =========================================================================

    /// The expression producing one target member's value, reading from
    /// the routine's `source` parameter of type `read_ty`.
    pub(crate) fn value_expr(&self, read_ty: &TypeDescriptor, mapping: &PropertyMapping) -> String {
        if !mapping.is_flattened() {
            let member = &read_ty.members[mapping.source_path[0]];
            let access = format!("source.{}", member.name);
            return if mapping.through_option {
                self.option_core(&access, &mapping.kind)
            } else {
                self.wrapped(self.plain_core(&access, &mapping.kind), mapping)
            };
        }

        // Flattened: one level of nested access, with option chaining when
        // a step along the path is nullable.
        let outer = &read_ty.members[mapping.source_path[0]];
        let nested_id = self
            .graph
            .resolve(&outer.ty)
            .expect("flattened chains resolve to graph types");
        let inner = &self.graph.get(nested_id).members[mapping.source_path[1]];
        let outer_access = format!("source.{}", outer.name);
        if outer.nullable {
            let inner_access = format!("value.{}", inner.name);
            if inner.nullable {
                format!(
                    "{outer_access}.as_ref().and_then(|value| {})",
                    self.option_core(&inner_access, &mapping.kind)
                )
            } else {
                format!(
                    "{outer_access}.as_ref().map(|value| {})",
                    self.plain_core(&inner_access, &mapping.kind)
                )
            }
        } else {
            let access = format!("{outer_access}.{}", inner.name);
            if inner.nullable {
                self.option_core(&access, &mapping.kind)
            } else {
                self.wrapped(self.plain_core(&access, &mapping.kind), mapping)
            }
        }
    }

    fn wrapped(&self, expr: String, mapping: &PropertyMapping) -> String {
        if mapping.wrap_some {
            format!("Some({expr})")
        } else {
            expr
        }
    }

    /// Value expression over a non-optional access.
    fn plain_core(&self, access: &str, kind: &MappingKind) -> String {
        match kind {
            MappingKind::Direct { needs_clone: false } => access.to_string(),
            MappingKind::Direct { needs_clone: true } => format!("{access}.clone()"),
            MappingKind::Convert(conversion) => conversion_expr(access, *conversion),
            MappingKind::Nested { source, target } => {
                format!("{}(&{access})", names::map_routine(self.graph, *source, *target))
            }
            MappingKind::EnumValue { source, target } => self.enum_expr(access, *source, *target),
            MappingKind::Collection { element, .. } => self.collection_expr(access, element),
        }
    }

    /// Value expression over an `Option` access, yielding an `Option`.
    fn option_core(&self, access: &str, kind: &MappingKind) -> String {
        match kind {
            MappingKind::Direct { needs_clone: false } => access.to_string(),
            MappingKind::Direct { needs_clone: true } => format!("{access}.clone()"),
            MappingKind::Convert(conversion) => {
                format!("{access}.map(|item| {})", conversion_expr("item", *conversion))
            }
            MappingKind::Nested { source, target } => format!(
                "{access}.as_ref().map({})",
                names::map_routine(self.graph, *source, *target)
            ),
            MappingKind::EnumValue { source, target } => {
                if self.inline_enums {
                    format!(
                        "{access}.map(|item| {})",
                        self.enum_expr("item", *source, *target)
                    )
                } else {
                    format!(
                        "{access}.map({})",
                        names::map_routine(self.graph, *source, *target)
                    )
                }
            }
            MappingKind::Collection { element, .. } => format!(
                "{access}.as_ref().map(|item| {})",
                self.collection_expr("item", element)
            ),
        }
    }

    /// Element-wise collection expression; `.collect()` infers the target
    /// container from the member's declared type.
    fn collection_expr(&self, access: &str, element: &MappingKind) -> String {
        match element {
            MappingKind::Direct { needs_clone: false } => {
                format!("{access}.iter().copied().collect()")
            }
            MappingKind::Direct { needs_clone: true } => {
                format!("{access}.iter().cloned().collect()")
            }
            MappingKind::Convert(conversion) => {
                let item = match conversion {
                    ConversionKind::WidenToI64 => "i64::from(*item)".to_string(),
                    _ => conversion_expr("item", *conversion),
                };
                format!("{access}.iter().map(|item| {item}).collect()")
            }
            MappingKind::Nested { source, target } => format!(
                "{access}.iter().map({}).collect()",
                names::map_routine(self.graph, *source, *target)
            ),
            MappingKind::EnumValue { source, target } => format!(
                "{access}.iter().map(|item| {}).collect()",
                self.enum_expr("*item", *source, *target)
            ),
            MappingKind::Collection { element, .. } => format!(
                "{access}.iter().map(|item| {}).collect()",
                self.collection_expr("item", element)
            ),
        }
    }

    /// An enum member value: a routine call, or an inline match when the
    /// emitter is in projection mode.
    fn enum_expr(&self, access: &str, source: TypeId, target: TypeId) -> String {
        if self.inline_enums
            && let Some(plan) = self.output.plan_for((source, target)).and_then(|p| p.as_enum())
        {
            let source_name = &self.graph.get(source).name;
            let target_name = &self.graph.get(target).name;
            let mut arms: Vec<String> = plan
                .values
                .iter()
                .filter_map(|v| {
                    v.target_value
                        .as_ref()
                        .map(|t| format!("{source_name}::{} => {target_name}::{t}", v.source_value))
                })
                .collect();
            if plan.values.iter().any(|v| !v.is_matched()) {
                arms.push(format!(
                    "other => panic!(\"no mapping from {source_name} value {{other:?}} to {target_name}\")"
                ));
            }
            return format!("match {access} {{ {} }}", arms.join(", "));
        }
        format!("{}({access})", names::map_routine(self.graph, source, target))
    }
}

fn conversion_expr(access: &str, conversion: ConversionKind) -> String {
    match conversion {
        ConversionKind::WidenToI64 => format!("i64::from({access})"),
        ConversionKind::TimestampToString => format!("{access}.to_rfc3339()"),
        ConversionKind::NumberToString
        | ConversionKind::BoolToString
        | ConversionKind::UuidToString => format!("{access}.to_string()"),
    }
}
