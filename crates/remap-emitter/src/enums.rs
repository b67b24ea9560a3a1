//! Enum conversion routines.
//!
//! One match arm per matched value pair, in source declaration order.
//! Unmapped values are omitted from the dispatch (the coverage warning
//! already acknowledged the gap) and fall through to a descriptive panic
//! naming the value and both types. When every value is matched the match
//! is exhaustive and no fallback arm is emitted.

use crate::names;
use crate::writer::SourceWriter;
use remap_analysis::{EnumPlan, EnumValueMapping};
use remap_graph::{TypeGraph, TypeId};

pub(crate) fn emit_enum(graph: &TypeGraph, w: &mut SourceWriter, plan: &EnumPlan) {
    emit_enum_routine(graph, w, plan.source, plan.target, &plan.values);
    if plan.directive.bidirectional() {
        emit_enum_routine(graph, w, plan.target, plan.source, &plan.reverse_values);
    }
}

fn emit_enum_routine(
    graph: &TypeGraph,
    w: &mut SourceWriter,
    source: TypeId,
    target: TypeId,
    values: &[EnumValueMapping],
) {
    let source_name = &graph.get(source).name;
    let target_name = &graph.get(target).name;
    let name = names::map_routine(graph, source, target);

    w.blank_line();
    w.line(&format!(
        "pub fn {name}(value: {source_name}) -> {target_name} {{"
    ));
    w.increase_indent();
    w.line("match value {");
    w.increase_indent();
    for value in values {
        if let Some(target_value) = &value.target_value {
            w.line(&format!(
                "{source_name}::{} => {target_name}::{target_value},",
                value.source_value
            ));
        }
    }
    if values.iter().any(|v| !v.is_matched()) {
        w.line(&format!(
            "other => panic!(\"no mapping from {source_name} value {{other:?}} to {target_name}\"),"
        ));
    }
    w.decrease_indent();
    w.line("}");
    w.decrease_indent();
    w.line("}");
}
