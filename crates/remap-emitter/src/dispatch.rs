//! Polymorphic dispatch routines.
//!
//! A base plan with derived-type pairs renders as a match over the source
//! variants, routing each to the direct routine for its pair, in
//! declaration order. The default arm fails loudly: an unrecognized
//! variant at runtime is a contract violation, never silently mapped.

use crate::names;
use crate::writer::SourceWriter;
use remap_analysis::ObjectPlan;
use remap_graph::TypeGraph;

pub(crate) fn emit_dispatch(graph: &TypeGraph, w: &mut SourceWriter, plan: &ObjectPlan) {
    let source_ty = graph.get(plan.source);
    let target_ty = graph.get(plan.target);
    let name = names::map_routine(graph, plan.source, plan.target);

    w.blank_line();
    w.line(&format!(
        "pub fn {name}(source: &{}) -> {} {{",
        source_ty.name, target_ty.name
    ));
    w.increase_indent();
    w.line("match source {");
    w.increase_indent();
    for &(derived_source, derived_target) in &plan.dispatch {
        let ds = graph.get(derived_source);
        let dt = graph.get(derived_target);
        w.line(&format!(
            "{}::{}(value) => {}::{}({}(value)),",
            source_ty.name,
            ds.name,
            target_ty.name,
            dt.name,
            names::map_routine(graph, derived_source, derived_target),
        ));
    }
    w.line(&format!(
        "_ => panic!(\"{name}: no derived mapping registered for this {} value\"),",
        source_ty.name
    ));
    w.decrease_indent();
    w.line("}");
    w.decrease_indent();
    w.line("}");
}
