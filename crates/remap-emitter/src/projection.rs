//! The side-effect-free projection form.
//!
//! A pure member selection suitable for query pushdown: a single struct
//! literal of field reads, clones, builtin conversions, and inline enum
//! matches. Plans with nested object construction or hooks never reach
//! this emitter; validation rejects them first.

use crate::names;
use crate::routines::RoutineEmitter;
use crate::writer::SourceWriter;
use remap_analysis::ObjectPlan;

pub(crate) fn emit_projection(emitter: &RoutineEmitter<'_>, w: &mut SourceWriter, plan: &ObjectPlan) {
    let emitter = RoutineEmitter {
        graph: emitter.graph,
        output: emitter.output,
        inline_enums: true,
    };
    let source_ty = emitter.graph.get(plan.source);
    let target_ty = emitter.graph.get(plan.target);
    let name = names::project_routine(emitter.graph, plan.source, plan.target);

    w.blank_line();
    w.line(&format!(
        "pub fn {name}{}(source: &{}) -> {} {{",
        names::generic_signature(source_ty, target_ty),
        names::type_display(source_ty),
        names::type_display(target_ty),
    ));
    w.increase_indent();
    emitter.emit_literal(w, source_ty, target_ty, &plan.mappings, "");
    w.line("target");
    w.decrease_indent();
    w.line("}");
}
