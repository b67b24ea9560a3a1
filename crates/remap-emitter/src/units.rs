//! Generated source units.
//!
//! Valid plans are stable-sorted by (target type name, source type name)
//! and grouped into one unit per target-type namespace, so output text
//! diffs stay minimal between passes and the caller's incremental build
//! avoids needless downstream recompilation.

use crate::enums::emit_enum;
use crate::names;
use crate::routines::RoutineEmitter;
use crate::writer::SourceWriter;
use indexmap::IndexMap;
use remap_analysis::{MappingPlan, PassOutput};
use remap_graph::TypeGraph;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub namespace: String,
    pub file_name: String,
    pub text: String,
}

/// Render every valid plan in `output` into per-namespace source units.
pub fn emit_units(graph: &TypeGraph, output: &PassOutput) -> Vec<GeneratedUnit> {
    let mut plans: Vec<&MappingPlan> = output.valid_plans().collect();
    plans.sort_by_key(|p| {
        (
            graph.get(p.target()).qualified_name(),
            graph.get(p.source()).qualified_name(),
        )
    });

    let mut groups: IndexMap<String, Vec<&MappingPlan>> = IndexMap::new();
    for plan in plans {
        groups
            .entry(graph.get(plan.target()).namespace.clone())
            .or_default()
            .push(plan);
    }

    let emitter = RoutineEmitter {
        graph,
        output,
        inline_enums: false,
    };
    let units: Vec<GeneratedUnit> = groups
        .into_iter()
        .map(|(namespace, plans)| {
            let mut w = SourceWriter::new();
            let scope = if namespace.is_empty() {
                "the root namespace".to_string()
            } else {
                format!("namespace `{namespace}`")
            };
            w.line(&format!("// @generated by remap: mapping routines for {scope}."));
            w.line("// Do not edit; regenerate from the type graph instead.");
            for plan in plans {
                match plan {
                    MappingPlan::Object(object) => emitter.emit_object(&mut w, object),
                    MappingPlan::Enum(enum_plan) => emit_enum(graph, &mut w, enum_plan),
                }
            }
            GeneratedUnit {
                file_name: names::unit_file_name(&namespace),
                namespace,
                text: w.finish(),
            }
        })
        .collect();
    debug!(units = units.len(), "emission finished");
    units
}
