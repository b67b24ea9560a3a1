//! The load, analyze, report, write pipeline.

use crate::args::CliArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use remap_analysis::{AnalysisSession, MappingPlan};
use remap_common::{Diagnostic, DiagnosticCategory};
use remap_emitter::emit_units;
use remap_graph::GraphDocument;
use std::fs;
use tracing::info;

/// What one invocation did, for exit-code and logging decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub errors: usize,
    pub warnings: usize,
    pub units_written: usize,
}

pub fn run(args: &CliArgs) -> Result<PassSummary> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading type graph document {}", args.input.display()))?;
    let graph = GraphDocument::parse(&text)
        .and_then(GraphDocument::into_graph)
        .with_context(|| format!("loading type graph from {}", args.input.display()))?;

    let mut session = AnalysisSession::new();
    let output = session.run_pass(&graph);

    for diagnostic in &output.diagnostics {
        render_diagnostic(diagnostic);
    }

    if args.dump_plans {
        let plans: Vec<&MappingPlan> = output.outcomes.iter().map(|o| o.plan.as_ref()).collect();
        println!("{}", serde_json::to_string_pretty(&plans).context("serializing plans")?);
    }

    let units = emit_units(&graph, &output);
    let mut units_written = 0;
    if !args.check {
        fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("creating output directory {}", args.out_dir.display()))?;
        for unit in &units {
            let path = args.out_dir.join(&unit.file_name);
            fs::write(&path, &unit.text)
                .with_context(|| format!("writing generated unit {}", path.display()))?;
            units_written += 1;
        }
    }

    let summary = PassSummary {
        errors: output.diagnostics.iter().filter(|d| d.is_error()).count(),
        warnings: output.diagnostics.iter().filter(|d| !d.is_error()).count(),
        units_written,
    };
    info!(
        errors = summary.errors,
        warnings = summary.warnings,
        units = summary.units_written,
        "pass finished"
    );
    Ok(summary)
}

fn render_diagnostic(diagnostic: &Diagnostic) {
    let label = match diagnostic.category {
        DiagnosticCategory::Error => "error".red().bold(),
        DiagnosticCategory::Warning => "warning".yellow().bold(),
    };
    let anchor = match &diagnostic.anchor_member {
        Some(member) => format!("{}.{member}", diagnostic.anchor_type),
        None => diagnostic.anchor_type.clone(),
    };
    println!(
        "{label}[{}]: {} ({anchor})",
        diagnostic.formatted_code(),
        diagnostic.message_text
    );
}
