//! `plexus stats`: shape of the adjacency graph and what construction dropped.

use std::io::{self, Write};

use clap::Args;
use plexus_core::graph::{BuildReport, GraphStats};
use serde::Serialize;

use crate::cmd::{InputArgs, RunContext, load_graph};
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `plexus stats`.
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Report payload for `plexus stats`.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub graph: GraphStats,
    pub build: BuildReport,
    pub connected: bool,
}

/// Execute `plexus stats`.
pub fn run_stats(args: &StatsArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let graph = load_graph(&args.input, ctx)?;
    let stats = GraphStats::from_graph(&graph);

    let payload = StatsReport {
        connected: stats.is_connected(),
        graph: stats,
        build: *graph.report(),
    };

    render_mode(ctx.output, &payload, render_stats_text, render_stats_pretty)
}

fn rows(report: &StatsReport) -> Vec<(&'static str, String)> {
    let g = &report.graph;
    let b = &report.build;
    vec![
        ("nodes", g.node_count.to_string()),
        ("edges", g.edge_count.to_string()),
        ("density", format!("{:.4}", g.density)),
        ("components", g.component_count.to_string()),
        ("largest_component", g.largest_component.to_string()),
        ("connected", report.connected.to_string()),
        ("max_degree", g.max_degree.to_string()),
        ("leaves", g.leaf_count.to_string()),
        ("records", b.records.to_string()),
        ("self_loops", b.self_loops.to_string()),
        ("duplicates", b.duplicates.to_string()),
    ]
}

fn render_stats_text(report: &StatsReport, w: &mut dyn Write) -> io::Result<()> {
    for (key, value) in rows(report) {
        writeln!(w, "{key}\t{value}")?;
    }
    Ok(())
}

fn render_stats_pretty(report: &StatsReport, w: &mut dyn Write) -> io::Result<()> {
    let rows = rows(report);
    let (graph_rows, input_rows) = rows.split_at(8);

    pretty_section(w, "Graph")?;
    for (key, value) in graph_rows {
        pretty_kv(w, key, value)?;
    }
    writeln!(w)?;
    pretty_section(w, "Input")?;
    for (key, value) in input_rows {
        pretty_kv(w, key, value)?;
    }
    Ok(())
}
