//! `plexus degree|closeness|betweenness|all`: ranked centrality scores.

use std::io::{self, Write};

use clap::Args;
use plexus_core::metrics::{Centrality, CentralityConfig, compute_all, rank};
use plexus_core::{CentralityScores, Graph, NodeKey, timing};
use serde::Serialize;
use tracing::instrument;

use crate::cmd::{InputArgs, RunContext, load_graph};
use crate::output::{pretty_rule, pretty_section, render_mode};

/// Options shared by every scoring subcommand.
#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Show only the N highest-scoring nodes.
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Run per-source searches on all cores.
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for `plexus closeness`.
#[derive(Args, Debug, Clone)]
pub struct ClosenessArgs {
    #[command(flatten)]
    pub score: ScoreArgs,

    /// Skip the Wasserman-Faust scaling for disconnected plans.
    #[arg(long)]
    pub no_wf_improved: bool,
}

/// Arguments for `plexus betweenness`.
#[derive(Args, Debug, Clone)]
pub struct BetweennessArgs {
    #[command(flatten)]
    pub score: ScoreArgs,

    /// Report raw pair counts instead of normalized scores.
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for `plexus all`.
#[derive(Args, Debug, Clone)]
pub struct AllArgs {
    #[command(flatten)]
    pub score: ScoreArgs,

    /// Skip the Wasserman-Faust scaling for closeness.
    #[arg(long)]
    pub no_wf_improved: bool,

    /// Report raw betweenness pair counts.
    #[arg(long)]
    pub raw: bool,

    /// Metric that orders the rows.
    #[arg(long, value_name = "METRIC", default_value = "betweenness")]
    pub sort: Centrality,
}

/// Flag overrides applied on top of the configured metric settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub parallel: bool,
    pub no_wf_improved: bool,
    pub raw: bool,
}

impl Overrides {
    fn apply(self, mut config: CentralityConfig) -> CentralityConfig {
        if self.parallel {
            config = config.with_parallel(true);
        }
        if self.no_wf_improved {
            config.closeness.wf_improved = false;
        }
        if self.raw {
            config.betweenness.normalized = false;
        }
        config
    }
}

#[derive(Debug, Serialize)]
struct NodeScore<'a> {
    node: &'a NodeKey,
    score: f64,
}

/// JSON payload for a single-metric run.
#[derive(Debug, Serialize)]
struct MetricReport<'a> {
    metric: Centrality,
    node_count: usize,
    edge_count: usize,
    config: CentralityConfig,
    scores: Vec<NodeScore<'a>>,
}

#[derive(Debug, Serialize)]
struct NodeRow<'a> {
    node: &'a NodeKey,
    degree: f64,
    closeness: f64,
    betweenness: f64,
}

/// JSON payload for `plexus all`.
#[derive(Debug, Serialize)]
struct AllReport<'a> {
    sort: Centrality,
    node_count: usize,
    edge_count: usize,
    config: CentralityConfig,
    scores: Vec<NodeRow<'a>>,
}

/// Execute one of `plexus degree|closeness|betweenness`.
#[instrument(skip(args, ctx))]
pub fn run_metric(
    metric: Centrality,
    args: &ScoreArgs,
    overrides: Overrides,
    ctx: &RunContext,
) -> anyhow::Result<()> {
    let graph = load_graph(&args.input, ctx)?;
    let config = overrides.apply(ctx.settings.centrality);

    let scores = timing::timed(metric.as_str(), || metric.compute(&graph, &config));
    let top = args.top.or(ctx.settings.top);

    let payload = MetricReport {
        metric,
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        config,
        scores: ranked(&graph, &scores, top),
    };

    render_mode(ctx.output, &payload, render_metric_text, render_metric_pretty)
}

/// Execute `plexus all`.
#[instrument(skip(args, ctx))]
pub fn run_all(args: &AllArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let graph = load_graph(&args.score.input, ctx)?;
    let overrides = Overrides {
        parallel: args.score.parallel,
        no_wf_improved: args.no_wf_improved,
        raw: args.raw,
    };
    let config = overrides.apply(ctx.settings.centrality);

    let report = timing::timed("all", || compute_all(&graph, &config));
    let top = args.score.top.or(ctx.settings.top);

    let score_of = |scores: &CentralityScores<NodeKey>, node: &NodeKey| {
        scores.get(node).copied().unwrap_or(0.0)
    };
    let rows = ranked(&graph, report.get(args.sort), top)
        .into_iter()
        .map(|entry| NodeRow {
            node: entry.node,
            degree: score_of(&report.degree, entry.node),
            closeness: score_of(&report.closeness, entry.node),
            betweenness: score_of(&report.betweenness, entry.node),
        })
        .collect();

    let payload = AllReport {
        sort: args.sort,
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        config,
        scores: rows,
    };

    render_mode(ctx.output, &payload, render_all_text, render_all_pretty)
}

fn ranked<'g>(
    graph: &'g Graph<NodeKey>,
    scores: &CentralityScores<NodeKey>,
    top: Option<usize>,
) -> Vec<NodeScore<'g>> {
    let mut rows: Vec<NodeScore<'g>> = rank(graph, scores)
        .into_iter()
        .map(|(node, score)| NodeScore { node, score })
        .collect();
    if let Some(top) = top {
        rows.truncate(top);
    }
    rows
}

fn label_width<'a>(nodes: impl Iterator<Item = &'a NodeKey>) -> usize {
    nodes
        .map(|node| node.to_string().chars().count())
        .max()
        .unwrap_or(0)
        .max(4)
}

fn render_metric_text(report: &MetricReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "node\t{}", report.metric)?;
    for row in &report.scores {
        writeln!(w, "{}\t{}", row.node, row.score)?;
    }
    Ok(())
}

fn render_metric_pretty(report: &MetricReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(
        w,
        &format!(
            "{} centrality ({} nodes, {} edges)",
            capitalize(report.metric.as_str()),
            report.node_count,
            report.edge_count
        ),
    )?;
    if report.scores.is_empty() {
        return writeln!(w, "no nodes");
    }

    let width = label_width(report.scores.iter().map(|row| row.node));
    for (i, row) in report.scores.iter().enumerate() {
        writeln!(w, "{:>3}  {:<width$}  {:.6}", i + 1, row.node.to_string(), row.score)?;
    }
    Ok(())
}

fn render_all_text(report: &AllReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "node\tdegree\tcloseness\tbetweenness")?;
    for row in &report.scores {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            row.node, row.degree, row.closeness, row.betweenness
        )?;
    }
    Ok(())
}

fn render_all_pretty(report: &AllReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Centrality ({} nodes, {} edges, sorted by {})",
            report.node_count, report.edge_count, report.sort
        ),
    )?;
    if report.scores.is_empty() {
        return writeln!(w, "no nodes");
    }

    let width = label_width(report.scores.iter().map(|row| row.node));
    writeln!(
        w,
        "{:>3}  {:<width$}  {:>10}  {:>10}  {:>11}",
        "#", "node", "degree", "closeness", "betweenness"
    )?;
    pretty_rule(w)?;
    for (i, row) in report.scores.iter().enumerate() {
        writeln!(
            w,
            "{:>3}  {:<width$}  {:>10.6}  {:>10.6}  {:>11.6}",
            i + 1,
            row.node.to_string(),
            row.degree,
            row.closeness,
            row.betweenness
        )?;
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
