//! Subcommand handlers and the input plumbing they share.

pub mod score;
pub mod stats;

use std::io;
use std::path::{Path, PathBuf};

use clap::Args;
use plexus_core::config::EffectiveConfig;
use plexus_core::edges::{EdgeFormat, EdgeReadError, EdgeRecords, read_edge_file, read_edges};
use plexus_core::{Graph, NodeKey, timing};
use tracing::{info, warn};

use crate::output::{CliError, OutputMode, render_error};

/// Where the edge list comes from.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Edge list file, or `-` to read stdin.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Edge list format: `text` or `json` (default: by file extension).
    #[arg(long, value_name = "FORMAT")]
    pub input_format: Option<EdgeFormat>,
}

/// Per-invocation state handed to every handler.
#[derive(Debug)]
pub struct RunContext {
    pub settings: EffectiveConfig,
    pub output: OutputMode,
}

/// Read the edge list named by `input` and build the canonical graph.
///
/// Failures are rendered to stderr in the active output mode before being
/// returned.
pub fn load_graph(input: &InputArgs, ctx: &RunContext) -> anyhow::Result<Graph<NodeKey>> {
    let format = input.input_format.or(ctx.settings.input_format);

    let records = timing::timed("read", || read_input(&input.file, format));
    let records = match records {
        Ok(records) => records,
        Err(err) => return Err(report_edge_error(ctx.output, err)),
    };
    if records.skipped > 0 {
        info!(skipped = records.skipped, "dropped empty adjacency markers");
    }

    let graph = match timing::timed("build", || records.into_graph()) {
        Ok(graph) => graph,
        Err(err) => return Err(report_edge_error(ctx.output, err)),
    };

    let report = graph.report();
    info!(
        nodes = report.node_count,
        edges = report.edge_count,
        self_loops = report.self_loops,
        duplicates = report.duplicates,
        "graph built"
    );
    if graph.is_empty() {
        warn!(file = %input.file.display(), "edge list has no usable edges");
    }

    Ok(graph)
}

fn read_input(path: &Path, format: Option<EdgeFormat>) -> Result<EdgeRecords, EdgeReadError> {
    if path == Path::new("-") {
        read_edges(io::stdin().lock(), format.unwrap_or(EdgeFormat::Text))
    } else {
        read_edge_file(path, format)
    }
}

fn report_edge_error(output: OutputMode, err: EdgeReadError) -> anyhow::Error {
    let code = err.error_code();
    let err = anyhow::Error::new(err);
    let detail = format!("{err:#}");
    if let Err(render_err) = render_error(output, &CliError::from_code(code, &detail)) {
        return render_err.context(detail);
    }
    err
}
