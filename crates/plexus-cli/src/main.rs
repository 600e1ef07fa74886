#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::RunContext;
use cmd::score::{AllArgs, BetweennessArgs, ClosenessArgs, Overrides, ScoreArgs};
use cmd::stats::StatsArgs;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use plexus_core::config::resolve_config;
use plexus_core::metrics::Centrality;
use plexus_core::{ErrorCode, timing};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "plexus: exact centrality for room-adjacency graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit a phase timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file to use instead of `./plexus.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Metrics",
        about = "Rank nodes by degree centrality",
        long_about = "Rank nodes by the fraction of other nodes they touch directly.",
        after_help = "EXAMPLES:\n    # Degree of every room\n    plexus degree rooms.txt\n\n    # Five best-connected rooms as JSON\n    plexus degree rooms.json --top 5 --json"
    )]
    Degree(ScoreArgs),

    #[command(
        next_help_heading = "Metrics",
        about = "Rank nodes by closeness centrality",
        long_about = "Rank nodes by how few hops it takes to reach every other node. Disconnected plans are scaled by the Wasserman-Faust correction unless --no-wf-improved is given.",
        after_help = "EXAMPLES:\n    # Closeness with the component correction\n    plexus closeness rooms.txt\n\n    # Component-local closeness\n    plexus closeness rooms.txt --no-wf-improved"
    )]
    Closeness(ClosenessArgs),

    #[command(
        next_help_heading = "Metrics",
        about = "Rank nodes by betweenness centrality",
        long_about = "Rank nodes by the share of shortest paths between other nodes that pass through them (Brandes' algorithm).",
        after_help = "EXAMPLES:\n    # Normalized betweenness\n    plexus betweenness rooms.txt\n\n    # Raw pair counts, using every core\n    plexus betweenness rooms.txt --raw --parallel"
    )]
    Betweenness(BetweennessArgs),

    #[command(
        next_help_heading = "Metrics",
        about = "Compute every metric in one table",
        after_help = "EXAMPLES:\n    # All metrics, ordered by betweenness\n    plexus all rooms.txt\n\n    # Ordered by closeness, read from stdin\n    cat rooms.txt | plexus all - --sort closeness"
    )]
    All(AllArgs),

    #[command(
        next_help_heading = "Inspect",
        about = "Summarize the adjacency graph",
        long_about = "Report node and edge counts, components, and what construction dropped from the input.",
        after_help = "EXAMPLES:\n    plexus stats rooms.json --json"
    )]
    Stats(StatsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("PLEXUS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "plexus=debug,info"
        } else {
            "plexus=info,warn"
        })
    });

    let format = env::var("PLEXUS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    let project_root = env::current_dir()?;
    let settings = match resolve_config(&project_root, cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            let output = resolve_output_mode(cli.format, cli.json, None);
            render_error(
                output,
                &CliError::from_code(ErrorCode::ConfigParseError, &format!("{err:#}")),
            )?;
            return Err(err);
        }
    };
    debug!(sources = ?settings.sources, "config loaded");

    let output = resolve_output_mode(cli.format, cli.json, settings.output_format.as_deref());
    if cli.verbose {
        info!(?output, "verbose mode enabled");
    }
    let ctx = RunContext { settings, output };

    let command_result = match &cli.command {
        Commands::Degree(args) => cmd::score::run_metric(
            Centrality::Degree,
            args,
            Overrides {
                parallel: args.parallel,
                ..Overrides::default()
            },
            &ctx,
        ),
        Commands::Closeness(args) => cmd::score::run_metric(
            Centrality::Closeness,
            &args.score,
            Overrides {
                parallel: args.score.parallel,
                no_wf_improved: args.no_wf_improved,
                ..Overrides::default()
            },
            &ctx,
        ),
        Commands::Betweenness(args) => cmd::score::run_metric(
            Centrality::Betweenness,
            &args.score,
            Overrides {
                parallel: args.score.parallel,
                raw: args.raw,
                ..Overrides::default()
            },
            &ctx,
        ),
        Commands::All(args) => cmd::score::run_all(args, &ctx),
        Commands::Stats(args) => cmd::stats::run_stats(args, &ctx),
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            eprintln!("timing report (json):");
            eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
        }
    }

    command_result
}
