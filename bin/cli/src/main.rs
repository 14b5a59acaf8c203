use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flowscope_core::{NodeId, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use error::CliError;

/// Flowscope - structural analysis for workflow graphs
#[derive(Parser)]
#[command(name = "flowscope")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect issues, estimate metrics and simulate optimization
    Analyze {
        /// Path to the graph snapshot (JSON)
        graph: PathBuf,

        /// Heuristics file (TOML, JSON or YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the optimized graph here
        #[arg(long)]
        graph_out: Option<PathBuf>,

        /// Print a text summary instead of the JSON report
        #[arg(long)]
        summary: bool,
    },

    /// Check whether a connection between two nodes would be accepted
    CheckConnection {
        /// Path to the graph snapshot (JSON)
        graph: PathBuf,

        /// Source node ID
        #[arg(long)]
        source: NodeId,

        /// Target node ID
        #[arg(long)]
        target: NodeId,

        /// Output port on the source node
        #[arg(long)]
        source_handle: Option<String>,

        /// Input port on the target node
        #[arg(long)]
        target_handle: Option<String>,
    },

    /// Check required inputs and acyclicity
    Validate {
        /// Path to the graph snapshot (JSON)
        graph: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(report) => {
            eprintln!("error: {report}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<String, CliError> {
    match command {
        Commands::Analyze {
            graph,
            config,
            graph_out,
            summary,
        } => {
            let heuristics = config::load_heuristics(config.as_deref()).map_err(|e| {
                CliError::Config {
                    details: e.to_string(),
                }
            })?;
            let graph = commands::load_graph(&graph)?;
            commands::analyze(&graph, &heuristics, graph_out.as_deref(), summary)
        }
        Commands::CheckConnection {
            graph,
            source,
            target,
            source_handle,
            target_handle,
        } => {
            let graph = commands::load_graph(&graph)?;
            commands::check_connection(&graph, source, target, source_handle, target_handle)
        }
        Commands::Validate { graph } => {
            let graph = commands::load_graph(&graph)?;
            commands::validate(&graph)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_check_connection_arguments() {
        let cli = Cli::try_parse_from([
            "flowscope",
            "check-connection",
            "graph.json",
            "--source",
            "fetch",
            "--target",
            "store",
            "--target-handle",
            "rows",
        ])
        .unwrap();
        match cli.command {
            Commands::CheckConnection {
                source,
                target,
                source_handle,
                target_handle,
                ..
            } => {
                assert_eq!(source.as_str(), "fetch");
                assert_eq!(target.as_str(), "store");
                assert_eq!(source_handle, None);
                assert_eq!(target_handle.as_deref(), Some("rows"));
            }
            _ => panic!("wrong subcommand"),
        }
    }
}
