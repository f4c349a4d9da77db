//! Command-line driver over the reference network.
//!
//! The binary is a thin caller of the library: it builds the sprinkler
//! network, applies `--evidence`, runs one query, and renders the result as
//! text or JSON.

use std::collections::BTreeMap;
use std::path::PathBuf;

use bn_common::{Error, InferenceKind, OutputFormat, Result, SCHEMA_VERSION};
use bn_config::EngineConfig;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::model::Network;
use crate::sprinkler::sprinkler_network_with_tolerance;

#[derive(Debug, Parser)]
#[command(name = "bayesnet")]
#[command(version)]
#[command(about = "Exact inference on a discrete Bayesian network", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to an engine.json configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Marginal distribution of every variable
    Marginals(QueryArgs),

    /// Most probable state of every variable
    Mpe(QueryArgs),

    /// Probability of a complete assignment
    Probability(ProbabilityArgs),
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Observed variable, as NAME=STATE (repeatable)
    #[arg(short, long, value_parser = parse_assignment)]
    pub evidence: Vec<(String, usize)>,

    /// Inference mode (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub mode: Option<InferenceKind>,
}

#[derive(Debug, Args)]
pub struct ProbabilityArgs {
    /// State of every variable, as NAME=STATE (repeatable)
    #[arg(short, long = "assign", value_parser = parse_assignment, required = true)]
    pub assignments: Vec<(String, usize)>,

    /// Report the natural log of the probability
    #[arg(long)]
    pub log: bool,
}

/// Parse `NAME=STATE`.
pub fn parse_assignment(raw: &str) -> std::result::Result<(String, usize), String> {
    let (name, state) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=STATE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{raw}'"));
    }
    let state = state
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid state in '{raw}': {e}"))?;
    Ok((name.to_lowercase(), state))
}

#[derive(Debug, Serialize)]
struct Report<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'static str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    evidence: BTreeMap<&'a str, usize>,
    result: T,
}

#[derive(Debug, Serialize)]
struct ProbabilityResult {
    probability: f64,
    log: bool,
}

fn apply_evidence(network: &mut Network, evidence: &[(String, usize)]) -> Result<()> {
    for (name, state) in evidence {
        network.clamp_variable(name, *state)?;
    }
    Ok(())
}

fn render<T: Serialize + std::fmt::Display>(
    format: OutputFormat,
    command: &'static str,
    evidence: &[(String, usize)],
    result: &T,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(result.to_string()),
        OutputFormat::Json => {
            let report = Report {
                schema_version: SCHEMA_VERSION,
                command,
                evidence: evidence.iter().map(|(n, s)| (n.as_str(), *s)).collect(),
                result,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

/// Execute a parsed command line, returning the rendered output.
pub fn run(cli: &Cli, config: &EngineConfig) -> Result<String> {
    let mut network = sprinkler_network_with_tolerance(config.cpt_tolerance)?;

    match &cli.command {
        Commands::Marginals(args) => {
            apply_evidence(&mut network, &args.evidence)?;
            let mode = args.mode.unwrap_or(config.inference);
            info!(%mode, clamped = args.evidence.len(), "running marginals query");
            let table = network.query(mode)?;
            render(cli.format, "marginals", &args.evidence, &table)
        }
        Commands::Mpe(args) => {
            apply_evidence(&mut network, &args.evidence)?;
            let mode = args.mode.unwrap_or(config.inference);
            info!(%mode, clamped = args.evidence.len(), "running mpe query");
            let table = network.query(mode)?;
            let explanation = crate::inference::most_probable_explanation(&table)?;
            render(cli.format, "mpe", &args.evidence, &explanation)
        }
        Commands::Probability(args) => {
            let assignment: Vec<(&str, usize)> = args
                .assignments
                .iter()
                .map(|(n, s)| (n.as_str(), *s))
                .collect();
            let probability = if args.log {
                network.log_assignment_probability(&assignment)?
            } else {
                network.assignment_probability(&assignment)?
            };
            match cli.format {
                OutputFormat::Text => Ok(format!("{probability}\n")),
                OutputFormat::Json => {
                    let report = Report {
                        schema_version: SCHEMA_VERSION,
                        command: "probability",
                        evidence: BTreeMap::new(),
                        result: ProbabilityResult {
                            probability,
                            log: args.log,
                        },
                    };
                    serde_json::to_string_pretty(&report).map_err(Error::from)
                }
            }
        }
    }
}
