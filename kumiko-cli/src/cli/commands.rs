//! Command implementations and argument parsing for the kumiko CLI.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use kumiko_core::{DEFAULT_BATCH_SIZE, RewireError, RewirerBuilder, SamplerStrategy, Simulation};
use kumiko_providers_edges::{EdgeColumns, EdgeTable, EdgeTableError, write_edge_table};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "kumiko",
    about = "Simulate strength-preserving random rewirings of a bipartite edge table."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the rewiring simulation against a Parquet edge table.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to the input Parquet edge table.
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Directory receiving one `<round>.edge.parquet` file per round.
    #[arg(short = 'o', long = "outdir")]
    pub outdir: PathBuf,

    /// Number of independent simulation rounds.
    #[arg(short = 'n', long = "rounds")]
    pub rounds: usize,

    /// Column holding the source-partition node ids.
    #[arg(long = "source-column")]
    pub source_column: String,

    /// Column holding the target-partition node ids.
    #[arg(long = "target-column")]
    pub target_column: String,

    /// Column holding the positive integer edge weights.
    #[arg(long = "weight-column")]
    pub weight_column: String,

    /// Sampling strategy used by every round.
    #[arg(long = "sampler", value_enum, default_value_t = SamplerArg::Permutation)]
    pub sampler: SamplerArg,

    /// Base seed; when omitted one is drawn from entropy and logged.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Batch size of the per-round uniform stream.
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

/// Sampling strategies selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SamplerArg {
    /// Weighted draw-without-replacement over a binary-indexed tree.
    Tree,
    /// Full shuffle of the materialized endpoint sequence.
    Permutation,
}

impl fmt::Display for SamplerArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Tree => "tree",
            Self::Permutation => "permutation",
        };
        f.write_str(label)
    }
}

impl From<SamplerArg> for SamplerStrategy {
    fn from(arg: SamplerArg) -> Self {
        match arg {
            SamplerArg::Tree => Self::Tree,
            SamplerArg::Permutation => Self::Permutation,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed outside the Parquet reader or writer.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Edge-table ingestion or persistence failed.
    #[error(transparent)]
    Provider(#[from] EdgeTableError),
    /// Core simulation failed.
    #[error(transparent)]
    Core(#[from] RewireError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name derived for the input table.
    pub table: String,
    /// Number of source-partition nodes.
    pub source_nodes: usize,
    /// Number of target-partition nodes.
    pub target_nodes: usize,
    /// Total mass redistributed by every round.
    pub total_mass: u64,
    /// Number of round tables written.
    pub rounds: usize,
    /// Base seed the run used.
    pub seed: u64,
    /// Directory the round tables were written to.
    pub outdir: PathBuf,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when parsing or execution fails.
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(input = field::Empty, rounds = field::Empty, sampler = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    span.record("input", field::display(command.input.display()));
    span.record("rounds", field::display(command.rounds));
    span.record("sampler", field::display(command.sampler));

    let seed = command.seed.unwrap_or_else(rand::random);
    let rewirer = RewirerBuilder::new()
        .with_rounds(command.rounds)
        .with_strategy(command.sampler.into())
        .with_seed(seed)
        .with_batch_size(command.batch_size)
        .build()?;

    let columns = EdgeColumns::new(
        command.source_column.clone(),
        command.target_column.clone(),
        command.weight_column.clone(),
    );
    let table_name = derive_table_name(&command.input);
    let table = EdgeTable::try_from_parquet_path(table_name.clone(), &command.input, &columns)?;
    info!(
        table = table_name.as_str(),
        rows = table.len(),
        seed,
        "edge table loaded"
    );

    let simulation = rewirer.prepare(table.edges())?;
    fs::create_dir_all(&command.outdir).map_err(|source| CliError::Io {
        path: command.outdir.clone(),
        source,
    })?;
    let rounds = persist_rounds(&simulation, &command.outdir, &columns)?;

    let summary = ExecutionSummary {
        table: table_name,
        source_nodes: simulation.source_strengths().len(),
        target_nodes: simulation.target_strengths().len(),
        total_mass: simulation.total_mass(),
        rounds,
        seed,
        outdir: command.outdir,
    };
    info!(
        table = summary.table.as_str(),
        rounds = summary.rounds,
        total_mass = summary.total_mass,
        "command completed"
    );
    Ok(summary)
}

/// Writes every round of `simulation` to `outdir`, one file per round.
fn persist_rounds(
    simulation: &Simulation,
    outdir: &Path,
    columns: &EdgeColumns,
) -> Result<usize, CliError> {
    let mut written = 0;
    for round in simulation.rounds() {
        let round = round?;
        let path = outdir.join(format!("{}.edge.parquet", round.index()));
        write_edge_table(&path, round.edges(), columns)?;
        info!(
            round = round.index(),
            seed = round.seed(),
            rows = round.edges().len(),
            path = field::display(path.display()),
            "round persisted"
        );
        written += 1;
    }
    Ok(written)
}

/// Renders `summary` as the human-readable stdout payload.
///
/// # Errors
/// Returns the underlying I/O error when the writer fails.
pub fn render_summary(summary: &ExecutionSummary, writer: &mut impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "table `{}`: {} x {} nodes, total mass {}",
        summary.table, summary.source_nodes, summary.target_nodes, summary.total_mass
    )?;
    writeln!(
        writer,
        "wrote {} round(s) to `{}` (seed {})",
        summary.rounds,
        summary.outdir.display(),
        summary.seed
    )?;
    Ok(())
}

pub(super) fn derive_table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map_or_else(|| "edge_table".to_owned(), ToOwned::to_owned)
}
