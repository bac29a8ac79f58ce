//! Command-line interface orchestration for the kumiko simulator.
//!
//! The CLI offers a `run` command that loads a Parquet edge table, simulates
//! the requested number of strength-preserving rewiring rounds and persists
//! one output table per round.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, RunCommand, SamplerArg, render_summary, run_cli,
};

#[cfg(test)]
mod test_fixtures;
