//! CLI module for the PMP evaluation harness
//!
//! Provides subcommands:
//! - `run`: evaluate gateway variants over a dataset

pub mod run;

use clap::{Parser, Subcommand};

/// PMP Eval Harness - accuracy estimates for LLM gateway variants
#[derive(Parser)]
#[command(name = "pmp-eval-harness")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a dataset against one or more variants and report accuracy
    Run(run::RunArgs),
}
