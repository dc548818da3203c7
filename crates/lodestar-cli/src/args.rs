//! Command-line argument definitions for the lodestar CLI.
//!
//! Running `lodestar` without a subcommand lays out `graph.json` into
//! `graph_with_pos.json` in the working directory.

use clap::{Parser, Subcommand};

/// Default node list read by `layout` and written by `extract`
pub const DEFAULT_INPUT: &str = "graph.json";

/// Default annotated node list written by `layout`
pub const DEFAULT_OUTPUT: &str = "graph_with_pos.json";

/// Command-line arguments for the lodestar tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

impl Args {
    /// Returns the subcommand to run, falling back to `layout` with defaults.
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Layout(LayoutArgs::default()))
    }
}

/// Subcommands of the lodestar tool
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compute positions for a node list
    Layout(LayoutArgs),

    /// Build a node list from wiki links in a directory of documents
    Extract(ExtractArgs),
}

/// Arguments of the `layout` subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Path to the input node list
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: String,

    /// Path to the output node list
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Seed for the initial placement, overrides the configuration
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of simulation steps, overrides the configuration
    #[arg(long)]
    pub iterations: Option<usize>,
}

impl Default for LayoutArgs {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            seed: None,
            iterations: None,
        }
    }
}

/// Arguments of the `extract` subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Directory holding the documents
    pub dir: String,

    /// Path to the output node list
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub output: String,
}
