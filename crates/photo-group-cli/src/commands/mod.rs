//! CLI command definitions and handlers.

pub mod scan;
pub mod state;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Photo Group - Resumable photo grouping
#[derive(Parser)]
#[command(name = "photo-group")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared scan arguments (paths, state, output).
    #[command(flatten)]
    pub scan: scan::ScanArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Group photos, resuming an interrupted scan when possible
    Scan(scan::ScanArgs),
    /// Report pending and cached scan state
    Status(StateArgs),
    /// Print the cached result of the last completed scan
    Show(state::ShowArgs),
    /// Delete the pending checkpoint and the cached result
    Clear(StateArgs),
}

/// Arguments shared by commands that only touch the state directory.
#[derive(Args, Clone)]
pub struct StateArgs {
    /// Directory holding scan state (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON document with every group
    #[default]
    Json,
    /// One line per non-empty group with its photo count
    Summary,
}

impl OutputFormat {
    /// Parses a config file value.
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "json" => Some(Self::Json),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command finished.
    Success = 0,
    /// `show` found no cached result, or a run ended cancelled.
    ///
    /// `scan` never cancels its own run; an interrupted `scan` process
    /// exits by signal and the next `scan` resumes its checkpoint.
    Incomplete = 1,
    /// Any error, including denied access.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
