//! State commands - inspect, print and discard persisted scan state.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use photo_group_adapters::{state_dir, FsItemSource, FsRecordStore};
use photo_group_core::{CheckpointStore, ItemSource};
use tracing::info;

use super::{ExitCode, OutputFormat, StateArgs};
use crate::config::AppConfig;
use crate::output::JsonOutput;

/// Arguments for printing the cached result.
#[derive(Args, Clone)]
pub struct ShowArgs {
    /// Only keep photos that these paths still contain
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories of the given paths
    #[arg(short, long)]
    pub recursive: bool,

    /// Directory holding scan state (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl ShowArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }
        if args.state_dir.is_none() {
            args.state_dir.clone_from(&config.state.dir);
        }
        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        args
    }
}

fn open_store(dir: Option<&PathBuf>, config: Option<&AppConfig>) -> (PathBuf, CheckpointStore) {
    let dir = dir
        .or_else(|| config.and_then(|c| c.state.dir.as_ref()))
        .cloned()
        .unwrap_or_else(state_dir);
    let store = CheckpointStore::new(Arc::new(FsRecordStore::new(dir.clone())));
    (dir, store)
}

/// Report whether a scan is pending and whether a result is cached.
#[allow(clippy::unnecessary_wraps)]
pub fn status(args: &StateArgs, config: &AppConfig) -> Result<ExitCode> {
    let (dir, store) = open_store(args.state_dir.as_ref(), Some(config));
    println!("State directory: {}", dir.display());

    match store.load_checkpoint() {
        Some(checkpoint) => println!(
            "Pending scan: {}/{} processed",
            checkpoint.processed_count, checkpoint.total_count
        ),
        None if store.has_pending_checkpoint() => println!("Pending scan: unreadable"),
        None => println!("Pending scan: none"),
    }

    match store.load_persisted_result() {
        Some(result) => println!(
            "Cached result: {} photos ({} other)",
            result.len(),
            result.others.len()
        ),
        None => println!("Cached result: none"),
    }

    Ok(ExitCode::Success)
}

/// Print the cached result.
///
/// With paths, the result is narrowed to the photos those paths still
/// enumerate: files that were deleted or lie outside them are dropped.
pub fn show(args: &ShowArgs) -> Result<ExitCode> {
    let (_, store) = open_store(args.state_dir.as_ref(), None);

    let Some(mut result) = store.load_persisted_result() else {
        eprintln!("No cached result. Run `photo-group scan` first.");
        return Ok(ExitCode::Incomplete);
    };

    if !args.paths.is_empty() {
        let source = FsItemSource::new(args.paths.clone(), args.recursive);
        let ids: Vec<String> = result.ids().map(str::to_owned).collect();
        let resolved = source.resolve(&ids);
        let known: HashSet<&str> = resolved.iter().map(|item| item.id.as_str()).collect();
        let pruned = result.retain_known(&known);
        if pruned > 0 {
            info!("Pruned {pruned} photos not found under the given paths");
        }
    }

    let output = JsonOutput::stdout();
    output.write_result(&result, args.format.unwrap_or_default(), args.pretty)?;
    output.flush()?;
    Ok(ExitCode::Success)
}

/// Delete the pending checkpoint and the cached result.
#[allow(clippy::unnecessary_wraps)]
pub fn clear(args: &StateArgs, config: &AppConfig) -> Result<ExitCode> {
    let (dir, store) = open_store(args.state_dir.as_ref(), Some(config));
    store.clear_checkpoint();
    store.clear_persisted_result();
    println!("Cleared scan state in {}", dir.display());
    Ok(ExitCode::Success)
}
