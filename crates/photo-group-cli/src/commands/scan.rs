//! Scan command - group photos into buckets, resuming interrupted runs.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, ValueEnum};
use photo_group_adapters::{
    state_dir, ContentHashClassifier, FsAccessGate, FsItemSource, FsRecordStore,
};
use photo_group_core::{
    AccessGate, CancelToken, Classifier, IdHashClassifier, RunOptions, RunOutcome, ScanCoordinator,
};
use tracing::{debug, info};

use super::{ExitCode, OutputFormat};
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// What a photo's group is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SeedBy {
    /// Hash of the file contents
    #[default]
    Content,
    /// Hash of the file path
    Id,
}

impl SeedBy {
    /// Parses a config file value.
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "content" => Some(Self::Content),
            "id" => Some(Self::Id),
            _ => None,
        }
    }

    fn classifier(self) -> Arc<dyn Classifier> {
        match self {
            Self::Content => Arc::new(ContentHashClassifier),
            Self::Id => Arc::new(IdHashClassifier),
        }
    }
}

/// Arguments for grouping photos.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScanArgs {
    /// Files or directories to group
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Ignore any pending checkpoint and start from scratch
    #[arg(long)]
    pub fresh: bool,

    /// Directory holding scan state (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// What each photo's group is derived from
    #[arg(long, value_enum)]
    pub seed_by: Option<SeedBy>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl ScanArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// `--fresh` always wins over `scan.resume`; every other option falls
    /// back to the config only when the flag was not given.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        if !args.fresh {
            args.fresh = config.scan.resume == Some(false);
        }

        if args.seed_by.is_none() {
            args.seed_by = config.scan.seed_by.as_deref().and_then(SeedBy::from_config);
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
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args
    }

    fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(state_dir)
    }

    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Run the scan command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &ScanArgs) -> Result<ExitCode> {
    info!("Running scan command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    ensure_access(&FsAccessGate::new(args.paths.clone()))?;

    let state_dir = args.state_dir();
    debug!("Using state directory: {}", state_dir.display());

    let seed_by = args.seed_by.unwrap_or_default();
    let coordinator = ScanCoordinator::new(
        Arc::new(FsItemSource::new(args.paths.clone(), args.recursive)),
        seed_by.classifier(),
        Arc::new(FsRecordStore::new(state_dir)),
    );

    let resume = !args.fresh;
    if resume {
        if let Some(checkpoint) = coordinator.load_checkpoint() {
            info!(
                "Found checkpoint at {}/{}",
                checkpoint.processed_count, checkpoint.total_count
            );
        }
    }

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = Arc::new(ProgressBar::new(args.quiet, show_progress));

    // Nothing cancels this token. An interrupted process leaves its last
    // checkpoint behind and the next scan resumes from it.
    let outcome = coordinator.run(
        RunOptions {
            resume_if_possible: resume,
        },
        progress,
        &CancelToken::new(),
    );

    finish(outcome, &JsonOutput::stdout(), args.format(), args.pretty)
}

/// Fails with `access denied` unless the gate grants access to the roots.
fn ensure_access(gate: &dyn AccessGate) -> Result<()> {
    if gate.authorize() {
        Ok(())
    } else {
        anyhow::bail!("access denied")
    }
}

/// Writes a completed result and maps the run outcome to an exit code.
fn finish(
    outcome: RunOutcome,
    output: &JsonOutput,
    format: OutputFormat,
    pretty: bool,
) -> Result<ExitCode> {
    match outcome {
        RunOutcome::Completed(result) => {
            output.write_result(&result, format, pretty)?;
            output.flush()?;
            Ok(ExitCode::Success)
        }
        RunOutcome::Cancelled { processed, total } => {
            info!("Scan stopped at {processed}/{total}");
            Ok(ExitCode::Incomplete)
        }
        RunOutcome::Busy => anyhow::bail!("a scan is already running"),
        RunOutcome::Aborted(reason) => anyhow::bail!("scan aborted: {reason}"),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use photo_group_core::ScanResult;
    use photo_group_test_support::MockAccessGate;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ScanArgs,
    }

    fn parse(argv: &[&str]) -> ScanArgs {
        Wrapper::try_parse_from(std::iter::once("photo-group").chain(argv.iter().copied()))
            .expect("parse args")
            .args
    }

    fn config(toml: &str) -> AppConfig {
        toml::from_str(toml).expect("parse config")
    }

    #[test]
    fn test_defaults_without_config() {
        let args = ScanArgs::with_config(parse(&["photos"]), &AppConfig::default());
        assert!(!args.recursive);
        assert!(!args.fresh);
        assert!(args.seed_by.is_none());
        assert_eq!(args.format(), OutputFormat::Json);
        assert!(!args.pretty);
    }

    #[test]
    fn test_config_fills_unset_flags() {
        let config = config(
            r"
[general]
recursive = true

[scan]
resume = false
seed_by = 'id'

[state]
dir = '/tmp/photo-group-state'

[output]
format = 'summary'
pretty = true
",
        );
        let args = ScanArgs::with_config(parse(&["photos"]), &config);

        assert!(args.recursive);
        assert!(args.fresh);
        assert_eq!(args.seed_by, Some(SeedBy::Id));
        assert_eq!(args.state_dir(), PathBuf::from("/tmp/photo-group-state"));
        assert_eq!(args.format(), OutputFormat::Summary);
        assert!(args.pretty);
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = config(
            r"
[scan]
seed_by = 'id'

[state]
dir = '/tmp/from-config'

[output]
format = 'summary'
",
        );
        let args = ScanArgs::with_config(
            parse(&[
                "photos",
                "--seed-by",
                "content",
                "--state-dir",
                "/tmp/from-cli",
                "--format",
                "json",
            ]),
            &config,
        );

        assert_eq!(args.seed_by, Some(SeedBy::Content));
        assert_eq!(args.state_dir(), PathBuf::from("/tmp/from-cli"));
        assert_eq!(args.format(), OutputFormat::Json);
    }

    #[test]
    fn test_resume_true_in_config_keeps_fresh_flag() {
        let config = config("[scan]\nresume = true\n");
        let args = ScanArgs::with_config(parse(&["photos", "--fresh"]), &config);
        assert!(args.fresh);
    }

    #[test]
    fn test_unknown_config_values_fall_back() {
        let config = config("[scan]\nseed_by = 'exif'\n[output]\nformat = 'xml'\n");
        let args = ScanArgs::with_config(parse(&["photos"]), &config);
        assert!(args.seed_by.is_none());
        assert_eq!(args.format(), OutputFormat::Json);
    }

    #[test]
    fn test_seed_by_from_config() {
        assert_eq!(SeedBy::from_config("content"), Some(SeedBy::Content));
        assert_eq!(SeedBy::from_config("id"), Some(SeedBy::Id));
        assert_eq!(SeedBy::from_config("ID"), None);
    }

    #[test]
    fn test_denied_access_is_an_error() {
        let gate = MockAccessGate::new(false);
        let err = ensure_access(&gate).expect_err("access denied");
        assert_eq!(err.to_string(), "access denied");
        assert_eq!(gate.check_count(), 1);
    }

    #[test]
    fn test_granted_access_passes() {
        let gate = MockAccessGate::new(true);
        assert!(ensure_access(&gate).is_ok());
        assert_eq!(gate.check_count(), 1);
    }

    fn discard() -> JsonOutput {
        JsonOutput::new(Box::new(std::io::sink()))
    }

    #[test]
    fn test_outcome_exit_codes() {
        let completed = finish(
            RunOutcome::Completed(ScanResult::empty()),
            &discard(),
            OutputFormat::Json,
            false,
        );
        assert_eq!(completed.unwrap(), ExitCode::Success);

        let cancelled = finish(
            RunOutcome::Cancelled {
                processed: 20,
                total: 57,
            },
            &discard(),
            OutputFormat::Json,
            false,
        );
        assert_eq!(cancelled.unwrap(), ExitCode::Incomplete);

        let busy = finish(RunOutcome::Busy, &discard(), OutputFormat::Json, false);
        assert!(busy.unwrap_err().to_string().contains("already running"));

        let aborted = finish(
            RunOutcome::Aborted("disk gone".into()),
            &discard(),
            OutputFormat::Json,
            false,
        );
        assert!(aborted.unwrap_err().to_string().contains("disk gone"));
    }

    #[test]
    fn test_seed_by_selects_classifier() {
        assert_eq!(SeedBy::Content.classifier().name(), "content-hash");
        assert_eq!(SeedBy::Id.classifier().name(), "id-hash");
    }
}
