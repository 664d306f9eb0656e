//! Progress bar adapter using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use photo_group_core::{ProgressSink, ScanEvent};

/// Progress bar adapter for CLI output.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates a new progress bar.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, show progress bar; otherwise print checkpoint lines
    #[must_use]
    pub fn new(quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                quiet: true,
            };
        }

        let bar = show_bar.then(|| {
            let bar = IndicatifBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });

        Self { bar, quiet }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ScanEvent) {
        if self.quiet {
            return;
        }

        match event {
            ScanEvent::Progress { processed, total } => {
                if let Some(bar) = &self.bar {
                    bar.set_length(total as u64);
                    bar.set_position(processed as u64);
                } else {
                    eprintln!("Scanned {processed}/{total}");
                }
            }
            ScanEvent::Snapshot(snapshot) => {
                if let Some(bar) = &self.bar {
                    bar.set_message(format!("({} other)", snapshot.others.len()));
                }
            }
            ScanEvent::Completed(result) => {
                if let Some(bar) = &self.bar {
                    bar.finish_with_message(format!("Done: {} photos", result.len()));
                }
            }
            // Only library callers holding a cancel token reach this.
            ScanEvent::Cancelled { processed, total } => {
                if let Some(bar) = &self.bar {
                    bar.abandon_with_message("Cancelled");
                }
                eprintln!("Scan stopped at {processed}/{total}; run again to resume");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use photo_group_core::ScanResult;

    #[test]
    fn test_bar_tracks_progress_and_completion() {
        let progress = ProgressBar::new(false, true);
        progress.on_event(ScanEvent::Progress {
            processed: 10,
            total: 25,
        });
        let bar = progress.bar.as_ref().expect("bar shown");
        assert_eq!(bar.position(), 10);
        assert_eq!(bar.length(), Some(25));

        progress.on_event(ScanEvent::Completed(ScanResult::empty()));
        assert!(bar.is_finished());
    }

    #[test]
    fn test_cancelled_abandons_bar_at_last_checkpoint() {
        let progress = ProgressBar::new(false, true);
        progress.on_event(ScanEvent::Progress {
            processed: 20,
            total: 57,
        });
        progress.on_event(ScanEvent::Cancelled {
            processed: 23,
            total: 57,
        });

        let bar = progress.bar.as_ref().expect("bar shown");
        assert!(bar.is_finished());
        assert_eq!(bar.position(), 20);
    }

    #[test]
    fn test_quiet_has_no_bar() {
        let progress = ProgressBar::new(true, true);
        assert!(progress.bar.is_none());
        progress.on_event(ScanEvent::Cancelled {
            processed: 0,
            total: 0,
        });
    }
}
