//! Result output adapter.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use photo_group_core::ScanResult;
use serde::Serialize;
use tracing::debug;

use crate::commands::OutputFormat;

/// Serialized form of a completed scan.
#[derive(Serialize)]
struct ResultDocument<'a> {
    timestamp: String,
    total: usize,
    groups: BTreeMap<&'a str, &'a [String]>,
    others: &'a [String],
}

impl<'a> ResultDocument<'a> {
    fn new(result: &'a ScanResult) -> Self {
        Self {
            timestamp: iso_timestamp(),
            total: result.len(),
            groups: result
                .groups
                .iter()
                .map(|(group, ids)| (group.as_str(), ids.as_slice()))
                .collect(),
            others: &result.others,
        }
    }
}

/// Writes scan results to stdout or any writer.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutput {
    /// Creates a new output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a new output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes a result in the requested format.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_result(
        &self,
        result: &ScanResult,
        format: OutputFormat,
        pretty: bool,
    ) -> Result<()> {
        let text = match format {
            OutputFormat::Json => {
                let document = ResultDocument::new(result);
                if pretty {
                    serde_json::to_string_pretty(&document)?
                } else {
                    serde_json::to_string(&document)?
                }
            }
            OutputFormat::Summary => summary_table(result),
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{text}")?;
        Ok(())
    }

    /// Flushes the underlying writer.
    #[allow(clippy::significant_drop_tightening)]
    pub fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}

fn summary_table(result: &ScanResult) -> String {
    let rows = result.summary();
    if rows.is_empty() {
        return String::from("No photos found");
    }
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut lines: Vec<String> = rows
        .iter()
        .map(|(label, count)| format!("{label:<width$}  {count:>5} photos"))
        .collect();
    lines.push(format!("{:<width$}  {:>5} photos", "TOTAL", result.len()));
    lines.join("\n")
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
