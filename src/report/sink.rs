use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::Serialize;
use sha1::{Digest, Sha1};
use tracing::info;

use crate::error::ScoutError;
use crate::report::console::format_console_summary;
use crate::report::summary::SuiteSummary;
use crate::synth::test_case::TestSuite;

/// Opaque identifier of a persisted report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportId(String);

impl ReportId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA-1 hex digest of the suite's JSON form. Identical suites share an id.
pub fn report_id(suite: &TestSuite) -> Result<ReportId, ScoutError> {
    let json = serde_json::to_string(suite).map_err(|source| ScoutError::JsonSerialize {
        context: "test suite".to_string(),
        source,
    })?;
    let mut hasher = Sha1::new();
    hasher.update(json.as_bytes());
    Ok(ReportId(format!("{:x}", hasher.finalize())))
}

/// Destination for a finished suite.
pub trait ReportSink {
    fn persist(
        &mut self,
        suite: &TestSuite,
        summary: &SuiteSummary,
    ) -> Result<ReportId, ScoutError>;
}

/// Document written by the serializing formats.
#[derive(Serialize)]
struct ReportDocument<'a> {
    report_id: &'a str,
    #[serde(flatten)]
    summary: &'a SuiteSummary,
    test_cases: &'a TestSuite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Yaml,
    /// Per-category count table only
    Console,
}

impl FromStr for ReportFormat {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            "console" => Ok(ReportFormat::Console),
            other => Err(ScoutError::Config(format!(
                "unknown output format '{}' (expected json, yaml or console)",
                other
            ))),
        }
    }
}

/// Writes reports to stdout, or to any writer in tests.
pub struct StdoutSink<W: Write = io::Stdout> {
    writer: W,
    format: ReportFormat,
}

impl StdoutSink<io::Stdout> {
    pub fn new(format: ReportFormat) -> Self {
        Self::with_writer(io::stdout(), format)
    }
}

impl<W: Write> StdoutSink<W> {
    pub fn with_writer(writer: W, format: ReportFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for StdoutSink<W> {
    fn persist(
        &mut self,
        suite: &TestSuite,
        summary: &SuiteSummary,
    ) -> Result<ReportId, ScoutError> {
        let id = report_id(suite)?;
        let document = ReportDocument {
            report_id: id.as_str(),
            summary,
            test_cases: suite,
        };

        let rendered = match self.format {
            ReportFormat::Json => serde_json::to_string_pretty(&document).map_err(|source| {
                ScoutError::JsonSerialize {
                    context: "report".to_string(),
                    source,
                }
            })?,
            ReportFormat::Yaml => {
                serde_yaml::to_string(&document).map_err(|e| ScoutError::Report(e.to_string()))?
            }
            ReportFormat::Console => format_console_summary(summary),
        };

        writeln!(self.writer, "{}", rendered.trim_end())
            .map_err(|e| ScoutError::Report(e.to_string()))?;
        self.writer.flush().map_err(|e| ScoutError::Report(e.to_string()))?;
        info!(report_id = %id, total = summary.summary.total_tests, "Report written");
        Ok(id)
    }
}
