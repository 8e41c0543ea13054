use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::report::finding::Report;

/// A file that could not be analyzed
#[derive(Debug, Clone, Serialize)]
pub struct FileError {
    pub file: PathBuf,
    pub error: String,
}

/// Machine-readable summary of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary<'a> {
    pub version: &'static str,
    pub timestamp: String,
    pub model: &'a str,
    pub reports: &'a [Report],
    pub errors: &'a [FileError],
}

impl<'a> RunSummary<'a> {
    pub fn new(model: &'a str, reports: &'a [Report], errors: &'a [FileError]) -> Self {
        RunSummary {
            version: env!("CARGO_PKG_VERSION"),
            timestamp: chrono::Utc::now().to_rfc3339(),
            model,
            reports,
            errors,
        }
    }
}

/// Render a run summary as pretty-printed JSON
pub fn render(summary: &RunSummary<'_>) -> Result<String> {
    let json = serde_json::to_string_pretty(summary)?;
    Ok(json)
}
