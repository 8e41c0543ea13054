use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel emitted when a file has no findings
pub const NO_FINDINGS: &str = "No vulnerabilities found.";

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// One vulnerability line reported by the model, e.g.
/// `Line 5: Buffer Overflow — unchecked strcpy — FIX: use strncpy`.
///
/// Kept as the exact text the model produced; equality is string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Finding(String);

impl Finding {
    pub fn new(text: impl Into<String>) -> Self {
        Finding(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First integer in the text, used as the sort key.
    /// Lines without any digits sort last.
    pub fn line_key(&self) -> u64 {
        FIRST_NUMBER
            .find(&self.0)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(u64::MAX)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of analyzing a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Path as given on the command line
    pub file: PathBuf,

    /// Number of blocks sent to the model
    pub blocks: usize,

    /// Unique findings sorted by first line number
    pub findings: Vec<Finding>,
}

impl Report {
    /// Header line: `# analyzer <basename>`
    pub fn header(&self) -> String {
        let name = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.display().to_string());
        format!("# analyzer {}", name)
    }

    /// Plain-text report: header, then findings or the no-issues sentinel
    pub fn render_text(&self) -> String {
        let mut out = self.header();
        out.push('\n');
        if self.findings.is_empty() {
            out.push_str(NO_FINDINGS);
        } else {
            let lines: Vec<&str> = self.findings.iter().map(Finding::as_str).collect();
            out.push_str(&lines.join("\n"));
        }
        out
    }
}
