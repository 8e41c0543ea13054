pub mod chunker;
pub mod file_walker;
pub mod prompt;

use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Model, ModelError};
use crate::report::finding::Report;
use crate::report::{merger, parser};
use chunker::Block;

/// Why a single file could not be analyzed
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The model failed on one block; the whole file is abandoned
    #[error("model failed on block starting at line {start_line}: {source}")]
    Model {
        start_line: usize,
        source: ModelError,
    },
}

/// Per-run knobs for the analyzer
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Maximum tokens the model may generate per block
    pub tokens: usize,
    /// Word budget per block when splitting
    pub chunk_budget: usize,
    /// Send each file as a single block
    pub nosplit: bool,
}

/// Drives the chunk → prompt → model → parse → merge pipeline for one
/// file at a time, reusing the same model handle.
pub struct Analyzer<'m> {
    model: &'m dyn Model,
    settings: AnalysisSettings,
}

impl<'m> Analyzer<'m> {
    pub fn new(model: &'m dyn Model, settings: AnalysisSettings) -> Self {
        Analyzer { model, settings }
    }

    /// Read a file once, split it, and analyze every block.
    pub fn analyze_file(&self, path: &Path) -> Result<Report, AnalyzeError> {
        if !path.exists() {
            return Err(AnalyzeError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| AnalyzeError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let lines: Vec<&str> = content.lines().collect();
        let blocks = chunker::split(&lines, self.settings.chunk_budget, self.settings.nosplit);

        info!(
            "{}: {} lines in {} block(s)",
            path.display(),
            lines.len(),
            blocks.len()
        );

        self.analyze(path, &blocks)
    }

    /// Run every block through the model and merge the findings.
    ///
    /// Blocks are processed in order; the first model failure aborts the
    /// file and no partial report is produced.
    pub fn analyze(&self, file: &Path, blocks: &[Block]) -> Result<Report, AnalyzeError> {
        let start = Instant::now();
        let mut pool = Vec::new();

        for (idx, block) in blocks.iter().enumerate() {
            let prompt = prompt::render(block);
            debug!(
                "Block {}/{} (line {}), prompt {} bytes",
                idx + 1,
                blocks.len(),
                block.start_line,
                prompt.len()
            );

            let raw = self
                .model
                .generate(&prompt, self.settings.tokens, Some(prompt::SYSTEM_PROMPT))
                .map_err(|source| AnalyzeError::Model {
                    start_line: block.start_line,
                    source,
                })?;

            debug!(
                "Raw model output for line {}:\n{}",
                block.start_line,
                raw.trim_end()
            );

            let found = parser::parse_response(&raw);
            debug!("Block at line {}: {} findings", block.start_line, found.len());
            pool.extend(found);
        }

        let raw_count = pool.len();
        let findings = merger::merge_findings(pool);

        info!(
            "{}: {} findings ({} before dedup) in {:.2}s",
            file.display(),
            findings.len(),
            raw_count,
            start.elapsed().as_secs_f64()
        );

        Ok(Report {
            file: file.to_path_buf(),
            blocks: blocks.len(),
            findings,
        })
    }
}
