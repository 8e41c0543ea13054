use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

/// C and C++ source and header extensions
pub const DEFAULT_EXTENSIONS: &[&str] = &["c", "h", "cc", "cpp", "cxx", "hh", "hpp", "hxx"];

/// Expand command-line inputs into the list of files to analyze.
///
/// - Directories are walked (respecting .gitignore) and replaced by the
///   source files beneath them, sorted by path
/// - Anything else is passed through untouched, so a missing file is
///   reported by the analyzer rather than silently dropped
pub fn expand_inputs(inputs: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = walk_sources(input, extensions);
            debug!("{}: {} source files", input.display(), found.len());
            if found.is_empty() {
                warn!("No source files found under {}", input.display());
            }
            files.append(&mut found);
        } else {
            files.push(input.clone());
        }
    }

    files
}

fn walk_sources(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);

    builder
        .hidden(true)          // skip hidden files
        .git_ignore(true)      // respect .gitignore
        .git_global(true)      // respect global gitignore
        .git_exclude(true)     // respect .git/info/exclude
        .follow_links(false);  // don't follow symlinks

    let mut files = Vec::new();

    for entry in builder.build() {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    continue;
                }
                let path = entry.path();
                if has_source_extension(path, extensions) {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => {
                debug!("Walk error: {}", e);
            }
        }
    }

    files.sort();
    files
}

fn has_source_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_lowercase();

    if extensions.is_empty() {
        DEFAULT_EXTENSIONS.contains(&ext.as_str())
    } else {
        extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}
