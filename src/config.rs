use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const CONFIG_FILE: &str = ".vuln-analyzer.toml";

/// Analyzer configuration (loaded from .vuln-analyzer.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name as installed on the server
    #[serde(default = "default_model")]
    pub name: String,

    /// Base URL of the local Ollama server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Context window
    #[serde(default = "default_ctx")]
    pub ctx: usize,

    /// CPU threads for the runtime
    #[serde(default = "default_threads")]
    pub threads: usize,

    #[serde(default)]
    pub temperature: f32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Max tokens generated per block
    #[serde(default = "default_tokens")]
    pub tokens: usize,

    /// Word budget per block (defaults to `tokens`)
    #[serde(default)]
    pub chunk_budget: Option<usize>,

    /// Analyze each file as a single block
    #[serde(default)]
    pub nosplit: bool,

    /// Extensions picked up when a directory is given (empty = C/C++)
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            name: default_model(),
            base_url: default_base_url(),
            ctx: default_ctx(),
            threads: default_threads(),
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            tokens: default_tokens(),
            chunk_budget: None,
            nosplit: false,
            extensions: Vec::new(),
        }
    }
}

fn default_model() -> String {
    "phi4".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ctx() -> usize {
    4096
}

fn default_threads() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_tokens() -> usize {
    512
}

impl AnalyzerConfig {
    /// Try to load .vuln-analyzer.toml from the given directory or its parents.
    /// Falls back to the defaults when none is found or it fails to parse.
    pub fn load(start: &Path) -> Self {
        let Some(config_path) = find_config_file(start) else {
            debug!("No {} found, using defaults", CONFIG_FILE);
            return AnalyzerConfig::default();
        };
        debug!("Found config: {}", config_path.display());

        match Self::from_file(&config_path) {
            Ok(config) => {
                info!("Loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                warn!("{:#}", e);
                AnalyzerConfig::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        toml::from_str::<AnalyzerConfig>(&content)
            .with_context(|| format!("invalid config {}", path.display()))
    }
}

/// Walk up from `start` to find .vuln-analyzer.toml
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let config = current.join(CONFIG_FILE);
        if config.exists() {
            return Some(config);
        }
        if !current.pop() {
            return None;
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# vuln-analyzer configuration
# Command-line flags override these values.

[model]
# Model name as installed on the Ollama server (`ollama pull phi4`)
name = "phi4"

# Local Ollama server
base_url = "http://localhost:11434"

# Context window and CPU threads requested from the runtime
ctx = 4096
threads = 8

# Sampling temperature (0 = deterministic)
temperature = 0.0

# Per-request timeout in seconds
timeout_secs = 600

[analysis]
# Max tokens generated per block
tokens = 512

# Word budget per block. Defaults to `tokens`.
# chunk_budget = 400

# Analyze each file as a single block
nosplit = false

# Extensions picked up when a directory is given. Empty = C/C++ sources.
# extensions = ["c", "h", "cpp", "hpp"]
"#;

/// Create a default .vuln-analyzer.toml in `dir`.
/// Returns false if one already exists.
pub fn init_config(dir: &Path) -> Result<bool> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() {
        println!("⚠️  {} already exists in this directory", CONFIG_FILE);
        return Ok(false);
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("✅ Created {}", CONFIG_FILE);
    println!("   Edit it to customize the model and chunking settings.");

    Ok(true)
}
