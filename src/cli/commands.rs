use std::path::PathBuf;
use std::time::Duration;

use clap::{Subcommand, ValueEnum};

use crate::config::AnalyzerConfig;
use crate::engine::AnalysisSettings;
use crate::model::OllamaSettings;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan source file(s) for vulnerabilities with the local model
    Analyze(AnalyzeArgs),

    /// Initialize a .vuln-analyzer.toml config file in the current directory
    Init,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// One or more C/C++ source files or directories to analyze
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Model name on the local server [default: phi4]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Base URL of the local Ollama server [default: http://localhost:11434]
    #[arg(long)]
    pub base_url: Option<String>,

    /// Max tokens generated per block [default: 512]
    #[arg(short, long, value_parser = positive_int)]
    pub tokens: Option<usize>,

    /// Word budget per block when splitting [default: same as --tokens]
    #[arg(long, value_parser = positive_int)]
    pub chunk_budget: Option<usize>,

    /// CPU threads for the model runtime [default: 8]
    #[arg(short = 'j', long, value_parser = positive_int)]
    pub threads: Option<usize>,

    /// Model context window [default: 4096]
    #[arg(long, value_parser = positive_int)]
    pub ctx: Option<usize>,

    /// Per-request timeout in seconds [default: 600]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Do not split files into blocks
    #[arg(long)]
    pub nosplit: bool,

    /// File extensions to pick up inside directories (can be repeated)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Ignore .vuln-analyzer.toml config files
    #[arg(long)]
    pub no_config: bool,
}

/// argparse-style positive integer
fn positive_int(value: &str) -> Result<usize, String> {
    let n: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a positive integer", value))?;
    if n == 0 {
        return Err("value must be > 0".to_string());
    }
    Ok(n)
}

impl AnalyzeArgs {
    /// Model settings: command line first, then config file
    pub fn model_settings(&self, config: &AnalyzerConfig) -> OllamaSettings {
        let cfg = &config.model;
        OllamaSettings {
            base_url: self.base_url.clone().unwrap_or_else(|| cfg.base_url.clone()),
            model: self.model.clone().unwrap_or_else(|| cfg.name.clone()),
            ctx: self.ctx.unwrap_or(cfg.ctx),
            threads: self.threads.unwrap_or(cfg.threads),
            temperature: cfg.temperature,
            timeout: Duration::from_secs(self.timeout.unwrap_or(cfg.timeout_secs)),
        }
    }

    /// Chunking and generation settings: command line first, then config file
    pub fn analysis_settings(&self, config: &AnalyzerConfig) -> AnalysisSettings {
        let cfg = &config.analysis;
        let tokens = self.tokens.unwrap_or(cfg.tokens).max(1);
        AnalysisSettings {
            tokens,
            chunk_budget: self
                .chunk_budget
                .or(cfg.chunk_budget)
                .unwrap_or(tokens)
                .max(1),
            nosplit: self.nosplit || cfg.nosplit,
        }
    }

    pub fn extensions(&self, config: &AnalyzerConfig) -> Vec<String> {
        if self.extensions.is_empty() {
            config.analysis.extensions.clone()
        } else {
            self.extensions.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn analyze_args(argv: &[&str]) -> AnalyzeArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Analyze(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_tokens() {
        assert!(Cli::try_parse_from(["vuln-analyzer", "analyze", "-t", "0", "a.c"]).is_err());
        assert!(Cli::try_parse_from(["vuln-analyzer", "analyze", "-t", "x", "a.c"]).is_err());
        assert!(Cli::try_parse_from(["vuln-analyzer", "analyze", "-j", "0", "a.c"]).is_err());
    }

    #[test]
    fn requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["vuln-analyzer", "analyze"]).is_err());
    }

    #[test]
    fn defaults_come_from_config() {
        let args = analyze_args(&["vuln-analyzer", "analyze", "a.c", "b.cpp"]);
        let config = AnalyzerConfig::default();

        let model = args.model_settings(&config);
        assert_eq!(model.model, "phi4");
        assert_eq!(model.ctx, 4096);
        assert_eq!(model.timeout, Duration::from_secs(600));

        let analysis = args.analysis_settings(&config);
        assert_eq!(analysis.tokens, 512);
        assert_eq!(analysis.chunk_budget, 512);
        assert!(!analysis.nosplit);
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn flags_override_config() {
        let args = analyze_args(&[
            "vuln-analyzer",
            "analyze",
            "-m",
            "codellama:13b",
            "-t",
            "768",
            "--ctx",
            "8192",
            "--nosplit",
            "--ext",
            "rs",
            "-f",
            "json",
            "a.c",
        ]);
        let mut config = AnalyzerConfig::default();
        config.model.name = "phi4".to_string();
        config.analysis.chunk_budget = Some(300);
        config.analysis.extensions = vec!["c".to_string()];

        let model = args.model_settings(&config);
        assert_eq!(model.model, "codellama:13b");
        assert_eq!(model.ctx, 8192);

        let analysis = args.analysis_settings(&config);
        assert_eq!(analysis.tokens, 768);
        assert_eq!(analysis.chunk_budget, 300);
        assert!(analysis.nosplit);
        assert_eq!(args.extensions(&config), vec!["rs".to_string()]);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn chunk_budget_follows_tokens() {
        let args = analyze_args(&["vuln-analyzer", "analyze", "--tokens", "100", "a.c"]);
        let analysis = args.analysis_settings(&AnalyzerConfig::default());
        assert_eq!(analysis.chunk_budget, 100);
    }
}
