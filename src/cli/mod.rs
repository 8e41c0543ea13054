pub mod commands;

use clap::Parser;

pub use commands::{AnalyzeArgs, Commands, OutputFormat};

/// vuln-analyzer — LLM-powered C/C++ vulnerability scanner
///
/// Splits source files into blocks, asks a locally hosted model to review
/// each one, and merges the answers into a per-file report.
#[derive(Parser, Debug)]
#[command(
    name = "vuln-analyzer",
    version,
    about = "🔍 vuln-analyzer — LLM-powered C/C++ vulnerability scanner",
    long_about = "vuln-analyzer reviews C/C++ source files with a locally hosted language model.\nFiles are split into blocks, each block is reviewed independently, and the\nfindings are merged into one report per file. Nothing leaves your machine."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output, including raw model responses
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors and reports
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
