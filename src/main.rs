mod cli;
mod config;
mod engine;
mod model;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{AnalyzeArgs, Cli, OutputFormat};
use config::AnalyzerConfig;
use engine::{AnalyzeError, Analyzer};
use model::{Model, OllamaModel};
use report::json::{FileError, RunSummary};
use report::terminal;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("vuln_analyzer=debug")
    } else if cli.quiet {
        EnvFilter::new("vuln_analyzer=error")
    } else {
        EnvFilter::new("vuln_analyzer=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    info!("vuln-analyzer v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        cli::Commands::Analyze(args) => {
            let ok = run_analyze(&cli, args)?;
            if !ok {
                std::process::exit(1);
            }
        }
        cli::Commands::Init => {
            config::init_config(&std::env::current_dir()?)?;
        }
    }

    Ok(())
}

/// Analyze every requested file with one shared model handle.
/// Returns false if any file failed.
fn run_analyze(cli: &Cli, args: &AnalyzeArgs) -> Result<bool> {
    let config = if args.no_config {
        AnalyzerConfig::default()
    } else {
        AnalyzerConfig::load(&std::env::current_dir()?)
    };

    let model = OllamaModel::connect(args.model_settings(&config))
        .context("cannot start analysis")?;
    let analyzer = Analyzer::new(&model, args.analysis_settings(&config));

    let files = engine::file_walker::expand_inputs(&args.files, &args.extensions(&config));
    info!("{} file(s) to analyze", files.len());

    let text_to_stdout = args.format == OutputFormat::Text && args.out.is_none();
    let mut reports = Vec::new();
    let mut errors = Vec::new();
    let mut text = String::new();

    for path in &files {
        if text_to_stdout && !cli.quiet {
            terminal::print_start(path);
        } else {
            info!("Analyzing {}", path.display());
        }

        match analyzer.analyze_file(path) {
            Ok(report) => {
                let rendered = terminal::render_report(&report);
                if text_to_stdout {
                    print!("{}", rendered);
                } else if args.format == OutputFormat::Text {
                    text.push_str(&rendered);
                }
                reports.push(report);
            }
            Err(e) => {
                let message = match &e {
                    AnalyzeError::NotFound(_) => e.to_string(),
                    _ => format!("Error scanning {}: {}", path.display(), e),
                };
                terminal::print_error(&message);
                errors.push(FileError {
                    file: path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let output = match args.format {
        OutputFormat::Json => Some(report::json::render(&RunSummary::new(
            model.name(),
            &reports,
            &errors,
        ))?),
        OutputFormat::Text if args.out.is_some() => Some(text),
        OutputFormat::Text => None,
    };

    match (output, &args.out) {
        (Some(output), Some(path)) => {
            std::fs::write(path, &output)
                .with_context(|| format!("cannot write {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        (Some(output), None) => println!("{}", output),
        (None, _) => {}
    }

    if !cli.quiet && args.format == OutputFormat::Text {
        terminal::print_summary(&reports, errors.len());
    }

    Ok(errors.is_empty())
}
