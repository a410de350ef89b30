//! sheetprompt CLI
//!
//! Reads the knowledge workbook and writes the Modelfile.
//!
//! ```text
//! sheetprompt [INPUT] [OUTPUT] [BASE_MODEL]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sheetprompt::{
    logging, GenerationReport, GeneratorBuilder, SheetPromptError, DEFAULT_BASE_MODEL,
    DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH,
};

/// Generate an Ollama Modelfile from an Excel knowledge base
#[derive(Parser, Debug)]
#[command(name = "sheetprompt")]
#[command(about = "Generate an Ollama Modelfile from an Excel knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    /// Input workbook (one sheet per category)
    #[arg(default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Output Modelfile
    #[arg(default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Base model for the FROM line
    #[arg(default_value = DEFAULT_BASE_MODEL)]
    base_model: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(None) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    tracing::info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        base_model = %cli.base_model,
        "generating Modelfile"
    );

    let generator = GeneratorBuilder::new()
        .with_base_model(cli.base_model.as_str())
        .build()
        .context("invalid configuration")?;

    let report = generator
        .generate(&cli.input, &cli.output)
        .with_context(|| format!("generation from '{}' failed", cli.input.display()))?;

    log_report(&report);
    tracing::info!(
        "next step: ollama create bts-sio-stlouis -f {}",
        cli.output.display()
    );

    Ok(())
}

fn log_report(report: &GenerationReport) {
    tracing::info!(
        categories = report.categories.len(),
        emitted = report.emitted_categories(),
        rows = report.total_rows(),
        bullets = report.total_bullets(),
        chars = report.document_chars,
        "generation complete"
    );

    for category in &report.categories {
        tracing::info!(
            category = %category.name,
            rows = category.rows,
            bullets = category.bullets,
            emitted = category.emitted,
            "category"
        );
    }
}

/// Missing, unreadable and unwritable files get a short message, anything
/// else the full chain.
fn report_error(error: &anyhow::Error) {
    match error.downcast_ref::<SheetPromptError>() {
        Some(SheetPromptError::SourceNotFound { path }) => {
            tracing::error!("input file '{}' not found", path.display());
            tracing::error!(
                "make sure it exists in the current directory or pass its path as the first argument"
            );
        }
        Some(SheetPromptError::SourceUnreadable { path, source }) => {
            tracing::error!(
                "'{}' could not be read as a workbook: {}",
                path.display(),
                source
            );
        }
        Some(SheetPromptError::DestinationWriteError { path, source }) => {
            tracing::error!("could not write '{}': {}", path.display(), source);
        }
        _ => tracing::error!("{:?}", error),
    }
}
