//! GaspX CLI - template preprocessor.
//!
//! Reads `*.gasp.aspx`, `*.gasp.ascx` and `*.gasp.master` template files,
//! desugars their declarative directives and writes the generated file next
//! to each input with the `.gasp.` infix dropped (`page.gasp.aspx` becomes
//! `page.aspx`).

mod error;
mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use error::CliError;
use output::Output;

/// File name suffixes the preprocessor claims.
const GASP_SUFFIXES: &[&str] = &[".gasp.aspx", ".gasp.ascx", ".gasp.master"];

/// Infix replaced to derive the output file name.
const GASP_INFIX: &str = ".gasp.";

/// GaspX - template preprocessor.
#[derive(Parser)]
#[command(name = "gaspx", version, about)]
struct Cli {
    /// Template files to preprocess (*.gasp.aspx, *.gasp.ascx, *.gasp.master).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut failures = 0;
    for file in &cli.files {
        if let Err(err) = process_file(file, &output) {
            output.error(&format!("{}: {err}", file.display()));
            failures += 1;
        }
    }

    output.info(&format!(
        "{} of {} file(s) processed",
        cli.files.len() - failures,
        cli.files.len()
    ));
    if failures > 0 {
        std::process::exit(1);
    }
}

/// Preprocess one template file and write the generated output beside it.
fn process_file(path: &Path, output: &Output) -> Result<(), CliError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or(CliError::UnhandledExtension)?;
    let generated_name = output_name(name).ok_or(CliError::UnhandledExtension)?;

    let raw = std::fs::read_to_string(path)?;
    let processed = gaspx_core::process_text(&raw)?;

    let out_path = path.with_file_name(&generated_name);
    std::fs::write(&out_path, processed.as_bytes())?;

    output.success(&format!("{} -> {}", path.display(), out_path.display()));
    Ok(())
}

/// Output file name for a recognized template file name, dropping the
/// `.gasp.` infix. `None` when the name carries no recognized suffix.
fn output_name(file_name: &str) -> Option<String> {
    GASP_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix) && file_name.len() > suffix.len())
        .then(|| file_name.replace(GASP_INFIX, "."))
}
