//! elmready - Elm 0.19 upgrade readiness checker CLI tool
//!
//! Reads an Elm 0.18 `elm-package.json` (from a file, stdin or a GitHub
//! repository) and reports for each dependency whether it is ready for
//! Elm 0.19, replaced by other packages, or not ready.

use clap::Parser;
use elmready::cli::CliArgs;
use elmready::config::{CheckConfig, ManifestInput};
use elmready::error::AppError;
use elmready::output::{create_formatter, OutputConfig, OutputFormat};
use elmready::registry::ManifestSource;
use elmready::session::Session;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status when `--strict` is set and a dependency is not ready
const NOT_READY_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Read the manifest text from a file
fn read_file(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the manifest text from stdin
fn read_stdin() -> Result<String, AppError> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .map_err(|source| AppError::ReadInput {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
    Ok(text)
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = CheckConfig::from_cli(&args)?;
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.no_color);

    // Print version info in verbose mode
    if args.verbose {
        eprintln!("elmready v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Timeout: {}s", config.timeout.as_secs());
    }

    let client = config.http_client()?;
    let session =
        Session::new(config.catalog_source(&client)).with_progress(output_config.shows_progress());

    if args.verbose {
        eprintln!("Catalog: {}", session.catalog_origin());
        eprintln!("Known renames: {}", session.renames().len());
    }

    let outcome = match &config.input {
        ManifestInput::Repository(location) => {
            let source = config.manifest_source(&client);
            if args.verbose {
                eprintln!("Manifest: {}", source.describe(location));
            }
            session.check_repository(&source, location).await
        }
        ManifestInput::File(path) => {
            if args.verbose {
                eprintln!("Manifest: {}", path.display());
            }
            let text = read_file(path)?;
            session.check_pasted(&text).await
        }
        ManifestInput::Stdin => {
            if args.verbose {
                eprintln!("Manifest: <stdin>");
            }
            let text = read_stdin()?;
            session.check_pasted(&text).await
        }
    };

    let formatter = create_formatter(&output_config);

    match outcome {
        Ok(report) => {
            let mut stdout = io::stdout().lock();
            formatter.format(&report, &mut stdout)?;
            stdout.flush()?;

            if args.strict && !report.result.is_fully_ready() {
                if args.verbose {
                    eprintln!(
                        "{} dependencies have no upgrade path",
                        report.result.not_ready_count()
                    );
                }
                return Ok(ExitCode::from(NOT_READY_EXIT));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            // JSON consumers read errors from stdout
            if output_config.format == OutputFormat::Json {
                let mut stdout = io::stdout().lock();
                formatter.format_error(&err, &mut stdout)?;
                stdout.flush()?;
            } else {
                let mut stderr = io::stderr().lock();
                formatter.format_error(&err, &mut stderr)?;
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
