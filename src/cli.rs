//! CLI argument parsing module for elmready

use crate::registry::{DEFAULT_BRANCH, PACKAGE_INDEX_URL};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a timeout given in whole seconds
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds: {}", s))?;
    if secs == 0 {
        return Err("timeout must be at least 1 second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

/// Elm 0.19 upgrade readiness checker
#[derive(Parser, Debug, Clone)]
#[command(
    name = "elmready",
    version,
    about = "Check whether the dependencies of an Elm 0.18 project are ready for Elm 0.19"
)]
pub struct CliArgs {
    /// Path to elm-package.json, or '-' to read it from stdin
    /// (default: ./elm-package.json when --repo is not given)
    pub manifest: Option<PathBuf>,

    // Source options
    /// Fetch elm-package.json from a GitHub repository (owner/repo or URL)
    #[arg(long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Branch to fetch the repository manifest from
    #[arg(long, default_value = DEFAULT_BRANCH, requires = "repo")]
    pub branch: String,

    /// Use the bundled package index instead of fetching it
    #[arg(long)]
    pub offline: bool,

    /// Package index to fetch the catalog from
    #[arg(long, value_name = "URL", default_value = PACKAGE_INDEX_URL, conflicts_with = "offline")]
    pub catalog_url: String,

    /// Network timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "30", value_parser = parse_timeout)]
    pub timeout: Duration,

    // General options
    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - only list packages without an upgrade path
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Exit with status 2 when any dependency is not ready
    #[arg(long)]
    pub strict: bool,
}

impl CliArgs {
    /// Check if the manifest should be read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.manifest
            .as_deref()
            .is_some_and(|p| p.as_os_str() == "-")
    }
}
