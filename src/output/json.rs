//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of readiness reports
//! - Structured error output with a stable `kind`

use crate::domain::DependencyStatus;
use crate::error::CheckError;
use crate::manifest::Manifest;
use crate::output::{OutputFormatter, Verbosity};
use crate::session::{ManifestOrigin, ReadinessReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of a report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Where the manifest came from
    source: &'a ManifestOrigin,
    /// When the check ran
    checked_at: DateTime<Utc>,
    /// Declared elm-version range
    elm_version: Option<String>,
    /// Whether elm-version already admits the target release
    targets_new_platform: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-package results
    packages: Vec<JsonPackage<'a>>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    ready: usize,
    replaced: usize,
    not_ready: usize,
}

/// JSON representation of a package result
#[derive(Serialize)]
struct JsonPackage<'a> {
    /// Package name
    name: &'a str,
    /// Declared constraint (verbose only)
    #[serde(skip_serializing_if = "Option::is_none")]
    constraint: Option<&'a str>,
    /// ready, replaced_with or not_ready
    status: &'static str,
    /// Successor packages when replaced
    #[serde(skip_serializing_if = "Vec::is_empty")]
    successors: Vec<&'a str>,
}

/// JSON representation of a failed check
#[derive(Serialize)]
struct JsonError {
    error: JsonErrorBody,
}

#[derive(Serialize)]
struct JsonErrorBody {
    kind: &'static str,
    message: String,
    detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    causes: Vec<String>,
}

impl JsonFormatter {
    fn status_tag(status: &DependencyStatus) -> &'static str {
        match status {
            DependencyStatus::Ready => "ready",
            DependencyStatus::ReplacedWith(_) => "replaced_with",
            DependencyStatus::NotReady => "not_ready",
        }
    }

    fn error_kind(error: &CheckError) -> &'static str {
        match error {
            CheckError::Manifest(_) => "manifest_parse",
            CheckError::Catalog(_) => "catalog_fetch",
            CheckError::RemoteManifest(_) => "remote_manifest_fetch",
            CheckError::CatalogNotReady => "catalog_not_ready",
            CheckError::Unclassified { .. } => "unclassified",
        }
    }

    fn constraint<'a>(&self, manifest: &'a Manifest, name: &str) -> Option<&'a str> {
        if self.verbosity != Verbosity::Verbose {
            return None;
        }
        manifest
            .dependencies
            .iter()
            .find(|d| d.name.as_str() == name)
            .map(|d| d.constraint.as_str())
    }

    fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ReadinessReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let result = &report.result;

        let packages = result
            .iter()
            .map(|(name, status)| JsonPackage {
                name: name.as_str(),
                constraint: self.constraint(&report.manifest, name.as_str()),
                status: Self::status_tag(status),
                successors: match status {
                    DependencyStatus::ReplacedWith(successors) => {
                        successors.iter().map(|s| s.as_str()).collect()
                    }
                    _ => Vec::new(),
                },
            })
            .collect();

        let output = JsonOutput {
            source: &report.origin,
            checked_at: report.checked_at,
            elm_version: report.manifest.elm_version.as_ref().map(ToString::to_string),
            targets_new_platform: report.manifest.targets_new_platform(),
            summary: JsonSummary {
                total: result.len(),
                ready: result.ready_count(),
                replaced: result.replaced_count(),
                not_ready: result.not_ready_count(),
            },
            packages,
        };

        Self::write_json(&output, writer)
    }

    fn format_error(&self, error: &CheckError, writer: &mut dyn Write) -> std::io::Result<()> {
        let causes = match error {
            CheckError::Unclassified { causes } => causes.clone(),
            _ => Vec::new(),
        };

        let output = JsonError {
            error: JsonErrorBody {
                kind: Self::error_kind(error),
                message: error.user_message(),
                detail: error.to_string(),
                causes,
            },
        };

        Self::write_json(&output, writer)
    }
}
