//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Readiness display grouped into "ready or replaced" and "not ready"
//! - Successor lists for replaced packages
//! - Summary counts
//! - Error display with causes in verbose mode

use crate::domain::{DependencyStatus, PackageName};
use crate::error::CheckError;
use crate::manifest::TARGET_ELM_VERSION;
use crate::output::{OutputFormatter, Verbosity};
use crate::session::{ManifestOrigin, ReadinessReport};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn origin_label(origin: &ManifestOrigin) -> String {
        match origin {
            ManifestOrigin::Pasted => "pasted manifest".to_string(),
            ManifestOrigin::Repository(location) => location.clone(),
        }
    }

    /// Calculate the maximum package name length for alignment
    fn max_name_length(report: &ReadinessReport) -> usize {
        report
            .result
            .iter()
            .map(|(name, _)| name.as_str().len())
            .max()
            .unwrap_or(0)
    }

    fn constraint_of<'a>(report: &'a ReadinessReport, name: &PackageName) -> Option<&'a str> {
        report
            .manifest
            .dependencies
            .iter()
            .find(|d| &d.name == name)
            .map(|d| d.constraint.as_str())
    }

    fn format_status(&self, status: &DependencyStatus) -> String {
        let text = status.to_string();
        if !self.color {
            return text;
        }
        match status {
            DependencyStatus::Ready => text.green().to_string(),
            DependencyStatus::ReplacedWith(_) => text.yellow().to_string(),
            DependencyStatus::NotReady => text.red().to_string(),
        }
    }

    fn write_header(
        &self,
        report: &ReadinessReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let title = format!(
            "Elm {}.{} readiness of {}",
            TARGET_ELM_VERSION.major,
            TARGET_ELM_VERSION.minor,
            Self::origin_label(&report.origin)
        );
        if self.color {
            writeln!(writer, "{}", title.bold())?;
        } else {
            writeln!(writer, "{}", title)?;
        }

        if let Some(range) = &report.manifest.elm_version {
            writeln!(writer, "elm-version: {}", range)?;
            if report.manifest.targets_new_platform() {
                writeln!(writer, "elm-version already admits {}", TARGET_ELM_VERSION)?;
            }
        }

        Ok(())
    }

    fn write_line(
        &self,
        report: &ReadinessReport,
        name: &PackageName,
        status: Option<&DependencyStatus>,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let mut line = format!("  {:width$}", name.as_str(), width = width);

        if let Some(status) = status {
            line.push(' ');
            line.push_str(&self.format_status(status));
        }

        if self.verbosity == Verbosity::Verbose {
            if let Some(constraint) = Self::constraint_of(report, name) {
                let constraint = format!("({})", constraint);
                line.push(' ');
                if self.color {
                    line.push_str(&constraint.dimmed().to_string());
                } else {
                    line.push_str(&constraint);
                }
            }
        }

        writeln!(writer, "{}", line.trim_end())
    }

    fn write_summary(
        &self,
        report: &ReadinessReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let result = &report.result;
        if self.color {
            writeln!(
                writer,
                "Summary: {} ready, {} replaced, {} not ready",
                result.ready_count().to_string().green(),
                result.replaced_count().to_string().yellow(),
                result.not_ready_count().to_string().red()
            )
        } else {
            writeln!(
                writer,
                "Summary: {} ready, {} replaced, {} not ready",
                result.ready_count(),
                result.replaced_count(),
                result.not_ready_count()
            )
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &ReadinessReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            for name in report.result.not_ready() {
                writeln!(writer, "{}", name)?;
            }
            return Ok(());
        }

        self.write_header(report, writer)?;
        writeln!(writer)?;

        if report.result.is_empty() {
            writeln!(writer, "No dependencies declared.")?;
            return Ok(());
        }

        let width = Self::max_name_length(report);

        let ready: Vec<_> = report.result.ready_or_replaced().collect();
        if !ready.is_empty() {
            writeln!(writer, "Ready or replaced ({}):", ready.len())?;
            for (name, status) in ready {
                self.write_line(report, name, Some(status), width, writer)?;
            }
            writeln!(writer)?;
        }

        let not_ready: Vec<_> = report.result.not_ready().collect();
        if !not_ready.is_empty() {
            writeln!(writer, "Not ready ({}):", not_ready.len())?;
            for name in not_ready {
                self.write_line(report, name, None, width, writer)?;
            }
            writeln!(writer)?;
        }

        self.write_summary(report, writer)
    }

    fn format_error(&self, error: &CheckError, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{} {}", "Error:".red().bold(), error.user_message())?;
        } else {
            writeln!(writer, "Error: {}", error.user_message())?;
        }

        if self.verbosity == Verbosity::Verbose {
            match error {
                CheckError::Unclassified { causes } => {
                    for cause in causes {
                        writeln!(writer, "  caused by: {}", cause)?;
                    }
                }
                CheckError::RemoteManifest(_) | CheckError::CatalogNotReady => {}
                other => writeln!(writer, "  caused by: {}", other)?,
            }
        }

        Ok(())
    }
}
