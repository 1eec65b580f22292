//! Core domain models for elmready
//!
//! This module contains the fundamental types used throughout the application:
//! - Package names and declared dependencies
//! - The catalog of published packages
//! - The table of known renames and splits
//! - Readiness statuses and results
//! - Elm version ranges
//! - Repository locations

mod catalog;
mod package;
mod readiness;
mod rename_table;
mod repo;
mod version_range;

pub use catalog::Catalog;
pub use package::{DeclaredDependency, PackageName};
pub use readiness::{DependencyStatus, ReadinessResult};
pub use rename_table::RenameTable;
pub use repo::RepoLocation;
pub use version_range::ElmVersionRange;
