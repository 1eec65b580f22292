//! Manifest parsing
//!
//! Reads the declared dependencies of an Elm 0.18 project from its
//! `elm-package.json`.

mod elm_package_json;

pub use elm_package_json::ElmPackageJsonParser;

use crate::domain::{DeclaredDependency, ElmVersionRange, PackageName};
use crate::error::ManifestError;
use semver::Version;
use serde::Serialize;

/// File name of a legacy Elm manifest
pub const MANIFEST_FILENAME: &str = "elm-package.json";

/// The Elm release dependencies are checked against
pub const TARGET_ELM_VERSION: Version = Version::new(0, 19, 0);

/// Contents of a manifest relevant to an upgrade check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Declared dependencies in declaration order
    pub dependencies: Vec<DeclaredDependency>,
    /// Declared `elm-version` range, when present and well-formed
    pub elm_version: Option<ElmVersionRange>,
}

impl Manifest {
    /// Declared package names in declaration order
    pub fn package_names(&self) -> impl Iterator<Item = &PackageName> {
        self.dependencies.iter().map(|d| &d.name)
    }

    /// Returns true if the declared `elm-version` already admits the target release
    pub fn targets_new_platform(&self) -> bool {
        self.elm_version
            .as_ref()
            .is_some_and(|range| range.contains(&TARGET_ELM_VERSION))
    }
}

/// Parse a manifest document
pub fn parse_manifest(content: &str) -> Result<Manifest, ManifestError> {
    ElmPackageJsonParser.parse(content)
}
