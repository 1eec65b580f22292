//! Network and bundled data sources
//!
//! This module provides:
//! - HTTP client shared foundation
//! - Package catalog sources (bundled index, package.elm-lang.org)
//! - Repository manifest source (GitHub raw content)

mod catalog;
mod client;
mod github;

pub use catalog::{
    parse_package_index, BundledCatalog, CatalogSource, RemoteCatalog, PACKAGE_INDEX_URL,
};
pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use github::{GitHubManifestSource, ManifestSource, DEFAULT_BRANCH, RAW_CONTENT_URL};
