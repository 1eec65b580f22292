//! Package catalog sources
//!
//! A catalog is built from a package index: a JSON array of objects that
//! each carry at least a `name`. Two sources are provided:
//! - the index bundled into the binary
//! - the live index at https://package.elm-lang.org/search.json

use crate::domain::{Catalog, PackageName};
use crate::error::CatalogError;
use crate::registry::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;

/// Live package index URL
pub const PACKAGE_INDEX_URL: &str = "https://package.elm-lang.org/search.json";

/// Package index snapshot shipped with the binary
const BUNDLED_INDEX: &str = include_str!("../../data/search.json");

/// Origin label for the bundled index
const BUNDLED_ORIGIN: &str = "bundled package index";

/// Package index entry; only the name is used
#[derive(Debug, Deserialize)]
struct IndexEntry {
    name: PackageName,
}

/// Builds a catalog from a package index document
pub fn parse_package_index(content: &str, origin: &str) -> Result<Catalog, CatalogError> {
    let entries: Vec<IndexEntry> = serde_json::from_str(content)
        .map_err(|e| CatalogError::invalid_index(origin, e.to_string()))?;

    Ok(entries.into_iter().map(|entry| entry.name).collect())
}

/// Trait for catalog sources
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Where the catalog comes from, for diagnostics
    fn describe(&self) -> String;

    /// Load the catalog
    async fn load(&self) -> Result<Catalog, CatalogError>;
}

/// Catalog from the index compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

impl BundledCatalog {
    /// Load the bundled catalog synchronously
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        parse_package_index(BUNDLED_INDEX, BUNDLED_ORIGIN)
    }
}

#[async_trait]
impl CatalogSource for BundledCatalog {
    fn describe(&self) -> String {
        BUNDLED_ORIGIN.to_string()
    }

    async fn load(&self) -> Result<Catalog, CatalogError> {
        self.catalog()
    }
}

/// Catalog fetched from a package index URL
pub struct RemoteCatalog {
    client: HttpClient,
    url: String,
}

impl RemoteCatalog {
    /// Create a source for the live package index
    pub fn new(client: HttpClient) -> Self {
        Self::with_url(client, PACKAGE_INDEX_URL)
    }

    /// Create a source for a custom index URL
    pub fn with_url(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The index URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalog {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> Result<Catalog, CatalogError> {
        let body = self.client.get_text(&self.url).await?;
        parse_package_index(&body, &self.url)
    }
}
