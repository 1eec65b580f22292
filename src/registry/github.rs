//! Repository manifest adapter
//!
//! Fetches `elm-package.json` for a GitHub repository.
//! Endpoint: https://raw.githubusercontent.com/{owner}/{repo}/{branch}/elm-package.json

use crate::domain::RepoLocation;
use crate::error::RemoteManifestError;
use crate::manifest::MANIFEST_FILENAME;
use crate::registry::HttpClient;
use async_trait::async_trait;

/// Raw content base URL
pub const RAW_CONTENT_URL: &str = "https://raw.githubusercontent.com";

/// Branch read when none is given
pub const DEFAULT_BRANCH: &str = "master";

/// Trait for fetching manifests by repository
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Where the manifest for `location` is read from
    fn describe(&self, location: &RepoLocation) -> String;

    /// Fetch the raw manifest text
    async fn fetch(&self, location: &RepoLocation) -> Result<String, RemoteManifestError>;
}

/// GitHub raw-content manifest source
pub struct GitHubManifestSource {
    client: HttpClient,
    base_url: String,
    branch: String,
}

impl GitHubManifestSource {
    /// Create a source reading the default branch
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: RAW_CONTENT_URL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }

    /// Read from another branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Read from another raw-content host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the URL for a repository
    fn build_url(&self, location: &RepoLocation) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.base_url,
            location.owner(),
            location.repo(),
            self.branch,
            MANIFEST_FILENAME
        )
    }
}

#[async_trait]
impl ManifestSource for GitHubManifestSource {
    fn describe(&self, location: &RepoLocation) -> String {
        self.build_url(location)
    }

    async fn fetch(&self, location: &RepoLocation) -> Result<String, RemoteManifestError> {
        let url = self.build_url(location);
        self.client
            .get_text(&url)
            .await
            .map_err(|e| RemoteManifestError::from_http(location.to_string(), e))
    }
}
