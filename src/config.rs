//! Check configuration derived from command-line arguments
//!
//! Resolves where the manifest comes from, which catalog to classify against,
//! and builds the network sources for a run.

use crate::cli::CliArgs;
use crate::domain::RepoLocation;
use crate::error::{ConfigError, HttpError};
use crate::manifest::MANIFEST_FILENAME;
use crate::registry::{
    BundledCatalog, CatalogSource, GitHubManifestSource, HttpClient, RemoteCatalog,
};
use std::path::PathBuf;
use std::time::Duration;

/// Where the manifest to check is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestInput {
    /// A local file
    File(PathBuf),
    /// Standard input
    Stdin,
    /// `elm-package.json` of a GitHub repository
    Repository(RepoLocation),
}

/// Which catalog dependencies are classified against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogChoice {
    /// The package index compiled into the binary
    Bundled,
    /// A package index fetched over HTTP
    Remote { url: String },
}

/// Resolved configuration for one check
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Manifest input
    pub input: ManifestInput,
    /// Catalog to use
    pub catalog: CatalogChoice,
    /// Branch for repository manifests
    pub branch: String,
    /// Network timeout
    pub timeout: Duration,
}

impl CheckConfig {
    /// Build the configuration from parsed CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        let input = match (&args.manifest, &args.repo) {
            (Some(path), Some(repo)) => {
                return Err(ConfigError::ConflictingOptions {
                    message: format!(
                        "both a manifest path ({}) and --repo {} were given",
                        path.display(),
                        repo
                    ),
                })
            }
            (None, Some(repo)) => ManifestInput::Repository(repo.parse()?),
            _ if args.reads_stdin() => ManifestInput::Stdin,
            (Some(path), None) => ManifestInput::File(path.clone()),
            (None, None) => ManifestInput::File(PathBuf::from(MANIFEST_FILENAME)),
        };

        let catalog = if args.offline {
            CatalogChoice::Bundled
        } else {
            CatalogChoice::Remote {
                url: args.catalog_url.clone(),
            }
        };

        Ok(Self {
            input,
            catalog,
            branch: args.branch.clone(),
            timeout: args.timeout,
        })
    }

    /// Create the HTTP client for this run
    pub fn http_client(&self) -> Result<HttpClient, HttpError> {
        HttpClient::with_timeout(self.timeout)
    }

    /// Create the catalog source for this run
    pub fn catalog_source(&self, client: &HttpClient) -> Box<dyn CatalogSource> {
        match &self.catalog {
            CatalogChoice::Bundled => Box::new(BundledCatalog),
            CatalogChoice::Remote { url } => Box::new(RemoteCatalog::with_url(client.clone(), url)),
        }
    }

    /// Create the repository manifest source for this run
    pub fn manifest_source(&self, client: &HttpClient) -> GitHubManifestSource {
        GitHubManifestSource::new(client.clone()).with_branch(&self.branch)
    }
}
