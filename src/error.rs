//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: the manifest text could not be read
//! - CatalogError: the package catalog could not be loaded
//! - RemoteManifestError: a repository manifest could not be fetched
//! - CheckError: the outcome of a failed check, as shown to the user
//! - HttpError: transport failures, mapped into the errors above
//! - ConfigError / RenameTableError: invalid configuration or static data

use crate::domain::PackageName;
use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A readiness check failed
    #[error(transparent)]
    Check(#[from] CheckError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client setup failed
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The manifest input could not be read
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading a manifest document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// Not valid JSON
    #[error("manifest is not valid JSON: {message}")]
    InvalidJson { message: String },

    /// Valid JSON, but not an object
    #[error("manifest must be a JSON object")]
    NotAnObject,

    /// No `dependencies` section
    #[error("manifest has no \"dependencies\" section")]
    MissingDependencies,

    /// `dependencies` is not an object
    #[error("\"dependencies\" must be an object of package names to version constraints")]
    DependenciesNotAnObject,

    /// A dependency constraint is not a string
    #[error("version constraint for '{package}' must be a string ({} entries read before it)", .parsed.len())]
    InvalidConstraint {
        package: PackageName,
        parsed: Vec<PackageName>,
    },
}

/// Errors raised while loading the package catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Network request failed
    #[error("failed to fetch package catalog from {url}: {message}")]
    Transport { url: String, message: String },

    /// Request timed out
    #[error("timeout while fetching package catalog from {url}")]
    Timeout { url: String },

    /// Response was not a package index
    #[error("invalid package index from {origin}: {message}")]
    InvalidIndex { origin: String, message: String },
}

/// Errors raised while fetching a manifest from a repository
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteManifestError {
    /// No manifest at the location
    #[error("no elm-package.json found for '{location}'; check that the repository exists and contains one")]
    NotFound { location: String },

    /// Network request failed
    #[error("failed to fetch elm-package.json for '{location}': {message}")]
    Transport { location: String, message: String },

    /// The fetched document is not a valid manifest
    #[error("elm-package.json for '{location}' could not be read: {source}")]
    InvalidManifest {
        location: String,
        #[source]
        source: ManifestError,
    },
}

/// Outcome of a failed readiness check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// The manifest could not be parsed
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The catalog could not be loaded
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The repository manifest could not be fetched
    #[error(transparent)]
    RemoteManifest(#[from] RemoteManifestError),

    /// The catalog has not finished loading
    #[error("package catalog is not loaded yet")]
    CatalogNotReady,

    /// Several failures at once
    #[error("something went wrong: {}", .causes.join("; "))]
    Unclassified { causes: Vec<String> },
}

impl CheckError {
    /// Message shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            CheckError::Manifest(_) => "could not read the pasted manifest".to_string(),
            CheckError::Catalog(_) => "could not load the package catalog".to_string(),
            CheckError::RemoteManifest(e) => e.to_string(),
            CheckError::CatalogNotReady => {
                "the package catalog is still loading, try again shortly".to_string()
            }
            CheckError::Unclassified { .. } => "something went wrong".to_string(),
        }
    }

    /// Combines a manifest failure with a catalog failure
    pub fn combined(manifest: impl Into<CheckError>, catalog: CatalogError) -> Self {
        CheckError::Unclassified {
            causes: vec![manifest.into().to_string(), catalog.to_string()],
        }
    }
}

/// Transport-level HTTP failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// The HTTP client could not be created
    #[error("failed to create HTTP client: {message}")]
    Client { message: String },

    /// HTTP 404
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Timeout
    #[error("timeout while fetching {url}")]
    Timeout { url: String },

    /// Connection or protocol failure
    #[error("failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    /// The body could not be decoded
    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl From<HttpError> for CatalogError {
    fn from(err: HttpError) -> Self {
        let message = err.to_string();
        match err {
            HttpError::Timeout { url } => CatalogError::Timeout { url },
            HttpError::Decode { url, message } => CatalogError::InvalidIndex {
                origin: url,
                message,
            },
            HttpError::NotFound { url }
            | HttpError::Status { url, .. }
            | HttpError::Transport { url, .. } => CatalogError::Transport { url, message },
            HttpError::Client { .. } => CatalogError::Transport {
                url: String::new(),
                message,
            },
        }
    }
}

impl RemoteManifestError {
    /// Maps a transport failure for `location`
    pub fn from_http(location: impl Into<String>, err: HttpError) -> Self {
        let location = location.into();
        match err {
            HttpError::NotFound { .. } => RemoteManifestError::NotFound { location },
            other => RemoteManifestError::Transport {
                location,
                message: other.to_string(),
            },
        }
    }

    /// Creates an InvalidManifest error
    pub fn invalid_manifest(location: impl Into<String>, source: ManifestError) -> Self {
        RemoteManifestError::InvalidManifest {
            location: location.into(),
            source,
        }
    }
}

impl CatalogError {
    /// Creates an InvalidIndex error
    pub fn invalid_index(origin: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::InvalidIndex {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

impl ManifestError {
    /// Creates an InvalidJson error
    pub fn invalid_json(message: impl Into<String>) -> Self {
        ManifestError::InvalidJson {
            message: message.into(),
        }
    }
}

/// Errors related to configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Repository name is not `owner/repo`
    #[error("invalid repository '{value}': expected 'owner/repo' or a GitHub URL")]
    InvalidRepository { value: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl ConfigError {
    /// Creates an InvalidRepository error
    pub fn invalid_repository(value: impl Into<String>) -> Self {
        ConfigError::InvalidRepository {
            value: value.into(),
        }
    }
}

/// Errors in rename table data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenameTableError {
    /// A retired package has no successor
    #[error("rename entry for '{retired}' has no successors")]
    EmptySuccessors { retired: PackageName },

    /// A retired package is listed twice
    #[error("rename entry for '{retired}' is listed more than once")]
    DuplicateEntry { retired: PackageName },
}

impl RenameTableError {
    /// Creates an EmptySuccessors error
    pub fn empty_successors(retired: PackageName) -> Self {
        RenameTableError::EmptySuccessors { retired }
    }

    /// Creates a DuplicateEntry error
    pub fn duplicate_entry(retired: PackageName) -> Self {
        RenameTableError::DuplicateEntry { retired }
    }
}
