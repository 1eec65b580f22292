//! Repository locations for fetching manifests

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A GitHub repository, `owner/repo`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoLocation {
    owner: String,
    repo: String,
}

impl RepoLocation {
    /// Creates a location from its parts
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Result<Self, ConfigError> {
        let owner = owner.into();
        let repo = repo.into();

        if !is_valid_segment(&owner) || !is_valid_segment(&repo) {
            return Err(ConfigError::invalid_repository(format!("{}/{}", owner, repo)));
        }

        Ok(Self { owner, repo })
    }

    /// Repository owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl FromStr for RepoLocation {
    type Err = ConfigError;

    /// Accepts `owner/repo` or `https://github.com/owner/repo[.git][/]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let path = ["https://github.com/", "http://github.com/", "github.com/"]
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
            .unwrap_or(trimmed);
        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);

        let mut parts = path.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) => {
                Self::new(owner, repo).map_err(|_| ConfigError::invalid_repository(s))
            }
            _ => Err(ConfigError::invalid_repository(s)),
        }
    }
}

impl fmt::Display for RepoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
