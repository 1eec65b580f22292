//! Readiness classification types

use super::PackageName;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Upgrade status of a single declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "successors", rename_all = "snake_case")]
pub enum DependencyStatus {
    /// Published for the target platform under the same name
    Ready,
    /// Retired; use these packages instead
    ReplacedWith(Vec<PackageName>),
    /// No known upgrade path
    NotReady,
}

impl DependencyStatus {
    /// Returns true for `Ready` and `ReplacedWith`
    pub fn is_ready_or_replaced(&self) -> bool {
        !matches!(self, DependencyStatus::NotReady)
    }
}

impl fmt::Display for DependencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyStatus::Ready => write!(f, "ready"),
            DependencyStatus::ReplacedWith(successors) => {
                let list: Vec<&str> = successors.iter().map(PackageName::as_str).collect();
                write!(f, "replaced with {}", list.join(", "))
            }
            DependencyStatus::NotReady => write!(f, "not ready"),
        }
    }
}

/// Status of every declared dependency, keyed by package name
///
/// Holds one entry per distinct package. Iteration is ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReadinessResult {
    statuses: BTreeMap<PackageName, DependencyStatus>,
}

impl ReadinessResult {
    /// Creates an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the status of a package; the first status recorded wins
    pub fn record(&mut self, name: PackageName, status: DependencyStatus) {
        self.statuses.entry(name).or_insert(status);
    }

    /// Returns the status of a package
    pub fn get(&self, name: &PackageName) -> Option<&DependencyStatus> {
        self.statuses.get(name)
    }

    /// Iterates over all packages in name order
    pub fn iter(&self) -> impl Iterator<Item = (&PackageName, &DependencyStatus)> {
        self.statuses.iter()
    }

    /// Packages that are ready or have a replacement
    pub fn ready_or_replaced(&self) -> impl Iterator<Item = (&PackageName, &DependencyStatus)> {
        self.iter().filter(|(_, status)| status.is_ready_or_replaced())
    }

    /// Packages without a known upgrade path
    pub fn not_ready(&self) -> impl Iterator<Item = &PackageName> {
        self.iter()
            .filter(|(_, status)| !status.is_ready_or_replaced())
            .map(|(name, _)| name)
    }

    /// Number of packages
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Returns true if no package was classified
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Number of `Ready` packages
    pub fn ready_count(&self) -> usize {
        self.count(|s| matches!(s, DependencyStatus::Ready))
    }

    /// Number of `ReplacedWith` packages
    pub fn replaced_count(&self) -> usize {
        self.count(|s| matches!(s, DependencyStatus::ReplacedWith(_)))
    }

    /// Number of `NotReady` packages
    pub fn not_ready_count(&self) -> usize {
        self.count(|s| matches!(s, DependencyStatus::NotReady))
    }

    /// Returns true if every package is ready or replaced
    pub fn is_fully_ready(&self) -> bool {
        self.not_ready_count() == 0
    }

    fn count(&self, pred: impl Fn(&DependencyStatus) -> bool) -> usize {
        self.statuses.values().filter(|s| pred(s)).count()
    }
}

impl<'a> IntoIterator for &'a ReadinessResult {
    type Item = (&'a PackageName, &'a DependencyStatus);
    type IntoIter = std::collections::btree_map::Iter<'a, PackageName, DependencyStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.statuses.iter()
    }
}
