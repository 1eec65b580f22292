//! Readiness classification
//!
//! Each declared package is checked in order of precedence:
//! 1. Published in the catalog → `Ready`
//! 2. Listed in the rename table → `ReplacedWith(successors)`
//! 3. Otherwise → `NotReady`

use crate::domain::{Catalog, DependencyStatus, PackageName, ReadinessResult, RenameTable};

/// Classifies every declared package
///
/// Packages declared more than once produce a single entry.
pub fn classify<'a, I>(declared: I, catalog: &Catalog, renames: &RenameTable) -> ReadinessResult
where
    I: IntoIterator<Item = &'a PackageName>,
{
    let mut result = ReadinessResult::new();

    for name in declared {
        result.record(name.clone(), status_of(name, catalog, renames));
    }

    result
}

/// Classifies a single package
pub fn status_of(name: &PackageName, catalog: &Catalog, renames: &RenameTable) -> DependencyStatus {
    if catalog.contains(name) {
        return DependencyStatus::Ready;
    }

    match renames.successors(name) {
        Some(successors) => DependencyStatus::ReplacedWith(successors.to_vec()),
        None => DependencyStatus::NotReady,
    }
}
