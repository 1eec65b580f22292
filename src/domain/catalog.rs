//! Catalog of packages currently published for Elm 0.19

use super::PackageName;
use std::collections::HashSet;

/// Set of package names considered valid on the target platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    packages: HashSet<PackageName>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the package is published
    pub fn contains(&self, name: &PackageName) -> bool {
        self.packages.contains(name)
    }

    /// Returns the number of packages
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the catalog holds no packages
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<N: Into<PackageName>> FromIterator<N> for Catalog {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            packages: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(!catalog.contains(&PackageName::from("elm/core")));
    }

    #[test]
    fn test_catalog_from_names() {
        let catalog: Catalog = ["elm/core", "elm/html", "elm/core"].into_iter().collect();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(&PackageName::from("elm/html")));
        assert!(!catalog.contains(&PackageName::from("elm-lang/html")));
    }
}
