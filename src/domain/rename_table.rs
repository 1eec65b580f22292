//! Known package renames and splits between Elm 0.18 and Elm 0.19

use super::PackageName;
use crate::error::RenameTableError;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Retired package and the packages that replace it, in recommended order
const BUILTIN_RENAMES: &[(&str, &[&str])] = &[
    ("elm-lang/core", &["elm/core", "elm/json"]),
    ("elm-lang/html", &["elm/html"]),
    ("elm-lang/svg", &["elm/svg"]),
    ("elm-lang/http", &["elm/http"]),
    ("elm-lang/virtual-dom", &["elm/virtual-dom"]),
    ("elm-lang/dom", &["elm/browser"]),
    ("elm-lang/navigation", &["elm/browser", "elm/url"]),
    ("elm-lang/window", &["elm/browser"]),
    ("elm-lang/keyboard", &["elm/browser"]),
    ("elm-lang/mouse", &["elm/browser"]),
    ("elm-lang/animation-frame", &["elm/browser"]),
    ("elm-lang/page-visibility", &["elm/browser"]),
    ("evancz/url-parser", &["elm/url"]),
    ("evancz/elm-http", &["elm/http"]),
    ("evancz/elm-markdown", &["elm-explorations/markdown"]),
    ("evancz/elm-sortable-table", &["billstclair/elm-sortable-table"]),
    ("elm-tools/parser", &["elm/parser"]),
    ("elm-community/elm-test", &["elm-explorations/test"]),
    ("elm-community/webgl", &["elm-explorations/webgl"]),
    ("elm-community/linear-algebra", &["elm-explorations/linear-algebra"]),
    ("mgold/elm-random-pcg", &["elm/random"]),
    ("NoRedInk/elm-decode-pipeline", &["NoRedInk/elm-json-decode-pipeline"]),
    (
        "justinmimbs/elm-date-extra",
        &[
            "justinmimbs/date",
            "rtfeldman/elm-iso8601-date-strings",
            "ryannhg/date-format",
        ],
    ),
    ("ohanhi/keyboard-extra", &["ohanhi/keyboard"]),
    ("mdgriffith/style-elements", &["mdgriffith/elm-ui"]),
];

static BUILTIN: LazyLock<Arc<RenameTable>> = LazyLock::new(|| {
    let table = RenameTable::new(
        BUILTIN_RENAMES
            .iter()
            .map(|(retired, successors)| (*retired, successors.iter().copied())),
    )
    .expect("built-in rename table is well-formed");
    Arc::new(table)
});

/// Mapping from a retired package to its successor packages
///
/// Every key maps to at least one successor and the successor order is
/// preserved. Tables are built once and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameTable {
    entries: HashMap<PackageName, Vec<PackageName>>,
}

impl RenameTable {
    /// Builds a table, rejecting empty successor lists and duplicate keys
    pub fn new<I, K, V, S>(entries: I) -> Result<Self, RenameTableError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<PackageName>,
        V: IntoIterator<Item = S>,
        S: Into<PackageName>,
    {
        let mut table = HashMap::new();

        for (retired, successors) in entries {
            let retired = retired.into();
            let successors: Vec<PackageName> = successors.into_iter().map(Into::into).collect();

            if successors.is_empty() {
                return Err(RenameTableError::empty_successors(retired));
            }
            if table.contains_key(&retired) {
                return Err(RenameTableError::duplicate_entry(retired));
            }

            table.insert(retired, successors);
        }

        Ok(Self { entries: table })
    }

    /// The rename table compiled into this crate
    pub fn builtin() -> &'static RenameTable {
        &BUILTIN
    }

    /// Shared handle to the built-in table
    pub fn shared_builtin() -> Arc<RenameTable> {
        Arc::clone(&BUILTIN)
    }

    /// Returns the successors of a retired package
    pub fn successors(&self, name: &PackageName) -> Option<&[PackageName]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Returns the number of retired packages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over retired packages and their successors
    pub fn iter(&self) -> impl Iterator<Item = (&PackageName, &[PackageName])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
