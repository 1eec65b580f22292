//! Elm version range constraints
//!
//! Handles constraints of the form used by `elm-package.json`:
//! - `0.18.0 <= v < 0.19.0`
//! - `1.0.0 <= v <= 1.0.0`

use regex::Regex;
use semver::Version;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+\.\d+\.\d+)\s*(<=|<)\s*v\s*(<=|<)\s*(\d+\.\d+\.\d+)\s*$")
        .expect("valid range pattern")
});

/// A `lower <= v < upper` style version range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElmVersionRange {
    /// Lower bound
    pub lower: Version,
    /// Whether the lower bound is included
    pub lower_inclusive: bool,
    /// Upper bound
    pub upper: Version,
    /// Whether the upper bound is included
    pub upper_inclusive: bool,
}

impl ElmVersionRange {
    /// Parses a range, returning `None` for anything that is not a two-sided range
    pub fn parse(input: &str) -> Option<Self> {
        let caps = RANGE_PATTERN.captures(input)?;

        Some(Self {
            lower: Version::parse(&caps[1]).ok()?,
            lower_inclusive: &caps[2] == "<=",
            upper: Version::parse(&caps[4]).ok()?,
            upper_inclusive: &caps[3] == "<=",
        })
    }

    /// Returns true if the range admits `version`
    pub fn contains(&self, version: &Version) -> bool {
        let above_lower = if self.lower_inclusive {
            version >= &self.lower
        } else {
            version > &self.lower
        };
        let below_upper = if self.upper_inclusive {
            version <= &self.upper
        } else {
            version < &self.upper
        };
        above_lower && below_upper
    }
}

impl fmt::Display for ElmVersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = |inclusive: bool| if inclusive { "<=" } else { "<" };
        write!(
            f,
            "{} {} v {} {}",
            self.lower,
            op(self.lower_inclusive),
            op(self.upper_inclusive),
            self.upper
        )
    }
}

impl Serialize for ElmVersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
