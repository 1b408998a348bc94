//! Three-part versions and constraint expressions.
//!
//! - [`Version`] - `major.minor.patch` triple parsed out of free text
//! - [`constraint`] - comma-separated comparison clauses such as `>=5.0,<5.6`

pub mod constraint;

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CompatError, Result};

pub use constraint::{evaluate, Clause, ConstraintExpr, Op};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bv?(\d+)\.(\d+)(?:\.(\d+))?\b").expect("version pattern is valid")
});

/// A `major.minor.patch` version. A missing patch component parses as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The `major.minor` release line, e.g. `5.3` for `5.3.1`.
    pub fn release_line(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Extract the first `major.minor[.patch]` occurrence from `text`.
///
/// An optional leading `v` marker is accepted, so `ESP-IDF v5.3.1-dirty`
/// yields `5.3.1`.
pub fn parse_version(text: &str) -> Result<Version> {
    let parse_err = || CompatError::VersionParse {
        text: text.to_string(),
    };

    let caps = VERSION_RE.captures(text).ok_or_else(parse_err)?;
    let component = |idx: usize| -> Result<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().map_err(|_| parse_err()),
            None => Ok(0),
        }
    };

    Ok(Version::new(component(1)?, component(2)?, component(3)?))
}

/// Lexicographic triple comparison.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    a.cmp(b)
}
