//! Package versions of the form `[epoch:]upstream[-revision]` and their
//! ordering.
//!
//! Ordering is decided in three stages, stopping at the first difference:
//! the epoch (numerically, `0` when absent), then the upstream part, then
//! the revision (empty when absent), the latter two with
//! [`compare_segments`]. This is what makes `1.0~rc1` sort before `1.0`,
//! and `1:0.5` after `2.0`.
//!
//! ```
//! use shelf_version::{Version, compare};
//! use std::cmp::Ordering;
//!
//! assert_eq!(compare("1.0~rc1", "1.0"), Ordering::Less);
//! let version: Version = "1:2.30-4".parse().unwrap();
//! assert_eq!(version.upstream(), "2.30");
//! ```

mod compare;
pub mod error;

pub use crate::compare::compare_segments;
use crate::compare::compare_numeric;
use crate::error::{Error, ErrorKind, Result};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A parsed package version.
///
/// Equality follows the ordering, so `1.01` and `1.1` are equal versions even
/// though their strings differ.
#[derive(Clone, Debug)]
pub struct Version {
    epoch: Option<String>,
    upstream: String,
    revision: Option<String>,
}

impl Version {
    /// Parse a version the way [`compare`] does: a malformed epoch is not an
    /// error, the colon is simply kept as part of the upstream version.
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            let (upstream, revision) = split_revision(s);
            Self {
                epoch: None,
                upstream: upstream.to_string(),
                revision: revision.map(str::to_string),
            }
        })
    }

    /// The epoch digits as written, `"0"` when absent.
    #[must_use]
    pub fn epoch(&self) -> &str {
        self.epoch.as_deref().unwrap_or("0")
    }

    #[must_use]
    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// The revision, empty when absent.
    #[must_use]
    pub fn revision(&self) -> &str {
        self.revision.as_deref().unwrap_or("")
    }
}

fn split_revision(s: &str) -> (&str, Option<&str>) {
    match s.rsplit_once('-') {
        Some((upstream, revision)) => (upstream, Some(revision)),
        None => (s, None),
    }
}

impl FromStr for Version {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse(s)
    }
}

fn parse(s: &str) -> Result<Version> {
    if s.is_empty() {
        exn::bail!(ErrorKind::Empty);
    }
    if s.chars().any(char::is_whitespace) {
        exn::bail!(ErrorKind::Whitespace(s.to_string()));
    }
    let (epoch, rest) = match s.split_once(':') {
        Some((epoch, rest)) => {
            if epoch.is_empty() || !epoch.bytes().all(|c| c.is_ascii_digit()) {
                exn::bail!(ErrorKind::InvalidEpoch(s.to_string()));
            }
            (Some(epoch.to_string()), rest)
        },
        None => (None, s),
    };
    let (upstream, revision) = split_revision(rest);
    if upstream.is_empty() {
        exn::bail!(ErrorKind::MissingUpstream(s.to_string()));
    }
    Ok(Version {
        epoch,
        upstream: upstream.to_string(),
        revision: revision.map(str::to_string),
    })
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(epoch) = &self.epoch {
            write!(f, "{epoch}:")?;
        }
        f.write_str(&self.upstream)?;
        if let Some(revision) = &self.revision {
            write!(f, "-{revision}")?;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_numeric(self.epoch().as_bytes(), other.epoch().as_bytes())
            .then_with(|| compare_segments(&self.upstream, &other.upstream))
            .then_with(|| compare_segments(self.revision(), other.revision()))
    }
}
impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}
impl Eq for Version {}

/// Total order over version strings.
///
/// Never fails: strings that do not parse strictly are compared via
/// [`Version::parse_lossy`].
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    Version::parse_lossy(a).cmp(&Version::parse_lossy(b))
}
