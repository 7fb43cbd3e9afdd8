//! Package archive reading.
//!
//! A binary package is an `ar` container holding `debian-binary`, a control
//! tarball (`control.tar`, optionally compressed) and a payload tarball.
//! [`read`] pulls the `control` paragraph out of the control tarball and
//! pairs it with the size and digests of the archive file itself, producing
//! a [`PackageRecord`].
//!
//! Reading is architecture-agnostic: filtering by architecture is the
//! caller's decision.

mod control;
pub mod error;
#[cfg(any(test, feature = "fixture"))]
pub mod fixture;

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use shelf_control::Paragraph;
use shelf_digest::{Digests, measure_file};
use shelf_version::Version;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::instrument;

pub use crate::control::read_control;

/// One scanned package archive.
///
/// `name`, `version` and `architecture` are never empty, and `version`
/// always parses as a [`Version`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageRecord {
    name: String,
    version: String,
    architecture: String,
    control: Paragraph,
    path: PathBuf,
    size: u64,
    digests: Digests,
}

impl PackageRecord {
    /// The `Package` field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `Version` field, verbatim.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The `Architecture` field.
    #[must_use]
    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    /// The archive's full control paragraph, as extracted.
    #[must_use]
    pub fn control(&self) -> &Paragraph {
        &self.control
    }

    /// Absolute path of the archive file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the archive file in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn digests(&self) -> &Digests {
        &self.digests
    }

    /// Build a record from an already-extracted control paragraph.
    ///
    /// # Errors
    /// [`ErrorKind::MissingField`] if `Package`, `Version` or `Architecture`
    /// is absent or empty, [`ErrorKind::InvalidVersion`] if `Version` does
    /// not parse.
    pub fn new(control: Paragraph, path: impl Into<PathBuf>, size: u64, digests: Digests) -> Result<Self> {
        let name = required(&control, "Package")?;
        let version = required(&control, "Version")?;
        let architecture = required(&control, "Architecture")?;
        version.parse::<Version>().or_raise(|| ErrorKind::InvalidVersion(version.clone()))?;
        Ok(Self {
            name,
            version,
            architecture,
            control,
            path: path.into(),
            size,
            digests,
        })
    }
}

fn required(control: &Paragraph, field: &'static str) -> Result<String> {
    control
        .get(field)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_raise(|| ErrorKind::MissingField(field))
}

/// Read the package archive at `path`.
///
/// The archive is opened twice: once to extract the control paragraph and
/// once, in `chunk_size` reads, to compute its size and digests.
#[instrument(skip(path), fields(path = %path.as_ref().display(), package))]
pub fn read(path: impl AsRef<Path>, chunk_size: usize) -> Result<PackageRecord> {
    let path = path.as_ref();
    let file = File::open(path).or_raise(|| ErrorKind::Io)?;
    let control = read_control(BufReader::new(file))?;
    let measured = measure_file(path, chunk_size).or_raise(|| ErrorKind::Io)?;
    let record = PackageRecord::new(control, path, measured.size, measured.digests)?;
    tracing::Span::current().record("package", record.name());
    tracing::debug!(version = record.version(), architecture = record.architecture(), "read package archive");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;
    use rstest::rstest;
    use shelf_digest::{DEFAULT_CHUNK_SIZE, DigestKind, digest_file};
    use tempfile::TempDir;

    const HELLO: &str = "Package: hello\nVersion: 1:2.10-3\nArchitecture: amd64\nDescription: greeter\n";

    #[test]
    fn reads_record_from_archive() {
        let dir = TempDir::new().unwrap();
        let path = fixture::write_deb(dir.path(), "hello.deb", HELLO).unwrap();
        let record = read(&path, DEFAULT_CHUNK_SIZE).unwrap();
        assert_eq!(record.name(), "hello");
        assert_eq!(record.version(), "1:2.10-3");
        assert_eq!(record.architecture(), "amd64");
        assert_eq!(record.control().get("Description"), Some("greeter"));
        assert_eq!(record.path(), path);
        assert_eq!(record.size(), std::fs::metadata(&path).unwrap().len());
        let expected = digest_file(&path, DEFAULT_CHUNK_SIZE).unwrap();
        assert_eq!(record.digests().get(DigestKind::Sha256), expected.get(DigestKind::Sha256));
    }

    #[rstest]
    #[case("Version: 1.0\nArchitecture: all\n", ErrorKind::MissingField("Package"))]
    #[case("Package: foo\nArchitecture: all\n", ErrorKind::MissingField("Version"))]
    #[case("Package: foo\nVersion: 1.0\n", ErrorKind::MissingField("Architecture"))]
    #[case("Package: foo\nVersion:\nArchitecture: all\n", ErrorKind::MissingField("Version"))]
    #[case("Package: foo\nVersion: x:1\nArchitecture: all\n", ErrorKind::InvalidVersion("x:1".to_string()))]
    fn rejects_incomplete_control(#[case] control: &str, #[case] expected: ErrorKind) {
        let dir = TempDir::new().unwrap();
        let path = fixture::write_deb(dir.path(), "broken.deb", control).unwrap();
        let err = read(&path, DEFAULT_CHUNK_SIZE).unwrap_err();
        assert_eq!(*err, expected);
    }

    #[test]
    fn missing_file_is_io() {
        let dir = TempDir::new().unwrap();
        let err = read(dir.path().join("absent.deb"), DEFAULT_CHUNK_SIZE).unwrap_err();
        assert_eq!(*err, ErrorKind::Io);
    }
}
