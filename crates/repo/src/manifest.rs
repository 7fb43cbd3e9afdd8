//! The repository manifest (`Release`).
//!
//! The manifest is one paragraph of free-form fields maintained by the
//! repository owner, plus one multi-line field per [`DigestKind`] listing the
//! index artifacts of the latest build:
//!
//! ```text
//! Origin: Example
//! MD5Sum:
//!  d41d8cd98f00b204e9800998ecf8427e 20 Packages.gz
//! ```

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use shelf_control::{Paragraph, aptconf};
use shelf_digest::DigestKind;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::instrument;

#[derive(Clone, Debug)]
pub struct Manifest {
    path: PathBuf,
    fields: Paragraph,
}

impl Manifest {
    /// Load the manifest at `path`, which must already exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let fields = read_paragraph(path, |text| text.parse::<Paragraph>())?;
        tracing::debug!(fields = fields.len(), "loaded manifest");
        Ok(Self {
            path: path.to_path_buf(),
            fields,
        })
    }

    /// Overlay the release fields of an apt-ftparchive configuration file.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn seed_from_apt_conf(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let seeded = read_paragraph(path.as_ref(), aptconf::parse)?;
        for (key, value) in seeded.iter() {
            self.fields.set(key, value);
        }
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn fields(&self) -> &Paragraph {
        &self.fields
    }

    /// Empty every digest field, keeping the positions of those that exist.
    pub fn clear_digest_fields(&mut self) {
        for kind in DigestKind::ALL {
            self.fields.replace(kind.field_name(), "");
        }
    }

    /// Replace the artifact lines listed under `kind`.
    pub fn set_digest_lines(&mut self, kind: DigestKind, lines: &[String]) {
        let value: String = lines.iter().map(|line| format!("\n{line}")).collect();
        self.fields.replace(kind.field_name(), value);
    }

    /// The artifact lines listed under `kind`, empty lines skipped.
    #[must_use]
    pub fn digest_lines(&self, kind: DigestKind) -> Vec<&str> {
        self.fields
            .get(kind.field_name())
            .map(|value| value.lines().filter(|line| !line.trim().is_empty()).collect())
            .unwrap_or_default()
    }

    /// Atomically replace the manifest file with the current fields, keeping
    /// the permissions of the file being replaced.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn persist(&self) -> Result<()> {
        let io = || ErrorKind::Io(self.path.clone());
        let dir = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let mut file = NamedTempFile::new_in(dir).or_raise(io)?;
        file.write_all(self.fields.to_string().as_bytes()).or_raise(io)?;
        if let Ok(metadata) = std::fs::metadata(&self.path) {
            file.as_file().set_permissions(metadata.permissions()).or_raise(io)?;
        }
        file.as_file().sync_all().or_raise(io)?;
        file.persist(&self.path).or_raise(io)?;
        tracing::debug!("persisted manifest");
        Ok(())
    }
}

fn read_paragraph(
    path: &Path,
    parse: impl FnOnce(&str) -> shelf_control::error::Result<Paragraph>,
) -> Result<Paragraph> {
    if !path.is_file() {
        exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
    parse(&text).or_raise(|| ErrorKind::Malformed(path.to_path_buf()))
}
