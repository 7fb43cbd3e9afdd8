//! Content digests for repository artifacts.
//!
//! Every artifact in a repository is described by the same four digests
//! (MD5, SHA1, SHA256, SHA512) because different consumers only trust
//! different subsets of them. [`digest_file`] computes all four in one pass
//! over the file; either all four are returned or an error is.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io::{ErrorKind as IoErrorKind, Read};
use std::path::Path;
use tracing::instrument;

/// Default number of bytes fed to the hashers per read.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// One of the fixed set of digest algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DigestKind {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl DigestKind {
    /// All kinds, in the order they are written to indexes and manifests.
    pub const ALL: [DigestKind; 4] = [DigestKind::Md5, DigestKind::Sha1, DigestKind::Sha256, DigestKind::Sha512];

    /// The paragraph field name carrying this digest (`MD5Sum`, `SHA1`, ...).
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            DigestKind::Md5 => "MD5Sum",
            DigestKind::Sha1 => "SHA1",
            DigestKind::Sha256 => "SHA256",
            DigestKind::Sha512 => "SHA512",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Display for DigestKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.field_name())
    }
}

/// Lowercase hex digests of one piece of content, one per [`DigestKind`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Digests {
    values: [String; 4],
}

impl Digests {
    #[must_use]
    pub fn get(&self, kind: DigestKind) -> &str {
        &self.values[kind.index()]
    }

    /// `(kind, hex)` pairs in [`DigestKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (DigestKind, &str)> {
        DigestKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Digest an in-memory buffer.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Hasher::default();
        hasher.update(bytes);
        hasher.finalize()
    }
}

/// The size and digests of a file, gathered in the same pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Measured {
    pub size: u64,
    pub digests: Digests,
}

#[derive(Default)]
struct Hasher {
    md5: Md5,
    sha1: Sha1,
    sha256: Sha256,
    sha512: Sha512,
    size: u64,
}

impl Hasher {
    fn update(&mut self, chunk: &[u8]) {
        self.md5.update(chunk);
        self.sha1.update(chunk);
        self.sha256.update(chunk);
        self.sha512.update(chunk);
        self.size += chunk.len() as u64;
    }

    fn finalize(self) -> Digests {
        Digests {
            values: [
                hex::encode(self.md5.finalize()),
                hex::encode(self.sha1.finalize()),
                hex::encode(self.sha256.finalize()),
                hex::encode(self.sha512.finalize()),
            ],
        }
    }
}

/// Stream `path` in `chunk_size` reads and return its size and digests.
#[instrument(skip(path), fields(path = %path.as_ref().display(), size))]
pub fn measure_file(path: impl AsRef<Path>, chunk_size: usize) -> Result<Measured> {
    let path = path.as_ref();
    if chunk_size == 0 {
        exn::bail!(ErrorKind::ChunkSize);
    }
    let mut file = File::open(path).or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
    let mut buffer = vec![0; chunk_size];
    let mut hasher = Hasher::default();
    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == IoErrorKind::Interrupted => continue,
            Err(e) => return Err(e).or_raise(|| ErrorKind::Read(path.to_path_buf())),
        };
        hasher.update(&buffer[..read]);
    }
    let size = hasher.size;
    tracing::Span::current().record("size", size);
    Ok(Measured { size, digests: hasher.finalize() })
}

/// Stream `path` in `chunk_size` reads and return its four digests.
pub fn digest_file(path: impl AsRef<Path>, chunk_size: usize) -> Result<Digests> {
    measure_file(path, chunk_size).map(|measured| measured.digests)
}
