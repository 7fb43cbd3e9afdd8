//! Compression and decompression for repository index artifacts.
//!
//! This crate wraps several compression libraries behind a unified
//! [`Compression`] enum, providing:
//!
//! - **Format detection** from file extensions ([`Compression::from_path`])
//! - **In-memory** compression/decompression ([`Compression::compress`],
//!   [`Compression::decompress`])
//! - **Streaming** decompression via a wrapped reader
//!   ([`Compression::wrap_reader`])
//! - A [`Registry`] mapping each format to a [`Codec`], owned by whoever
//!   builds indexes so that tests can swap in their own codecs.
//!
//! Bzip2 and Gzip are always available. XZ is behind the (default) `xz`
//! feature.
//!
//! Output is deterministic: compressing the same bytes twice yields the same
//! bytes, which keeps published index digests stable between rebuilds.

mod construct;
pub mod error;
mod ops;
mod registry;
#[cfg(feature = "serde")]
mod serialize;
mod util;

pub use crate::registry::{Codec, Registry};

/// A supported compression format.
///
/// Defaults to [`None`](Self::None) (uncompressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// Gzip compression (.gz)
    Gzip,
    /// XZ/LZMA compression (.xz)
    #[cfg(feature = "xz")]
    Xz,
}

impl Compression {
    /// Every compiled-in format, in the order existing indexes are probed for.
    pub const ALL: &'static [Compression] = &[
        Compression::Gzip,
        Compression::Bzip2,
        #[cfg(feature = "xz")]
        Compression::Xz,
        Compression::None,
    ];
}
