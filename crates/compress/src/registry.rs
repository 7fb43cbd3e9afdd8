//! Codec registry.
//!
//! A [`Registry`] maps each [`Compression`] format to the [`Codec`] that
//! implements it. Index builders own one, so the set of formats (and the
//! implementation behind each) is decided at construction instead of being
//! looked up globally.

use crate::Compression;
use crate::error::Result;
use std::fmt::{Debug, Formatter, Result as FmtResult};

/// A compress/decompress capability pair for one format.
pub trait Codec: Send + Sync {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

impl Codec for Compression {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Compression::compress(self, input)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Compression::decompress(self, input)
    }
}

/// Ordered mapping from [`Compression`] format to [`Codec`].
///
/// Registration order is significant: it is the order in which existing
/// index files are probed for.
#[derive(Default)]
pub struct Registry {
    codecs: Vec<(Compression, Box<dyn Codec>)>,
}

impl Registry {
    /// A registry with no codecs at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with the built-in codec for every compiled-in format, in
    /// [`Compression::ALL`] order.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for format in Compression::ALL {
            registry.register(*format, Box::new(*format));
        }
        registry
    }

    /// Register `codec` for `format`, returning the codec it replaced.
    ///
    /// Replacing keeps the format's original probe position; new formats are
    /// appended.
    pub fn register(&mut self, format: Compression, codec: Box<dyn Codec>) -> Option<Box<dyn Codec>> {
        match self.codecs.iter_mut().find(|(f, _)| *f == format) {
            Some((_, existing)) => Some(std::mem::replace(existing, codec)),
            None => {
                self.codecs.push((format, codec));
                None
            },
        }
    }

    #[must_use]
    pub fn get(&self, format: Compression) -> Option<&dyn Codec> {
        self.codecs.iter().find(|(f, _)| *f == format).map(|(_, codec)| &**codec)
    }

    #[must_use]
    pub fn contains(&self, format: Compression) -> bool {
        self.get(format).is_some()
    }

    /// Registered formats in probe order.
    pub fn formats(&self) -> impl Iterator<Item = Compression> + '_ {
        self.codecs.iter().map(|(format, _)| *format)
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_list().entries(self.formats()).finish()
    }
}
