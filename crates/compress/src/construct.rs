use crate::Compression;
use crate::error::{Error, ErrorKind};
use std::{path::Path, str::FromStr};

impl Compression {
    /// Names and file extensions (without the dot) this format answers to.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Compression::None => &["none"],
            Compression::Bzip2 => &["bzip2", "bz2"],
            Compression::Gzip => &["gzip", "gz"],
            #[cfg(feature = "xz")]
            Compression::Xz => &["xz", "lzma"],
        }
    }

    fn from_alias(alias: &str) -> Option<Self> {
        let alias = alias.to_ascii_lowercase();
        Compression::ALL.iter().copied().find(|format| format.aliases().contains(&alias.as_str()))
    }

    /// Detect compression from a file extension: `Packages.xz`,
    /// `control.tar.gz`.
    ///
    /// Unknown extensions (including `.tar`) are treated as uncompressed.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Compression::from_alias)
            .unwrap_or_default()
    }
}

impl FromStr for Compression {
    type Err = Error;

    /// Parse a configuration name or extension; a leading dot is allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('.');
        if let Some(format) = Compression::from_alias(name) {
            return Ok(format);
        }
        #[cfg(not(feature = "xz"))]
        if name.eq_ignore_ascii_case("xz") || name.eq_ignore_ascii_case("lzma") {
            exn::bail!(ErrorKind::DisabledFormat(s.to_string()));
        }
        exn::bail!(ErrorKind::UnsupportedFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::Compression;
    use crate::error::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case("none", Compression::None)]
    #[case("bzip2", Compression::Bzip2)]
    #[case("BZ2", Compression::Bzip2)]
    #[case("gzip", Compression::Gzip)]
    #[case(".gz", Compression::Gzip)]
    #[case(" gz ", Compression::Gzip)]
    #[cfg_attr(feature = "xz", case("xz", Compression::Xz))]
    #[cfg_attr(feature = "xz", case("lzma", Compression::Xz))]
    fn parses_names(#[case] name: &str, #[case] expected: Compression) {
        assert_eq!(name.parse::<Compression>().unwrap(), expected);
    }

    #[rstest]
    #[case("zstd")]
    #[case("tar")]
    #[case("")]
    fn rejects_unknown_names(#[case] name: &str) {
        let err = name.parse::<Compression>().unwrap_err();
        assert_eq!(*err, ErrorKind::UnsupportedFormat(name.to_string()));
    }

    #[rstest]
    #[case("Packages", Compression::None)]
    #[case("control.tar", Compression::None)]
    #[case("data.tar.zst", Compression::None)]
    // A bare `.gz` is a dotfile without an extension.
    #[case(".gz", Compression::None)]
    #[case("Packages.bz2", Compression::Bzip2)]
    #[case("control.tar.GZ", Compression::Gzip)]
    #[cfg_attr(feature = "xz", case("Packages.xz", Compression::Xz))]
    #[cfg_attr(feature = "xz", case("data.tar.lzma", Compression::Xz))]
    fn detects_from_path(#[case] path: &str, #[case] expected: Compression) {
        assert_eq!(Compression::from_path(path), expected);
    }
}
