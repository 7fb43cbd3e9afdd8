//! Compression Operations

use crate::Compression;
use crate::error::{ErrorKind, Result};
use bzip2::{Compression as BzCompression, read::BzDecoder, write::BzEncoder};
use exn::ResultExt;
use flate2::{Compression as GzCompression, read::GzDecoder, write::GzEncoder};
use std::io::{Read, Write};
use tracing::instrument;
#[cfg(feature = "xz")]
use xz2::{read::XzDecoder, write::XzEncoder};

// Highest level each format offers.
const BZIP2_LEVEL: BzCompression = BzCompression::best();
const GZIP_LEVEL: GzCompression = GzCompression::best();
#[cfg(feature = "xz")]
const XZ_LEVEL: u32 = 9;

impl Compression {
    /// Compress a byte slice in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf_compress::Compression;
    ///
    /// let data = b"Package: hello\nVersion: 1.0\n";
    /// let compressed = Compression::Gzip.compress(data).unwrap();
    /// assert!(compressed.starts_with(&[0x1F, 0x8B]));
    /// ```
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.compress_into(input, &mut output)?;
        Ok(output)
    }

    /// Decompress a byte slice in memory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shelf_compress::Compression;
    ///
    /// let original = b"Package: hello\n";
    /// let compressed = Compression::Bzip2.compress(original).unwrap();
    /// assert_ne!(compressed, original);
    /// let decompressed = Compression::Bzip2.decompress(&compressed).unwrap();
    /// assert_eq!(decompressed, original);
    /// ```
    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.decompress_into(input, &mut output)?;
        Ok(output)
    }

    #[instrument(skip(input, output), fields(
        format = %self,
        input_size = input.len(),
        output_size
    ))]
    pub fn compress_into(&self, input: &[u8], output: &mut Vec<u8>) -> Result<usize> {
        let start = output.len();
        match self {
            Compression::None => output.extend_from_slice(input),
            Compression::Bzip2 => {
                let mut encoder = BzEncoder::new(&mut *output, BZIP2_LEVEL);
                encoder.write_all(input).or_raise(|| ErrorKind::Io)?;
                encoder.finish().or_raise(|| ErrorKind::Io)?;
            },
            Compression::Gzip => {
                // GzEncoder::new leaves the header mtime at zero, keeping
                // output identical across runs.
                let mut encoder = GzEncoder::new(&mut *output, GZIP_LEVEL);
                encoder.write_all(input).or_raise(|| ErrorKind::Io)?;
                encoder.finish().or_raise(|| ErrorKind::Io)?;
            },
            #[cfg(feature = "xz")]
            Compression::Xz => {
                let mut encoder = XzEncoder::new(&mut *output, XZ_LEVEL);
                encoder.write_all(input).or_raise(|| ErrorKind::Io)?;
                encoder.finish().or_raise(|| ErrorKind::Io)?;
            },
        }
        let size = output.len() - start;
        tracing::Span::current().record("output_size", size);
        Ok(size)
    }

    #[instrument(skip(input, output), fields(
        format = %self,
        input_size = input.len(),
        output_size
    ))]
    pub fn decompress_into(&self, input: &[u8], output: &mut Vec<u8>) -> Result<usize> {
        let size = match self {
            Compression::None => {
                output.extend_from_slice(input);
                input.len()
            },
            Compression::Bzip2 => BzDecoder::new(input).read_to_end(output).or_raise(|| ErrorKind::InvalidData)?,
            Compression::Gzip => GzDecoder::new(input).read_to_end(output).or_raise(|| ErrorKind::InvalidData)?,
            #[cfg(feature = "xz")]
            Compression::Xz => XzDecoder::new(input).read_to_end(output).or_raise(|| ErrorKind::InvalidData)?,
        };
        tracing::Span::current().record("output_size", size);
        Ok(size)
    }

    /// Wrap a reader with the appropriate decompression layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::{Cursor, Read};
    /// use shelf_compress::Compression;
    ///
    /// let compressed = Compression::Gzip.compress(b"Package: hello\n").unwrap();
    /// let mut reader = Compression::Gzip.wrap_reader(Cursor::new(compressed));
    /// let mut text = String::new();
    /// reader.read_to_string(&mut text).unwrap();
    /// assert_eq!(text, "Package: hello\n");
    /// ```
    pub fn wrap_reader<'a, R: Read + 'a>(&self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Compression::None => Box::new(reader),
            Compression::Bzip2 => Box::new(BzDecoder::new(reader)),
            Compression::Gzip => Box::new(GzDecoder::new(reader)),
            #[cfg(feature = "xz")]
            Compression::Xz => Box::new(XzDecoder::new(reader)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Compression;
    use rstest::rstest;

    const PARAGRAPH: &[u8] = b"Package: hello\nVersion: 2.10-3\nArchitecture: amd64\n\n";

    #[rstest]
    #[case(Compression::None, b"Package")]
    #[case(Compression::Bzip2, b"BZh")]
    #[case(Compression::Gzip, &[0x1F, 0x8B])]
    #[cfg_attr(feature = "xz", case(Compression::Xz, &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00]))]
    fn compressed_output_has_format_header(#[case] format: Compression, #[case] header: &[u8]) {
        let compressed = format.compress(PARAGRAPH).unwrap();
        assert!(compressed.starts_with(header));
        assert_eq!(format.decompress(&compressed).unwrap(), PARAGRAPH);
    }

    #[rstest]
    #[case(Compression::Bzip2)]
    #[case(Compression::Gzip)]
    #[cfg_attr(feature = "xz", case(Compression::Xz))]
    fn compression_is_deterministic(#[case] format: Compression) {
        assert_eq!(format.compress(PARAGRAPH).unwrap(), format.compress(PARAGRAPH).unwrap());
    }

    #[test]
    fn compress_into_reports_only_appended_bytes() {
        let mut output = b"prefix".to_vec();
        let size = Compression::None.compress_into(PARAGRAPH, &mut output).unwrap();
        assert_eq!(size, PARAGRAPH.len());
        assert_eq!(output.len(), 6 + PARAGRAPH.len());
    }

    #[test]
    fn decompress_rejects_garbage() {
        assert!(Compression::Gzip.decompress(b"definitely not gzip").is_err());
    }
}
