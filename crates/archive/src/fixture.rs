//! Minimal, reproducible package archives for tests.
//!
//! Every header timestamp is zero, so building the same archive twice yields
//! identical bytes (and identical digests).

use shelf_compress::Compression;
use std::fs;
use std::io::{self, Error as IoError};
use std::path::{Path, PathBuf};

/// Build an `ar` container from `(identifier, contents)` members.
pub fn build_ar(members: &[(&str, Vec<u8>)]) -> io::Result<Vec<u8>> {
    let mut builder = ar::Builder::new(Vec::new());
    for (identifier, contents) in members {
        let mut header = ar::Header::new(identifier.as_bytes().to_vec(), contents.len() as u64);
        header.set_mode(0o644);
        builder.append(&header, contents.as_slice())?;
    }
    builder.into_inner()
}

/// Build an uncompressed tarball from `(path, contents)` files.
pub fn build_tar(files: &[(&str, &[u8])]) -> io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        builder.append_data(&mut header, path, *contents)?;
    }
    builder.into_inner()
}

/// Build a package archive whose control tarball is compressed with
/// `compression`.
pub fn build_deb_with(control: &str, compression: Compression) -> io::Result<Vec<u8>> {
    let compress = |bytes: &[u8]| compression.compress(bytes).map_err(|err| IoError::other((*err).clone()));
    let control_tar = compress(&build_tar(&[("./control", control.as_bytes())])?)?;
    let data_tar = compress(&build_tar(&[])?)?;
    let control_name = compression.file_name("control.tar");
    let data_name = compression.file_name("data.tar");
    build_ar(&[
        ("debian-binary", b"2.0\n".to_vec()),
        (control_name.as_str(), control_tar),
        (data_name.as_str(), data_tar),
    ])
}

/// Build a package archive with a gzip-compressed control tarball.
pub fn build_deb(control: &str) -> io::Result<Vec<u8>> {
    build_deb_with(control, Compression::Gzip)
}

/// Write [`build_deb`] output to `dir/file_name`, returning the path.
pub fn write_deb(dir: impl AsRef<Path>, file_name: &str, control: &str) -> io::Result<PathBuf> {
    let path = dir.as_ref().join(file_name);
    fs::write(&path, build_deb(control)?)?;
    Ok(path)
}
