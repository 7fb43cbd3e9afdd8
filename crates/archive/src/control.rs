use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use shelf_compress::Compression;
use shelf_control::Paragraph;
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Component, Path};

const CONTROL_MEMBER: &str = "control.tar";

/// Extract and parse the `control` file from a package archive stream.
///
/// The control member may be a plain tarball or compressed with any format
/// [`Compression`] supports; the format is taken from the member name.
pub fn read_control<R: Read>(reader: R) -> Result<Paragraph> {
    let mut archive = ar::Archive::new(reader);
    while let Some(entry) = archive.next_entry() {
        let entry = entry.or_raise(|| ErrorKind::NotAnArchive)?;
        let name = String::from_utf8_lossy(entry.header().identifier()).trim_end_matches('/').to_string();
        if !name.starts_with(CONTROL_MEMBER) {
            continue;
        }
        let compression = Compression::from_path(&name);
        if compression == Compression::None && name != CONTROL_MEMBER {
            exn::bail!(ErrorKind::UnsupportedMember(name));
        }
        tracing::trace!(member = %name, %compression, "found control member");
        return control_from_tarball(compression.wrap_reader(entry));
    }
    exn::bail!(ErrorKind::MissingMember(CONTROL_MEMBER))
}

fn control_from_tarball(reader: impl Read) -> Result<Paragraph> {
    let mut tarball = tar::Archive::new(reader);
    for entry in tarball.entries().or_raise(|| ErrorKind::Control)? {
        let mut entry = entry.or_raise(|| ErrorKind::Control)?;
        if !is_control_file(&entry.path().or_raise(|| ErrorKind::Control)?) {
            continue;
        }
        let mut text = String::new();
        entry.read_to_string(&mut text).or_raise(|| ErrorKind::Control)?;
        return text.parse::<Paragraph>().or_raise(|| ErrorKind::Control);
    }
    exn::bail!(ErrorKind::MissingControl)
}

/// `control` or `./control`, but not `foo/control`.
fn is_control_file(path: &Path) -> bool {
    let mut components = path.components().filter(|c| !matches!(c, Component::CurDir));
    matches!(components.next(), Some(Component::Normal(name)) if name == OsStr::new("control"))
        && components.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;
    use rstest::rstest;
    use std::io::Cursor;

    const CONTROL: &str = "Package: foo\nVersion: 1.0\nArchitecture: all\n";

    #[rstest]
    #[case(Compression::None)]
    #[case(Compression::Gzip)]
    #[case(Compression::Bzip2)]
    #[case(Compression::Xz)]
    fn reads_control_with_any_member_compression(#[case] compression: Compression) {
        let deb = fixture::build_deb_with(CONTROL, compression).unwrap();
        let control = read_control(Cursor::new(deb)).unwrap();
        assert_eq!(control.get("Package"), Some("foo"));
        assert_eq!(control.len(), 3);
    }

    #[rstest]
    #[case("control", true)]
    #[case("./control", true)]
    #[case("./postinst", false)]
    #[case("./usr/control", false)]
    fn control_file_paths(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_control_file(Path::new(path)), expected);
    }

    #[test]
    fn rejects_non_archives() {
        let err = read_control(Cursor::new(b"Package: foo\n".to_vec())).unwrap_err();
        assert_eq!(*err, ErrorKind::NotAnArchive);
    }

    #[test]
    fn requires_a_control_member() {
        let deb = fixture::build_ar(&[("debian-binary", b"2.0\n".to_vec())]).unwrap();
        let err = read_control(Cursor::new(deb)).unwrap_err();
        assert_eq!(*err, ErrorKind::MissingMember("control.tar"));
    }

    #[test]
    fn rejects_unknown_member_compression() {
        let deb = fixture::build_ar(&[("control.tar.zst", vec![0x28, 0xB5, 0x2F, 0xFD])]).unwrap();
        let err = read_control(Cursor::new(deb)).unwrap_err();
        assert_eq!(*err, ErrorKind::UnsupportedMember("control.tar.zst".to_string()));
    }

    #[test]
    fn requires_a_control_file() {
        let tarball = fixture::build_tar(&[("./postinst", b"#!/bin/sh\n".as_slice())]).unwrap();
        let deb = fixture::build_ar(&[("control.tar", tarball)]).unwrap();
        let err = read_control(Cursor::new(deb)).unwrap_err();
        assert_eq!(*err, ErrorKind::MissingControl);
    }
}
