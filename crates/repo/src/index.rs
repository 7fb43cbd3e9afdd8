//! Package index text, and finding existing index files.

use crate::error::{ErrorKind, Result};
use crate::tree::PackageTree;
use exn::{OptionExt, ResultExt};
use shelf_archive::PackageRecord;
use shelf_compress::{Compression, Registry};
use shelf_control::{Paragraph, parse_paragraphs};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Rendered index text and what went into it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Index {
    pub text: String,
    pub packages: usize,
    pub paragraphs: usize,
}

/// The index paragraph for one archive: its control fields with the
/// location, size and digests of the archive file set.
#[must_use]
pub fn paragraph(record: &PackageRecord, root: &Path) -> Paragraph {
    let mut paragraph = record.control().clone();
    let filename = record.path().strip_prefix(root).unwrap_or(record.path());
    paragraph.replace("Filename", filename.to_string_lossy());
    paragraph.replace("Size", record.size().to_string());
    for (kind, digest) in record.digests().iter() {
        paragraph.replace(kind.field_name(), digest);
    }
    paragraph
}

/// Render every selected record: packages by name, each newest first.
#[instrument(skip_all, fields(multiversion = multiversion, paragraphs))]
pub fn render(tree: &PackageTree, root: &Path, multiversion: bool) -> Index {
    let mut index = Index::default();
    for name in tree.names() {
        index.packages += 1;
        for record in tree.selected_versions(name, multiversion) {
            index.text.push_str(&format!("{}\n", paragraph(record, root)));
            index.paragraphs += 1;
        }
    }
    tracing::Span::current().record("paragraphs", index.paragraphs);
    index
}

/// Find `<name><ext>` in `dir`, trying each registered format in registry
/// order. Only existence is checked.
#[must_use]
pub fn locate_index(dir: &Path, name: &str, registry: &Registry) -> Option<(PathBuf, Compression)> {
    registry
        .formats()
        .map(|format| (dir.join(format.file_name(name)), format))
        .find(|(path, _)| path.is_file())
}

/// Read and parse the first index [`locate_index`] finds.
#[instrument(skip(dir, registry), fields(dir = %dir.display(), format))]
pub fn read_index(dir: &Path, name: &str, registry: &Registry) -> Result<Vec<Paragraph>> {
    let (path, format) = locate_index(dir, name, registry).ok_or_raise(|| ErrorKind::NotFound(dir.join(name)))?;
    tracing::Span::current().record("format", format.as_str());
    let bytes = std::fs::read(&path).or_raise(|| ErrorKind::Io(path.clone()))?;
    let codec = registry.get(format).ok_or_raise(|| ErrorKind::Configuration)?;
    let bytes = codec.decompress(&bytes).or_raise(|| ErrorKind::Compression(format))?;
    let text = String::from_utf8(bytes).or_raise(|| ErrorKind::Malformed(path.clone()))?;
    parse_paragraphs(&text).or_raise(|| ErrorKind::Malformed(path.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shelf_digest::Digests;
    use tempfile::TempDir;

    fn record(name: &str, version: &str, path: &str) -> PackageRecord {
        let control: Paragraph = [
            ("Package", name),
            ("Version", version),
            ("Architecture", "all"),
            ("Size", "stale"),
            ("Description", "test package\nsecond line"),
        ]
        .into_iter()
        .collect();
        PackageRecord::new(control, path, 4, Digests::of_bytes(b"data")).unwrap()
    }

    #[test]
    fn paragraph_fields_follow_control_fields() {
        let record = record("foo", "1.0", "/repo/debs/foo_1.0_all.deb");
        let paragraph = paragraph(&record, Path::new("/repo"));
        let keys: Vec<_> = paragraph.iter().map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            ["Package", "Version", "Architecture", "Size", "Description", "Filename", "MD5Sum", "SHA1", "SHA256", "SHA512"]
        );
        assert_eq!(paragraph.get("Filename"), Some("debs/foo_1.0_all.deb"));
        assert_eq!(paragraph.get("Size"), Some("4"));
        assert_eq!(paragraph.get("MD5Sum"), Some("8d777f385d3dfec8815d20f7496026dc"));
    }

    #[test]
    fn digest_fields_take_canonical_names() {
        let control: Paragraph =
            [("Package", "foo"), ("Version", "1.0"), ("Architecture", "all"), ("MD5sum", "stale"), ("filename", "old.deb")]
                .into_iter()
                .collect();
        let record = PackageRecord::new(control, "/repo/debs/foo.deb", 4, Digests::of_bytes(b"data")).unwrap();
        let text = paragraph(&record, Path::new("/repo")).to_string();
        assert!(text.contains("MD5Sum: 8d777f385d3dfec8815d20f7496026dc\n"));
        assert!(text.contains("Filename: debs/foo.deb\n"));
        assert!(!text.contains("MD5sum"));
        assert!(!text.contains("filename"));
    }

    #[test]
    fn renders_names_ascending_versions_descending() {
        let mut tree = PackageTree::new();
        tree.insert(record("zed", "1.0", "/repo/debs/zed.deb"));
        tree.insert(record("pkg", "1.0", "/repo/debs/pkg_1.deb"));
        tree.insert(record("pkg", "2.0", "/repo/debs/pkg_2.deb"));
        let index = render(&tree, Path::new("/repo"), true);
        assert_eq!(index.packages, 2);
        assert_eq!(index.paragraphs, 3);
        let parsed = parse_paragraphs(&index.text).unwrap();
        let order: Vec<_> = parsed.iter().map(|p| (p.get("Package").unwrap(), p.get("Version").unwrap())).collect();
        assert_eq!(order, [("pkg", "2.0"), ("pkg", "1.0"), ("zed", "1.0")]);
        assert_eq!(parsed[0].get("Description"), Some("test package\nsecond line"));
        assert!(index.text.ends_with("\n\n"));
    }

    #[test]
    fn empty_tree_renders_nothing() {
        let index = render(&PackageTree::new(), Path::new("/repo"), false);
        assert_eq!(index, Index::default());
    }

    #[rstest]
    #[case(&["Packages", "Packages.xz"], Some(Compression::Xz))]
    #[case(&["Packages.bz2", "Packages.xz"], Some(Compression::Bzip2))]
    #[case(&["Packages.gz", "Packages.bz2"], Some(Compression::Gzip))]
    #[case(&["Packages"], Some(Compression::None))]
    #[case(&["Packages.zst", "Release"], None)]
    fn locates_in_registry_order(#[case] files: &[&str], #[case] expected: Option<Compression>) {
        let dir = TempDir::new().unwrap();
        for file in files {
            std::fs::write(dir.path().join(file), b"").unwrap();
        }
        let found = locate_index(dir.path(), "Packages", &Registry::builtin());
        assert_eq!(found.as_ref().map(|(_, format)| *format), expected);
        if let Some((path, format)) = found {
            assert_eq!(path, dir.path().join(format.file_name("Packages")));
        }
    }

    #[test]
    fn locate_skips_unregistered_formats() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Packages.gz"), b"").unwrap();
        let mut registry = Registry::empty();
        registry.register(Compression::Xz, Box::new(Compression::Xz));
        assert!(locate_index(dir.path(), "Packages", &registry).is_none());
    }

    #[test]
    fn reads_compressed_index() {
        let dir = TempDir::new().unwrap();
        let text = "Package: foo\nVersion: 1.0\n\nPackage: bar\nVersion: 2.0\n\n";
        std::fs::write(dir.path().join("Packages.bz2"), Compression::Bzip2.compress(text.as_bytes()).unwrap()).unwrap();
        let paragraphs = read_index(dir.path(), "Packages", &Registry::builtin()).unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[1].get("Package"), Some("bar"));
    }

    #[test]
    fn read_missing_index_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_index(dir.path(), "Packages", &Registry::builtin()).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(dir.path().join("Packages")));
    }

    #[test]
    fn read_corrupt_index() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Packages.gz"), b"not gzip").unwrap();
        let err = read_index(dir.path(), "Packages", &Registry::builtin()).unwrap_err();
        assert_eq!(*err, ErrorKind::Compression(Compression::Gzip));
    }
}
