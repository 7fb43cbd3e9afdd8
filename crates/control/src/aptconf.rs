//! Release fields kept in APT FTPArchive configuration syntax.
//!
//! Some repository templates keep the manifest's descriptive fields in an
//! `apt-ftparchive` configuration file rather than in the manifest itself:
//!
//! ```text
//! APT {
//! FTPArchive {
//! Release {
//! Origin "Example Repo";
//! Label Example;
//! };
//! };
//! };
//! ```
//!
//! Only the `Key value;` declarations matter; block delimiters are ignored.

use crate::Paragraph;
use crate::error::{ErrorKind, Result};

/// Read every `Key value;` declaration into a paragraph, in order.
///
/// Surrounding double quotes are removed from values.
pub fn parse(text: &str) -> Result<Paragraph> {
    let mut paragraph = Paragraph::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") || line.ends_with('{') || line.starts_with('}') {
            continue;
        }
        let Some(declaration) = line.strip_suffix(';') else {
            exn::bail!(ErrorKind::Declaration(index + 1));
        };
        let Some((key, value)) = declaration.split_once(char::is_whitespace) else {
            exn::bail!(ErrorKind::Declaration(index + 1));
        };
        let value = value.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') || value.is_empty() {
            exn::bail!(ErrorKind::Declaration(index + 1));
        }
        let value = match value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            true => &value[1..value.len() - 1],
            false => value,
        };
        paragraph.set(key, value);
    }
    tracing::debug!(fields = paragraph.len(), "parsed apt.conf release fields");
    Ok(paragraph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const CONF: &str = r#"APT {
    FTPArchive {
        Release {
            Origin "Example Repo";
            Label Example;
            Architectures iphoneos-arm;
            Description "A repository of examples";
        };
    };
};
"#;

    #[test]
    fn parses_declarations_in_order() {
        let paragraph = parse(CONF).unwrap();
        let fields: Vec<_> = paragraph.iter().collect();
        assert_eq!(
            fields,
            [
                ("Origin", "Example Repo"),
                ("Label", "Example"),
                ("Architectures", "iphoneos-arm"),
                ("Description", "A repository of examples"),
            ]
        );
    }

    #[rstest]
    #[case("Origin Example\n", 1)]
    #[case("APT {\n  Origin;\n};\n", 2)]
    #[case("Bad/Key value;\n", 1)]
    fn malformed_declarations(#[case] text: &str, #[case] line: usize) {
        let err = parse(text).unwrap_err();
        assert_eq!(*err, ErrorKind::Declaration(line));
    }
}
