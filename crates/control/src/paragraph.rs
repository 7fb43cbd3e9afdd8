use std::fmt::{Display, Formatter, Result as FmtResult};

/// An ordered set of `Key: value` fields.
///
/// Field names are matched ASCII case-insensitively but keep the spelling
/// they were first inserted with. Multi-line values are stored with their
/// lines joined by `\n`; the first line may be empty, as in manifest digest
/// lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paragraph {
    fields: Vec<(String, String)>,
}

impl Paragraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.fields[i].1.as_str())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Set a field, overwriting an existing value in place or appending a new
    /// field at the end. Returns the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.fields[i].1, value)),
            None => {
                self.fields.push((key, value));
                None
            },
        }
    }

    /// Like [`set`](Self::set), but an existing field also takes `key`'s
    /// spelling, so `MD5sum` becomes `MD5Sum`.
    pub fn replace(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => {
                let (_, previous) = std::mem::replace(&mut self.fields[i], (key, value));
                Some(previous)
            },
            None => {
                self.fields.push((key, value));
                None
            },
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|i| self.fields.remove(i).1)
    }

    /// Fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn push(&mut self, key: String, value: String) {
        self.fields.push((key, value));
    }

    pub(crate) fn last_value_mut(&mut self) -> Option<&mut String> {
        self.fields.last_mut().map(|(_, v)| v)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Paragraph {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut paragraph = Paragraph::new();
        for (key, value) in iter {
            paragraph.set(key, value);
        }
        paragraph
    }
}

impl Display for Paragraph {
    /// Every field line (including the last) ends with `\n`; no blank
    /// separator line is written.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (key, value) in &self.fields {
            let mut lines = value.split('\n');
            match lines.next() {
                Some(first) if !first.is_empty() => writeln!(f, "{key}: {first}")?,
                _ => writeln!(f, "{key}:")?,
            }
            for line in lines {
                match line.is_empty() {
                    true => writeln!(f, " .")?,
                    false => writeln!(f, " {line}")?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Paragraph {
        [("Package", "hello"), ("Version", "2.10-3"), ("Architecture", "amd64")].into_iter().collect()
    }

    #[test]
    fn get_is_case_insensitive() {
        let paragraph = sample();
        assert_eq!(paragraph.get("VERSION"), Some("2.10-3"));
        assert_eq!(paragraph.get("Depends"), None);
        assert!(paragraph.contains("architecture"));
    }

    #[test]
    fn replace_renames_in_place() {
        let mut paragraph: Paragraph = [("Package", "hello"), ("MD5sum", "abc"), ("Size", "1")].into_iter().collect();
        assert_eq!(paragraph.replace("MD5Sum", "def"), Some("abc".to_string()));
        assert_eq!(paragraph.replace("Filename", "debs/hello.deb"), None);
        let fields: Vec<_> = paragraph.iter().collect();
        assert_eq!(fields, [("Package", "hello"), ("MD5Sum", "def"), ("Size", "1"), ("Filename", "debs/hello.deb")]);
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut paragraph = sample();
        assert_eq!(paragraph.set("version", "2.10-4"), Some("2.10-3".to_string()));
        assert_eq!(paragraph.set("Size", "10"), None);
        let keys: Vec<_> = paragraph.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Package", "Version", "Architecture", "Size"]);
        assert_eq!(paragraph.get("Version"), Some("2.10-4"));
    }

    #[test]
    fn remove_drops_the_field() {
        let mut paragraph = sample();
        assert_eq!(paragraph.remove("package"), Some("hello".to_string()));
        assert_eq!(paragraph.len(), 2);
        assert_eq!(paragraph.remove("package"), None);
    }

    #[test]
    fn display_folds_multi_line_values() {
        let mut paragraph = Paragraph::new();
        paragraph.set("Description", "short\nlong text\n\nmore");
        paragraph.set("MD5Sum", "\nabc 10 Packages.gz");
        paragraph.set("Empty", "");
        assert_eq!(
            paragraph.to_string(),
            "Description: short\n long text\n .\n more\nMD5Sum:\n abc 10 Packages.gz\nEmpty:\n"
        );
    }
}
