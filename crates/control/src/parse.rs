use crate::Paragraph;
use crate::error::{Error, ErrorKind, Result};
use std::str::FromStr;

/// Parse blank-line separated paragraphs.
///
/// Lines starting with `#` are comments. A continuation line (leading space
/// or tab) extends the previous field's value; a continuation of just `.`
/// stands for an empty line.
pub fn parse_paragraphs(text: &str) -> Result<Vec<Paragraph>> {
    Ok(parse_numbered(text)?.into_iter().map(|(_, paragraph)| paragraph).collect())
}

/// Paragraphs paired with the line number each one starts on.
fn parse_numbered(text: &str) -> Result<Vec<(usize, Paragraph)>> {
    let mut paragraphs = Vec::new();
    let mut current = Paragraph::new();
    let mut start = 1;
    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.starts_with('#') {
            continue;
        }
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push((start, std::mem::take(&mut current)));
            }
            continue;
        }
        if line.starts_with([' ', '\t']) {
            let Some(value) = current.last_value_mut() else {
                exn::bail!(ErrorKind::OrphanContinuation(number));
            };
            let content = &line[1..];
            value.push('\n');
            if content.trim() != "." {
                value.push_str(content);
            }
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            exn::bail!(ErrorKind::MissingColon(number));
        };
        let key = key.trim();
        if key.is_empty() {
            exn::bail!(ErrorKind::EmptyKey(number));
        }
        if current.is_empty() {
            start = number;
        }
        current.push(key.to_string(), value.trim().to_string());
    }
    if !current.is_empty() {
        paragraphs.push((start, current));
    }
    Ok(paragraphs)
}

impl FromStr for Paragraph {
    type Err = Error;

    /// Parse exactly one paragraph. Empty input yields an empty paragraph.
    fn from_str(s: &str) -> Result<Self> {
        let mut paragraphs = parse_numbered(s)?.into_iter();
        let first = paragraphs.next().map(|(_, paragraph)| paragraph).unwrap_or_default();
        if let Some((line, _)) = paragraphs.next() {
            exn::bail!(ErrorKind::MultipleParagraphs(line));
        }
        Ok(first)
    }
}
