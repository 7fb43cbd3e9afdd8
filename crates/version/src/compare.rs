//! The version ordering algorithm.
//!
//! A segment (upstream or revision) is walked as alternating runs of
//! non-digits and digits, always starting with a (possibly empty) non-digit
//! run. Non-digit runs are compared character by character where `~` sorts
//! before the end of the run, the end of the run sorts before anything else,
//! and letters sort before every other character. Digit runs are compared as
//! integers of unbounded size.

use std::cmp::Ordering;

/// Sort weight of one character of a non-digit run (`None` is end-of-run).
fn weight(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(b'~') => -1,
        Some(c) if c.is_ascii_alphabetic() => i32::from(c),
        Some(c) => i32::from(c) + 256,
    }
}

fn split_run(s: &[u8], digits: bool) -> (&[u8], &[u8]) {
    let end = s.iter().position(|c| c.is_ascii_digit() != digits).unwrap_or(s.len());
    s.split_at(end)
}

fn compare_lexical(a: &[u8], b: &[u8]) -> Ordering {
    (0..a.len().max(b.len()))
        .map(|i| weight(a.get(i).copied()).cmp(&weight(b.get(i).copied())))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Compare two runs of ASCII digits as integers. Empty runs are zero.
pub(crate) fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let trim = |s: &[u8]| -> usize { s.iter().position(|c| *c != b'0').unwrap_or(s.len()) };
    let (a, b) = (&a[trim(a)..], &b[trim(b)..]);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compare two upstream (or two revision) segments.
pub fn compare_segments(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());
    while !a.is_empty() || !b.is_empty() {
        let (a_text, a_rest) = split_run(a, false);
        let (b_text, b_rest) = split_run(b, false);
        let ordering = compare_lexical(a_text, b_text);
        if ordering.is_ne() {
            return ordering;
        }
        let (a_num, a_rest) = split_run(a_rest, true);
        let (b_num, b_rest) = split_run(b_rest, true);
        let ordering = compare_numeric(a_num, b_num);
        if ordering.is_ne() {
            return ordering;
        }
        (a, b) = (a_rest, b_rest);
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "", Ordering::Equal)]
    #[case("0", "", Ordering::Equal)]
    #[case("007", "7", Ordering::Equal)]
    #[case("9", "10", Ordering::Less)]
    #[case("99999999999999999999999999", "100000000000000000000000000", Ordering::Less)]
    fn numeric_runs(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare_numeric(a.as_bytes(), b.as_bytes()), expected);
        assert_eq!(compare_numeric(b.as_bytes(), a.as_bytes()), expected.reverse());
    }

    #[rstest]
    #[case("1.0~rc1", "1.0", Ordering::Less)]
    #[case("1.0~~", "1.0~", Ordering::Less)]
    #[case("1.0", "1.0a", Ordering::Less)]
    #[case("1.0a", "1.0+", Ordering::Less)]
    #[case("1.0+", "1.0.", Ordering::Less)]
    #[case("a", "b", Ordering::Less)]
    #[case("1.01", "1.1", Ordering::Equal)]
    #[case("2.10", "2.9", Ordering::Greater)]
    #[case("1", "1.0", Ordering::Less)]
    fn segments(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare_segments(a, b), expected);
        assert_eq!(compare_segments(b, a), expected.reverse());
    }
}
