//! Natural sort keys.
//!
//! Splits a string on digit runs into typed segments so that embedded
//! numbers compare numerically: "item2" sorts before "item10", where plain
//! lexical order would reverse them. Keys are derived on demand for sorting
//! and never persisted.

use std::cmp::Ordering;

/// One chunk of a sort key: either a parsed digit run or a case-folded
/// stretch of non-digit text.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    /// Digit runs order before text at the same position, which keeps
    /// "a2" < "a10" < "b" intact. Declared first so the derived Ord agrees.
    Number(u128),
    Text(String),
}

/// An ordered sequence of [`Segment`]s. Comparing two keys element-wise
/// yields human-expected ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NaturalKey {
    segments: Vec<Segment>,
}

impl NaturalKey {
    pub fn new(input: &str) -> Self {
        let mut segments = Vec::new();
        let mut buf = String::new();
        let mut in_digits = false;

        for c in input.chars() {
            if c.is_ascii_digit() != in_digits && !buf.is_empty() {
                segments.push(Self::flush(&mut buf, in_digits));
            }
            in_digits = c.is_ascii_digit();
            buf.push(c);
        }
        if !buf.is_empty() {
            segments.push(Self::flush(&mut buf, in_digits));
        }

        Self { segments }
    }

    /// Absent values sort as the empty string, before everything else.
    pub fn from_opt(input: Option<&str>) -> Self {
        Self::new(input.unwrap_or(""))
    }

    fn flush(buf: &mut String, in_digits: bool) -> Segment {
        let chunk = std::mem::take(buf);
        if in_digits {
            // A digit run too long for u128 is no longer a number anyone
            // typed; fall back to comparing it as text.
            match chunk.parse::<u128>() {
                Ok(n) => Segment::Number(n),
                Err(_) => Segment::Text(chunk),
            }
        } else {
            Segment::Text(chunk.to_lowercase())
        }
    }
}

impl PartialOrd for NaturalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NaturalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments.cmp(&other.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut input: Vec<&str>) -> Vec<&str> {
        input.sort_by_key(|s| NaturalKey::new(s));
        input
    }

    #[test]
    fn test_digit_runs_compare_numerically() {
        assert_eq!(sorted(vec!["item10", "item2"]), vec!["item2", "item10"]);
    }

    #[test]
    fn test_numbers_before_text() {
        assert_eq!(sorted(vec!["b", "a2", "a10"]), vec!["a2", "a10", "b"]);
    }

    #[test]
    fn test_case_folded() {
        assert_eq!(sorted(vec!["Web2", "web10"]), vec!["Web2", "web10"]);
    }

    #[test]
    fn test_mixed_segments() {
        assert_eq!(
            sorted(vec!["v10-rc2", "v2-rc1", "v10-rc10"]),
            vec!["v2-rc1", "v10-rc2", "v10-rc10"]
        );
    }

    #[test]
    fn test_empty_and_absent_sort_first() {
        let empty = NaturalKey::from_opt(None);
        assert_eq!(empty, NaturalKey::new(""));
        assert!(empty < NaturalKey::new("0"));
        assert!(empty < NaturalKey::new("a"));
    }

    #[test]
    fn test_leading_zeros_equal_value() {
        assert_eq!(
            NaturalKey::new("a007").cmp(&NaturalKey::new("a7")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_oversized_digit_run_still_orders() {
        // 40 digits: overflows u128 and degrades to text, without panicking.
        let big = "x9999999999999999999999999999999999999999";
        assert!(NaturalKey::new("x1") < NaturalKey::new(big));
    }
}
