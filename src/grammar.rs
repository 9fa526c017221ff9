//! Textual grammar of the order and inventory formats.
//!
//! ```text
//! order line:      <name><S|L>(<qty><species>)*<total>     e.g. AL10a15b5c30
//! inventory line:  <species><S|L>                          e.g. aS
//! ```
//!
//! `<name>` is one or more non-space characters other than the size markers.
//! The flower run accepts either letter case; the rule parser is the one that
//! rejects uppercase species, so the raw pattern stays permissive here.
//!
//! All patterns are compiled lazily, once per process, by the `regex!` macro.

use regex::Regex;

/// Shortest order line the rule parser accepts (`AS1a1` is still too short).
pub(crate) const MIN_RULE_LENGTH: usize = 6;

/// Blank line separating the order block from the inventory block.
pub(crate) const BLOCK_SEPARATOR: &str = "\n\n";

/// Line separator inside each block.
pub(crate) const LINE_SEPARATOR: char = '\n';

/// Full order line. Groups: 1 name, 2 size code, 3 flower run, 4 total.
pub(crate) fn bouquet_line() -> &'static Regex {
    regex!(r"^([^\sSL]+)([SL])((?:[0-9]+[A-Za-z])*)([0-9]+)$")
}

/// One quantity+species token inside a flower run.
pub(crate) fn flower_token() -> &'static Regex {
    regex!(r"[0-9]+[A-Za-z]")
}

/// One inventory line. Groups: 1 species, 2 size code.
pub(crate) fn inventory_line() -> &'static Regex {
    regex!(r"^([a-z])([SL])$")
}

/// Split a flower run into its tokens, in input order.
///
/// ```text
/// "10a15B5c" -> ["10a", "15B", "5c"]
/// ```
pub(crate) fn split_flowers(run: &str) -> Vec<&str> {
    flower_token().find_iter(run).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bouquet_line_captures_parts() {
        let caps = bouquet_line().captures("AL10a15b5c30").unwrap();
        assert_eq!(&caps[1], "A");
        assert_eq!(&caps[2], "L");
        assert_eq!(&caps[3], "10a15b5c");
        assert_eq!(&caps[4], "30");
    }

    #[test]
    fn bouquet_line_takes_last_digits_as_total() {
        let caps = bouquet_line().captures("5S3a2b10").unwrap();
        assert_eq!(&caps[1], "5");
        assert_eq!(&caps[3], "3a2b");
        assert_eq!(&caps[4], "10");
    }

    #[test]
    fn bouquet_line_rejects_malformed() {
        for line in ["S3a10", "A X3a10", "AS3a", "AQ3a10", "AS3a10 ", "AS3a10\r"] {
            assert!(bouquet_line().captures(line).is_none(), "{line:?} should not match");
        }
    }

    #[test]
    fn split_flowers_keeps_case_and_order() {
        assert_eq!(split_flowers("10a15B5c"), vec!["10a", "15B", "5c"]);
        assert!(split_flowers("").is_empty());
    }

    #[test]
    fn inventory_line_is_two_characters() {
        assert!(inventory_line().is_match("aS"));
        assert!(inventory_line().is_match("zL"));
        for line in ["Ax", "AS", "a", "aSS", "1S", "aM", ""] {
            assert!(!inventory_line().is_match(line), "{line:?} should not match");
        }
    }
}
