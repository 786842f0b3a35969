//! Flags accepted by the `REGEX` command.

use std::fmt;

use regex::bytes::{Regex, RegexBuilder};

use crate::{Error, Result};

/// Matching options for the content search of a `REGEX` command.
///
/// Parsed from a word made of the letters `M`, `U` and `I` in any order and
/// case. Content is searched as raw bytes, so without `U` the search is
/// byte-oriented: `.` matches any byte and `I` folds ASCII letters only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    /// `M`: `^`/`$` match at line breaks and `.` matches `\n`.
    pub multi_line: bool,
    /// `U`: Unicode-aware classes and case folding.
    pub unicode: bool,
    /// `I`: case-insensitive search.
    pub case_insensitive: bool,
}

impl RegexFlags {
    /// Parses a flags word.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFlag`] for any character outside `MUImui`.
    ///
    /// ```rust
    /// use zippatch::command::RegexFlags;
    ///
    /// let flags = RegexFlags::parse("iM").unwrap();
    /// assert!(flags.case_insensitive && flags.multi_line && !flags.unicode);
    /// assert!(RegexFlags::parse("x").is_err());
    /// ```
    pub fn parse(word: &str) -> Result<Self> {
        let mut flags = Self::default();
        for c in word.chars() {
            match c.to_ascii_uppercase() {
                'M' => flags.multi_line = true,
                'U' => flags.unicode = true,
                'I' => flags.case_insensitive = true,
                _ => {
                    return Err(Error::InvalidFlag {
                        flag: c,
                        flags: word.to_string(),
                    });
                }
            }
        }
        Ok(flags)
    }

    /// Returns `true` if no flag is set.
    pub fn is_empty(&self) -> bool {
        !(self.multi_line || self.unicode || self.case_insensitive)
    }

    /// Compiles a content search pattern with these flags.
    pub fn build(&self, pattern: &str) -> Result<Regex> {
        RegexBuilder::new(pattern)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.multi_line)
            .unicode(self.unicode)
            .case_insensitive(self.case_insensitive)
            .build()
            .map_err(|e| Error::invalid_regex(pattern, &e))
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multi_line {
            f.write_str("M")?;
        }
        if self.unicode {
            f.write_str("U")?;
        }
        if self.case_insensitive {
            f.write_str("I")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let flags = RegexFlags::parse("MUI").unwrap();
        assert!(flags.multi_line);
        assert!(flags.unicode);
        assert!(flags.case_insensitive);
        assert_eq!(flags.to_string(), "MUI");
    }

    #[test]
    fn test_parse_empty() {
        let flags = RegexFlags::parse("").unwrap();
        assert!(flags.is_empty());
        assert_eq!(flags.to_string(), "");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        match RegexFlags::parse("Mg") {
            Err(Error::InvalidFlag { flag, flags }) => {
                assert_eq!(flag, 'g');
                assert_eq!(flags, "Mg");
            }
            other => panic!("Expected InvalidFlag, got: {:?}", other),
        }
    }

    #[test]
    fn test_case_insensitive_search() {
        let re = RegexFlags::parse("I").unwrap().build("a").unwrap();
        assert_eq!(re.replace_all(b"aAaA", &b"Z"[..]).as_ref(), b"ZZZZ");
    }

    #[test]
    fn test_multi_line_dot_matches_newline() {
        let plain = RegexFlags::default().build("a.b").unwrap();
        assert!(!plain.is_match(b"a\nb"));

        let multi = RegexFlags::parse("M").unwrap().build("^b.c$").unwrap();
        assert!(multi.is_match(b"a\nb\nc\nd"));
    }

    #[test]
    fn test_byte_mode_without_unicode() {
        let re = RegexFlags::default().build(".").unwrap();
        // A lone invalid UTF-8 byte still matches `.` in byte mode.
        assert!(re.is_match(&[0xFF]));
    }

    #[test]
    fn test_invalid_search_pattern() {
        assert!(matches!(
            RegexFlags::default().build("(unclosed"),
            Err(Error::InvalidRegex { .. })
        ));
    }
}
