use std::fmt;

use regex::{Regex, RegexBuilder};

use super::error::ValueError;

/// A compiled regular expression literal, written `/source/` or `/source/i`.
///
/// Matching is a substring search: `/ab/` matches `"xaby"`. Anchor with `^`
/// and `$` for a full match. Two patterns are equal when their source and
/// flag are equal.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    case_insensitive: bool,
    regex: Regex,
}

impl Pattern {
    /// Compile `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidPattern`] if `source` is not a valid
    /// regular expression.
    pub fn new(source: &str, case_insensitive: bool) -> Result<Self, ValueError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|source_err| ValueError::InvalidPattern {
                pattern: source.to_owned(),
                source: source_err,
            })?;
        Ok(Self {
            source: source.to_owned(),
            case_insensitive,
            regex,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case_insensitive == other.case_insensitive
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source.replace('/', "\\/"))?;
        if self.case_insensitive {
            write!(f, "i")?;
        }
        Ok(())
    }
}
