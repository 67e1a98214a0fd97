use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::ValueError;

const ZERO_PART: &str = "0";

/// A dot-separated version such as `2.6.18` or `42.43.441_RC-45`.
///
/// Components are compared pairwise, a missing component counting as `0`, so
/// `42` and `42.0` are equal. Purely numeric components compare numerically
/// and order before every other component, which compare lexically. The first
/// component starts with a digit.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<String>,
}

impl Version {
    #[must_use]
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(String::as_str)
    }

    fn part_or_zero(&self, index: usize) -> &str {
        self.parts.get(index).map_or(ZERO_PART, String::as_str)
    }
}

/// Sort key of one component.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum PartKey<'a> {
    Number(u64),
    Text(&'a str),
}

impl<'a> PartKey<'a> {
    fn of(part: &'a str) -> Self {
        part.parse().map_or(PartKey::Text(part), PartKey::Number)
    }
}

fn is_part_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl FromStr for Version {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<String> = s.split('.').map(str::to_owned).collect();
        let malformed = !s.starts_with(|c: char| c.is_ascii_digit())
            || parts.iter().any(|p| p.is_empty() || !p.chars().all(is_part_char));
        if malformed {
            return Err(ValueError::InvalidVersion(s.to_owned()));
        }
        Ok(Self { parts })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| PartKey::of(self.part_or_zero(i)).cmp(&PartKey::of(other.part_or_zero(i))))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Version {}

/// Renders at least two components so the text lexes back as a version
/// rather than a plain number.
impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))?;
        if self.parts.len() == 1 {
            write!(f, ".{ZERO_PART}")?;
        }
        Ok(())
    }
}
