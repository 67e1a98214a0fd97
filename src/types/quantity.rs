use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::ValueError;

/// Binary unit prefix. Each step multiplies the magnitude by 1024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitPrefix {
    Kilo,
    Mega,
    Giga,
    Tera,
    Peta,
}

impl UnitPrefix {
    /// Map a prefix character (`k`, `M`, `G`, `T`, `P`) to its prefix.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'k' => Some(UnitPrefix::Kilo),
            'M' => Some(UnitPrefix::Mega),
            'G' => Some(UnitPrefix::Giga),
            'T' => Some(UnitPrefix::Tera),
            'P' => Some(UnitPrefix::Peta),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            UnitPrefix::Kilo => 'k',
            UnitPrefix::Mega => 'M',
            UnitPrefix::Giga => 'G',
            UnitPrefix::Tera => 'T',
            UnitPrefix::Peta => 'P',
        }
    }

    /// Power of 1024 this prefix stands for.
    #[must_use]
    pub fn rank(self) -> u32 {
        match self {
            UnitPrefix::Kilo => 1,
            UnitPrefix::Mega => 2,
            UnitPrefix::Giga => 3,
            UnitPrefix::Tera => 4,
            UnitPrefix::Peta => 5,
        }
    }
}

/// An integer magnitude with an optional binary prefix and an optional unit name,
/// e.g. `42`, `42k`, `42Hz`, `42kHz`.
///
/// The derived `PartialEq` is structural: `1kHz` and `1024Hz` are different
/// literals even though they denote the same amount. Use [`Quantity::try_compare`]
/// for the numeric, unit-aware comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity {
    magnitude: i64,
    prefix: Option<UnitPrefix>,
    unit: Option<String>,
}

impl Quantity {
    /// Build a quantity from its parts. An empty unit name is treated as no
    /// unit.
    ///
    /// The unit must read back unchanged from the literal text: ASCII letters
    /// only, and without a prefix it must not open with one of `k M G T P`
    /// (`42MHz` is 42 with prefix `M` and unit `Hz`).
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidUnit`] for a unit the literal syntax
    /// cannot express.
    pub fn new(
        magnitude: i64,
        prefix: Option<UnitPrefix>,
        unit: Option<&str>,
    ) -> Result<Self, ValueError> {
        let unit = unit.filter(|u| !u.is_empty());
        if let Some(unit) = unit {
            let opens_like_prefix =
                prefix.is_none() && unit.starts_with(|c: char| UnitPrefix::from_char(c).is_some());
            if opens_like_prefix || !unit.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ValueError::InvalidUnit(unit.to_owned()));
            }
        }
        Ok(Self {
            magnitude,
            prefix,
            unit: unit.map(str::to_owned),
        })
    }

    /// A bare number without prefix or unit.
    #[must_use]
    pub fn plain(magnitude: i64) -> Self {
        Self {
            magnitude,
            prefix: None,
            unit: None,
        }
    }

    /// Build a quantity from a raw prefix character.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidPrefix`] if `prefix` is not one of `k M G T P`,
    /// or any error of [`Quantity::new`].
    pub fn with_prefix_char(
        magnitude: i64,
        prefix: Option<char>,
        unit: Option<&str>,
    ) -> Result<Self, ValueError> {
        let prefix = match prefix {
            Some(c) => Some(UnitPrefix::from_char(c).ok_or(ValueError::InvalidPrefix(c))?),
            None => None,
        };
        Self::new(magnitude, prefix, unit)
    }

    #[must_use]
    pub fn magnitude(&self) -> i64 {
        self.magnitude
    }

    #[must_use]
    pub fn prefix(&self) -> Option<UnitPrefix> {
        self.prefix
    }

    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// The magnitude multiplied by `1024^rank(prefix)`.
    #[must_use]
    pub fn applied_magnitude(&self) -> i128 {
        let rank = self.prefix.map_or(0, UnitPrefix::rank);
        i128::from(self.magnitude) << (10 * rank)
    }

    /// Whether the two quantities can be compared: at least one of them has no
    /// unit name, or both carry the same one.
    #[must_use]
    pub fn is_comparable_with(&self, other: &Quantity) -> bool {
        match (&self.unit, &other.unit) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Compare applied magnitudes.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnitConflict`] when both sides name a unit and the
    /// names differ.
    pub fn try_compare(&self, other: &Quantity) -> Result<Ordering, ValueError> {
        if !self.is_comparable_with(other) {
            return Err(ValueError::UnitConflict {
                left: self.unit.clone().unwrap_or_default(),
                right: other.unit.clone().unwrap_or_default(),
            });
        }
        Ok(self.applied_magnitude().cmp(&other.applied_magnitude()))
    }

    /// Numeric equality, failing on a unit conflict.
    ///
    /// # Errors
    ///
    /// See [`Quantity::try_compare`].
    pub fn try_equals(&self, other: &Quantity) -> Result<bool, ValueError> {
        self.try_compare(other).map(Ordering::is_eq)
    }
}

impl FromStr for Quantity {
    type Err = ValueError;

    /// Parse `-?[0-9]+[kMGTP]?[A-Za-z]*`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidQuantity(s.to_owned());

        let sign_len = usize::from(s.starts_with('-'));
        let digits_end = s[sign_len..]
            .find(|c: char| !c.is_ascii_digit())
            .map_or(s.len(), |i| sign_len + i);
        if digits_end == sign_len {
            return Err(invalid());
        }
        let (number, suffix) = s.split_at(digits_end);
        if !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        let magnitude: i64 = number
            .parse()
            .map_err(|_| ValueError::MagnitudeOverflow(number.to_owned()))?;

        let mut chars = suffix.chars();
        let (prefix, unit) = match chars.next().and_then(UnitPrefix::from_char) {
            Some(prefix) => (Some(prefix), chars.as_str()),
            None => (None, suffix),
        };
        Self::new(magnitude, prefix, Some(unit))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.magnitude)?;
        if let Some(prefix) = self.prefix {
            write!(f, "{}", prefix.as_char())?;
        }
        if let Some(unit) = &self.unit {
            write!(f, "{unit}")?;
        }
        Ok(())
    }
}

impl From<i64> for Quantity {
    fn from(v: i64) -> Self {
        Quantity::plain(v)
    }
}
