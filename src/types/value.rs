use std::fmt;

use super::{Category, Pattern, Quantity, Timestamp, Version};

/// The declared kind of a property value or literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Quantity,
    Text,
    Version,
    Timestamp,
    Category,
    Regex,
    /// Multi-valued text, only usable with `contains`.
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Quantity => "quantity",
            ValueKind::Text => "text",
            ValueKind::Version => "version",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Category => "category",
            ValueKind::Regex => "regex",
            ValueKind::List => "list",
        };
        f.write_str(name)
    }
}

/// A typed value: either a literal in a condition or the value of a simple
/// property.
///
/// Equality is structural. Quantities compare by their literal spelling here;
/// the evaluator uses [`Quantity::try_compare`] for numeric comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Quantity(Quantity),
    Text(String),
    Version(Version),
    Timestamp(Timestamp),
    Category(Category),
    Pattern(Pattern),
    List(Vec<String>),
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Quantity(_) => ValueKind::Quantity,
            Value::Text(_) => ValueKind::Text,
            Value::Version(_) => ValueKind::Version,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Category(_) => ValueKind::Category,
            Value::Pattern(_) => ValueKind::Regex,
            Value::List(_) => ValueKind::List,
        }
    }
}

impl From<Quantity> for Value {
    fn from(v: Quantity) -> Self {
        Value::Quantity(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Quantity(Quantity::plain(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Version> for Value {
    fn from(v: Version) -> Self {
        Value::Version(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Category> for Value {
    fn from(v: Category) -> Self {
        Value::Category(v)
    }
}

impl From<Pattern> for Value {
    fn from(v: Pattern) -> Self {
        Value::Pattern(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(v)
    }
}

fn write_text(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Quantity(v) => write!(f, "{v}"),
            Value::Text(v) => write_text(f, v),
            Value::Version(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{v}"),
            Value::Category(v) => write!(f, "{v}"),
            Value::Pattern(v) => write!(f, "{v}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_text(f, item)?;
                }
                f.write_str("]")
            }
        }
    }
}
