use std::fmt;

use super::{Container, Pattern, SemanticError, Value};

/// Comparison operators supported in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `=~`, a text property against a regex literal.
    Matches,
    /// A multi-valued property holding the given text.
    Contains,
}

impl CompareOp {
    /// Whether the operator needs a total order on its operands.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        matches!(self, CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Matches => "=~",
            CompareOp::Contains => "contains",
        };
        f.write_str(token)
    }
}

/// A parsed RSL condition.
///
/// Conditions are immutable once built and may be shared across threads and
/// evaluated against any number of property trees. `Display` renders the
/// canonical text form, which parses back to an equal condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    AlwaysTrue,
    Compare {
        name: String,
        op: CompareOp,
        value: Value,
    },
    /// Conjunction of two or more conditions, in source order.
    ///
    /// The parser and [`Condition::and`] / [`Condition::all`] never build
    /// fewer children. A single child prints as that child and an empty
    /// conjunction prints as `true`, so both re-parse to an equivalent but
    /// structurally different condition.
    And(Vec<Condition>),
    /// Disjunction of two or more conditions, in source order.
    ///
    /// A single child prints as that child. An empty disjunction never
    /// matches and has no text form; build disjunctions with
    /// [`Condition::or`].
    Or(Vec<Condition>),
    /// `name { condition }`: evaluate `condition` inside a container property,
    /// or inside at least one item of an array property.
    Qualified {
        name: String,
        condition: Box<Condition>,
    },
}

impl Condition {
    /// Conjunction with `other`. Extends `self` in place when it is already
    /// a conjunction, so chained calls stay flat.
    #[must_use]
    pub fn and(self, other: Condition) -> Condition {
        match self {
            Condition::And(mut subs) => {
                subs.push(other);
                Condition::And(subs)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    /// Disjunction with `other`, flattened like [`Condition::and`].
    #[must_use]
    pub fn or(self, other: Condition) -> Condition {
        match self {
            Condition::Or(mut subs) => {
                subs.push(other);
                Condition::Or(subs)
            }
            first => Condition::Or(vec![first, other]),
        }
    }

    /// Conjunction of every condition in `conditions`. No conditions yield
    /// [`Condition::AlwaysTrue`]; a single one is returned as is.
    #[must_use]
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Condition {
        let mut subs: Vec<Condition> = conditions.into_iter().collect();
        match subs.len() {
            0 => Condition::AlwaysTrue,
            1 => subs.remove(0),
            _ => Condition::And(subs),
        }
    }

    /// Evaluate against `root` with the default [`EvalConfig`](super::EvalConfig).
    ///
    /// # Errors
    ///
    /// Returns a [`SemanticError`] when the condition does not fit the shape
    /// or types of `root`.
    pub fn evaluate(&self, root: &dyn Container) -> Result<bool, SemanticError> {
        crate::evaluate::Evaluator::default().evaluate(self, root)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, subs: &[Condition], sep: &str) -> fmt::Result {
    for (i, sub) in subs.iter().enumerate() {
        if i > 0 {
            write!(f, " {sep} ")?;
        }
        write!(f, "({sub})")?;
    }
    Ok(())
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::AlwaysTrue => f.write_str("true"),
            Condition::Compare { name, op, value } => write!(f, "{name} {op} {value}"),
            Condition::And(subs) => match subs.as_slice() {
                [] => f.write_str("true"),
                [only] => write!(f, "{only}"),
                _ => write_joined(f, subs, "&&"),
            },
            Condition::Or(subs) => match subs.as_slice() {
                [only] => write!(f, "{only}"),
                _ => write_joined(f, subs, "||"),
            },
            Condition::Qualified { name, condition } => write!(f, "{name} {{ {condition} }}"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Condition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Condition {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        crate::parse::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Intermediate builder for comparisons against one property.
/// Created by [`property()`].
#[derive(Debug, Clone)]
pub struct PropertyRef {
    name: String,
}

impl PropertyRef {
    fn compare(self, op: CompareOp, value: Value) -> Condition {
        Condition::Compare {
            name: self.name,
            op,
            value,
        }
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Eq, value.into())
    }

    #[must_use]
    pub fn ne(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Ne, value.into())
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Lt, value.into())
    }

    #[must_use]
    pub fn le(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Le, value.into())
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Gt, value.into())
    }

    #[must_use]
    pub fn ge(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Ge, value.into())
    }

    #[must_use]
    pub fn matches(self, pattern: Pattern) -> Condition {
        self.compare(CompareOp::Matches, Value::Pattern(pattern))
    }

    #[must_use]
    pub fn contains(self, item: impl Into<String>) -> Condition {
        self.compare(CompareOp::Contains, Value::Text(item.into()))
    }
}

/// Start a comparison against the property `name`.
///
/// ```
/// use rsl::property;
///
/// let c = property("cpu.count").ge(4_i64);
/// assert_eq!(c.to_string(), "cpu.count >= 4");
/// ```
#[must_use]
pub fn property(name: impl Into<String>) -> PropertyRef {
    PropertyRef { name: name.into() }
}

/// Build `name { condition }`.
#[must_use]
pub fn qualified(name: impl Into<String>, condition: Condition) -> Condition {
    Condition::Qualified {
        name: name.into(),
        condition: Box::new(condition),
    }
}
