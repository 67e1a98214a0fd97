use std::fmt;

use thiserror::Error;

use super::condition::CompareOp;
use super::value::ValueKind;

/// Errors raised while constructing or comparing literal values.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("invalid unit prefix '{0}', expected one of k, M, G, T, P")]
    InvalidPrefix(char),

    #[error("malformed quantity '{0}'")]
    InvalidQuantity(String),

    #[error("unit '{0}' cannot be written in a quantity literal")]
    InvalidUnit(String),

    #[error("magnitude '{0}' does not fit into a 64-bit integer")]
    MagnitudeOverflow(String),

    #[error("malformed timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("malformed version '{0}'")]
    InvalidVersion(String),

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("invalid regular expression /{pattern}/: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unit '{left}' is not comparable with unit '{right}'")]
    UnitConflict { left: String, right: String },
}

/// Why a property name could not be used where it appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyFault {
    /// The current scope has no property of that name.
    Missing,
    /// A comparison named a container or array property.
    NotSimple,
    /// A qualification named a simple property.
    NotQualifiable,
}

impl fmt::Display for PropertyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyFault::Missing => write!(f, "does not exist"),
            PropertyFault::NotSimple => write!(f, "is not a simple property"),
            PropertyFault::NotQualifiable => write!(f, "is not a container or array property"),
        }
    }
}

/// Errors raised while evaluating a condition against a property tree.
///
/// These are tied to one specific tree: the same condition may evaluate
/// cleanly against a different, compatible tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("property '{name}' {fault}")]
    InvalidProperty { name: String, fault: PropertyFault },

    #[error("operator '{op}' is not supported for {kind} property '{name}'")]
    InvalidOperator {
        name: String,
        op: CompareOp,
        kind: ValueKind,
    },

    #[error("property '{name}' expects a {expected} value, got {actual}")]
    InvalidValueType {
        name: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("property '{name}' is measured in '{expected}', got '{actual}'")]
    InvalidValueUnit {
        name: String,
        expected: String,
        actual: String,
    },
}

impl SemanticError {
    pub(crate) fn property(name: &str, fault: PropertyFault) -> Self {
        SemanticError::InvalidProperty {
            name: name.to_owned(),
            fault,
        }
    }

    /// The property name the error refers to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SemanticError::InvalidProperty { name, .. }
            | SemanticError::InvalidOperator { name, .. }
            | SemanticError::InvalidValueType { name, .. }
            | SemanticError::InvalidValueUnit { name, .. } => name,
        }
    }
}
