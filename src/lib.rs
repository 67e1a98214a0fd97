//! Resource Specification Language.
//!
//! A small typed predicate language for matching structured host and
//! resource data:
//!
//! ```
//! use rsl::{PropertyTree, eval_str};
//!
//! let host = PropertyTree::new()
//!     .with_value("cpu.count", 4_i64)
//!     .with_container("os", PropertyTree::new().with_value("name", "GNU/Linux"));
//!
//! assert!(eval_str("cpu.count >= 2 && os { name =~ /linux/i }", &host).unwrap());
//! ```

mod error;
mod evaluate;
pub mod parse;
mod types;

pub use error::RslError;
pub use evaluate::Evaluator;
pub use parse::{parse, ParseError};
pub use types::{
    property, qualified, ArrayErrorPolicy, Category, CompareOp, Condition, Container, EvalConfig,
    Pattern, Property, PropertyFault, PropertyRef, PropertyTree, Quantity, SemanticError, Timestamp,
    UnitPrefix, Value, ValueError, ValueKind, Version,
};

/// Evaluate `condition` against `root` with the default [`EvalConfig`].
///
/// # Errors
///
/// Returns a [`SemanticError`] when the condition does not fit `root`.
pub fn evaluate(condition: &Condition, root: &dyn Container) -> Result<bool, SemanticError> {
    Evaluator::default().evaluate(condition, root)
}

/// Parse `source` and evaluate it against `root`.
///
/// # Errors
///
/// Returns [`RslError::Parse`] for malformed source and
/// [`RslError::Semantic`] when the condition does not fit `root`.
pub fn eval_str(source: &str, root: &dyn Container) -> Result<bool, RslError> {
    let condition = parse(source)?;
    Ok(evaluate(&condition, root)?)
}
