use std::borrow::Cow;
use std::cmp::Ordering;
use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::types::{
    ArrayErrorPolicy, CompareOp, Condition, Container, EvalConfig, Property, PropertyFault,
    Quantity, SemanticError, Value, ValueKind,
};

/// Walks a [`Condition`] against a property tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    #[must_use]
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate `condition` with `root` as the outermost scope.
    ///
    /// Conjunctions and disjunctions short-circuit, so a semantic problem in
    /// a branch that is never reached goes unreported. Use
    /// [`Evaluator::check`] to validate every branch.
    ///
    /// # Errors
    ///
    /// Returns a [`SemanticError`] when a name does not resolve, resolves to
    /// the wrong shape, or is compared in a way its kind does not support.
    pub fn evaluate(
        &self,
        condition: &Condition,
        root: &dyn Container,
    ) -> Result<bool, SemanticError> {
        let result = self.eval(condition, root);
        trace!(%condition, ?result, "evaluated condition");
        result
    }

    /// Validate `condition` against `root` without short-circuiting.
    ///
    /// Every comparison is resolved and type-checked, descending into every
    /// container and every array item. The first error in source order is
    /// returned.
    ///
    /// # Errors
    ///
    /// The first [`SemanticError`] found.
    pub fn check(&self, condition: &Condition, root: &dyn Container) -> Result<(), SemanticError> {
        match condition {
            Condition::AlwaysTrue => Ok(()),
            Condition::Compare { name, op, value } => {
                let target = resolve_simple(root, name)?;
                compare(name, *op, &target, value).map(drop)
            }
            Condition::And(subs) | Condition::Or(subs) => {
                subs.iter().try_for_each(|sub| self.check(sub, root))
            }
            Condition::Qualified { name, condition } => match resolve(root, name)? {
                Property::Container(inner) => self.check(condition, inner.as_ref()),
                Property::Array(items) => items
                    .iter()
                    .try_for_each(|item| self.check(condition, item.as_ref())),
                Property::Simple(_) => Err(SemanticError::property(
                    name,
                    PropertyFault::NotQualifiable,
                )),
            },
        }
    }

    fn eval(&self, condition: &Condition, scope: &dyn Container) -> Result<bool, SemanticError> {
        match condition {
            Condition::AlwaysTrue => Ok(true),
            Condition::Compare { name, op, value } => {
                let target = resolve_simple(scope, name)?;
                compare(name, *op, &target, value)
            }
            Condition::And(subs) => {
                for sub in subs {
                    if !self.eval(sub, scope)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Or(subs) => {
                for sub in subs {
                    if self.eval(sub, scope)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Condition::Qualified { name, condition } => match resolve(scope, name)? {
                Property::Container(inner) => self.eval(condition, inner.as_ref()),
                Property::Array(items) => self.any_item(name, condition, &items),
                Property::Simple(_) => Err(SemanticError::property(
                    name,
                    PropertyFault::NotQualifiable,
                )),
            },
        }
    }

    /// Existential qualification: true as soon as one item satisfies
    /// `condition`. Item errors are held back while the scan continues and
    /// only surface if nothing matched.
    fn any_item(
        &self,
        name: &str,
        condition: &Condition,
        items: &[Box<dyn Container + '_>],
    ) -> Result<bool, SemanticError> {
        let policy = self.config.array_errors;
        let scan = items
            .iter()
            .enumerate()
            .try_fold(None, |pending: Option<SemanticError>, (index, item)| {
                match self.eval(condition, item.as_ref()) {
                    Ok(true) => ControlFlow::Break(()),
                    Ok(false) => ControlFlow::Continue(match policy {
                        ArrayErrorPolicy::LastItem => None,
                        ArrayErrorPolicy::FirstError => pending,
                    }),
                    Err(err) => {
                        debug!(array = name, index, error = %err, "array item failed to evaluate");
                        ControlFlow::Continue(match policy {
                            ArrayErrorPolicy::LastItem => Some(err),
                            ArrayErrorPolicy::FirstError => pending.or(Some(err)),
                        })
                    }
                }
            });
        match scan {
            ControlFlow::Break(()) => Ok(true),
            ControlFlow::Continue(None) => Ok(false),
            ControlFlow::Continue(Some(err)) => {
                debug!(array = name, error = %err, "no array item matched, reporting item error");
                Err(err)
            }
        }
    }
}

fn resolve<'a>(scope: &'a dyn Container, name: &str) -> Result<Property<'a>, SemanticError> {
    if !scope.has_property(name) {
        return Err(SemanticError::property(name, PropertyFault::Missing));
    }
    scope
        .property(name)
        .ok_or_else(|| SemanticError::property(name, PropertyFault::Missing))
}

fn resolve_simple<'a>(
    scope: &'a dyn Container,
    name: &str,
) -> Result<Cow<'a, Value>, SemanticError> {
    match resolve(scope, name)? {
        Property::Simple(value) => Ok(value),
        Property::Container(_) | Property::Array(_) => {
            Err(SemanticError::property(name, PropertyFault::NotSimple))
        }
    }
}

fn compare(
    name: &str,
    op: CompareOp,
    target: &Value,
    literal: &Value,
) -> Result<bool, SemanticError> {
    match op {
        CompareOp::Eq => equals(name, op, target, literal),
        CompareOp::Ne => equals(name, op, target, literal).map(|eq| !eq),
        CompareOp::Lt => order(name, op, target, literal).map(Ordering::is_lt),
        CompareOp::Le => order(name, op, target, literal).map(Ordering::is_le),
        CompareOp::Gt => order(name, op, target, literal).map(Ordering::is_gt),
        CompareOp::Ge => order(name, op, target, literal).map(Ordering::is_ge),
        CompareOp::Matches => matches(name, target, literal),
        CompareOp::Contains => contains(name, target, literal),
    }
}

fn invalid_operator(name: &str, op: CompareOp, target: &Value) -> SemanticError {
    SemanticError::InvalidOperator {
        name: name.to_owned(),
        op,
        kind: target.kind(),
    }
}

fn invalid_value_type(name: &str, expected: ValueKind, literal: &Value) -> SemanticError {
    SemanticError::InvalidValueType {
        name: name.to_owned(),
        expected,
        actual: literal.kind(),
    }
}

fn equals(
    name: &str,
    op: CompareOp,
    target: &Value,
    literal: &Value,
) -> Result<bool, SemanticError> {
    match (target, literal) {
        (Value::Pattern(_) | Value::List(_), _) => Err(invalid_operator(name, op, target)),
        (Value::Quantity(a), Value::Quantity(b)) => {
            compare_quantities(name, a, b).map(Ordering::is_eq)
        }
        (Value::Text(a), Value::Text(b)) => Ok(a == b),
        (Value::Version(a), Value::Version(b)) => Ok(a == b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Ok(a == b),
        (Value::Category(a), Value::Category(b)) => Ok(a == b),
        _ => Err(invalid_value_type(name, target.kind(), literal)),
    }
}

fn order(
    name: &str,
    op: CompareOp,
    target: &Value,
    literal: &Value,
) -> Result<Ordering, SemanticError> {
    match (target, literal) {
        (Value::Text(_) | Value::Category(_) | Value::Pattern(_) | Value::List(_), _) => {
            Err(invalid_operator(name, op, target))
        }
        (Value::Quantity(a), Value::Quantity(b)) => compare_quantities(name, a, b),
        (Value::Version(a), Value::Version(b)) => Ok(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Ok(a.cmp(b)),
        _ => Err(invalid_value_type(name, target.kind(), literal)),
    }
}

fn matches(name: &str, target: &Value, literal: &Value) -> Result<bool, SemanticError> {
    match (target, literal) {
        (Value::Text(text), Value::Pattern(pattern)) => Ok(pattern.is_match(text)),
        (Value::Text(_), _) => Err(invalid_value_type(name, ValueKind::Regex, literal)),
        _ => Err(invalid_operator(name, CompareOp::Matches, target)),
    }
}

fn contains(name: &str, target: &Value, literal: &Value) -> Result<bool, SemanticError> {
    match (target, literal) {
        (Value::List(items), Value::Text(item)) => Ok(items.iter().any(|i| i == item)),
        (Value::List(_), _) => Err(invalid_value_type(name, ValueKind::Text, literal)),
        _ => Err(invalid_operator(name, CompareOp::Contains, target)),
    }
}

/// A literal naming a unit must match the property's unit. A unitless
/// literal compares against any property unit.
fn compare_quantities(
    name: &str,
    property: &Quantity,
    literal: &Quantity,
) -> Result<Ordering, SemanticError> {
    let unit_error = || SemanticError::InvalidValueUnit {
        name: name.to_owned(),
        expected: property.unit().unwrap_or_default().to_owned(),
        actual: literal.unit().unwrap_or_default().to_owned(),
    };
    if property.unit().is_none() && literal.unit().is_some() {
        return Err(unit_error());
    }
    property.try_compare(literal).map_err(|_| unit_error())
}
