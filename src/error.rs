use thiserror::Error;

use crate::parse::ParseError;
use crate::types::SemanticError;

/// Unified error type covering parsing and evaluation.
///
/// Returned by [`eval_str()`](crate::eval_str), which does both in one call.
#[derive(Debug, Error)]
pub enum RslError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}
