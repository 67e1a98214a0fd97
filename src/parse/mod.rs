mod error;
mod grammar;

use std::str::FromStr;

use tracing::{debug, trace};
use winnow::Parser;

pub use error::ParseError;
pub use grammar::MAX_NESTING;

use crate::types::Condition;

/// Parse RSL source text into a [`Condition`].
///
/// Blank input parses to [`Condition::AlwaysTrue`]. Parentheses and
/// qualification bodies may nest at most [`MAX_NESTING`] levels deep.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a well-formed condition. No
/// partial result is produced.
pub fn parse(input: &str) -> Result<Condition, ParseError> {
    match grammar::condition.parse(input) {
        Ok(condition) => {
            trace!(%condition, "parsed condition");
            Ok(condition)
        }
        Err(e) => {
            // Literal and depth failures carry a cause; report it alone.
            let mut message = match e.inner().cause() {
                Some(cause) => cause.to_string(),
                None => e.inner().to_string().replace('\n', "; "),
            };
            if message.is_empty() {
                message.push_str("unexpected input");
            }
            let err = ParseError::new(input, e.offset(), message);
            debug!(
                offset = err.offset(),
                message = err.message(),
                "failed to parse condition"
            );
            Err(err)
        }
    }
}

impl FromStr for Condition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
