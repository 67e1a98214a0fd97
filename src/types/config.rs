/// What an array qualification reports when no item matched and at least
/// one item failed to evaluate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArrayErrorPolicy {
    /// Report the error only if the last item raised it. An item that
    /// evaluates to `false` clears any earlier error.
    #[default]
    LastItem,
    /// Report the first error raised by any item.
    FirstError,
}

/// Evaluator settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvalConfig {
    pub array_errors: ArrayErrorPolicy,
}

impl EvalConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_array_errors(mut self, policy: ArrayErrorPolicy) -> Self {
        self.array_errors = policy;
        self
    }
}
