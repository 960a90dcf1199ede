//! Caller-predicate unit

use crate::foundation::{RuleValidator, ValidationContext};

/// Checks an arbitrary caller predicate over `(instance, value)`.
///
/// The predicate sees the raw value — no absent-value passthrough — so it can
/// express cross-member constraints that depend on presence.
pub struct Must<F> {
    predicate: F,
}

impl<F> Must<F> {
    /// Wraps a predicate.
    #[must_use]
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<T, V, F> RuleValidator<T, V> for Must<F>
where
    F: Fn(&T, &V) -> bool + Send + Sync,
{
    fn kind(&self) -> &'static str {
        "must"
    }

    fn template(&self) -> &str {
        "The specified condition was not met for '{PropertyName}'."
    }

    fn is_valid(&self, ctx: &mut ValidationContext<'_, T>, value: &V) -> bool {
        (self.predicate)(ctx.instance(), value)
    }
}

/// Creates a [`Must`] unit.
#[must_use]
pub fn must<F>(predicate: F) -> Must<F> {
    Must::new(predicate)
}
