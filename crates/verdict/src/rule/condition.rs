//! Condition composition
//!
//! Conditions gate whether validator units run. A rule (or a single unit)
//! carries at most one condition, stored as a tagged variant: none,
//! synchronous, or asynchronous. Applying a further `when`/`unless`
//! refinement does not overwrite the stored condition — it composes with it.
//!
//! Composition is a strict logical AND with a fixed evaluation order: the
//! newly applied condition runs first, then the pre-existing one, and both
//! sides always run. The new condition may rely on ordering established by
//! earlier declarations, and skipping the second predicate would lose any
//! state it maintains, so there is no short-circuit between the two.
//!
//! Combination is only defined within a tag. Mixing a synchronous and an
//! asynchronous condition on the same rule is a declaration bug and panics.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::foundation::ValidationContext;

/// Synchronous condition over the validation context.
pub type SyncConditionFn<T> =
    Arc<dyn Fn(&ValidationContext<'_, T>) -> bool + Send + Sync>;

/// Asynchronous condition over the validation context.
///
/// The closure inspects the context synchronously and returns an owned
/// future, so the future itself borrows nothing from the context.
pub type AsyncConditionFn<T> =
    Arc<dyn Fn(&ValidationContext<'_, T>) -> BoxFuture<'static, bool> + Send + Sync>;

// ============================================================================
// PROPAGATION SCOPE
// ============================================================================

/// Which units a condition applied to a rule attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyConditionTo {
    /// Every unit currently attached to the rule, plus all dependent rules.
    /// Used when refining a whole rule retroactively.
    #[default]
    AllValidators,
    /// Only the most-recently-added unit. Used when a condition refines just
    /// the last constraint in a chain.
    CurrentValidator,
}

// ============================================================================
// CONDITION
// ============================================================================

/// A rule's (or unit's) condition slot.
pub enum Condition<T> {
    /// No condition; the guarded work always runs.
    None,
    /// Synchronous predicate.
    Sync(SyncConditionFn<T>),
    /// Asynchronous predicate; only legal on the async execution path.
    Async(AsyncConditionFn<T>),
}

impl<T: 'static> Condition<T> {
    /// True when no condition has been applied.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Condition::None)
    }

    /// Composes a new synchronous predicate onto this slot.
    ///
    /// # Panics
    ///
    /// Panics if an asynchronous condition is already stored: a rule chain
    /// commits to one form and never races both for the same evaluation.
    #[must_use]
    pub fn and_sync(self, new: SyncConditionFn<T>) -> Self {
        match self {
            Condition::None => Condition::Sync(new),
            Condition::Sync(existing) => {
                Condition::Sync(Arc::new(move |ctx: &ValidationContext<'_, T>| {
                    // New condition first, then the existing one; both always
                    // run, the result is their conjunction.
                    let first = new(ctx);
                    let second = existing(ctx);
                    first && second
                }))
            }
            Condition::Async(_) => panic!(
                "cannot apply a synchronous condition over an existing asynchronous one; \
                 a rule chain must use one form consistently"
            ),
        }
    }

    /// Composes a new asynchronous predicate onto this slot.
    ///
    /// The combined future awaits the new predicate, then the existing one;
    /// both are awaited, the result is their conjunction.
    ///
    /// # Panics
    ///
    /// Panics if a synchronous condition is already stored.
    #[must_use]
    pub fn and_async(self, new: AsyncConditionFn<T>) -> Self {
        match self {
            Condition::None => Condition::Async(new),
            Condition::Async(existing) => Condition::Async(Arc::new(
                move |ctx: &ValidationContext<'_, T>| -> BoxFuture<'static, bool> {
                    let first = new(ctx);
                    let second = existing(ctx);
                    Box::pin(async move {
                        let first = first.await;
                        let second = second.await;
                        first && second
                    })
                },
            )),
            Condition::Sync(_) => panic!(
                "cannot apply an asynchronous condition over an existing synchronous one; \
                 a rule chain must use one form consistently"
            ),
        }
    }
}

impl<T> Default for Condition<T> {
    fn default() -> Self {
        Condition::None
    }
}

impl<T> Clone for Condition<T> {
    fn clone(&self) -> Self {
        match self {
            Condition::None => Condition::None,
            Condition::Sync(f) => Condition::Sync(Arc::clone(f)),
            Condition::Async(f) => Condition::Async(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::None => f.write_str("Condition::None"),
            Condition::Sync(_) => f.write_str("Condition::Sync(..)"),
            Condition::Async(_) => f.write_str("Condition::Async(..)"),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
