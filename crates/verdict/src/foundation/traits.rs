//! Validator unit contracts
//!
//! A validator unit is one constraint check over one value. Units expose a
//! stable kind name (used for diagnostics, failure codes and filtering), a
//! default message template, and an evaluation function that writes
//! message-formatting arguments into the context scratch space before
//! reporting failure.
//!
//! Units are attached to rules as `Arc` handles so the caller can keep a
//! clone for later [`replace_validator`](crate::rule::Rule::replace_validator)
//! / [`remove_validator`](crate::rule::Rule::remove_validator) calls, which
//! match by pointer identity.

use async_trait::async_trait;

use crate::foundation::context::ValidationContext;

/// Fallback template used when a unit does not provide one.
pub const DEFAULT_TEMPLATE: &str = "'{PropertyName}' is not valid.";

// ============================================================================
// SYNCHRONOUS UNIT
// ============================================================================

/// A synchronous validator unit over values of type `V`, evaluated against
/// instances of `T`.
///
/// # Examples
///
/// ```rust,ignore
/// use verdict::foundation::{RuleValidator, ValidationContext};
///
/// struct Positive;
///
/// impl<T> RuleValidator<T, i64> for Positive {
///     fn kind(&self) -> &'static str {
///         "positive"
///     }
///
///     fn is_valid(&self, ctx: &mut ValidationContext<'_, T>, value: &i64) -> bool {
///         if *value > 0 {
///             true
///         } else {
///             ctx.formatter_mut().insert("Value", value);
///             false
///         }
///     }
/// }
/// ```
pub trait RuleValidator<T, V>: Send + Sync {
    /// Stable kind name; doubles as the default failure code.
    fn kind(&self) -> &'static str;

    /// Default message template, interpolated through the context's
    /// [`MessageFormatter`](crate::foundation::MessageFormatter).
    fn template(&self) -> &str {
        DEFAULT_TEMPLATE
    }

    /// Evaluates the value. On failure the unit writes its message arguments
    /// into the context scratch space before returning `false`.
    fn is_valid(&self, ctx: &mut ValidationContext<'_, T>, value: &V) -> bool;
}

// ============================================================================
// ASYNCHRONOUS UNIT
// ============================================================================

/// Asynchronous counterpart of [`RuleValidator`], for checks that perform I/O
/// (uniqueness lookups, remote policy checks).
///
/// An async unit can only run through the asynchronous execution path;
/// invoking it through the synchronous one is a configuration error and
/// panics.
#[async_trait]
pub trait AsyncRuleValidator<T, V>: Send + Sync {
    /// Stable kind name; doubles as the default failure code.
    fn kind(&self) -> &'static str;

    /// Default message template.
    fn template(&self) -> &str {
        DEFAULT_TEMPLATE
    }

    /// Evaluates the value, suspending at its own await points only.
    async fn is_valid(&self, ctx: &mut ValidationContext<'_, T>, value: &V) -> bool;
}
