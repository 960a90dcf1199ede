//! Aggregate object validator
//!
//! A [`Validator`] is an ordered collection of rules for one model type. It
//! owns rules through [`ErasedRule`], so rules over different members (and
//! value types) sit side by side, and drives them all against one
//! [`ValidationContext`] per call. Rule-declaration order is preserved in the
//! failure sequence.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::foundation::{Cancelled, RuleSetSelection, ValidationContext, ValidationOutcome};
use crate::rule::ErasedRule;

/// An ordered rule collection for instances of `T`.
///
/// Declared once (typically at startup), then invoked concurrently by many
/// simultaneous validation calls. Adding rules must not race with validation
/// on the same instance of `Validator`.
///
/// # Examples
///
/// ```rust,ignore
/// use verdict::prelude::*;
///
/// let validator = Validator::new()
///     .rule(Rule::for_member(member!(Person, surname)).validator(not_empty()))
///     .rule(Rule::for_member(member!(Person, age)).validator(inclusive_between(18, 60)));
///
/// let outcome = validator.validate(&person);
/// assert!(outcome.is_valid());
/// ```
pub struct Validator<T> {
    rules: Vec<Box<dyn ErasedRule<T>>>,
}

impl<T> Validator<T> {
    /// Creates an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule and continues the chain.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule<R>(mut self, rule: R) -> Self
    where
        R: ErasedRule<T> + 'static,
    {
        self.add_rule(rule);
        self
    }

    /// Appends a rule.
    pub fn add_rule<R>(&mut self, rule: R)
    where
        R: ErasedRule<T> + 'static,
    {
        self.rules.push(Box::new(rule));
    }

    /// Number of top-level rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules have been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validates an instance against the default rule set.
    #[must_use]
    pub fn validate(&self, instance: &T) -> ValidationOutcome {
        self.validate_with(instance, RuleSetSelection::default_rules())
    }

    /// Validates an instance against an explicit rule-set selection.
    #[must_use]
    pub fn validate_with(&self, instance: &T, selection: RuleSetSelection) -> ValidationOutcome {
        let mut ctx = ValidationContext::new(instance).with_selection(selection);
        let mut failures = Vec::new();
        for rule in &self.rules {
            failures.extend(rule.run(&mut ctx));
        }
        debug!(failures = failures.len(), "validation finished");
        ValidationOutcome::new(failures)
    }

    /// Asynchronous counterpart of [`Validator::validate`].
    pub async fn validate_async(&self, instance: &T) -> Result<ValidationOutcome, Cancelled> {
        self.validate_async_with(
            instance,
            RuleSetSelection::default_rules(),
            CancellationToken::new(),
        )
        .await
    }

    /// Validates asynchronously with a rule-set selection and a cancellation
    /// token. Cancellation discards every failure collected so far — a
    /// cancelled call never returns a partial outcome.
    pub async fn validate_async_with(
        &self,
        instance: &T,
        selection: RuleSetSelection,
        cancellation: CancellationToken,
    ) -> Result<ValidationOutcome, Cancelled> {
        let mut ctx = ValidationContext::new(instance)
            .with_selection(selection)
            .with_cancellation(cancellation);
        let mut failures = Vec::new();
        for rule in &self.rules {
            failures.extend(rule.run_async(&mut ctx).await?);
        }
        debug!(failures = failures.len(), "validation finished");
        Ok(ValidationOutcome::new(failures))
    }
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self::new()
    }
}
