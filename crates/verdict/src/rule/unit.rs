//! Rule units
//!
//! A [`RuleUnit`] is one validator attached to a rule together with its
//! per-unit configuration: an own condition, a message override, an error
//! code, a severity, and optional custom state. Units are immutable during a
//! `run`; mutation is legal only between runs (single-writer/many-reader
//! discipline is the caller's responsibility).

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::foundation::{AsyncRuleValidator, RuleValidator, Severity, ValidationContext};
use crate::rule::condition::Condition;

// ============================================================================
// UNIT VALIDATOR
// ============================================================================

/// The validator carried by a unit: synchronous or asynchronous.
pub enum UnitValidator<T, V> {
    /// Runs on both execution paths.
    Sync(Arc<dyn RuleValidator<T, V>>),
    /// Runs only on the asynchronous path; the synchronous path panics.
    Async(Arc<dyn AsyncRuleValidator<T, V>>),
}

impl<T, V> UnitValidator<T, V> {
    /// The validator's stable kind name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            UnitValidator::Sync(v) => v.kind(),
            UnitValidator::Async(v) => v.kind(),
        }
    }

    /// The validator's default message template.
    #[must_use]
    pub fn template(&self) -> &str {
        match self {
            UnitValidator::Sync(v) => v.template(),
            UnitValidator::Async(v) => v.template(),
        }
    }
}

impl<T, V> Clone for UnitValidator<T, V> {
    fn clone(&self) -> Self {
        match self {
            UnitValidator::Sync(v) => UnitValidator::Sync(Arc::clone(v)),
            UnitValidator::Async(v) => UnitValidator::Async(Arc::clone(v)),
        }
    }
}

// ============================================================================
// MESSAGE OVERRIDE
// ============================================================================

/// Message builder closure: receives the context and the failing value.
pub type MessageBuilderFn<T, V> =
    Arc<dyn Fn(&ValidationContext<'_, T>, &V) -> String + Send + Sync>;

/// Where a unit's failure message comes from when overridden.
pub enum MessageSource<T, V> {
    /// A fixed template, still interpolated through the formatter.
    Template(Cow<'static, str>),
    /// A closure building the message directly.
    Builder(MessageBuilderFn<T, V>),
}

impl<T, V> Clone for MessageSource<T, V> {
    fn clone(&self) -> Self {
        match self {
            MessageSource::Template(t) => MessageSource::Template(t.clone()),
            MessageSource::Builder(f) => MessageSource::Builder(Arc::clone(f)),
        }
    }
}

// ============================================================================
// RULE UNIT
// ============================================================================

/// One validator plus its per-unit configuration.
pub struct RuleUnit<T, V> {
    pub(crate) validator: UnitValidator<T, V>,
    pub(crate) condition: Condition<T>,
    pub(crate) message: Option<MessageSource<T, V>>,
    pub(crate) code: Option<Cow<'static, str>>,
    pub(crate) severity: Severity,
    pub(crate) state: Option<Value>,
}

impl<T: 'static, V> RuleUnit<T, V> {
    /// Wraps a validator with default configuration.
    #[must_use]
    pub fn new(validator: UnitValidator<T, V>) -> Self {
        Self {
            validator,
            condition: Condition::None,
            message: None,
            code: None,
            severity: Severity::Error,
            state: None,
        }
    }

    /// The validator's stable kind name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.validator.kind()
    }

    /// The effective failure code: the override if set, otherwise the kind.
    #[must_use]
    pub fn code(&self) -> Cow<'static, str> {
        self.code
            .clone()
            .unwrap_or_else(|| Cow::Borrowed(self.validator.kind()))
    }

    /// Overrides the failure message with a fixed template.
    pub fn set_message_template(&mut self, template: impl Into<Cow<'static, str>>) {
        self.message = Some(MessageSource::Template(template.into()));
    }

    /// Overrides the failure message with a builder closure.
    pub fn set_message_builder<F>(&mut self, builder: F)
    where
        F: Fn(&ValidationContext<'_, T>, &V) -> String + Send + Sync + 'static,
    {
        self.message = Some(MessageSource::Builder(Arc::new(builder)));
    }

    /// Overrides the failure code.
    pub fn set_code(&mut self, code: impl Into<Cow<'static, str>>) {
        self.code = Some(code.into());
    }

    /// Sets the failure severity.
    pub fn set_severity(&mut self, severity: Severity) {
        self.severity = severity;
    }

    /// Attaches custom state copied onto failures this unit produces.
    pub fn set_state(&mut self, state: Value) {
        self.state = Some(state);
    }

    /// Composes a synchronous condition onto this unit.
    ///
    /// # Panics
    ///
    /// Panics if the unit already carries an asynchronous condition.
    pub fn compose_condition(&mut self, condition: crate::rule::condition::SyncConditionFn<T>) {
        self.condition = std::mem::take(&mut self.condition).and_sync(condition);
    }

    /// Composes an asynchronous condition onto this unit.
    ///
    /// # Panics
    ///
    /// Panics if the unit already carries a synchronous condition.
    pub fn compose_async_condition(
        &mut self,
        condition: crate::rule::condition::AsyncConditionFn<T>,
    ) {
        self.condition = std::mem::take(&mut self.condition).and_async(condition);
    }
}

impl<T, V> Clone for RuleUnit<T, V> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
            condition: self.condition.clone(),
            message: self.message.clone(),
            code: self.code.clone(),
            severity: self.severity,
            state: self.state.clone(),
        }
    }
}

impl<T: 'static, V> fmt::Debug for RuleUnit<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleUnit")
            .field("kind", &self.kind())
            .field("condition", &self.condition)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}
