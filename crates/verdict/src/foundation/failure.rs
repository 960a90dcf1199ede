//! Failure records produced by rule execution
//!
//! Validation failures are *data*, not errors: a validator unit that rejects a
//! value contributes a [`ValidationFailure`] to the result sequence, and the
//! engine never converts that into a panic or an `Err`. The only `Err`-shaped
//! outcome in the engine is [`Cancelled`], raised by the asynchronous path
//! when the context's cancellation token fires.
//!
//! All string fields that are usually known at compile time use
//! `Cow<'static, str>` for zero-allocation in the common case.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SEVERITY
// ============================================================================

/// Severity level attached to a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Failure that must be fixed (default).
    #[default]
    Error,
    /// Should be addressed but does not have to block the caller.
    Warning,
    /// Informational message.
    Info,
}

// ============================================================================
// VALIDATION FAILURE
// ============================================================================

/// A single structured validation failure.
///
/// Produced immutable by the rule executor; collected in rule-declaration
/// order, then validator-declaration order within a rule, then dependent-rule
/// order.
///
/// # Examples
///
/// ```rust,ignore
/// use verdict::foundation::ValidationFailure;
///
/// let failure = ValidationFailure::new("Surname", "'Surname' must not be empty.")
///     .with_code("not_empty");
/// assert_eq!(failure.property_name, "Surname");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationFailure {
    /// Name of the member the owning rule is bound to. Empty for model-level
    /// rules.
    pub property_name: String,

    /// Formatted, human-readable error message.
    pub message: String,

    /// The value that failed the check, serialized for diagnostics.
    pub attempted_value: Value,

    /// Stable code for programmatic handling and i18n. Defaults to the
    /// validator unit's kind name.
    pub code: Cow<'static, str>,

    /// Severity of this failure.
    pub severity: Severity,

    /// Caller-supplied state attached to the unit that produced the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_state: Option<Value>,
}

impl ValidationFailure {
    /// Creates a failure with a property name and message; the remaining
    /// fields take their defaults.
    pub fn new(property_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            message: message.into(),
            attempted_value: Value::Null,
            code: Cow::Borrowed(""),
            severity: Severity::Error,
            custom_state: None,
        }
    }

    /// Sets the attempted value.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_attempted_value(mut self, value: Value) -> Self {
        self.attempted_value = value;
        self
    }

    /// Sets the error code.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the severity.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attaches custom state.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_custom_state(mut self, state: Value) -> Self {
        self.custom_state = Some(state);
        self
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property_name.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "[{}] {}", self.property_name, self.message)
        }
    }
}

// ============================================================================
// VALIDATION OUTCOME
// ============================================================================

/// The ordered failure sequence produced by one top-level validation call.
///
/// An empty outcome means the instance satisfied every rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationOutcome {
    failures: Vec<ValidationFailure>,
}

impl ValidationOutcome {
    /// Creates an outcome from collected failures.
    #[must_use]
    pub fn new(failures: Vec<ValidationFailure>) -> Self {
        Self { failures }
    }

    /// Returns true if no rule produced a failure.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the failures in execution order.
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Returns the number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns true if there are no failures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Consumes the outcome, yielding the failure list.
    #[must_use]
    pub fn into_failures(self) -> Vec<ValidationFailure> {
        self.failures
    }

    /// Converts to a `Result`, treating any failure as `Err`.
    #[must_use = "result must be used"]
    pub fn into_result(self) -> Result<(), ValidationOutcome> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

impl FromIterator<ValidationFailure> for ValidationOutcome {
    fn from_iter<I: IntoIterator<Item = ValidationFailure>>(iter: I) -> Self {
        Self {
            failures: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} failure(s):", self.failures.len())?;
        for (i, failure) in self.failures.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationOutcome {}

// ============================================================================
// CANCELLATION
// ============================================================================

/// Signal that an asynchronous validation was cancelled mid-flight.
///
/// Distinct from both configuration errors (panics) and validation failures
/// (data): the in-flight rule's partial failure list is discarded, never
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("validation was cancelled before it completed")]
pub struct Cancelled;

// ============================================================================
// TESTS
// ============================================================================
