//! Per-call validation context
//!
//! A [`ValidationContext`] is created at the start of one top-level validation
//! call and passed by reference through every nested rule and dependent-rule
//! invocation. It carries the instance under validation, the active rule-set
//! selection, the message-formatter scratch space, and the cancellation token
//! for the asynchronous path. It is never shared across concurrent calls and
//! never retained afterward.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use tokio_util::sync::CancellationToken;

// ============================================================================
// RULE-SET SELECTION
// ============================================================================

/// The set of rule-set names active for one validation call.
///
/// An empty selection means "default rules": rules without rule-set labels
/// run, labelled rules do not. The special name [`RuleSetSelection::DEFAULT`]
/// can be combined with explicit labels to run both, and
/// [`RuleSetSelection::WILDCARD`] matches every rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSetSelection {
    sets: Vec<String>,
}

impl RuleSetSelection {
    /// Name that selects rules carrying no rule-set labels.
    pub const DEFAULT: &'static str = "default";

    /// Name that selects every rule regardless of labels.
    pub const WILDCARD: &'static str = "*";

    /// Selection that runs only unlabelled rules.
    #[must_use]
    pub fn default_rules() -> Self {
        Self::default()
    }

    /// Selection restricted to the given rule-set names.
    pub fn only<I>(sets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            sets: sets.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the selected names. Empty means "default rules".
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.sets
    }

    /// Decides whether a rule carrying `rule_sets` labels runs under this
    /// selection.
    #[must_use]
    pub fn matches(&self, rule_sets: &[Cow<'static, str>]) -> bool {
        if self.sets.iter().any(|s| s == Self::WILDCARD) {
            return true;
        }
        if self.sets.is_empty() {
            return rule_sets.is_empty();
        }
        if rule_sets.is_empty() {
            return self.sets.iter().any(|s| s == Self::DEFAULT);
        }
        self.sets
            .iter()
            .any(|s| rule_sets.iter().any(|r| r.as_ref() == s.as_str()))
    }
}

// ============================================================================
// MESSAGE FORMATTER
// ============================================================================

/// Scratch space for message-template arguments.
///
/// Cleared by the executor before each validator invocation and read
/// immediately after a failed check to build the failure message. Validator
/// units write named arguments (e.g. `From`, `To`, `Value`) here before
/// returning `false`.
#[derive(Debug, Clone, Default)]
pub struct MessageFormatter {
    args: SmallVec<[(Cow<'static, str>, Value); 4]>,
}

impl MessageFormatter {
    /// Creates an empty formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all arguments.
    pub fn clear(&mut self) {
        self.args.clear();
    }

    /// Adds (or overwrites) a named argument with any serializable value.
    pub fn insert<S>(&mut self, name: impl Into<Cow<'static, str>>, value: &S)
    where
        S: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.insert_value(name, value);
    }

    /// Adds (or overwrites) a named argument with an already-built value.
    pub fn insert_value(&mut self, name: impl Into<Cow<'static, str>>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.args.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.args.push((name, value));
        }
    }

    /// Looks up an argument by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Returns true if no arguments have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Interpolates `{Name}` placeholders in `template` from the argument
    /// bag. Unknown placeholders are left as-is.
    #[must_use]
    pub fn format(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find(['{', '}']) {
                Some(end) if after.as_bytes()[end] == b'}' => {
                    let name = &after[..end];
                    if let Some(value) = self.get(name) {
                        out.push_str(&render(value));
                    } else {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Strings render bare; everything else uses its JSON form.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// VALIDATION CONTEXT
// ============================================================================

/// Carrier for one top-level validation call.
///
/// # Examples
///
/// ```rust,ignore
/// use verdict::foundation::{RuleSetSelection, ValidationContext};
///
/// let person = Person { surname: "Smith".into() };
/// let mut ctx = ValidationContext::new(&person)
///     .with_selection(RuleSetSelection::only(["Update"]));
/// let failures = rule.run(&mut ctx);
/// ```
#[derive(Debug)]
pub struct ValidationContext<'i, T> {
    instance: &'i T,
    selection: RuleSetSelection,
    formatter: MessageFormatter,
    cancellation: CancellationToken,
}

impl<'i, T> ValidationContext<'i, T> {
    /// Creates a context over `instance` with the default rule-set selection
    /// and a token that never cancels.
    pub fn new(instance: &'i T) -> Self {
        Self {
            instance,
            selection: RuleSetSelection::default(),
            formatter: MessageFormatter::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Sets the active rule-set selection.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_selection(mut self, selection: RuleSetSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Threads a cancellation token through the asynchronous execution path.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// The instance under validation.
    #[must_use]
    pub fn instance(&self) -> &'i T {
        self.instance
    }

    /// The active rule-set selection.
    #[must_use]
    pub fn selection(&self) -> &RuleSetSelection {
        &self.selection
    }

    /// Read access to the message-argument scratch space.
    #[must_use]
    pub fn formatter(&self) -> &MessageFormatter {
        &self.formatter
    }

    /// Write access to the message-argument scratch space.
    pub fn formatter_mut(&mut self) -> &mut MessageFormatter {
        &mut self.formatter
    }

    /// The cancellation token for this call.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// True once the caller has requested cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

// ============================================================================
// TESTS
// ============================================================================
