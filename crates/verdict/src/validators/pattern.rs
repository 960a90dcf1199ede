//! Regex pattern unit

use regex::Regex;

use crate::foundation::{RuleValidator, Textual, ValidationContext};

/// Checks that a string value matches a regular expression.
///
/// Absent values pass; format checks never reject absence.
#[derive(Debug, Clone)]
pub struct Matches {
    regex: Regex,
}

impl Matches {
    /// Compiles `pattern` into a unit. Fails on an invalid pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Wraps an already-compiled regex.
    #[must_use]
    pub fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }

    /// The pattern this unit matches against.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl<T, V: Textual> RuleValidator<T, V> for Matches {
    fn kind(&self) -> &'static str {
        "matches"
    }

    fn template(&self) -> &str {
        "'{PropertyName}' is not in the correct format."
    }

    fn is_valid(&self, ctx: &mut ValidationContext<'_, T>, value: &V) -> bool {
        let Some(text) = value.text() else {
            return true;
        };
        if self.regex.is_match(text) {
            return true;
        }
        let fmt = ctx.formatter_mut();
        fmt.insert("Pattern", self.regex.as_str());
        fmt.insert("Value", text);
        false
    }
}

/// Creates a [`Matches`] unit from a pattern.
pub fn matches(pattern: &str) -> Result<Matches, regex::Error> {
    Matches::new(pattern)
}
