//! Display-name resolution
//!
//! Failure messages refer to the member through a display name. A rule can
//! carry a fixed name or a factory over the context; the two are mutually
//! exclusive storage (last writer wins). With neither set, the member name is
//! split at word boundaries: `GenderString` becomes `"Gender String"`.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::foundation::ValidationContext;

/// Factory producing a display name from the validation context.
pub type DisplayNameFn<T> = Arc<dyn Fn(&ValidationContext<'_, T>) -> String + Send + Sync>;

/// A rule's display-name slot.
pub enum DisplayName<T> {
    /// Nothing set; fall back to the split member name.
    Unset,
    /// Fixed name.
    Fixed(Cow<'static, str>),
    /// Resolved per call from the context.
    Factory(DisplayNameFn<T>),
}

impl<T> DisplayName<T> {
    /// Resolves the name, falling back to the pascal-case split of
    /// `member_name`.
    #[must_use]
    pub fn resolve(&self, ctx: &ValidationContext<'_, T>, member_name: &str) -> String {
        match self {
            DisplayName::Factory(factory) => factory(ctx),
            DisplayName::Fixed(name) => name.clone().into_owned(),
            DisplayName::Unset => split_pascal_case(member_name),
        }
    }
}

impl<T> Default for DisplayName<T> {
    fn default() -> Self {
        DisplayName::Unset
    }
}

impl<T> Clone for DisplayName<T> {
    fn clone(&self) -> Self {
        match self {
            DisplayName::Unset => DisplayName::Unset,
            DisplayName::Fixed(name) => DisplayName::Fixed(name.clone()),
            DisplayName::Factory(factory) => DisplayName::Factory(Arc::clone(factory)),
        }
    }
}

impl<T> fmt::Debug for DisplayName<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayName::Unset => f.write_str("DisplayName::Unset"),
            DisplayName::Fixed(name) => write!(f, "DisplayName::Fixed({name:?})"),
            DisplayName::Factory(_) => f.write_str("DisplayName::Factory(..)"),
        }
    }
}

/// Splits a pascal-case identifier into space-separated words.
///
/// A space is inserted before an uppercase letter that follows a lowercase
/// letter or digit, and before the last capital of an acronym run that is
/// followed by a lowercase letter (`ABCDef` → `ABC Def`).
#[must_use]
pub fn split_pascal_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower)
            {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}
