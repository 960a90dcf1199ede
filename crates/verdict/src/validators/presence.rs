//! Presence units
//!
//! The only units that reject absent values. Every comparison and format
//! unit treats `None` as trivially valid, which decouples "is it present"
//! from "is it well-formed"; these two put the presence half back.

use crate::foundation::{Lengthy, RuleValidator, ValidationContext};

// ============================================================================
// REQUIRED
// ============================================================================

/// Checks that an `Option` holds a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Required;

impl<T, U> RuleValidator<T, Option<U>> for Required
where
    U: Send + Sync,
{
    fn kind(&self) -> &'static str {
        "required"
    }

    fn template(&self) -> &str {
        "'{PropertyName}' must not be empty."
    }

    fn is_valid(&self, _ctx: &mut ValidationContext<'_, T>, value: &Option<U>) -> bool {
        value.is_some()
    }
}

/// Creates a [`Required`] unit.
#[must_use]
pub fn required() -> Required {
    Required
}

// ============================================================================
// NOT EMPTY
// ============================================================================

/// Checks that a value is present *and* non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotEmpty;

impl<T, V: Lengthy> RuleValidator<T, V> for NotEmpty {
    fn kind(&self) -> &'static str {
        "not_empty"
    }

    fn template(&self) -> &str {
        "'{PropertyName}' must not be empty."
    }

    fn is_valid(&self, _ctx: &mut ValidationContext<'_, T>, value: &V) -> bool {
        value.measured_length().is_some_and(|length| length > 0)
    }
}

/// Creates a [`NotEmpty`] unit.
#[must_use]
pub fn not_empty() -> NotEmpty {
    NotEmpty
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn check<V, R>(unit: &R, value: &V) -> bool
    where
        R: RuleValidator<(), V>,
    {
        let mut ctx = ValidationContext::new(&());
        unit.is_valid(&mut ctx, value)
    }

    #[test]
    fn required_rejects_none() {
        assert!(check(&required(), &Some(42)));
        assert!(!check(&required(), &None::<i32>));
    }

    #[test]
    fn not_empty_rejects_empty_and_absent() {
        assert!(check(&not_empty(), &String::from("x")));
        assert!(!check(&not_empty(), &String::new()));
        assert!(!check(&not_empty(), &None::<String>));
        assert!(!check(&not_empty(), &Some(String::new())));
        assert!(check(&not_empty(), &Some(String::from("x"))));
    }

    #[test]
    fn not_empty_rejects_empty_collections() {
        assert!(check(&not_empty(), &vec![1]));
        assert!(!check(&not_empty(), &Vec::<i32>::new()));
    }
}
