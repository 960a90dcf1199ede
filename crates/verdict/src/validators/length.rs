//! Length units
//!
//! Lengths are observed through [`Lengthy`], so the same unit instance
//! validates `String`, `Option<String>`, `Vec<T>` and friends. String length
//! is measured in Unicode scalar values (chars). Absent values pass; use the
//! presence units to reject them.

use crate::foundation::{Lengthy, RuleValidator, ValidationContext};

// ============================================================================
// LENGTH (BETWEEN)
// ============================================================================

/// Checks that a value's length lies within an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Length {
    pub min: usize,
    pub max: usize,
}

impl Length {
    /// Creates a length check with inclusive bounds.
    #[must_use]
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl<T, V: Lengthy> RuleValidator<T, V> for Length {
    fn kind(&self) -> &'static str {
        "length"
    }

    fn template(&self) -> &str {
        "'{PropertyName}' must be between {MinLength} and {MaxLength} characters. \
         You entered {TotalLength} characters."
    }

    fn is_valid(&self, ctx: &mut ValidationContext<'_, T>, value: &V) -> bool {
        let Some(length) = value.measured_length() else {
            return true;
        };
        if length >= self.min && length <= self.max {
            return true;
        }
        let fmt = ctx.formatter_mut();
        fmt.insert("MinLength", &self.min);
        fmt.insert("MaxLength", &self.max);
        fmt.insert("TotalLength", &length);
        false
    }
}

/// Creates a [`Length`] unit.
#[must_use]
pub fn length(min: usize, max: usize) -> Length {
    Length::new(min, max)
}

// ============================================================================
// MIN LENGTH
// ============================================================================

/// Checks that a value's length is at least a minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinLength {
    pub min: usize,
}

impl MinLength {
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl<T, V: Lengthy> RuleValidator<T, V> for MinLength {
    fn kind(&self) -> &'static str {
        "min_length"
    }

    fn template(&self) -> &str {
        "The length of '{PropertyName}' must be at least {MinLength} characters. \
         You entered {TotalLength} characters."
    }

    fn is_valid(&self, ctx: &mut ValidationContext<'_, T>, value: &V) -> bool {
        let Some(length) = value.measured_length() else {
            return true;
        };
        if length >= self.min {
            return true;
        }
        let fmt = ctx.formatter_mut();
        fmt.insert("MinLength", &self.min);
        fmt.insert("TotalLength", &length);
        false
    }
}

/// Creates a [`MinLength`] unit.
#[must_use]
pub fn min_length(min: usize) -> MinLength {
    MinLength::new(min)
}

// ============================================================================
// MAX LENGTH
// ============================================================================

/// Checks that a value's length does not exceed a maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaxLength {
    pub max: usize,
}

impl MaxLength {
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl<T, V: Lengthy> RuleValidator<T, V> for MaxLength {
    fn kind(&self) -> &'static str {
        "max_length"
    }

    fn template(&self) -> &str {
        "The length of '{PropertyName}' must be {MaxLength} characters or fewer. \
         You entered {TotalLength} characters."
    }

    fn is_valid(&self, ctx: &mut ValidationContext<'_, T>, value: &V) -> bool {
        let Some(length) = value.measured_length() else {
            return true;
        };
        if length <= self.max {
            return true;
        }
        let fmt = ctx.formatter_mut();
        fmt.insert("MaxLength", &self.max);
        fmt.insert("TotalLength", &length);
        false
    }
}

/// Creates a [`MaxLength`] unit.
#[must_use]
pub fn max_length(max: usize) -> MaxLength {
    MaxLength::new(max)
}

// ============================================================================
// EXACT LENGTH
// ============================================================================

/// Checks that a value's length is exactly `length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExactLength {
    pub length: usize,
}

impl ExactLength {
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl<T, V: Lengthy> RuleValidator<T, V> for ExactLength {
    fn kind(&self) -> &'static str {
        "exact_length"
    }

    fn template(&self) -> &str {
        "'{PropertyName}' must be {MaxLength} characters in length. \
         You entered {TotalLength} characters."
    }

    fn is_valid(&self, ctx: &mut ValidationContext<'_, T>, value: &V) -> bool {
        let Some(length) = value.measured_length() else {
            return true;
        };
        if length == self.length {
            return true;
        }
        let fmt = ctx.formatter_mut();
        fmt.insert("MaxLength", &self.length);
        fmt.insert("TotalLength", &length);
        false
    }
}

/// Creates an [`ExactLength`] unit.
#[must_use]
pub fn exact_length(length: usize) -> ExactLength {
    ExactLength::new(length)
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
    fn length_bounds_are_inclusive() {
        let v = length(2, 4);
        assert!(!check(&v, &String::from("a")));
        assert!(check(&v, &String::from("ab")));
        assert!(check(&v, &String::from("abcd")));
        assert!(!check(&v, &String::from("abcde")));
    }

    #[test]
    fn length_counts_chars() {
        let v = length(5, 5);
        assert!(check(&v, &String::from("héllo")));
    }

    #[test]
    fn absent_values_pass() {
        let v = length(2, 4);
        assert!(check(&v, &None::<String>));
        assert!(check(&v, &Some(String::from("abc"))));
        assert!(!check(&v, &Some(String::from("a"))));
    }

    #[test]
    fn length_writes_args_on_failure() {
        let v = length(5, 10);
        let mut ctx = ValidationContext::new(&());
        let value = String::from("Matthew Leibowitz");
        assert!(!RuleValidator::<(), String>::is_valid(&v, &mut ctx, &value));
        assert_eq!(
            ctx.formatter().get("TotalLength"),
            Some(&serde_json::json!(17))
        );
    }

    #[test]
    fn min_and_max_length() {
        assert!(check(&min_length(3), &String::from("abc")));
        assert!(!check(&min_length(3), &String::from("ab")));
        assert!(check(&max_length(3), &String::from("abc")));
        assert!(!check(&max_length(3), &String::from("abcd")));
    }

    #[test]
    fn exact_length_matches_only_one_size() {
        assert!(check(&exact_length(3), &String::from("abc")));
        assert!(!check(&exact_length(3), &String::from("ab")));
        assert!(!check(&exact_length(3), &String::from("abcd")));
    }

    #[test]
    fn collections_measure_elements() {
        let v = length(1, 2);
        assert!(check(&v, &vec![1, 2]));
        assert!(!check(&v, &vec![1, 2, 3]));
    }
}
