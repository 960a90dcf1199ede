//! Numeric and ordering comparison units
//!
//! All comparison units treat an absent value as trivially valid; rejecting
//! absence belongs to the presence units.

use serde::Serialize;

crate::unit! {
    /// Checks that a comparable value falls within an inclusive range.
    ///
    /// Valid when the value is absent or `from <= value <= to`, inclusive on
    /// both ends. On failure the unit writes `From`, `To` and `Value` into
    /// the message formatter.
    pub InclusiveBetween<U: PartialOrd + Serialize> { from: U, to: U };
    kind = "inclusive_between";
    template = "'{PropertyName}' must be between {From} and {To}. You entered {Value}.";
    valid(self, value) { *value >= self.from && *value <= self.to }
    args(self, value, fmt) {
        fmt.insert("From", &self.from);
        fmt.insert("To", &self.to);
        fmt.insert("Value", value);
    }
    fn inclusive_between(from: U, to: U);
}

crate::unit! {
    /// Checks that a comparable value falls strictly between two bounds.
    pub ExclusiveBetween<U: PartialOrd + Serialize> { from: U, to: U };
    kind = "exclusive_between";
    template = "'{PropertyName}' must be between {From} and {To} (exclusive). You entered {Value}.";
    valid(self, value) { *value > self.from && *value < self.to }
    args(self, value, fmt) {
        fmt.insert("From", &self.from);
        fmt.insert("To", &self.to);
        fmt.insert("Value", value);
    }
    fn exclusive_between(from: U, to: U);
}

crate::unit! {
    /// Checks that a comparable value is strictly greater than a bound.
    pub GreaterThan<U: PartialOrd + Serialize> { bound: U };
    kind = "greater_than";
    template = "'{PropertyName}' must be greater than {ComparisonValue}.";
    valid(self, value) { *value > self.bound }
    args(self, value, fmt) {
        fmt.insert("ComparisonValue", &self.bound);
        fmt.insert("Value", value);
    }
    fn greater_than(bound: U);
}

crate::unit! {
    /// Checks that a comparable value is strictly less than a bound.
    pub LessThan<U: PartialOrd + Serialize> { bound: U };
    kind = "less_than";
    template = "'{PropertyName}' must be less than {ComparisonValue}.";
    valid(self, value) { *value < self.bound }
    args(self, value, fmt) {
        fmt.insert("ComparisonValue", &self.bound);
        fmt.insert("Value", value);
    }
    fn less_than(bound: U);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{RuleValidator, ValidationContext};

    fn check<V, R>(unit: &R, value: &V) -> bool
    where
        R: RuleValidator<(), V>,
    {
        let mut ctx = ValidationContext::new(&());
        unit.is_valid(&mut ctx, value)
    }

    #[test]
    fn inclusive_between_accepts_both_ends() {
        let v = inclusive_between(5, 10);
        assert!(check(&v, &5));
        assert!(check(&v, &7));
        assert!(check(&v, &10));
        assert!(!check(&v, &4));
        assert!(!check(&v, &11));
    }

    #[test]
    fn inclusive_between_passes_absent_values() {
        let v = inclusive_between(5, 10);
        assert!(check(&v, &None::<i32>));
        assert!(check(&v, &Some(7)));
        assert!(!check(&v, &Some(11)));
    }

    #[test]
    fn inclusive_between_writes_from_to_value() {
        let v = inclusive_between(18, 60);
        let mut ctx = ValidationContext::new(&());
        assert!(!RuleValidator::<(), i32>::is_valid(&v, &mut ctx, &17));
        assert_eq!(ctx.formatter().get("From"), Some(&serde_json::json!(18)));
        assert_eq!(ctx.formatter().get("To"), Some(&serde_json::json!(60)));
        assert_eq!(ctx.formatter().get("Value"), Some(&serde_json::json!(17)));
    }

    #[test]
    fn exclusive_between_rejects_both_ends() {
        let v = exclusive_between(0, 10);
        assert!(check(&v, &5));
        assert!(!check(&v, &0));
        assert!(!check(&v, &10));
    }

    #[test]
    fn greater_and_less_than_are_strict() {
        assert!(check(&greater_than(5), &6));
        assert!(!check(&greater_than(5), &5));
        assert!(check(&less_than(5), &4));
        assert!(!check(&less_than(5), &5));
    }

    #[test]
    fn comparisons_work_on_floats() {
        let v = inclusive_between(0.5_f64, 1.5_f64);
        assert!(check(&v, &1.0));
        assert!(!check(&v, &2.0));
    }
}
