//! Equality units

use serde::Serialize;

crate::unit! {
    /// Checks that a value equals a comparison value.
    pub Equal<U: PartialEq + Serialize> { other: U };
    kind = "equal";
    template = "'{PropertyName}' must be equal to {ComparisonValue}.";
    valid(self, value) { *value == self.other }
    args(self, value, fmt) {
        fmt.insert("ComparisonValue", &self.other);
        fmt.insert("Value", value);
    }
    fn equal(other: U);
}

crate::unit! {
    /// Checks that a value differs from a comparison value.
    pub NotEqual<U: PartialEq + Serialize> { other: U };
    kind = "not_equal";
    template = "'{PropertyName}' must not be equal to {ComparisonValue}.";
    valid(self, value) { *value != self.other }
    args(self, value, fmt) {
        fmt.insert("ComparisonValue", &self.other);
        fmt.insert("Value", value);
    }
    fn not_equal(other: U);
}
