//! Macros for declaring validator units and member accessors with minimal
//! boilerplate.
//!
//! # Available Macros
//!
//! - [`unit!`] — Create a complete comparison unit (struct + `RuleValidator`
//!   impl + factory fn) with the absent-value passthrough built in
//! - [`member!`] — Build a [`MemberAccessor`](crate::foundation::MemberAccessor)
//!   from a field name
//!
//! # Examples
//!
//! ```rust,ignore
//! use serde::Serialize;
//!
//! verdict::unit! {
//!     /// Checks that a comparable value stays below a ceiling.
//!     pub Below<U: PartialOrd + Serialize> { ceiling: U };
//!     kind = "below";
//!     template = "'{PropertyName}' must be below {Ceiling}.";
//!     valid(self, value) { *value < self.ceiling }
//!     args(self, value, fmt) {
//!         fmt.insert("Ceiling", &self.ceiling);
//!         fmt.insert("Value", value);
//!     }
//!     fn below(ceiling: U);
//! }
//! ```

// ============================================================================
// UNIT MACRO
// ============================================================================

/// Creates a complete comparison validator unit: struct definition,
/// constructor, `RuleValidator` implementation, and factory function.
///
/// `#[derive(Debug, Clone)]` is always applied. The generated `is_valid`
/// observes the value through [`Presence`](crate::foundation::Presence), so
/// an absent value passes without running the check — rejecting absence is
/// the presence units' job. On failure the `args` block runs with write
/// access to the message formatter before `false` is returned.
///
/// Trait bounds must be simple identifiers (use imports for paths).
///
/// ```rust,ignore
/// use serde::Serialize;
///
/// verdict::unit! {
///     /// Checks that a comparable value does not exceed a bound.
///     pub AtMost<U: PartialOrd + Serialize> { bound: U };
///     kind = "at_most";
///     template = "'{PropertyName}' must be at most {Bound}.";
///     valid(self, value) { *value <= self.bound }
///     args(self, value, fmt) {
///         fmt.insert("Bound", &self.bound);
///         fmt.insert("Value", value);
///     }
///     fn at_most(bound: U);
/// }
/// ```
#[macro_export]
macro_rules! unit {
    // ── Variant 1a: generic struct + factory fn ──────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident<$gen:ident: $first_bound:ident $(+ $rest_bound:ident)*>
            { $($field:ident: $fty:ty),+ $(,)? };
        kind = $kind:literal;
        template = $template:literal;
        valid($self_:ident, $value:ident) $rule:block
        args($self2:ident, $value2:ident, $fmt:ident) $args:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?);
    ) => {
        $crate::unit! {
            $(#[$meta])*
            $vis $name<$gen: $first_bound $(+ $rest_bound)*> { $($field: $fty),+ };
            kind = $kind;
            template = $template;
            valid($self_, $value) $rule
            args($self2, $value2, $fmt) $args
        }

        #[must_use]
        $vis fn $factory<$gen: $first_bound $(+ $rest_bound)*>($($farg: $faty),*) -> $name<$gen> {
            $name::new($($farg),*)
        }
    };

    // ── Variant 1b: generic struct, no factory ───────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident<$gen:ident: $first_bound:ident $(+ $rest_bound:ident)*>
            { $($field:ident: $fty:ty),+ $(,)? };
        kind = $kind:literal;
        template = $template:literal;
        valid($self_:ident, $value:ident) $rule:block
        args($self2:ident, $value2:ident, $fmt:ident) $args:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name<$gen> {
            $(pub $field: $fty,)+
        }

        impl<$gen: $first_bound $(+ $rest_bound)*> $name<$gen> {
            #[must_use]
            pub fn new($($field: $fty),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl<T, $gen, V> $crate::foundation::RuleValidator<T, V> for $name<$gen>
        where
            $gen: $first_bound $(+ $rest_bound)* + ::std::marker::Send + ::std::marker::Sync,
            V: $crate::foundation::Presence<$gen>,
        {
            fn kind(&self) -> &'static str {
                $kind
            }

            fn template(&self) -> &str {
                $template
            }

            fn is_valid(
                &$self_,
                ctx: &mut $crate::foundation::ValidationContext<'_, T>,
                value: &V,
            ) -> bool {
                // Absent values are never a violation for comparison units.
                let ::std::option::Option::Some($value) =
                    $crate::foundation::Presence::present(value)
                else {
                    return true;
                };
                if $rule {
                    return true;
                }
                let $value2 = $value;
                let $fmt = ctx.formatter_mut();
                $args
                false
            }
        }
    };
}

// ============================================================================
// MEMBER MACRO
// ============================================================================

/// Builds a [`MemberAccessor`](crate::foundation::MemberAccessor) from an
/// owner type and a field name. The accessor's name is the stringified field.
///
/// ```rust,ignore
/// let accessor = verdict::member!(Person, surname);
/// assert_eq!(accessor.name(), "surname");
/// ```
#[macro_export]
macro_rules! member {
    ($owner:ty, $field:ident) => {
        $crate::foundation::MemberAccessor::new(stringify!($field), |instance: &$owner| {
            &instance.$field
        })
    };
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::foundation::{RuleValidator, ValidationContext};
    use serde::Serialize;

    unit! {
        /// Test unit: value must be at least a floor.
        AtLeast<U: PartialOrd + Serialize> { floor: U };
        kind = "at_least";
        template = "'{PropertyName}' must be at least {Floor}.";
        valid(self, value) { *value >= self.floor }
        args(self, value, fmt) {
            fmt.insert("Floor", &self.floor);
            fmt.insert("Value", value);
        }
        fn at_least(floor: U);
    }

    fn check<V, R>(unit: &R, value: &V) -> bool
    where
        R: RuleValidator<(), V>,
    {
        let mut ctx = ValidationContext::new(&());
        unit.is_valid(&mut ctx, value)
    }

    #[test]
    fn generated_unit_validates() {
        let v = AtLeast::new(5);
        assert!(check(&v, &5));
        assert!(check(&v, &9));
        assert!(!check(&v, &4));
    }

    #[test]
    fn generated_factory_works() {
        let v = at_least(2.5_f64);
        assert!(check(&v, &3.0));
        assert!(!check(&v, &2.0));
    }

    #[test]
    fn absent_values_pass_without_running_the_check() {
        let v = at_least(5);
        assert!(check(&v, &None::<i32>));
        assert!(check(&v, &Some(7)));
        assert!(!check(&v, &Some(3)));
    }

    #[test]
    fn failure_writes_message_args() {
        let v = at_least(5);
        let mut ctx = ValidationContext::new(&());
        assert!(!RuleValidator::<(), i32>::is_valid(&v, &mut ctx, &3));
        assert_eq!(ctx.formatter().get("Floor"), Some(&serde_json::json!(5)));
        assert_eq!(ctx.formatter().get("Value"), Some(&serde_json::json!(3)));
    }

    #[test]
    fn generated_kind_and_template() {
        let v = at_least(1);
        assert_eq!(RuleValidator::<(), i32>::kind(&v), "at_least");
        assert!(RuleValidator::<(), i32>::template(&v).contains("{Floor}"));
    }

    #[test]
    fn member_macro_reads_fields() {
        struct Person {
            surname: String,
        }
        let accessor = member!(Person, surname);
        let person = Person {
            surname: "Smith".into(),
        };
        assert_eq!(accessor.name(), "surname");
        assert_eq!(accessor.get(&person), "Smith");
    }
}
