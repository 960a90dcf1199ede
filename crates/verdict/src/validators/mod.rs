//! Built-in validator units
//!
//! A representative set of constraint checks, all implementing the
//! [`RuleValidator`](crate::foundation::RuleValidator) contract:
//!
//! - **Comparison**: [`InclusiveBetween`], [`ExclusiveBetween`],
//!   [`GreaterThan`], [`LessThan`], [`Equal`], [`NotEqual`]
//! - **Length**: [`Length`], [`MinLength`], [`MaxLength`], [`ExactLength`]
//! - **Presence**: [`Required`], [`NotEmpty`]
//! - **Format**: [`Matches`]
//! - **Predicate**: [`Must`]
//!
//! Every comparison, length and format unit treats an absent value as
//! trivially valid; only the presence units reject absence. Each unit also
//! has a lowercase factory function (`inclusive_between(5, 10)`,
//! `not_empty()`, …) for fluent rule declarations.

pub mod equality;
pub mod length;
pub mod pattern;
pub mod predicate;
pub mod presence;
pub mod range;

pub use equality::{Equal, NotEqual, equal, not_equal};
pub use length::{
    ExactLength, Length, MaxLength, MinLength, exact_length, length, max_length, min_length,
};
pub use pattern::{Matches, matches};
pub use predicate::{Must, must};
pub use presence::{NotEmpty, Required, not_empty, required};
pub use range::{
    ExclusiveBetween, GreaterThan, InclusiveBetween, LessThan, exclusive_between, greater_than,
    inclusive_between, less_than,
};
