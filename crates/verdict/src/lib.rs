//! # verdict
//!
//! A declarative rule-validation engine for domain objects: declare rules
//! against selected members (or the whole object), evaluate them against an
//! instance, and collect structured failures describing what violated which
//! constraint — outside of any transport or framework.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use verdict::prelude::*;
//!
//! struct Person {
//!     surname: String,
//!     age: Option<u32>,
//! }
//!
//! let validator = Validator::new()
//!     .rule(
//!         Rule::for_member(member!(Person, surname))
//!             .validator(not_empty())
//!             .validator(length(2, 40)),
//!     )
//!     .rule(
//!         Rule::for_member(member!(Person, age))
//!             .validator(inclusive_between(18, 130))
//!             .when(|ctx| !ctx.instance().surname.is_empty(), ApplyConditionTo::AllValidators),
//!     );
//!
//! let outcome = validator.validate(&person);
//! for failure in outcome.failures() {
//!     println!("{failure}");
//! }
//! ```
//!
//! ## Concepts
//!
//! - A [`Rule`](rule::Rule) binds an ordered list of validator units to one
//!   member (or the whole object), with a cascade policy, shared conditions,
//!   rule-set labels, and optional dependent rules that run only when the
//!   owner passed.
//! - Conditions come in synchronous and asynchronous forms and *compose*:
//!   repeated `when`/`unless` refinements AND together rather than
//!   overwriting each other.
//! - Validation failures are data, collected into a
//!   [`ValidationOutcome`](foundation::ValidationOutcome); only cancellation
//!   of an asynchronous run surfaces as an `Err`.
//!
//! ## Built-in Units
//!
//! - **Comparison**: [`InclusiveBetween`](validators::InclusiveBetween),
//!   [`GreaterThan`](validators::GreaterThan), [`Equal`](validators::Equal), …
//! - **Length**: [`Length`](validators::Length),
//!   [`MinLength`](validators::MinLength), …
//! - **Presence**: [`Required`](validators::Required),
//!   [`NotEmpty`](validators::NotEmpty)
//! - **Format**: [`Matches`](validators::Matches)
//! - **Predicate**: [`Must`](validators::Must)

// Deeply generic boxed closure types (conditions, accessors, message
// builders) are inherent to the type-erased rule architecture.
#![allow(clippy::type_complexity)]

pub mod foundation;
mod macros;
pub mod prelude;
pub mod rule;
pub mod validator;
pub mod validators;

pub use validator::Validator;
