//! Core building blocks of the validation engine
//!
//! This module contains the pieces everything else composes over:
//!
//! - **Unit contracts**: [`RuleValidator`], [`AsyncRuleValidator`]
//! - **Failures**: [`ValidationFailure`], [`ValidationOutcome`], [`Severity`],
//!   [`Cancelled`]
//! - **Context**: [`ValidationContext`], [`RuleSetSelection`],
//!   [`MessageFormatter`]
//! - **Member binding**: [`MemberAccessor`]
//! - **Value views**: [`Presence`], [`Lengthy`], [`Textual`]
//!
//! # Architecture
//!
//! Validator units are generic over the value type, giving compile-time
//! guarantees that a rule only carries units matching its member's value
//! type. Failures are plain data: a failing check contributes a record to the
//! result sequence and never raises an error. The context is created per
//! top-level validation call and threaded by reference through every nested
//! rule invocation.

pub mod context;
pub mod failure;
pub mod member;
pub mod traits;
pub mod value;

pub use context::{MessageFormatter, RuleSetSelection, ValidationContext};
pub use failure::{Cancelled, Severity, ValidationFailure, ValidationOutcome};
pub use member::MemberAccessor;
pub use traits::{AsyncRuleValidator, DEFAULT_TEMPLATE, RuleValidator};
pub use value::{Lengthy, Presence, Textual};
