//! Prelude module for convenient imports.
//!
//! Provides a single `use verdict::prelude::*;` import that brings in the
//! engine types, the unit contracts, and all built-in validator factories.
//!
//! # Examples
//!
//! ```rust,ignore
//! use verdict::prelude::*;
//!
//! let validator = Validator::new()
//!     .rule(Rule::for_member(member!(Person, surname)).validator(length(5, 10)))
//!     .rule(Rule::for_member(member!(Person, age)).validator(inclusive_between(18, 60)));
//! ```

// ============================================================================
// FOUNDATION: unit contracts, failures, context, member binding
// ============================================================================

pub use crate::foundation::{
    AsyncRuleValidator, Cancelled, Lengthy, MemberAccessor, MessageFormatter, Presence,
    RuleSetSelection, RuleValidator, Severity, Textual, ValidationContext, ValidationFailure,
    ValidationOutcome,
};

// ============================================================================
// RULE ENGINE: rules, conditions, cascade
// ============================================================================

pub use crate::rule::{
    ApplyConditionTo, Cascade, CascadeCell, CascadeMode, Condition, ErasedRule, Rule,
    process_default_cascade, split_pascal_case,
};

// ============================================================================
// VALIDATORS: all built-in units and factories
// ============================================================================

#[allow(clippy::wildcard_imports)]
pub use crate::validators::*;

// ============================================================================
// AGGREGATE VALIDATOR
// ============================================================================

pub use crate::validator::Validator;
