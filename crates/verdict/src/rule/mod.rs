//! Rule composition and execution
//!
//! A [`Rule`] owns an ordered list of validator units for one member (or the
//! whole object), a cascade policy, a display-name resolver, shared
//! conditions, rule-set labels, and an optional list of nested dependent
//! rules. Execution lives in [`executor`]; the composition surface lives
//! here.
//!
//! Rules are declared once (typically at startup) and then invoked
//! concurrently by many simultaneous validation calls. Mutation operations
//! (`add_validator`, `replace_validator`, …) must not race with runs on the
//! same rule — single-writer/many-reader discipline, enforced by the caller.

pub mod cascade;
pub mod condition;
pub mod display;
mod executor;
pub mod unit;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::foundation::{
    AsyncRuleValidator, Cancelled, MemberAccessor, RuleValidator, Severity, ValidationContext,
    ValidationFailure,
};
use crate::validators::Must;

pub use cascade::{Cascade, CascadeCell, CascadeMode, process_default_cascade};
pub use condition::{ApplyConditionTo, AsyncConditionFn, Condition, SyncConditionFn};
pub use display::{DisplayName, DisplayNameFn, split_pascal_case};
pub use unit::{MessageBuilderFn, MessageSource, RuleUnit, UnitValidator};

/// Callback invoked once per validated instance when a rule failed.
pub type OnFailureFn<T> = Arc<dyn Fn(&T, &[ValidationFailure]) + Send + Sync>;

// ============================================================================
// ERASED RULE
// ============================================================================

/// Object-safe view of a rule, independent of its value type.
///
/// Dependent rules and aggregate validators hold rules through this trait so
/// that rules over different members (and value types) of the same model can
/// be stored side by side.
#[async_trait]
pub trait ErasedRule<T>: Send + Sync {
    /// Runs the rule synchronously, yielding its failures.
    fn run(&self, ctx: &mut ValidationContext<'_, T>) -> Vec<ValidationFailure>;

    /// Runs the rule asynchronously. A cancelled context aborts the rule and
    /// discards its partial failures.
    async fn run_async(
        &self,
        ctx: &mut ValidationContext<'_, T>,
    ) -> Result<Vec<ValidationFailure>, Cancelled>;

    /// Composes a synchronous condition onto this rule's units per `scope`.
    fn apply_condition(&mut self, condition: SyncConditionFn<T>, scope: ApplyConditionTo);

    /// Composes an asynchronous condition onto this rule's units per `scope`.
    fn apply_async_condition(&mut self, condition: AsyncConditionFn<T>, scope: ApplyConditionTo);
}

// ============================================================================
// VALUE SOURCE
// ============================================================================

/// Where a rule reads the value it validates.
pub(crate) enum ValueSource<T, V> {
    /// A bound member of the instance.
    Member(MemberAccessor<T, V>),
    /// The whole instance (model-level rule).
    Model(Arc<dyn Fn(&T) -> &V + Send + Sync>),
}

impl<T, V> ValueSource<T, V> {
    fn extract<'a>(&self, instance: &'a T) -> &'a V {
        match self {
            ValueSource::Member(member) => member.get(instance),
            ValueSource::Model(extract) => extract(instance),
        }
    }

    fn name(&self) -> &str {
        match self {
            ValueSource::Member(member) => member.name(),
            ValueSource::Model(_) => "",
        }
    }
}

// ============================================================================
// RULE
// ============================================================================

/// A named, conditioned, cascading group of validator units bound to one
/// member or the whole object.
///
/// # Examples
///
/// ```rust,ignore
/// use verdict::prelude::*;
///
/// let rule = Rule::for_member(member!(Person, surname))
///     .validator(Length::new(5, 10))
///     .with_message("Surname length is off");
/// ```
pub struct Rule<T, V> {
    source: ValueSource<T, V>,
    units: Vec<RuleUnit<T, V>>,
    cascade: Cascade,
    shared_condition: Condition<T>,
    rule_sets: Vec<Cow<'static, str>>,
    display_name: DisplayName<T>,
    on_failure: Option<OnFailureFn<T>>,
    dependent: Vec<Box<dyn ErasedRule<T>>>,
}

impl<T: 'static, V> Rule<T, V> {
    fn with_source(source: ValueSource<T, V>) -> Self {
        Self {
            source,
            units: Vec::new(),
            cascade: Cascade::Default,
            shared_condition: Condition::None,
            rule_sets: Vec::new(),
            display_name: DisplayName::Unset,
            on_failure: None,
            dependent: Vec::new(),
        }
    }

    /// Declares a rule over one member of `T`.
    #[must_use]
    pub fn for_member(member: MemberAccessor<T, V>) -> Self {
        Self::with_source(ValueSource::Member(member))
    }

    /// The bound member's name; empty for model-level rules.
    #[must_use]
    pub fn property_name(&self) -> &str {
        self.source.name()
    }

    /// Number of validator units currently attached.
    #[must_use]
    pub fn validator_count(&self) -> usize {
        self.units.len()
    }

    /// The rule-set labels this rule carries.
    #[must_use]
    pub fn rule_sets(&self) -> &[Cow<'static, str>] {
        &self.rule_sets
    }

    // ------------------------------------------------------------------
    // Mutation contract
    // ------------------------------------------------------------------

    /// Appends a synchronous validator unit.
    pub fn add_validator(&mut self, validator: Arc<dyn RuleValidator<T, V>>) {
        self.units
            .push(RuleUnit::new(UnitValidator::Sync(validator)));
    }

    /// Appends an asynchronous validator unit.
    pub fn add_async_validator(&mut self, validator: Arc<dyn AsyncRuleValidator<T, V>>) {
        self.units
            .push(RuleUnit::new(UnitValidator::Async(validator)));
    }

    /// Swaps the validator held by the unit carrying `old` for `new`,
    /// preserving the unit's position and configuration. No-op when `old` is
    /// not attached to this rule.
    pub fn replace_validator(
        &mut self,
        old: &Arc<dyn RuleValidator<T, V>>,
        new: Arc<dyn RuleValidator<T, V>>,
    ) {
        if let Some(unit) = self.units.iter_mut().find(|u| holds(u, old)) {
            unit.validator = UnitValidator::Sync(new);
        }
    }

    /// Detaches the unit carrying `target`. No-op when `target` is not
    /// attached to this rule.
    pub fn remove_validator(&mut self, target: &Arc<dyn RuleValidator<T, V>>) {
        self.units.retain(|u| !holds(u, target));
    }

    /// Removes every validator unit.
    pub fn clear_validators(&mut self) {
        self.units.clear();
    }

    /// The most-recently-added unit, for per-unit configuration.
    ///
    /// # Panics
    ///
    /// Panics when no validator has been added yet — configuring a unit that
    /// does not exist is a declaration bug, not a recoverable state.
    pub fn current_unit(&mut self) -> &mut RuleUnit<T, V> {
        self.units
            .last_mut()
            .expect("no validator has been added to this rule yet")
    }

    // ------------------------------------------------------------------
    // Conditions
    // ------------------------------------------------------------------

    /// Composes a synchronous condition onto the units selected by `scope`;
    /// with [`ApplyConditionTo::AllValidators`] the condition also reaches
    /// every dependent rule.
    pub fn apply_condition(&mut self, condition: SyncConditionFn<T>, scope: ApplyConditionTo) {
        match scope {
            ApplyConditionTo::AllValidators => {
                for unit in &mut self.units {
                    unit.compose_condition(Arc::clone(&condition));
                }
                for dependent in &mut self.dependent {
                    dependent.apply_condition(Arc::clone(&condition), scope);
                }
            }
            ApplyConditionTo::CurrentValidator => {
                self.current_unit().compose_condition(condition);
            }
        }
    }

    /// Asynchronous counterpart of [`Rule::apply_condition`].
    pub fn apply_async_condition(
        &mut self,
        condition: AsyncConditionFn<T>,
        scope: ApplyConditionTo,
    ) {
        match scope {
            ApplyConditionTo::AllValidators => {
                for unit in &mut self.units {
                    unit.compose_async_condition(Arc::clone(&condition));
                }
                for dependent in &mut self.dependent {
                    dependent.apply_async_condition(Arc::clone(&condition), scope);
                }
            }
            ApplyConditionTo::CurrentValidator => {
                self.current_unit().compose_async_condition(condition);
            }
        }
    }

    /// Composes a synchronous shared condition, checked once per rule
    /// invocation. A false shared condition skips the whole rule, dependent
    /// rules included, without evaluating any unit's own condition.
    ///
    /// # Panics
    ///
    /// Panics if the rule already carries an asynchronous shared condition.
    pub fn apply_shared_condition(&mut self, condition: SyncConditionFn<T>) {
        self.shared_condition =
            std::mem::take(&mut self.shared_condition).and_sync(condition);
    }

    /// Asynchronous counterpart of [`Rule::apply_shared_condition`].
    ///
    /// # Panics
    ///
    /// Panics if the rule already carries a synchronous shared condition.
    pub fn apply_shared_async_condition(&mut self, condition: AsyncConditionFn<T>) {
        self.shared_condition =
            std::mem::take(&mut self.shared_condition).and_async(condition);
    }

    // ------------------------------------------------------------------
    // Display name
    // ------------------------------------------------------------------

    /// Sets a fixed display name, clearing any factory.
    pub fn set_display_name(&mut self, name: impl Into<Cow<'static, str>>) {
        self.display_name = DisplayName::Fixed(name.into());
    }

    /// Sets a display-name factory, clearing any fixed name.
    pub fn set_display_name_fn<F>(&mut self, factory: F)
    where
        F: Fn(&ValidationContext<'_, T>) -> String + Send + Sync + 'static,
    {
        self.display_name = DisplayName::Factory(Arc::new(factory));
    }

    /// Resolves the display name for one invocation: factory, else fixed
    /// name, else the pascal-case split of the member name.
    #[must_use]
    pub fn display_name(&self, ctx: &ValidationContext<'_, T>) -> String {
        self.display_name.resolve(ctx, self.property_name())
    }

    // ------------------------------------------------------------------
    // Fluent declaration surface
    // ------------------------------------------------------------------

    /// Appends a synchronous validator and continues the chain.
    #[must_use = "builder methods must be chained or built"]
    pub fn validator(mut self, validator: impl RuleValidator<T, V> + 'static) -> Self {
        self.add_validator(Arc::new(validator));
        self
    }

    /// Appends an asynchronous validator and continues the chain.
    #[must_use = "builder methods must be chained or built"]
    pub fn async_validator(mut self, validator: impl AsyncRuleValidator<T, V> + 'static) -> Self {
        self.add_async_validator(Arc::new(validator));
        self
    }

    /// Appends a predicate validator over `(instance, value)`.
    #[must_use = "builder methods must be chained or built"]
    pub fn must<F>(self, predicate: F) -> Self
    where
        F: Fn(&T, &V) -> bool + Send + Sync + 'static,
    {
        self.validator(Must::new(predicate))
    }

    /// Overrides the failure message of the most-recently-added unit.
    ///
    /// # Panics
    ///
    /// Panics when no validator has been added yet.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.current_unit().set_message_template(template);
        self
    }

    /// Overrides the failure message of the most-recently-added unit with a
    /// builder closure.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message_fn<F>(mut self, builder: F) -> Self
    where
        F: Fn(&ValidationContext<'_, T>, &V) -> String + Send + Sync + 'static,
    {
        self.current_unit().set_message_builder(builder);
        self
    }

    /// Overrides the failure code of the most-recently-added unit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.current_unit().set_code(code);
        self
    }

    /// Sets the severity of the most-recently-added unit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.current_unit().set_severity(severity);
        self
    }

    /// Attaches custom state to the most-recently-added unit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_state(mut self, state: serde_json::Value) -> Self {
        self.current_unit().set_state(state);
        self
    }

    /// Gates units (per `scope`) on a synchronous condition.
    #[must_use = "builder methods must be chained or built"]
    pub fn when<C>(mut self, condition: C, scope: ApplyConditionTo) -> Self
    where
        C: Fn(&ValidationContext<'_, T>) -> bool + Send + Sync + 'static,
    {
        self.apply_condition(Arc::new(condition), scope);
        self
    }

    /// Gates units (per `scope`) on the negation of a synchronous condition.
    #[must_use = "builder methods must be chained or built"]
    pub fn unless<C>(self, condition: C, scope: ApplyConditionTo) -> Self
    where
        C: Fn(&ValidationContext<'_, T>) -> bool + Send + Sync + 'static,
    {
        self.when(
            move |ctx: &ValidationContext<'_, T>| !condition(ctx),
            scope,
        )
    }

    /// Gates units (per `scope`) on an asynchronous condition.
    #[must_use = "builder methods must be chained or built"]
    pub fn when_async<C>(mut self, condition: C, scope: ApplyConditionTo) -> Self
    where
        C: Fn(&ValidationContext<'_, T>) -> BoxFuture<'static, bool> + Send + Sync + 'static,
    {
        self.apply_async_condition(Arc::new(condition), scope);
        self
    }

    /// Gates units (per `scope`) on the negation of an asynchronous
    /// condition.
    #[must_use = "builder methods must be chained or built"]
    pub fn unless_async<C>(self, condition: C, scope: ApplyConditionTo) -> Self
    where
        C: Fn(&ValidationContext<'_, T>) -> BoxFuture<'static, bool> + Send + Sync + 'static,
    {
        self.when_async(
            move |ctx: &ValidationContext<'_, T>| -> BoxFuture<'static, bool> {
                let pending = condition(ctx);
                Box::pin(async move { !pending.await })
            },
            scope,
        )
    }

    /// Sets a synchronous shared condition (fluent form of
    /// [`Rule::apply_shared_condition`]).
    #[must_use = "builder methods must be chained or built"]
    pub fn shared_when<C>(mut self, condition: C) -> Self
    where
        C: Fn(&ValidationContext<'_, T>) -> bool + Send + Sync + 'static,
    {
        self.apply_shared_condition(Arc::new(condition));
        self
    }

    /// Sets an asynchronous shared condition (fluent form of
    /// [`Rule::apply_shared_async_condition`]).
    #[must_use = "builder methods must be chained or built"]
    pub fn shared_when_async<C>(mut self, condition: C) -> Self
    where
        C: Fn(&ValidationContext<'_, T>) -> BoxFuture<'static, bool> + Send + Sync + 'static,
    {
        self.apply_shared_async_condition(Arc::new(condition));
        self
    }

    /// Sets a fixed display name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.set_display_name(name);
        self
    }

    /// Sets a display-name factory.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_name_fn<F>(mut self, factory: F) -> Self
    where
        F: Fn(&ValidationContext<'_, T>) -> String + Send + Sync + 'static,
    {
        self.set_display_name_fn(factory);
        self
    }

    /// Tags the rule with rule-set labels.
    #[must_use = "builder methods must be chained or built"]
    pub fn in_rule_sets<I>(mut self, sets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Cow<'static, str>>,
    {
        self.rule_sets.extend(sets.into_iter().map(Into::into));
        self
    }

    /// Fixes the cascade mode for this rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn cascade(mut self, mode: CascadeMode) -> Self {
        self.cascade = Cascade::Fixed(mode);
        self
    }

    /// Resolves the cascade mode through a caller-owned cell at evaluation
    /// time.
    #[must_use = "builder methods must be chained or built"]
    pub fn cascade_cell(mut self, cell: Arc<CascadeCell>) -> Self {
        self.cascade = Cascade::Cell(cell);
        self
    }

    /// Registers a callback invoked once per validated instance when this
    /// rule produced failures. Dependent-rule failures are not included.
    #[must_use = "builder methods must be chained or built"]
    pub fn on_failure<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T, &[ValidationFailure]) + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(callback));
        self
    }

    /// Nests a dependent rule, executed only when this rule produced zero
    /// failures.
    #[must_use = "builder methods must be chained or built"]
    pub fn dependent<R>(mut self, rule: R) -> Self
    where
        R: ErasedRule<T> + 'static,
    {
        self.dependent.push(Box::new(rule));
        self
    }

    // Internal accessors for the executor.

    pub(crate) fn source(&self) -> &ValueSource<T, V> {
        &self.source
    }

    pub(crate) fn units(&self) -> &[RuleUnit<T, V>] {
        &self.units
    }

    pub(crate) fn cascade_source(&self) -> &Cascade {
        &self.cascade
    }

    pub(crate) fn shared_condition(&self) -> &Condition<T> {
        &self.shared_condition
    }

    pub(crate) fn dependent_rules(&self) -> &[Box<dyn ErasedRule<T>>] {
        &self.dependent
    }

    pub(crate) fn on_failure_callback(&self) -> Option<&OnFailureFn<T>> {
        self.on_failure.as_ref()
    }
}

impl<T: 'static> Rule<T, T> {
    /// Declares a model-level rule: no member is bound and the whole
    /// instance is the value under validation.
    #[must_use]
    pub fn model() -> Self {
        Self::with_source(ValueSource::Model(Arc::new(|instance: &T| instance)))
    }
}

fn holds<T, V>(unit: &RuleUnit<T, V>, validator: &Arc<dyn RuleValidator<T, V>>) -> bool {
    match &unit.validator {
        UnitValidator::Sync(held) => Arc::ptr_eq(held, validator),
        UnitValidator::Async(_) => false,
    }
}

impl<T: 'static, V> fmt::Debug for Rule<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("property_name", &self.property_name())
            .field("validators", &self.units.len())
            .field("rule_sets", &self.rule_sets)
            .field("dependent", &self.dependent.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::Length;

    struct Person {
        surname: String,
    }

    fn surname_rule() -> Rule<Person, String> {
        Rule::for_member(MemberAccessor::new("Surname", |p: &Person| &p.surname))
    }

    #[test]
    fn replace_validator_is_a_noop_when_absent() {
        let mut rule = surname_rule();
        let attached: Arc<dyn RuleValidator<Person, String>> = Arc::new(Length::new(1, 5));
        let stranger: Arc<dyn RuleValidator<Person, String>> = Arc::new(Length::new(2, 3));
        rule.add_validator(Arc::clone(&attached));

        rule.replace_validator(&stranger, Arc::new(Length::new(7, 9)));
        assert_eq!(rule.validator_count(), 1);
        assert_eq!(rule.current_unit().kind(), "length");
    }

    #[test]
    fn remove_validator_is_a_noop_when_absent() {
        let mut rule = surname_rule();
        let attached: Arc<dyn RuleValidator<Person, String>> = Arc::new(Length::new(1, 5));
        let stranger: Arc<dyn RuleValidator<Person, String>> = Arc::new(Length::new(2, 3));
        rule.add_validator(Arc::clone(&attached));

        rule.remove_validator(&stranger);
        assert_eq!(rule.validator_count(), 1);

        rule.remove_validator(&attached);
        assert_eq!(rule.validator_count(), 0);
    }

    #[test]
    fn clear_validators_empties_the_rule() {
        let mut rule = surname_rule();
        rule.add_validator(Arc::new(Length::new(1, 5)));
        rule.add_validator(Arc::new(Length::new(2, 6)));
        rule.clear_validators();
        assert_eq!(rule.validator_count(), 0);
    }

    #[test]
    #[should_panic(expected = "no validator has been added")]
    fn current_unit_panics_on_empty_rule() {
        let mut rule = surname_rule();
        let _ = rule.current_unit();
    }

    #[test]
    fn display_name_setters_are_mutually_exclusive() {
        let mut rule = surname_rule();
        rule.set_display_name_fn(|_| "from factory".to_owned());
        rule.set_display_name("fixed");

        let person = Person {
            surname: "Smith".into(),
        };
        let ctx = ValidationContext::new(&person);
        assert_eq!(rule.display_name(&ctx), "fixed");

        rule.set_display_name_fn(|_| "factory again".to_owned());
        assert_eq!(rule.display_name(&ctx), "factory again");
    }
}
