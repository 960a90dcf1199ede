//! Rule execution
//!
//! One rule invocation walks a small state machine: rule-set gate, shared
//! condition, value resolution, the validator loop (cascade-aware), dependent
//! rules, `on_failure` notification. The synchronous and asynchronous paths
//! implement the same machine; when nothing in the rule is actually
//! asynchronous they produce identical failure sequences.
//!
//! The executor never swallows panics raised by units or conditions — a
//! throwing validator is a programming defect, not a validation failure.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::foundation::{Cancelled, ValidationContext, ValidationFailure};
use crate::rule::condition::{ApplyConditionTo, AsyncConditionFn, Condition, SyncConditionFn};
use crate::rule::unit::{MessageSource, RuleUnit, UnitValidator};
use crate::rule::{CascadeMode, ErasedRule, Rule};

impl<T: 'static, V> Rule<T, V>
where
    V: Serialize,
{
    /// Runs the rule synchronously against the context's instance.
    ///
    /// # Panics
    ///
    /// Panics when the rule (or one of its units) carries an asynchronous
    /// condition or an asynchronous validator: an async member on the sync
    /// path is a declaration bug. Use [`Rule::run_async`] for such rules.
    pub fn run(&self, ctx: &mut ValidationContext<'_, T>) -> Vec<ValidationFailure> {
        if !ctx.selection().matches(self.rule_sets()) {
            trace!(
                property = self.property_name(),
                "rule excluded by rule-set selection"
            );
            return Vec::new();
        }

        match self.shared_condition() {
            Condition::None => {}
            Condition::Sync(condition) => {
                if !condition(ctx) {
                    trace!(
                        property = self.property_name(),
                        "shared condition false; rule skipped"
                    );
                    return Vec::new();
                }
            }
            Condition::Async(_) => panic!(
                "rule '{}' carries an asynchronous shared condition and was invoked \
                 synchronously; use run_async",
                self.property_name()
            ),
        }

        let value = self.source().extract(ctx.instance());
        let cascade = self.cascade_source().resolve();
        let mut failures = Vec::new();

        for unit in self.units() {
            let gated = match &unit.condition {
                Condition::None => true,
                Condition::Sync(condition) => condition(ctx),
                Condition::Async(_) => panic!(
                    "validator '{}' on rule '{}' carries an asynchronous condition and was \
                     invoked synchronously; use run_async",
                    unit.kind(),
                    self.property_name()
                ),
            };
            if !gated {
                // Skipped units do not count toward cascade; only failures do.
                continue;
            }

            ctx.formatter_mut().clear();
            let valid = match &unit.validator {
                UnitValidator::Sync(validator) => validator.is_valid(ctx, value),
                UnitValidator::Async(validator) => panic!(
                    "asynchronous validator '{}' on rule '{}' was invoked synchronously; \
                     use run_async",
                    validator.kind(),
                    self.property_name()
                ),
            };

            if !valid {
                failures.push(self.build_failure(unit, ctx, value));
                if cascade == CascadeMode::StopOnFirstFailure {
                    trace!(
                        property = self.property_name(),
                        "cascade stopped after first failure"
                    );
                    break;
                }
            }
        }

        self.finish(ctx, failures)
    }

    /// Runs the rule asynchronously, observing the context's cancellation
    /// token before every await point. A cancelled run discards the rule's
    /// partial failures.
    pub async fn run_async(
        &self,
        ctx: &mut ValidationContext<'_, T>,
    ) -> Result<Vec<ValidationFailure>, Cancelled> {
        if !ctx.selection().matches(self.rule_sets()) {
            trace!(
                property = self.property_name(),
                "rule excluded by rule-set selection"
            );
            return Ok(Vec::new());
        }

        match self.shared_condition() {
            Condition::None => {}
            Condition::Sync(condition) => {
                if !condition(ctx) {
                    trace!(
                        property = self.property_name(),
                        "shared condition false; rule skipped"
                    );
                    return Ok(Vec::new());
                }
            }
            Condition::Async(condition) => {
                if ctx.is_cancelled() {
                    return Err(Cancelled);
                }
                if !condition(ctx).await {
                    trace!(
                        property = self.property_name(),
                        "shared condition false; rule skipped"
                    );
                    return Ok(Vec::new());
                }
            }
        }

        let value = self.source().extract(ctx.instance());
        let cascade = self.cascade_source().resolve();
        let mut failures = Vec::new();

        for unit in self.units() {
            let gated = match &unit.condition {
                Condition::None => true,
                Condition::Sync(condition) => condition(ctx),
                Condition::Async(condition) => {
                    if ctx.is_cancelled() {
                        return Err(Cancelled);
                    }
                    condition(ctx).await
                }
            };
            if !gated {
                continue;
            }

            ctx.formatter_mut().clear();
            let valid = match &unit.validator {
                UnitValidator::Sync(validator) => validator.is_valid(ctx, value),
                UnitValidator::Async(validator) => {
                    if ctx.is_cancelled() {
                        return Err(Cancelled);
                    }
                    validator.is_valid(ctx, value).await
                }
            };

            if !valid {
                failures.push(self.build_failure(unit, ctx, value));
                if cascade == CascadeMode::StopOnFirstFailure {
                    trace!(
                        property = self.property_name(),
                        "cascade stopped after first failure"
                    );
                    break;
                }
            }
        }

        if failures.is_empty() {
            for dependent in self.dependent_rules() {
                failures.extend(dependent.run_async(ctx).await?);
            }
        } else if let Some(callback) = self.on_failure_callback() {
            callback(ctx.instance(), &failures);
        }

        Ok(failures)
    }

    /// Shared tail of the synchronous path: dependent rules run only on a
    /// clean rule; `on_failure` fires once otherwise.
    fn finish(
        &self,
        ctx: &mut ValidationContext<'_, T>,
        mut failures: Vec<ValidationFailure>,
    ) -> Vec<ValidationFailure> {
        if failures.is_empty() {
            for dependent in self.dependent_rules() {
                failures.extend(dependent.run(ctx));
            }
        } else if let Some(callback) = self.on_failure_callback() {
            callback(ctx.instance(), &failures);
        }
        failures
    }

    /// Builds the failure record for one failed unit. The unit has already
    /// written its message arguments into the formatter; the display name is
    /// added here so every template (default or override) can refer to
    /// `{PropertyName}`.
    fn build_failure(
        &self,
        unit: &RuleUnit<T, V>,
        ctx: &mut ValidationContext<'_, T>,
        value: &V,
    ) -> ValidationFailure {
        let display_name = self.display_name(ctx);
        ctx.formatter_mut()
            .insert_value("PropertyName", Value::String(display_name));

        let message = match &unit.message {
            Some(MessageSource::Template(template)) => ctx.formatter().format(template),
            Some(MessageSource::Builder(builder)) => builder(ctx, value),
            None => ctx.formatter().format(unit.validator.template()),
        };

        ValidationFailure {
            property_name: self.property_name().to_owned(),
            message,
            attempted_value: serde_json::to_value(value).unwrap_or(Value::Null),
            code: unit.code(),
            severity: unit.severity,
            custom_state: unit.state.clone(),
        }
    }
}

#[async_trait]
impl<T, V> ErasedRule<T> for Rule<T, V>
where
    T: Send + Sync + 'static,
    V: Serialize + Send + Sync + 'static,
{
    fn run(&self, ctx: &mut ValidationContext<'_, T>) -> Vec<ValidationFailure> {
        Rule::run(self, ctx)
    }

    async fn run_async(
        &self,
        ctx: &mut ValidationContext<'_, T>,
    ) -> Result<Vec<ValidationFailure>, Cancelled> {
        Rule::run_async(self, ctx).await
    }

    fn apply_condition(&mut self, condition: SyncConditionFn<T>, scope: ApplyConditionTo) {
        Rule::apply_condition(self, condition, scope);
    }

    fn apply_async_condition(&mut self, condition: AsyncConditionFn<T>, scope: ApplyConditionTo) {
        Rule::apply_async_condition(self, condition, scope);
    }
}

// ============================================================================
// TESTS
// ============================================================================
