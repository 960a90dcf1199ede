//! Execution semantics: cascade, ordering, rule sets, dependent rules, and
//! the declaration/mutation contract.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use serde::Serialize;

use verdict::prelude::*;

#[derive(Serialize)]
struct Person {
    surname: String,
    forename: String,
}

fn person(surname: &str) -> Person {
    Person {
        surname: surname.into(),
        forename: "Jane".into(),
    }
}

fn surname_rule() -> Rule<Person, String> {
    Rule::for_member(MemberAccessor::new("Surname", |p: &Person| &p.surname))
}

fn forename_rule() -> Rule<Person, String> {
    Rule::for_member(MemberAccessor::new("Forename", |p: &Person| &p.forename))
}

// ----------------------------------------------------------------------------
// End-to-end: declare, validate, remove, replace
// ----------------------------------------------------------------------------

#[test]
fn length_failure_uses_the_message_override() {
    let mut rule = surname_rule();
    let length_5_10: Arc<dyn RuleValidator<Person, String>> = Arc::new(Length::new(5, 10));
    rule.add_validator(Arc::clone(&length_5_10));
    rule.current_unit().set_message_template("foo");

    let instance = person("Matthew Leibowitz");
    let mut ctx = ValidationContext::new(&instance);
    let failures = rule.run(&mut ctx);

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].message, "foo");
    assert_eq!(failures[0].property_name, "Surname");
}

#[test]
fn removing_the_validator_clears_the_failure() {
    let mut rule = surname_rule();
    let length_5_10: Arc<dyn RuleValidator<Person, String>> = Arc::new(Length::new(5, 10));
    rule.add_validator(Arc::clone(&length_5_10));
    rule.current_unit().set_message_template("foo");

    let instance = person("Matthew Leibowitz");
    let mut ctx = ValidationContext::new(&instance);
    assert_eq!(rule.run(&mut ctx).len(), 1);

    rule.remove_validator(&length_5_10);
    let mut ctx = ValidationContext::new(&instance);
    assert!(rule.run(&mut ctx).is_empty());
}

#[test]
fn replacing_the_validator_revalidates_with_the_new_bounds() {
    let mut rule = surname_rule();
    let length_5_10: Arc<dyn RuleValidator<Person, String>> = Arc::new(Length::new(5, 10));
    rule.add_validator(Arc::clone(&length_5_10));

    let instance = person("Matthew Leibowitz"); // 17 chars
    let mut ctx = ValidationContext::new(&instance);
    assert_eq!(rule.run(&mut ctx).len(), 1);

    // 17 is within [10, 20], so the replacement passes.
    rule.replace_validator(&length_5_10, Arc::new(Length::new(10, 20)));
    let mut ctx = ValidationContext::new(&instance);
    assert!(rule.run(&mut ctx).is_empty());
}

// ----------------------------------------------------------------------------
// Cascade
// ----------------------------------------------------------------------------

#[test]
fn stop_on_first_failure_skips_the_remaining_validators() {
    let probe = Arc::new(AtomicUsize::new(0));
    let probed = Arc::clone(&probe);

    let rule = surname_rule()
        .cascade(CascadeMode::StopOnFirstFailure)
        .must(|_, _| false)
        .must(move |_, _| {
            probed.fetch_add(1, Ordering::SeqCst);
            true
        });

    let instance = person("anything");
    let mut ctx = ValidationContext::new(&instance);
    let failures = rule.run(&mut ctx);

    assert_eq!(failures.len(), 1);
    assert_eq!(probe.load(Ordering::SeqCst), 0, "second validator must never run");
}

#[test]
fn continue_collects_every_failure_in_declaration_order() {
    let rule = surname_rule()
        .cascade(CascadeMode::Continue)
        .must(|_, _| false)
        .with_code("first")
        .must(|_, _| false)
        .with_code("second");

    let instance = person("anything");
    let mut ctx = ValidationContext::new(&instance);
    let failures = rule.run(&mut ctx);

    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].code, "first");
    assert_eq!(failures[1].code, "second");
}

#[test]
fn cascade_resolves_through_a_shared_cell_at_run_time() {
    let cell = Arc::new(CascadeCell::new(CascadeMode::Continue));
    let rule = surname_rule()
        .cascade_cell(Arc::clone(&cell))
        .must(|_, _| false)
        .must(|_, _| false);

    let instance = person("anything");

    let mut ctx = ValidationContext::new(&instance);
    assert_eq!(rule.run(&mut ctx).len(), 2);

    // Flipping the cell changes the effective mode of the declared rule.
    cell.set(CascadeMode::StopOnFirstFailure);
    let mut ctx = ValidationContext::new(&instance);
    assert_eq!(rule.run(&mut ctx).len(), 1);
}

// ----------------------------------------------------------------------------
// Rule sets
// ----------------------------------------------------------------------------

#[test]
fn rule_set_filtering_gates_execution() {
    let rule = surname_rule()
        .in_rule_sets(["Update"])
        .must(|_, _| false);
    let instance = person("anything");

    let mut ctx = ValidationContext::new(&instance);
    assert!(rule.run(&mut ctx).is_empty(), "default selection skips tagged rules");

    let mut ctx = ValidationContext::new(&instance)
        .with_selection(RuleSetSelection::only(["Create"]));
    assert!(rule.run(&mut ctx).is_empty(), "non-matching selection skips the rule");

    let mut ctx = ValidationContext::new(&instance)
        .with_selection(RuleSetSelection::only(["Update"]));
    assert_eq!(rule.run(&mut ctx).len(), 1);
}

#[test]
fn untagged_rules_do_not_run_under_a_named_selection() {
    let rule = surname_rule().must(|_, _| false);
    let instance = person("anything");

    let mut ctx = ValidationContext::new(&instance)
        .with_selection(RuleSetSelection::only(["Update"]));
    assert!(rule.run(&mut ctx).is_empty());

    let mut ctx = ValidationContext::new(&instance)
        .with_selection(RuleSetSelection::only(["default", "Update"]));
    assert_eq!(rule.run(&mut ctx).len(), 1);
}

// ----------------------------------------------------------------------------
// Display names
// ----------------------------------------------------------------------------

#[derive(Serialize)]
struct Form {
    gender_string: String,
}

#[test]
fn default_display_name_splits_the_member_name() {
    let rule = Rule::for_member(MemberAccessor::new("GenderString", |f: &Form| {
        &f.gender_string
    }))
    .must(|_, _| false)
    .with_message("{PropertyName}");

    let form = Form {
        gender_string: "x".into(),
    };
    let mut ctx = ValidationContext::new(&form);
    let failures = rule.run(&mut ctx);
    assert_eq!(failures[0].message, "Gender String");
}

#[test]
fn fixed_display_name_overrides_the_member_name() {
    let rule = surname_rule()
        .with_name("Last name")
        .must(|_, _| false)
        .with_message("{PropertyName}");

    let instance = person("anything");
    let mut ctx = ValidationContext::new(&instance);
    assert_eq!(rule.run(&mut ctx)[0].message, "Last name");
}

// ----------------------------------------------------------------------------
// Dependent rules
// ----------------------------------------------------------------------------

#[test]
fn dependent_rules_run_only_when_the_owner_passed() {
    let rule = surname_rule()
        .validator(NotEmpty)
        .dependent(forename_rule().must(|_, _| false).with_code("dependent"));

    // Owner fails: no dependent failures in the output.
    let failing = person("");
    let mut ctx = ValidationContext::new(&failing);
    let failures = rule.run(&mut ctx);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].code, "not_empty");

    // Owner passes: dependent failures appear after the owner's.
    let passing = person("Smith");
    let mut ctx = ValidationContext::new(&passing);
    let failures = rule.run(&mut ctx);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].code, "dependent");
}

#[test]
fn cascade_short_circuit_also_skips_dependent_rules() {
    let rule = surname_rule()
        .cascade(CascadeMode::StopOnFirstFailure)
        .must(|_, _| false)
        .dependent(forename_rule().must(|_, _| false).with_code("dependent"));

    let instance = person("anything");
    let mut ctx = ValidationContext::new(&instance);
    let failures = rule.run(&mut ctx);
    assert_eq!(failures.len(), 1);
    assert_ne!(failures[0].code, "dependent");
}

#[test]
fn dependent_rules_nest_recursively() {
    let rule = surname_rule().validator(NotEmpty).dependent(
        forename_rule()
            .validator(NotEmpty)
            .dependent(surname_rule().must(|_, _| false).with_code("grandchild")),
    );

    let instance = person("Smith");
    let mut ctx = ValidationContext::new(&instance);
    let failures = rule.run(&mut ctx);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].code, "grandchild");
}

// ----------------------------------------------------------------------------
// on_failure
// ----------------------------------------------------------------------------

#[test]
fn on_failure_fires_once_with_the_rules_own_failures() {
    let seen = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&seen);

    let rule = surname_rule()
        .must(|_, _| false)
        .must(|_, _| false)
        .on_failure(move |_instance, failures| {
            sink.store(failures.len(), Ordering::SeqCst);
        });

    let instance = person("anything");
    let mut ctx = ValidationContext::new(&instance);
    let failures = rule.run(&mut ctx);

    assert_eq!(failures.len(), 2);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn on_failure_does_not_fire_for_a_clean_rule() {
    let fired = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&fired);

    let rule = surname_rule()
        .validator(NotEmpty)
        .on_failure(move |_, _| {
            sink.fetch_add(1, Ordering::SeqCst);
        })
        .dependent(forename_rule().must(|_, _| false));

    let instance = person("Smith");
    let mut ctx = ValidationContext::new(&instance);
    let failures = rule.run(&mut ctx);

    // The dependent rule failed, but the owner was clean, so its callback
    // stays silent.
    assert_eq!(failures.len(), 1);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

// ----------------------------------------------------------------------------
// Model-level rules and edge cases
// ----------------------------------------------------------------------------

#[test]
fn model_level_rule_receives_the_whole_instance() {
    let rule = Rule::<Person, Person>::model()
        .must(|_, instance: &Person| instance.surname != instance.forename);

    let distinct = person("Smith");
    let mut ctx = ValidationContext::new(&distinct);
    assert!(rule.run(&mut ctx).is_empty());

    let clashing = Person {
        surname: "Jane".into(),
        forename: "Jane".into(),
    };
    let mut ctx = ValidationContext::new(&clashing);
    let failures = rule.run(&mut ctx);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].property_name, "");
}

#[test]
fn rule_without_member_or_validators_is_a_noop() {
    let rule = Rule::<Person, Person>::model();
    let instance = person("anything");
    let mut ctx = ValidationContext::new(&instance);
    assert!(rule.run(&mut ctx).is_empty());
}

#[test]
fn failure_records_carry_unit_configuration() {
    let rule = surname_rule()
        .must(|_, _| false)
        .with_code("custom_code")
        .with_severity(Severity::Warning)
        .with_state(serde_json::json!({ "hint": 1 }));

    let instance = person("Smith");
    let mut ctx = ValidationContext::new(&instance);
    let failures = rule.run(&mut ctx);

    assert_eq!(failures[0].code, "custom_code");
    assert_eq!(failures[0].severity, Severity::Warning);
    assert_eq!(failures[0].custom_state, Some(serde_json::json!({ "hint": 1 })));
    assert_eq!(failures[0].attempted_value, serde_json::json!("Smith"));
}

#[test]
fn skipped_units_do_not_affect_cascade() {
    // First unit is gated off; under StopOnFirstFailure the second must still
    // run because a skip is not a failure.
    let rule = surname_rule()
        .cascade(CascadeMode::StopOnFirstFailure)
        .must(|_, _| false)
        .when(|_| false, ApplyConditionTo::CurrentValidator)
        .must(|_, _| false)
        .with_code("second");

    let instance = person("anything");
    let mut ctx = ValidationContext::new(&instance);
    let failures = rule.run(&mut ctx);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].code, "second");
}
