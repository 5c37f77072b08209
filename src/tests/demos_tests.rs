use crate::demos::{Scenario, ScenarioReport, run};
use classdown_desugar::{DesugarOptions, render_es5};

fn run_default(scenario: Scenario) -> ScenarioReport {
    run(scenario, DesugarOptions::default()).unwrap()
}

fn outcomes(report: &ScenarioReport) -> Vec<(&str, bool)> {
    report
        .steps
        .iter()
        .map(|step| (step.outcome.as_str(), step.ok))
        .collect()
}

#[test]
fn test_greeter_returns_name() {
    let report = run_default(Scenario::Greeter);
    assert_eq!(report.last_outcome(), Some("\"John\""));
    assert!(report.steps.iter().all(|step| step.ok));
}

#[test]
fn test_guarded_name_keeps_prior_value_for_short_names() {
    let report = run_default(Scenario::GuardedName);
    let reads: Vec<&str> = report
        .steps
        .iter()
        .filter(|step| step.action == "person.name")
        .map(|step| step.outcome.as_str())
        .collect();
    assert_eq!(reads, ["\"John\"", "\"John\"", "\"Maria\""]);
}

#[test]
fn test_computed_key_lands_in_table() {
    let report = run_default(Scenario::ComputedKey);
    assert_eq!(
        outcomes(&report)[0],
        ("\"[constructor, DigaOla]\"", true)
    );
    assert_eq!(report.last_outcome(), Some("\"Olá, John\""));
    assert!(
        report
            .layout
            .members
            .iter()
            .any(|member| member.key.as_str() == Some("DigaOla"))
    );
}

#[test]
fn test_named_expression_resolves_only_inside() {
    let report = run_default(Scenario::NamedExpression);
    let steps = outcomes(&report);
    assert_eq!(steps[1], ("class MyClass", true));
    assert_eq!(steps[2], ("true", true));
    assert_eq!(steps[3], ("MyClass is not defined", false));
}

#[test]
fn test_direct_call_is_rejected_then_instantiation_works() {
    let report = run_default(Scenario::DirectCall);
    let steps = outcomes(&report);
    let message = "Class constructor Person cannot be invoked without instantiation";
    assert_eq!(steps[0], (message, false));
    assert_eq!(steps[1], (message, false));
    assert!(steps[2].1);
}

#[test]
fn test_every_scenario_renders() {
    for scenario in Scenario::ALL {
        let report = run_default(scenario);
        let es5 = render_es5(&report.class);
        assert!(es5.contains("instanceof"), "{}", scenario.name());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["scenario"], scenario.name());
        assert!(json.get("class").is_none());
    }
}
