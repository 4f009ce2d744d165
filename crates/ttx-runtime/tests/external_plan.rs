use serde_json::{json, Value};
use ttx_core::{
    build_schedule, GenerationSource, ScenarioConfig, ScenarioStatus, Severity, SimConfig, Urgency,
};
use ttx_events::PlanError;
use ttx_runtime::{generate_scenario, OfflineProvider, RuntimeError, StaticPlan};

fn scenario() -> ScenarioConfig {
    ScenarioConfig {
        scenario_type: "Category 4 Hurricane".into(),
        location: "Galveston".into(),
        severity: "major".into(),
        population: 55_000,
        agents: Some(20),
        time: Some("2025-09-10T00:00Z".into()),
    }
}

fn plan(periods: u32) -> Value {
    let schedule = build_schedule(periods, -120, &Default::default());
    let items: Vec<Value> = schedule
        .iter()
        .map(|p| {
            json!({
                "periodNumber": p.period_number,
                "phase": p.phase.as_str().to_uppercase(),
                "injects": [
                    {"type": "weather_update", "title": "Advisory", "severity": "SEVERE"},
                    {"type": "media", "title": "Press conference", "severity": "moderate"},
                    "Gas lines reported on Broadway"
                ],
                "eocActions": [
                    {"actionType": "evacuation_order", "zone": "Zone A", "details": "Leave the island"}
                ]
            })
        })
        .collect();
    json!({ "actionPlan": { "periods": items } })
}

#[test]
fn valid_external_plan_is_used() {
    let provider = StaticPlan::new("fixture", plan(12).to_string());
    let r = generate_scenario(&scenario(), &SimConfig::default(), Some(&provider)).expect("plan");
    assert_eq!(r.ttx_script.source, GenerationSource::External);
    assert_eq!(r.status, ScenarioStatus::Completed);
    let p1 = &r.period_results[0];
    assert_eq!(p1.injects.len(), 3);
    assert_eq!(p1.injects[0].severity, Severity::High);
    assert_eq!(p1.injects[1].severity, Severity::Medium);
    assert_eq!(p1.injects[2].title, "Gas lines reported on Broadway");
    // urgency filled from the phase rule
    assert_eq!(p1.eoc_actions[0].urgency, Some(Urgency::Voluntary));
    assert_eq!(r.period_results[5].eoc_actions[0].urgency, Some(Urgency::Mandatory));
}

#[test]
fn wrong_period_count_is_rejected() {
    let sim = SimConfig {
        period_count: 13,
        ..SimConfig::default()
    };
    let provider = StaticPlan::new("fixture", plan(12).to_string());
    let err = generate_scenario(&scenario(), &sim, Some(&provider)).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Plan(PlanError::WrongPeriodCount {
            expected: 13,
            found: 12
        })
    ));
}

#[test]
fn missing_eoc_actions_is_rejected() {
    let mut payload = plan(12);
    payload["actionPlan"]["periods"][3]
        .as_object_mut()
        .expect("object")
        .remove("eocActions");
    let provider = StaticPlan::new("fixture", payload.to_string());
    let err = generate_scenario(&scenario(), &SimConfig::default(), Some(&provider)).unwrap_err();
    assert!(matches!(err, RuntimeError::Plan(PlanError::MissingField { position: 4, .. })));
}

#[test]
fn unavailable_backend_degrades_to_templates() {
    let r = generate_scenario(&scenario(), &SimConfig::default(), Some(&OfflineProvider))
        .expect("fallback");
    assert_eq!(r.status, ScenarioStatus::Degraded);
    assert_eq!(r.ttx_script.source, GenerationSource::Template);
    assert_eq!(r.period_results.len(), 12);
    assert!(r.period_results.iter().all(|p| !p.injects.is_empty()));
}
