use serde_json::json;
use ttx_adk::transform_adk_response;
use ttx_core::{PersonaType, ScenarioConfig, SimConfig};
use ttx_knowledge::{format_knowledge_for_prompt, AwarenessLevel, InformationSource};
use ttx_runtime::{persona_knowledge, RuntimeError};

fn scenario() -> ScenarioConfig {
    ScenarioConfig {
        scenario_type: "flood".into(),
        location: "Cedar Rapids, IA".into(),
        severity: "moderate".into(),
        population: 137_000,
        agents: None,
        time: None,
    }
}

#[test]
fn knowledge_uses_the_backend_profile() {
    let skeptic = json!({
        "decision": "stay home",
        "sentiment": "skeptical",
        "location": "home",
        "personaType": "The Skeptic"
    });
    let planner = json!({
        "decision": "evacuate",
        "sentiment": "calm",
        "personaType": "The Planner"
    });
    let payload = json!({"list_sessions": [{"state": {
        "persona-001": [skeptic.clone(), skeptic],
        "resident-7": [planner.clone(), planner]
    }}]});
    let sim = SimConfig::default();
    let r = transform_adk_response(&payload, &scenario(), &sim).expect("transform");
    assert_eq!(
        r.period_results[0].persona_responses[0].persona_type,
        PersonaType::Skeptic.label()
    );

    let k = persona_knowledge(&r, &sim, "persona-001", 2).expect("skeptic knowledge");
    assert_eq!(k.persona_id, "persona-001");
    assert_eq!(k.awareness_level, AwarenessLevel::Low);
    assert!(!k.information_sources.contains(&InformationSource::GovernmentBriefings));

    let k = persona_knowledge(&r, &sim, "resident-7", 1).expect("planner knowledge");
    assert_eq!(k.awareness_level, AwarenessLevel::High);
    assert!(k.information_sources.contains(&InformationSource::GovernmentBriefings));
    assert_eq!(k.known_injects, r.period_results[0].injects);
    assert!(format_knowledge_for_prompt(&k).contains("Government press briefings"));

    assert!(matches!(
        persona_knowledge(&r, &sim, "persona-002", 1),
        Err(RuntimeError::UnknownPersona(_))
    ));
}
