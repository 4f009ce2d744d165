#![deny(warnings)]

//! Per-persona view of ground truth.
//!
//! Each persona only learns a subset of a period's injects and EOC actions,
//! depending on income, trust, persona type and current sentiment.

pub mod filter;
pub mod prompt;
pub mod sources;

pub use filter::{filter_eoc_actions, filter_injects};
pub use prompt::format_knowledge_for_prompt;
pub use sources::{information_sources, InformationSource};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ttx_core::{
    EocAction, Inject, KnowledgeParams, PeriodResult, Persona, PersonaType, Sentiment,
    TrustLevel, TtxScript,
};

/// Overall information quality of a persona.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwarenessLevel {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaKnowledge {
    pub persona_id: String,
    pub period_number: u32,
    pub known_injects: Vec<Inject>,
    pub known_eoc_actions: Vec<EocAction>,
    pub information_sources: Vec<InformationSource>,
    pub awareness_level: AwarenessLevel,
    pub scenario_awareness: String,
}

/// Reproducible filter stream for one persona in one period.
pub fn knowledge_rng(seed: u64, persona_index: u32, period: u32) -> ChaCha8Rng {
    let mix = ((u64::from(persona_index) << 32) | u64::from(period))
        .wrapping_mul(0xD6E8_FEB8_6659_FD93);
    ChaCha8Rng::seed_from_u64(seed ^ mix)
}

pub fn awareness_level(
    persona: &Persona,
    sentiment: Sentiment,
    source_count: usize,
) -> AwarenessLevel {
    match persona.persona_type {
        PersonaType::InformationSeeker | PersonaType::Planner | PersonaType::TechSavvy => {
            return AwarenessLevel::High
        }
        PersonaType::Skeptic if persona.demographics.trust_in_government == TrustLevel::Low => {
            return AwarenessLevel::Low
        }
        _ => {}
    }
    if matches!(sentiment, Sentiment::Defiant | Sentiment::Skeptical) {
        return AwarenessLevel::Low;
    }
    match source_count {
        n if n >= 6 => AwarenessLevel::High,
        n if n >= 4 => AwarenessLevel::Medium,
        _ => AwarenessLevel::Low,
    }
}

/// Short narrative of how well the persona understands the situation.
pub fn scenario_awareness(
    level: AwarenessLevel,
    script: &TtxScript,
    period: &PeriodResult,
    known_injects: usize,
    known_actions: usize,
) -> String {
    let op = &period.operational_period;
    let hazard = script.scenario_type.as_str();
    let location = &script.location;
    match level {
        AwarenessLevel::High => format!(
            "You are well informed about the {hazard} threatening {location}. It is period {} \
             ({} phase, {} to {}). You have followed {known_injects} updates and \
             {known_actions} official actions closely and understand what officials are \
             asking residents to do.",
            op.period_number, op.phase, op.start_time, op.end_time
        ),
        AwarenessLevel::Medium => format!(
            "You have a general sense that a {hazard} is affecting {location} and that \
             officials are in the {} phase, but some details are fuzzy. You have caught \
             {known_injects} updates and {known_actions} official announcements.",
            op.phase
        ),
        AwarenessLevel::Low => format!(
            "You have only heard bits and pieces about what is happening in {location}. \
             You are not sure how serious this is or what officials want you to do. \
             You picked up {known_injects} updates and {known_actions} announcements, \
             mostly secondhand."
        ),
    }
}

/// What `persona` knows in `period`. Sentiment comes from the persona's own
/// response when present, otherwise from the behavior table.
pub fn build_persona_knowledge<R: rand::Rng + ?Sized>(
    persona: &Persona,
    period: &PeriodResult,
    script: &TtxScript,
    params: &KnowledgeParams,
    rng: &mut R,
) -> PersonaKnowledge {
    let n = period.period_number;
    let sentiment = period
        .persona_responses
        .iter()
        .find(|r| r.persona_id == persona.id)
        .map(|r| r.sentiment)
        .unwrap_or_else(|| ttx_personas::sentiment(persona.persona_type, n));

    let known_injects = filter_injects(
        persona.persona_type,
        sentiment,
        &period.injects,
        params,
        rng,
    );
    let known_eoc_actions = filter_eoc_actions(persona, &period.eoc_actions);
    let information_sources = information_sources(persona);
    let awareness_level = awareness_level(persona, sentiment, information_sources.len());
    let scenario_awareness = scenario_awareness(
        awareness_level,
        script,
        period,
        known_injects.len(),
        known_eoc_actions.len(),
    );
    debug!(
        persona = %persona.id,
        period = n,
        injects = known_injects.len(),
        of = period.injects.len(),
        actions = known_eoc_actions.len(),
        awareness = ?awareness_level,
        "persona knowledge built"
    );
    PersonaKnowledge {
        persona_id: persona.id.clone(),
        period_number: n,
        known_injects,
        known_eoc_actions,
        information_sources,
        awareness_level,
        scenario_awareness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use ttx_core::{
        build_schedule, Aggregates, GenerationSource, HourOffset, LatLng, PersonaLocationData,
        PhasePolicy, ScenarioType, Severity, SocialStatus,
    };

    /// Persona types allowed to miss a critical inject. Currently none.
    const CRITICAL_BLIND_EXCEPTIONS: &[PersonaType] = &[];

    pub(crate) fn persona(t: PersonaType) -> Persona {
        let index = PersonaType::ALL.iter().position(|x| *x == t).unwrap_or(0) as u32;
        Persona {
            id: ttx_personas::persona_id(index),
            name: ttx_personas::persona_name(index),
            persona_type: t,
            index,
            demographics: ttx_personas::generate_demographics(t, index),
            location: PersonaLocationData {
                home_location: LatLng::new(27.95, -82.45),
                shelter_location: LatLng::new(28.1, -82.3),
                evacuation_start_period: None,
                evacuation_end_period: None,
            },
        }
    }

    fn script() -> TtxScript {
        TtxScript {
            title: "Hurricane exercise".into(),
            scenario_type: ScenarioType::Hurricane,
            location: "Tampa Bay".into(),
            severity: "major".into(),
            population: 2_700_000,
            total_periods: 12,
            persona_count: 10,
            seed: 42,
            source: GenerationSource::Template,
        }
    }

    fn period_with(injects: Vec<Inject>) -> PeriodResult {
        let op = build_schedule(12, -120, &PhasePolicy::canonical()).remove(4);
        PeriodResult {
            period_number: op.period_number,
            operational_period: op,
            injects,
            eoc_actions: Vec::new(),
            persona_responses: Vec::new(),
            aggregates: Aggregates {
                total_personas: 0,
                decisions: BTreeMap::new(),
                sentiments: BTreeMap::new(),
                locations: BTreeMap::new(),
                needing_assistance: 0,
                critical_issues: Vec::new(),
            },
        }
    }

    fn inject(n: usize, severity: Severity) -> Inject {
        Inject {
            id: format!("inject-5-{n}"),
            period_number: 5,
            time: HourOffset(-70),
            inject_type: "infrastructure".into(),
            title: format!("Event {n}"),
            description: "Details".into(),
            severity,
        }
    }

    #[test]
    fn awareness_rules() {
        let seeker = persona(PersonaType::InformationSeeker);
        assert_eq!(awareness_level(&seeker, Sentiment::Panicked, 0), AwarenessLevel::High);
        let skeptic = persona(PersonaType::Skeptic);
        assert_eq!(awareness_level(&skeptic, Sentiment::Calm, 9), AwarenessLevel::Low);
        let mut optimist = persona(PersonaType::Optimist);
        optimist.demographics.trust_in_government = TrustLevel::Medium;
        assert_eq!(awareness_level(&optimist, Sentiment::Calm, 6), AwarenessLevel::High);
        assert_eq!(awareness_level(&optimist, Sentiment::Calm, 4), AwarenessLevel::Medium);
        assert_eq!(awareness_level(&optimist, Sentiment::Calm, 3), AwarenessLevel::Low);
        assert_eq!(awareness_level(&optimist, Sentiment::Defiant, 7), AwarenessLevel::Low);
    }

    #[test]
    fn low_income_sources_are_minimal() {
        let mut p = persona(PersonaType::Optimist);
        p.demographics.social_status = SocialStatus::LowIncome;
        p.demographics.trust_in_government = TrustLevel::Low;
        assert_eq!(
            information_sources(&p),
            vec![InformationSource::EmergencyAlerts, InformationSource::LocalRadio]
        );
        p.demographics.social_status = SocialStatus::HighIncome;
        p.demographics.trust_in_government = TrustLevel::High;
        let rich = information_sources(&p);
        assert_eq!(rich.len(), 8);
        assert!(rich.contains(&InformationSource::OfficialWebsites));
    }

    #[test]
    fn sources_are_deduplicated() {
        let mut p = persona(PersonaType::TechSavvy);
        p.demographics.social_status = SocialStatus::MiddleIncome;
        let s = information_sources(&p);
        let social = s.iter().filter(|x| **x == InformationSource::SocialMedia).count();
        assert_eq!(social, 1);
    }

    #[test]
    fn seeded_filter_replays() {
        let p = persona(PersonaType::Elderly);
        let period = period_with((0..60).map(|n| inject(n, Severity::Low)).collect());
        let params = KnowledgeParams::default();
        let a = build_persona_knowledge(
            &p,
            &period,
            &script(),
            &params,
            &mut knowledge_rng(42, 3, 5),
        );
        let b = build_persona_knowledge(
            &p,
            &period,
            &script(),
            &params,
            &mut knowledge_rng(42, 3, 5),
        );
        assert_eq!(a, b);
        assert!(a.known_injects.len() < 60);
        let json = serde_json::to_value(&a).unwrap();
        assert!(json["awarenessLevel"].is_string());
        assert!(json["knownInjects"].is_array());
    }

    #[test]
    fn narrative_branches_on_level() {
        let period = period_with(Vec::new());
        let high = scenario_awareness(AwarenessLevel::High, &script(), &period, 3, 1);
        assert!(high.contains("well informed about the hurricane threatening Tampa Bay"));
        assert!(high.contains("period 5 (preparation phase"));
        let low = scenario_awareness(AwarenessLevel::Low, &script(), &period, 0, 0);
        assert!(low.contains("bits and pieces"));
        assert!(!low.contains("hurricane"));
    }

    proptest! {
        #[test]
        fn critical_injects_always_known(
            t in 0usize..10,
            s in 0usize..6,
            severities in proptest::collection::vec(0usize..4, 1..30),
            seed in any::<u64>(),
        ) {
            let pt = PersonaType::ALL[t];
            prop_assume!(!CRITICAL_BLIND_EXCEPTIONS.contains(&pt));
            let injects: Vec<Inject> = severities
                .iter()
                .enumerate()
                .map(|(n, sev)| inject(n, Severity::ALL[*sev]))
                .collect();
            let period = period_with(injects.clone());
            let p = persona(pt);
            let sentiment = Sentiment::ALL[s];
            let mut rng = knowledge_rng(seed, p.index, 5);
            let known = filter_injects(
                pt,
                sentiment,
                &injects,
                &KnowledgeParams::default(),
                &mut rng,
            );
            for i in injects.iter().filter(|i| i.severity == Severity::Critical) {
                prop_assert!(known.contains(i));
            }
            let k = build_persona_knowledge(
                &p,
                &period,
                &script(),
                &KnowledgeParams::default(),
                &mut rng,
            );
            let critical = injects.iter().filter(|i| i.severity == Severity::Critical).count();
            prop_assert_eq!(
                k.known_injects.iter().filter(|i| i.severity == Severity::Critical).count(),
                critical
            );
        }
    }
}
