//! Selective attention over ground-truth injects and EOC actions.

use rand::Rng;
use ttx_core::{
    action_types, EocAction, Inject, KnowledgeParams, Persona, PersonaType, Sentiment, Severity,
    TrustLevel,
};

/// Injects a persona of type `t` with `sentiment` notices this period.
///
/// Critical injects always get through. Randomness is only consumed for
/// entries whose inclusion is probabilistic.
pub fn filter_injects<R: Rng + ?Sized>(
    t: PersonaType,
    sentiment: Sentiment,
    injects: &[Inject],
    params: &KnowledgeParams,
    rng: &mut R,
) -> Vec<Inject> {
    injects
        .iter()
        .filter(|inject| keeps_inject(t, sentiment, inject.severity, params, rng))
        .cloned()
        .collect()
}

fn keeps_inject<R: Rng + ?Sized>(
    t: PersonaType,
    sentiment: Sentiment,
    severity: Severity,
    params: &KnowledgeParams,
    rng: &mut R,
) -> bool {
    if severity.is_high_or_critical() {
        return true;
    }
    match t {
        PersonaType::InformationSeeker | PersonaType::Planner => true,
        PersonaType::Skeptic if sentiment == Sentiment::Skeptical => match severity {
            Severity::Medium => rng.gen_bool(params.skeptic_medium_keep_probability),
            _ => false,
        },
        PersonaType::Optimist => severity != Severity::Low,
        _ => rng.gen_bool(params.low_severity_keep_probability),
    }
}

fn hard_to_miss(action: &EocAction) -> bool {
    action.is_mandatory()
        || action.action_type == action_types::CONTRAFLOW
        || action.action_type.contains(action_types::SHELTER)
}

fn mentions_contraflow(action: &EocAction) -> bool {
    action.details.to_ascii_lowercase().contains("contraflow")
}

/// EOC actions the persona is aware of.
pub fn filter_eoc_actions(persona: &Persona, actions: &[EocAction]) -> Vec<EocAction> {
    let low_trust = persona.demographics.trust_in_government == TrustLevel::Low;
    actions
        .iter()
        .filter(|a| !low_trust || hard_to_miss(a))
        .filter(|a| {
            persona.persona_type != PersonaType::Skeptic
                || a.action_type != action_types::PUBLIC_ANNOUNCEMENT
                || a.is_mandatory()
                || mentions_contraflow(a)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use ttx_core::{HourOffset, Urgency};

    fn inject(n: usize, severity: Severity) -> Inject {
        Inject {
            id: format!("inject-1-{n}"),
            period_number: 1,
            time: HourOffset(-118),
            inject_type: "weather_update".into(),
            title: format!("Update {n}"),
            description: "Forecast shift".into(),
            severity,
        }
    }

    fn action(action_type: &str, urgency: Option<Urgency>, details: &str) -> EocAction {
        EocAction {
            id: format!("eoc-1-{action_type}"),
            period_number: 1,
            time: HourOffset(-116),
            action_type: action_type.into(),
            zone: None,
            urgency,
            details: details.into(),
            target_population: "All residents".into(),
        }
    }

    fn mixed() -> Vec<Inject> {
        Severity::ALL
            .iter()
            .cycle()
            .take(40)
            .enumerate()
            .map(|(n, s)| inject(n, *s))
            .collect()
    }

    #[test]
    fn seekers_see_everything() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let all = mixed();
        let seen = filter_injects(
            PersonaType::InformationSeeker,
            Sentiment::Calm,
            &all,
            &KnowledgeParams::default(),
            &mut rng,
        );
        assert_eq!(seen, all);
    }

    #[test]
    fn skeptical_skeptic_drops_low() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let seen = filter_injects(
            PersonaType::Skeptic,
            Sentiment::Skeptical,
            &mixed(),
            &KnowledgeParams::default(),
            &mut rng,
        );
        assert!(seen.iter().all(|i| i.severity != Severity::Low));
        assert_eq!(
            seen.iter().filter(|i| i.severity.is_high_or_critical()).count(),
            20
        );
    }

    fn count(seen: &[Inject], s: Severity) -> usize {
        seen.iter().filter(|i| i.severity == s).count()
    }

    #[test]
    fn skeptic_medium_rate_is_a_parameter() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let never = KnowledgeParams {
            low_severity_keep_probability: 1.0,
            skeptic_medium_keep_probability: 0.0,
        };
        let seen = filter_injects(
            PersonaType::Skeptic,
            Sentiment::Skeptical,
            &mixed(),
            &never,
            &mut rng,
        );
        assert_eq!(count(&seen, Severity::Medium), 0);
        assert_eq!(count(&seen, Severity::Low), 0);
        assert_eq!(seen.len(), 20);

        let always = KnowledgeParams {
            skeptic_medium_keep_probability: 1.0,
            ..never
        };
        let seen = filter_injects(
            PersonaType::Skeptic,
            Sentiment::Skeptical,
            &mixed(),
            &always,
            &mut rng,
        );
        assert_eq!(count(&seen, Severity::Medium), 10);
        assert_eq!(count(&seen, Severity::Low), 0);

        let medium: Vec<Inject> = (0..1000).map(|n| inject(n, Severity::Medium)).collect();
        let kept = filter_injects(
            PersonaType::Skeptic,
            Sentiment::Skeptical,
            &medium,
            &KnowledgeParams::default(),
            &mut rng,
        )
        .len();
        assert!((400..=600).contains(&kept), "kept {kept} of 1000");

        // the rule only applies while the skeptic is skeptical
        let seen = filter_injects(
            PersonaType::Skeptic,
            Sentiment::Calm,
            &mixed(),
            &never,
            &mut rng,
        );
        assert_eq!(seen.len(), 40);
    }

    #[test]
    fn optimist_keeps_medium() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let seen = filter_injects(
            PersonaType::Optimist,
            Sentiment::Calm,
            &mixed(),
            &KnowledgeParams::default(),
            &mut rng,
        );
        assert_eq!(seen.len(), 30);
    }

    #[test]
    fn keep_probability_is_a_parameter() {
        let never = KnowledgeParams {
            low_severity_keep_probability: 0.0,
            skeptic_medium_keep_probability: 0.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let seen = filter_injects(
            PersonaType::Elderly,
            Sentiment::Calm,
            &mixed(),
            &never,
            &mut rng,
        );
        assert!(seen.iter().all(|i| i.severity.is_high_or_critical()));
        let always = KnowledgeParams {
            low_severity_keep_probability: 1.0,
            ..never
        };
        let seen = filter_injects(
            PersonaType::Elderly,
            Sentiment::Calm,
            &mixed(),
            &always,
            &mut rng,
        );
        assert_eq!(seen.len(), 40);
    }

    #[test]
    fn low_trust_sees_only_hard_to_miss_actions() {
        let mut persona = crate::tests::persona(PersonaType::Optimist);
        persona.demographics.trust_in_government = TrustLevel::Low;
        let actions = vec![
            action("evacuation_order", Some(Urgency::Voluntary), "Zone B voluntary"),
            action("evacuation_order", Some(Urgency::Mandatory), "Zone A mandatory"),
            action("contraflow", None, "I-4 eastbound"),
            action("shelter", None, "Shelters open"),
            action("public_announcement", None, "Stay tuned"),
        ];
        let seen: Vec<String> = filter_eoc_actions(&persona, &actions)
            .into_iter()
            .map(|a| a.details)
            .collect();
        assert_eq!(seen, vec!["Zone A mandatory", "I-4 eastbound", "Shelters open"]);

        persona.demographics.trust_in_government = TrustLevel::Medium;
        assert_eq!(filter_eoc_actions(&persona, &actions).len(), 5);
    }

    #[test]
    fn skeptic_ignores_plain_announcements() {
        let mut persona = crate::tests::persona(PersonaType::Skeptic);
        persona.demographics.trust_in_government = TrustLevel::Medium;
        let actions = vec![
            action("public_announcement", None, "Stay tuned"),
            action("public_announcement", None, "Contraflow begins at noon"),
            action("public_announcement", Some(Urgency::Mandatory), "Leave now"),
            action("school_closure", None, "Schools closed"),
        ];
        let seen: Vec<String> = filter_eoc_actions(&persona, &actions)
            .into_iter()
            .map(|a| a.details)
            .collect();
        assert_eq!(
            seen,
            vec!["Contraflow begins at noon", "Leave now", "Schools closed"]
        );
    }
}
