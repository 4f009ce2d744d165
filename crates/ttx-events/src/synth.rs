//! Template-mode event synthesis.

use crate::templates::{templates_for, ActionTemplate, InjectTemplate};
use rand::seq::SliceRandom;
use rand::Rng;
use ttx_core::action_types::is_evacuation_type;
use ttx_core::{EocAction, Inject, OperationalPeriod, Phase, ScenarioType, Severity, Urgency};

/// Scenario parameters the templates are rendered against.
#[derive(Clone, Debug)]
pub struct SynthesisContext {
    pub scenario_type: ScenarioType,
    pub location: String,
    pub population: u64,
}

/// Ground-truth events for one period.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PeriodEvents {
    pub injects: Vec<Inject>,
    pub eoc_actions: Vec<EocAction>,
}

/// Severity escalation by phase.
pub fn severity_for_phase<R: Rng + ?Sized>(phase: Phase, rng: &mut R) -> Severity {
    match phase {
        Phase::Planning => Severity::Low,
        Phase::Preparation => {
            if rng.gen_bool(0.5) {
                Severity::Medium
            } else {
                Severity::High
            }
        }
        Phase::Response => Severity::Critical,
        Phase::Recovery => Severity::High,
    }
}

/// Evacuation-type actions are mandatory while the threat is active.
pub fn urgency_for(action_type: &str, phase: Phase) -> Option<Urgency> {
    if !is_evacuation_type(action_type) {
        return None;
    }
    match phase {
        Phase::Preparation | Phase::Response => Some(Urgency::Mandatory),
        Phase::Planning | Phase::Recovery => Some(Urgency::Voluntary),
    }
}

/// Thousands separators: 2700000 -> "2,700,000".
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn render(text: &str, ctx: &SynthesisContext, period_number: u32) -> String {
    text.replace("{location}", &ctx.location)
        .replace("{population}", &format_population(ctx.population))
        .replace("{period}", &period_number.to_string())
}

fn build_inject<R: Rng + ?Sized>(
    t: &InjectTemplate,
    ctx: &SynthesisContext,
    period: &OperationalPeriod,
    ordinal: usize,
    spacing: i32,
    rng: &mut R,
) -> Inject {
    Inject {
        id: format!("inject-{}-{}", period.period_number, ordinal + 1),
        period_number: period.period_number,
        time: period.start_time.plus(ordinal as i32 * spacing),
        inject_type: t.inject_type.to_string(),
        title: render(t.title, ctx, period.period_number),
        description: render(t.description, ctx, period.period_number),
        severity: severity_for_phase(period.phase, rng),
    }
}

fn build_action(
    t: &ActionTemplate,
    ctx: &SynthesisContext,
    period: &OperationalPeriod,
    ordinal: usize,
    spacing: i32,
) -> EocAction {
    EocAction {
        id: format!("eoc-{}-{}", period.period_number, ordinal + 1),
        period_number: period.period_number,
        time: period.start_time.plus(1 + ordinal as i32 * spacing),
        action_type: t.action_type.to_string(),
        zone: t.zone.map(str::to_string),
        urgency: urgency_for(t.action_type, period.phase),
        details: render(t.details, ctx, period.period_number),
        target_population: t.target_population.to_string(),
    }
}

/// Pick 2-4 injects and 1-4 EOC actions for one period from the hazard tables.
pub fn synthesize_period<R: Rng + ?Sized>(
    ctx: &SynthesisContext,
    period: &OperationalPeriod,
    rng: &mut R,
) -> PeriodEvents {
    let table = templates_for(ctx.scenario_type).phase(period.phase);

    let n_injects = rng.gen_range(2..=4).min(table.injects.len());
    let n_actions = rng.gen_range(1..=4).min(table.actions.len());
    let inject_spacing = 12 / n_injects.max(1) as i32;
    let action_spacing = 11 / n_actions.max(1) as i32;

    let inject_templates: Vec<&InjectTemplate> =
        table.injects.choose_multiple(rng, n_injects).collect();
    let injects = inject_templates
        .into_iter()
        .enumerate()
        .map(|(k, t)| build_inject(t, ctx, period, k, inject_spacing, rng))
        .collect();
    let eoc_actions = table
        .actions
        .choose_multiple(rng, n_actions)
        .enumerate()
        .map(|(k, t)| build_action(t, ctx, period, k, action_spacing))
        .collect();

    PeriodEvents {
        injects,
        eoc_actions,
    }
}

/// Synthesize events for every period of a schedule, in order.
pub fn synthesize_timeline<R: Rng + ?Sized>(
    ctx: &SynthesisContext,
    schedule: &[OperationalPeriod],
    rng: &mut R,
) -> Vec<PeriodEvents> {
    schedule
        .iter()
        .map(|p| synthesize_period(ctx, p, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use ttx_core::{build_schedule, PhasePolicy};

    fn ctx() -> SynthesisContext {
        SynthesisContext {
            scenario_type: ScenarioType::Hurricane,
            location: "Tampa Bay".into(),
            population: 2_700_000,
        }
    }

    #[test]
    fn population_formatting() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1000), "1,000");
        assert_eq!(format_population(2_700_000), "2,700,000");
    }

    #[test]
    fn counts_and_severity_follow_phase() {
        let schedule = build_schedule(12, -120, &PhasePolicy::canonical());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let events = synthesize_timeline(&ctx(), &schedule, &mut rng);
        assert_eq!(events.len(), 12);
        for (p, ev) in schedule.iter().zip(&events) {
            assert!((2..=4).contains(&ev.injects.len()));
            assert!((1..=4).contains(&ev.eoc_actions.len()));
            for inj in &ev.injects {
                assert_eq!(inj.period_number, p.period_number);
                assert!(inj.time >= p.start_time && inj.time < p.end_time);
                match p.phase {
                    Phase::Planning => assert_eq!(inj.severity, Severity::Low),
                    Phase::Preparation => assert!(matches!(
                        inj.severity,
                        Severity::Medium | Severity::High
                    )),
                    Phase::Response => assert_eq!(inj.severity, Severity::Critical),
                    Phase::Recovery => assert_eq!(inj.severity, Severity::High),
                }
                assert!(!inj.description.contains("{location}"));
            }
            for act in &ev.eoc_actions {
                assert!(act.time >= p.start_time && act.time < p.end_time);
            }
        }
    }

    #[test]
    fn evacuation_urgency_rule() {
        assert_eq!(
            urgency_for("evacuation_order", Phase::Preparation),
            Some(Urgency::Mandatory)
        );
        assert_eq!(
            urgency_for("evacuation_order", Phase::Response),
            Some(Urgency::Mandatory)
        );
        assert_eq!(
            urgency_for("evacuation_order", Phase::Planning),
            Some(Urgency::Voluntary)
        );
        assert_eq!(urgency_for("public_announcement", Phase::Response), None);
    }

    #[test]
    fn same_seed_same_timeline() {
        let schedule = build_schedule(12, -120, &PhasePolicy::canonical());
        let a = synthesize_timeline(&ctx(), &schedule, &mut ChaCha8Rng::seed_from_u64(3));
        let b = synthesize_timeline(&ctx(), &schedule, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
