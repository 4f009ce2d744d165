//! Scenario orchestration: schedule, events, roster, periods x personas.

use crate::aggregate::aggregate;
use crate::provider::{PlanProvider, ProviderError};
use crate::RuntimeError;
use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use ttx_core::{
    build_schedule, validate_sim_config, CriticalIssueThresholds, GenerationSource,
    OperationalPeriod, PeriodResult, Persona, PersonaResponse, PersonaType, ScenarioConfig,
    ScenarioResults, ScenarioStatus, ScenarioType, SimConfig, TtxScript, ValidationError,
};
use ttx_events::{parse_action_plan, synthesize_timeline, PeriodEvents, SynthesisContext};
use ttx_knowledge::{build_persona_knowledge, knowledge_rng, PersonaKnowledge};
use ttx_personas::{
    build_roster, generate_location, persona_type_for, respond, PlacementParams,
};

/// ChaCha stream reserved for roster placement, so the roster does not depend
/// on how many draws event synthesis consumed.
pub const ROSTER_STREAM: u64 = 1;

/// Roster for a run seeded with `sim.rng_seed`.
pub fn scenario_roster(sim: &SimConfig, persona_count: u32) -> Vec<Persona> {
    let mut rng = ChaCha8Rng::seed_from_u64(sim.rng_seed);
    rng.set_stream(ROSTER_STREAM);
    build_roster(persona_count, sim, &mut rng)
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display title such as "Major Hurricane Exercise: Tampa Bay".
pub fn exercise_title(scenario: &ScenarioConfig) -> String {
    let hazard = title_case(&scenario.scenario_type);
    let severity = title_case(&scenario.severity);
    if severity.is_empty() || hazard.contains(&severity) {
        format!("{hazard} Exercise: {}", scenario.location)
    } else {
        format!("{severity} {hazard} Exercise: {}", scenario.location)
    }
}

fn plan_events(
    scenario: &ScenarioConfig,
    schedule: &[OperationalPeriod],
    ctx: &SynthesisContext,
    provider: Option<&dyn PlanProvider>,
    rng: &mut ChaCha8Rng,
) -> Result<(Vec<PeriodEvents>, GenerationSource, ScenarioStatus), RuntimeError> {
    let Some(provider) = provider else {
        return Ok((
            synthesize_timeline(ctx, schedule, rng),
            GenerationSource::Template,
            ScenarioStatus::Completed,
        ));
    };
    match provider.fetch_plan(scenario, schedule) {
        Ok(raw) => {
            let plan = parse_action_plan(&raw, schedule)?;
            info!(provider = provider.name(), "using external action plan");
            Ok((
                plan.periods.into_iter().map(PeriodEvents::from).collect(),
                GenerationSource::External,
                ScenarioStatus::Completed,
            ))
        }
        Err(ProviderError::Unavailable(reason)) => {
            warn!(
                provider = provider.name(),
                %reason,
                "plan provider unavailable, falling back to templates"
            );
            Ok((
                synthesize_timeline(ctx, schedule, rng),
                GenerationSource::Template,
                ScenarioStatus::Degraded,
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Run every persona through every period.
pub fn simulate_periods(
    roster: &[Persona],
    schedule: &[OperationalPeriod],
    events: Vec<PeriodEvents>,
    thresholds: &CriticalIssueThresholds,
) -> Vec<PeriodResult> {
    schedule
        .iter()
        .zip(events)
        .map(|(op, ev)| {
            let persona_responses: Vec<_> = roster.iter().map(|p| respond(p, op)).collect();
            let aggregates = aggregate(&persona_responses, thresholds);
            debug!(
                period = op.period_number,
                phase = %op.phase,
                injects = ev.injects.len(),
                actions = ev.eoc_actions.len(),
                issues = aggregates.critical_issues.len(),
                "period simulated"
            );
            PeriodResult {
                period_number: op.period_number,
                operational_period: op.clone(),
                injects: ev.injects,
                eoc_actions: ev.eoc_actions,
                persona_responses,
                aggregates,
            }
        })
        .collect()
}

/// Generate a complete scenario.
///
/// With no provider, events come from the hazard templates. An unavailable
/// provider falls back to templates and marks the result degraded; a payload
/// that fails structural validation is an error.
pub fn generate_scenario(
    scenario: &ScenarioConfig,
    sim: &SimConfig,
    provider: Option<&dyn PlanProvider>,
) -> Result<ScenarioResults, RuntimeError> {
    validate_sim_config(sim)?;
    let persona_count = scenario.agents.unwrap_or(sim.persona_count);
    if persona_count == 0 {
        return Err(ValidationError::ZeroPersonas.into());
    }
    let scenario_type = ScenarioType::parse_lenient(&scenario.scenario_type);
    info!(
        scenario = %scenario_type,
        location = %scenario.location,
        periods = sim.period_count,
        personas = persona_count,
        seed = sim.rng_seed,
        time = ?scenario.time,
        "generating scenario"
    );

    let schedule = build_schedule(sim.period_count, sim.base_hour_offset, &sim.phase_policy);
    let ctx = SynthesisContext {
        scenario_type,
        location: scenario.location.clone(),
        population: scenario.population,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(sim.rng_seed);
    let (events, source, status) = plan_events(scenario, &schedule, &ctx, provider, &mut rng)?;

    let roster = scenario_roster(sim, persona_count);
    let period_results = simulate_periods(&roster, &schedule, events, &sim.critical_issues);

    let results = ScenarioResults {
        ttx_script: TtxScript {
            title: exercise_title(scenario),
            scenario_type,
            location: scenario.location.clone(),
            severity: scenario.severity.clone(),
            population: scenario.population,
            total_periods: sim.period_count,
            persona_count,
            seed: sim.rng_seed,
            source,
        },
        period_results,
        status,
        generated_at: Utc::now(),
    };
    info!(
        periods = results.period_results.len(),
        source = ?source,
        status = ?status,
        "scenario generated"
    );
    Ok(results)
}

fn response_type(r: &PersonaResponse, index: u32) -> PersonaType {
    PersonaType::parse_label(&r.persona_type).unwrap_or_else(|| persona_type_for(index))
}

/// Profile of `persona_id` as it appears in one period. Type, name and
/// demographics come from the response; placement is replayed on the roster
/// stream in response order, which is the order every generator places in.
fn persona_in_period(
    results: &ScenarioResults,
    period: &PeriodResult,
    sim: &SimConfig,
    persona_id: &str,
) -> Option<Persona> {
    let responses = &period.persona_responses;
    let index = responses.iter().position(|r| r.persona_id == persona_id)?;
    let params = PlacementParams {
        center: sim.map_center,
        radius_spread: sim.radius_spread,
        shelters: &sim.shelters,
        period_count: results.ttx_script.total_periods,
        evacuation_duration: sim.evacuation_duration,
    };
    let total = responses.len() as u32;
    let mut rng = ChaCha8Rng::seed_from_u64(results.ttx_script.seed);
    rng.set_stream(ROSTER_STREAM);

    let mut placed = None;
    for (i, r) in responses.iter().enumerate().take(index + 1) {
        let i = i as u32;
        let t = response_type(r, i);
        placed = Some((r, t, generate_location(t, i, total, &params, &mut rng)));
    }
    let (r, persona_type, location) = placed?;
    Some(Persona {
        id: r.persona_id.clone(),
        name: r.persona_name.clone(),
        persona_type,
        index: index as u32,
        demographics: r.demographics.clone(),
        location,
    })
}

/// Rebuild a persona's knowledge for one period of a generated or
/// transformed scenario. `sim` must be the configuration the scenario was
/// produced with, apart from the seed, which is taken from the script.
pub fn persona_knowledge(
    results: &ScenarioResults,
    sim: &SimConfig,
    persona_id: &str,
    period_number: u32,
) -> Result<PersonaKnowledge, RuntimeError> {
    let period = results
        .period(period_number)
        .ok_or(RuntimeError::UnknownPeriod(period_number))?;
    let persona = persona_in_period(results, period, sim, persona_id)
        .ok_or_else(|| RuntimeError::UnknownPersona(persona_id.to_string()))?;
    let mut rng = knowledge_rng(results.ttx_script.seed, persona.index, period_number);
    Ok(build_persona_knowledge(
        &persona,
        period,
        &results.ttx_script,
        &sim.knowledge,
        &mut rng,
    ))
}
