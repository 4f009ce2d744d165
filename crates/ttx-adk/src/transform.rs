//! Agent backend payload to `ScenarioResults`.

use crate::payload::{AdkPayload, PersonaSeries, RawResponse};
use crate::vocab::{map_decision, map_location, map_sentiment};
use crate::AdkError;
use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use tracing::{info, warn};
use ttx_core::{
    build_schedule, validate_sim_config, Decision, GenerationSource, PeriodResult, Persona,
    PersonaLocation, PersonaResponse, PersonaType, ScenarioConfig, ScenarioResults,
    ScenarioStatus, ScenarioType, Sentiment, SimConfig, TtxScript,
};
use ttx_events::{synthesize_timeline, SynthesisContext};
use ttx_personas::{
    calculate_position, generate_demographics, generate_location, persona_name, persona_type_for,
    PlacementParams,
};
use ttx_runtime::{aggregate, exercise_title, ROSTER_STREAM};

/// Response to use for `period` (0-based) and, if it is borrowed from another
/// period, that period's 1-based number.
pub fn resolve_response(
    series: &PersonaSeries,
    period: usize,
) -> Option<(&RawResponse, Option<usize>)> {
    if let Some(Some(r)) = series.get(period) {
        return Some((r, None));
    }
    let upto = period.min(series.len());
    let earlier = series[..upto]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, r)| r.as_ref().map(|r| (i, r)));
    let (i, r) = earlier.or_else(|| {
        series
            .iter()
            .enumerate()
            .find_map(|(i, r)| r.as_ref().map(|r| (i, r)))
    })?;
    Some((r, Some(i + 1)))
}

fn fallback_note(from: usize) -> String {
    format!("[Fallback: reusing period {from} response]")
}

struct AdkPersona {
    persona: Persona,
    series: PersonaSeries,
}

fn build_personas(
    series: std::collections::BTreeMap<String, PersonaSeries>,
    sim: &SimConfig,
    period_count: u32,
) -> Vec<AdkPersona> {
    let usable: Vec<(String, PersonaSeries)> = series
        .into_iter()
        .filter(|(id, s)| {
            let ok = s.iter().any(Option::is_some);
            if !ok {
                warn!(persona = %id, "no readable responses, skipping persona");
            }
            ok
        })
        .collect();

    let params = PlacementParams {
        center: sim.map_center,
        radius_spread: sim.radius_spread,
        shelters: &sim.shelters,
        period_count,
        evacuation_duration: sim.evacuation_duration,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(sim.rng_seed);
    rng.set_stream(ROSTER_STREAM);
    let total = usable.len() as u32;

    usable
        .into_iter()
        .enumerate()
        .map(|(i, (id, series))| {
            let index = i as u32;
            let first = series.iter().flatten();
            let persona_type = first
                .clone()
                .find_map(|r| r.persona_type.as_deref().and_then(PersonaType::parse_label))
                .unwrap_or_else(|| persona_type_for(index));
            let name = first
                .clone()
                .find_map(|r| r.persona_name.clone())
                .unwrap_or_else(|| persona_name(index));
            let persona = Persona {
                id,
                name,
                persona_type,
                index,
                demographics: generate_demographics(persona_type, index),
                location: generate_location(persona_type, index, total, &params, &mut rng),
            };
            AdkPersona { persona, series }
        })
        .collect()
}

fn to_response(
    p: &Persona,
    raw: &RawResponse,
    fallback_from: Option<usize>,
    period_number: u32,
) -> PersonaResponse {
    let reasoning = raw.reasoning.clone().unwrap_or_default();
    let reasoning = match fallback_from {
        Some(from) if reasoning.is_empty() => fallback_note(from),
        Some(from) => format!("{} {reasoning}", fallback_note(from)),
        None => reasoning,
    };
    PersonaResponse {
        persona_id: p.id.clone(),
        persona_name: p.name.clone(),
        persona_type: p.persona_type.label().to_string(),
        demographics: p.demographics.clone(),
        decision: raw
            .decision
            .as_deref()
            .map(map_decision)
            .unwrap_or(Decision::StayHome),
        sentiment: raw
            .sentiment
            .as_deref()
            .map(map_sentiment)
            .unwrap_or(Sentiment::Calm),
        reasoning,
        actions: raw.actions.clone(),
        concerns: raw.concerns.clone(),
        needs_assistance: raw
            .needs_assistance
            .unwrap_or_else(|| p.persona_type.needs_assistance()),
        location: raw
            .location
            .as_deref()
            .map(map_location)
            .unwrap_or(PersonaLocation::Home),
        position: raw
            .position
            .unwrap_or_else(|| calculate_position(&p.location, period_number)),
    }
}

/// Transform a parsed agent backend payload.
///
/// The period count is the longest response series of any persona. Gaps are
/// filled from the persona's nearest earlier response (annotated in the
/// reasoning) and mark the result degraded. Fails only when no persona data
/// is found at all.
pub fn transform_adk_response(
    payload: &Value,
    scenario: &ScenarioConfig,
    sim: &SimConfig,
) -> Result<ScenarioResults, AdkError> {
    validate_sim_config(sim)?;
    let series = AdkPayload::detect(payload)?.persona_series();
    let period_count = series.values().map(Vec::len).max().unwrap_or(0) as u32;
    let personas = build_personas(series, sim, period_count);
    if personas.is_empty() || period_count == 0 {
        return Err(AdkError::NoPersonaData);
    }
    info!(
        personas = personas.len(),
        periods = period_count,
        "transforming agent backend payload"
    );

    let scenario_type = ScenarioType::parse_lenient(&scenario.scenario_type);
    let schedule = build_schedule(period_count, sim.base_hour_offset, &sim.phase_policy);
    let ctx = SynthesisContext {
        scenario_type,
        location: scenario.location.clone(),
        population: scenario.population,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(sim.rng_seed);
    let events = synthesize_timeline(&ctx, &schedule, &mut rng);

    let mut fallbacks = 0usize;
    let period_results: Vec<PeriodResult> = schedule
        .iter()
        .zip(events)
        .enumerate()
        .map(|(idx, (op, ev))| {
            let persona_responses: Vec<PersonaResponse> = personas
                .iter()
                .filter_map(|ap| {
                    let (raw, from) = resolve_response(&ap.series, idx)?;
                    if let Some(from) = from {
                        fallbacks += 1;
                        warn!(
                            persona = %ap.persona.id,
                            period = op.period_number,
                            from,
                            "missing response, reusing earlier period"
                        );
                    }
                    Some(to_response(&ap.persona, raw, from, op.period_number))
                })
                .collect();
            let aggregates = aggregate(&persona_responses, &sim.critical_issues);
            PeriodResult {
                period_number: op.period_number,
                operational_period: op.clone(),
                injects: ev.injects,
                eoc_actions: ev.eoc_actions,
                persona_responses,
                aggregates,
            }
        })
        .collect();

    let status = if fallbacks > 0 {
        ScenarioStatus::Degraded
    } else {
        ScenarioStatus::Completed
    };
    info!(fallbacks, status = ?status, "agent backend payload transformed");
    Ok(ScenarioResults {
        ttx_script: TtxScript {
            title: exercise_title(scenario),
            scenario_type,
            location: scenario.location.clone(),
            severity: scenario.severity.clone(),
            population: scenario.population,
            total_periods: period_count,
            persona_count: personas.len() as u32,
            seed: sim.rng_seed,
            source: GenerationSource::Adk,
        },
        period_results,
        status,
        generated_at: Utc::now(),
    })
}

/// Parse JSON text and transform it.
pub fn transform_adk_str(
    raw: &str,
    scenario: &ScenarioConfig,
    sim: &SimConfig,
) -> Result<ScenarioResults, AdkError> {
    let value: Value = serde_json::from_str(raw)?;
    transform_adk_response(&value, scenario, sim)
}
