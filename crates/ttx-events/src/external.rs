//! Validation and normalization of externally generated action plans.
//!
//! Payloads come from a generative backend and are untrusted. Structural
//! problems (no periods array, wrong period count, missing per-period fields,
//! too few events) are hard errors. Value-level problems (unknown enum text,
//! missing ids, titles or times) are filled with deterministic defaults.

use crate::synth::urgency_for;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use ttx_core::{EocAction, HourOffset, Inject, OperationalPeriod, Phase, Severity, Urgency};

/// Minimum injects each externally supplied period must carry.
pub const MIN_INJECTS_PER_PERIOD: usize = 3;
/// Minimum EOC actions each externally supplied period must carry.
pub const MIN_EOC_ACTIONS_PER_PERIOD: usize = 1;

/// Structural failures of an external action plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has no periods array")]
    MissingPeriods,
    #[error("expected {expected} periods, found {found}")]
    WrongPeriodCount { expected: usize, found: usize },
    #[error("period {position} is not an object")]
    MalformedPeriod { position: usize },
    #[error("period {position} is missing required field `{field}`")]
    MissingField {
        position: usize,
        field: &'static str,
    },
    #[error("period {position} field `{field}` is not an array")]
    NotAnArray {
        position: usize,
        field: &'static str,
    },
    #[error("period {position} has {found} injects, at least {min} required")]
    TooFewInjects {
        position: usize,
        found: usize,
        min: usize,
    },
    #[error("period {position} has no EOC actions")]
    NoEocActions { position: usize },
}

/// One normalized period of an external plan.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedPeriod {
    pub period_number: u32,
    /// Phase as stated by the payload, after lenient parsing.
    pub phase: Phase,
    pub injects: Vec<Inject>,
    pub eoc_actions: Vec<EocAction>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionPlan {
    pub periods: Vec<PlannedPeriod>,
}

/// The historical payload shapes.
enum PlanShape<'a> {
    /// `{ "periods": [...] }`
    Bare(&'a [Value]),
    /// `{ "actionPlan": { "periods": [...] } }`
    Wrapped(&'a [Value]),
}

fn periods_array(obj: &Map<String, Value>) -> Result<Option<&[Value]>, PlanError> {
    match obj.get("periods") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.as_slice())),
        Some(_) => Err(PlanError::NotAnArray {
            position: 0,
            field: "periods",
        }),
    }
}

fn detect_shape(value: &Value) -> Result<PlanShape<'_>, PlanError> {
    let obj = value.as_object().ok_or(PlanError::MissingPeriods)?;
    if let Some(items) = periods_array(obj)? {
        return Ok(PlanShape::Bare(items));
    }
    let wrapped = obj
        .get("actionPlan")
        .or_else(|| obj.get("action_plan"))
        .and_then(Value::as_object);
    if let Some(inner) = wrapped {
        if let Some(items) = periods_array(inner)? {
            return Ok(PlanShape::Wrapped(items));
        }
    }
    Err(PlanError::MissingPeriods)
}

fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Non-empty text for the first present key; numbers are stringified.
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match field(obj, keys)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_period_number(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn humanize(kind: &str) -> String {
    let spaced = kind.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_time(obj: &Map<String, Value>, fallback: HourOffset) -> HourOffset {
    match text(obj, &["time", "timestamp"]) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            debug!(value = %raw, "unparseable time, using period start");
            fallback
        }),
        None => fallback,
    }
}

fn normalize_inject(raw: &Value, period: &OperationalPeriod, ordinal: usize) -> Inject {
    let empty = Map::new();
    let (obj, bare_text) = match raw {
        Value::Object(o) => (o, None),
        Value::String(s) => (&empty, Some(s.trim().to_string())),
        _ => (&empty, None),
    };
    let inject_type = text(obj, &["type", "injectType", "inject_type", "category"])
        .unwrap_or_else(|| ttx_core::inject_types::INFORMATION.to_string());
    let title = text(obj, &["title", "name", "headline"])
        .or_else(|| bare_text.clone())
        .unwrap_or_else(|| format!("{} {}", humanize(&inject_type), ordinal + 1));
    let description = text(obj, &["description", "details", "content", "text"])
        .or(bare_text)
        .unwrap_or_else(|| title.clone());
    let severity = text(obj, &["severity", "priority"])
        .map(|s| Severity::parse_lenient(&s))
        .unwrap_or(Severity::Medium);
    Inject {
        id: text(obj, &["id"])
            .unwrap_or_else(|| format!("inject-{}-{}", period.period_number, ordinal + 1)),
        period_number: period.period_number,
        time: parse_time(obj, period.start_time),
        inject_type,
        title,
        description,
        severity,
    }
}

fn normalize_action(raw: &Value, period: &OperationalPeriod, ordinal: usize) -> EocAction {
    let empty = Map::new();
    let (obj, bare_text) = match raw {
        Value::Object(o) => (o, None),
        Value::String(s) => (&empty, Some(s.trim().to_string())),
        _ => (&empty, None),
    };
    let action_type = text(obj, &["actionType", "action_type", "type"])
        .map(|s| s.to_ascii_lowercase().replace([' ', '-'], "_"))
        .unwrap_or_else(|| ttx_core::action_types::PUBLIC_ANNOUNCEMENT.to_string());
    let urgency = match text(obj, &["urgency"]) {
        Some(raw) => Urgency::parse_lenient(&raw).or_else(|| {
            debug!(value = %raw, "unrecognized urgency");
            urgency_for(&action_type, period.phase)
        }),
        None => urgency_for(&action_type, period.phase),
    };
    EocAction {
        id: text(obj, &["id"])
            .unwrap_or_else(|| format!("eoc-{}-{}", period.period_number, ordinal + 1)),
        period_number: period.period_number,
        time: parse_time(obj, period.start_time),
        details: text(obj, &["details", "description", "title"])
            .or(bare_text)
            .unwrap_or_else(|| humanize(&action_type)),
        action_type,
        zone: text(obj, &["zone", "area"]),
        urgency,
        target_population: text(obj, &["targetPopulation", "target_population", "target"])
            .unwrap_or_else(|| "General public".to_string()),
    }
}

fn required_array<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&str],
    position: usize,
    name: &'static str,
) -> Result<&'a [Value], PlanError> {
    match field(obj, keys) {
        None => Err(PlanError::MissingField {
            position,
            field: name,
        }),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(PlanError::NotAnArray {
            position,
            field: name,
        }),
    }
}

/// Validate and normalize a parsed payload against the expected schedule.
pub fn validate_action_plan(
    payload: &Value,
    schedule: &[OperationalPeriod],
) -> Result<ActionPlan, PlanError> {
    let periods = match detect_shape(payload)? {
        PlanShape::Bare(items) => {
            debug!("action plan uses bare periods shape");
            items
        }
        PlanShape::Wrapped(items) => {
            debug!("action plan uses wrapped actionPlan shape");
            items
        }
    };
    if periods.len() != schedule.len() {
        return Err(PlanError::WrongPeriodCount {
            expected: schedule.len(),
            found: periods.len(),
        });
    }

    let mut out = Vec::with_capacity(periods.len());
    for (idx, (raw, slot)) in periods.iter().zip(schedule).enumerate() {
        let position = idx + 1;
        let obj = raw
            .as_object()
            .ok_or(PlanError::MalformedPeriod { position })?;

        let number = field(obj, &["periodNumber", "period_number"]).ok_or(
            PlanError::MissingField {
                position,
                field: "periodNumber",
            },
        )?;
        let phase_raw = field(obj, &["phase"]).ok_or(PlanError::MissingField {
            position,
            field: "phase",
        })?;
        let injects = required_array(obj, &["injects"], position, "injects")?;
        let actions = required_array(obj, &["eocActions", "eoc_actions"], position, "eocActions")?;

        if injects.len() < MIN_INJECTS_PER_PERIOD {
            return Err(PlanError::TooFewInjects {
                position,
                found: injects.len(),
                min: MIN_INJECTS_PER_PERIOD,
            });
        }
        if actions.len() < MIN_EOC_ACTIONS_PER_PERIOD {
            return Err(PlanError::NoEocActions { position });
        }

        match as_period_number(number) {
            Some(n) if n == slot.period_number => {}
            other => debug!(
                position,
                stated = ?other,
                "period number disagrees with position, using position"
            ),
        }
        let phase = Phase::parse_lenient(phase_raw.as_str().unwrap_or_default());
        if phase != slot.phase {
            warn!(
                period = slot.period_number,
                stated = %phase,
                scheduled = %slot.phase,
                "external phase differs from schedule"
            );
        }

        out.push(PlannedPeriod {
            period_number: slot.period_number,
            phase,
            injects: injects
                .iter()
                .enumerate()
                .map(|(k, v)| normalize_inject(v, slot, k))
                .collect(),
            eoc_actions: actions
                .iter()
                .enumerate()
                .map(|(k, v)| normalize_action(v, slot, k))
                .collect(),
        });
    }
    Ok(ActionPlan { periods: out })
}

/// Parse a JSON string and validate it.
pub fn parse_action_plan(
    raw: &str,
    schedule: &[OperationalPeriod],
) -> Result<ActionPlan, PlanError> {
    let value: Value = serde_json::from_str(raw)?;
    validate_action_plan(&value, schedule)
}
