//! Detection and extraction of the agent backend's payload shapes.
//!
//! Two shapes exist in the wild:
//! - `{"list_sessions": [{"state": {<persona id>: [response, ...]}}]}`
//! - `[{"author": ..., "actions": {"stateDelta": {<persona id>: [...]}}}]`
//!
//! State values may be arrays or JSON text encoding an array.

use crate::AdkError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use ttx_core::LatLng;

/// One persona response as sent by the backend. Every field is optional and
/// read on its own, so a malformed value never costs the rest of the entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawResponse {
    pub decision: Option<String>,
    pub sentiment: Option<String>,
    pub location: Option<String>,
    pub reasoning: Option<String>,
    pub actions: Vec<String>,
    pub concerns: Vec<String>,
    pub needs_assistance: Option<bool>,
    pub persona_name: Option<String>,
    pub persona_type: Option<String>,
    pub position: Option<LatLng>,
}

/// Keys that mark an object as a persona response rather than other state.
const RESPONSE_KEYS: [&str; 3] = ["decision", "sentiment", "location"];

fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Strings as-is, numbers and bools as their text, anything else dropped.
fn text(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn text_list(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().filter_map(text).collect(),
        other => text(other).into_iter().collect(),
    }
}

impl RawResponse {
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        let text_of = |keys: &[&str]| field(obj, keys).and_then(text);
        let position = field(obj, &["position"]).and_then(|v| {
            serde_json::from_value::<LatLng>(v.clone())
                .map_err(|e| debug!(error = %e, "ignoring unreadable position"))
                .ok()
        });
        RawResponse {
            decision: text_of(&["decision"]),
            sentiment: text_of(&["sentiment"]),
            location: text_of(&["location"]),
            reasoning: text_of(&["reasoning"]),
            actions: field(obj, &["actions"]).map(text_list).unwrap_or_default(),
            concerns: field(obj, &["concerns"]).map(text_list).unwrap_or_default(),
            needs_assistance: field(obj, &["needsAssistance", "needs_assistance"])
                .and_then(Value::as_bool),
            persona_name: text_of(&["personaName", "persona_name", "name"]),
            persona_type: text_of(&["personaType", "persona_type", "type"]),
            position,
        }
    }
}

/// Responses of one persona indexed by 0-based period. `None` marks an
/// entry that was missing or unreadable.
pub type PersonaSeries = Vec<Option<RawResponse>>;

/// Recognized payload shapes.
#[derive(Debug)]
pub enum AdkPayload<'a> {
    Sessions(&'a [Value]),
    Records(&'a [Value]),
}

impl<'a> AdkPayload<'a> {
    pub fn detect(value: &'a Value) -> Result<Self, AdkError> {
        match value {
            Value::Object(obj) => ["list_sessions", "listSessions", "sessions"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(Value::as_array))
                .map(|s| AdkPayload::Sessions(s.as_slice()))
                .ok_or(AdkError::UnrecognizedShape),
            Value::Array(items) if items.iter().any(|r| r.get("actions").is_some()) => {
                Ok(AdkPayload::Records(items.as_slice()))
            }
            Value::Array(items) if items.iter().any(|r| r.get("state").is_some()) => {
                Ok(AdkPayload::Sessions(items.as_slice()))
            }
            _ => Err(AdkError::UnrecognizedShape),
        }
    }

    /// Per-persona series, keyed by persona id.
    pub fn persona_series(&self) -> BTreeMap<String, PersonaSeries> {
        match self {
            AdkPayload::Sessions(sessions) => best_session(sessions),
            AdkPayload::Records(records) => merge_records(records),
        }
    }
}

fn decode(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => serde_json::from_str(s).ok(),
        other => Some(other.clone()),
    }
}

fn read_response(key: &str, period: usize, entry: &Value) -> Option<RawResponse> {
    match decode(entry) {
        Some(Value::Object(obj)) => Some(RawResponse::from_object(&obj)),
        _ => {
            warn!(persona = key, period = period + 1, "response is not an object");
            None
        }
    }
}

fn is_response(entry: &Value) -> bool {
    decode(entry)
        .as_ref()
        .and_then(Value::as_object)
        .map_or(false, |obj| RESPONSE_KEYS.iter().any(|k| obj.contains_key(*k)))
}

/// Entries of `state` that hold arrays of persona responses. Arrays of other
/// objects (injects, logs) are not personas.
fn series_from_state(state: &Map<String, Value>) -> BTreeMap<String, PersonaSeries> {
    let mut out = BTreeMap::new();
    for (key, value) in state {
        let Some(Value::Array(items)) = decode(value) else {
            continue;
        };
        if !items.iter().any(is_response) {
            debug!(key = %key, "state entry holds no persona responses");
            continue;
        }
        let series: PersonaSeries = items
            .iter()
            .enumerate()
            .map(|(p, v)| read_response(key, p, v))
            .collect();
        out.insert(key.clone(), series);
    }
    out
}

fn populated(series: &BTreeMap<String, PersonaSeries>) -> (usize, usize) {
    let responses = series.values().flatten().filter(|r| r.is_some()).count();
    (series.len(), responses)
}

/// The session with the most persona data; earliest wins a tie.
fn best_session(sessions: &[Value]) -> BTreeMap<String, PersonaSeries> {
    let mut best: Option<(usize, BTreeMap<String, PersonaSeries>)> = None;
    for (idx, session) in sessions.iter().enumerate() {
        let Some(state) = session.get("state").and_then(Value::as_object) else {
            continue;
        };
        let series = series_from_state(state);
        let better = match &best {
            Some((_, cur)) => populated(&series) > populated(cur),
            None => !series.is_empty(),
        };
        if better {
            best = Some((idx, series));
        }
    }
    match best {
        Some((idx, series)) => {
            debug!(session = idx, personas = series.len(), "selected session");
            series
        }
        None => BTreeMap::new(),
    }
}

/// State deltas applied in order; a later delta for a persona replaces an
/// earlier one unless it carries fewer responses.
fn merge_records(records: &[Value]) -> BTreeMap<String, PersonaSeries> {
    let mut merged: BTreeMap<String, PersonaSeries> = BTreeMap::new();
    for record in records {
        let delta = record
            .get("actions")
            .and_then(|a| a.get("stateDelta").or_else(|| a.get("state_delta")))
            .and_then(Value::as_object);
        let Some(delta) = delta else {
            continue;
        };
        let author = record.get("author").and_then(Value::as_str).unwrap_or("?");
        for (key, series) in series_from_state(delta) {
            debug!(author, persona = %key, responses = series.len(), "state delta");
            let keep_old = merged
                .get(&key)
                .map_or(false, |old| old.len() > series.len());
            if !keep_old {
                merged.insert(key, series);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_both_shapes() {
        let sessions = json!({"list_sessions": [{"state": {}}]});
        assert!(matches!(AdkPayload::detect(&sessions), Ok(AdkPayload::Sessions(_))));
        let records = json!([{"author": "sim", "actions": {"stateDelta": {}}}]);
        assert!(matches!(AdkPayload::detect(&records), Ok(AdkPayload::Records(_))));
        assert!(matches!(
            AdkPayload::detect(&json!({"foo": []})),
            Err(AdkError::UnrecognizedShape)
        ));
        assert!(matches!(AdkPayload::detect(&json!(3)), Err(AdkError::UnrecognizedShape)));
    }

    #[test]
    fn picks_the_populated_session() {
        let payload = json!({"list_sessions": [
            {"id": "a", "state": {"status": "pending"}},
            {"id": "b", "state": {
                "persona-001": [{"decision": "evacuate"}],
                "persona-002": "[{\"decision\": \"stay_home\"}, {\"decision\": \"evacuate\"}]"
            }},
            {"id": "c", "state": {"persona-001": [{"decision": "evacuate"}]}}
        ]});
        let series = AdkPayload::detect(&payload).unwrap().persona_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series["persona-002"].len(), 2);
        assert_eq!(
            series["persona-002"][1].as_ref().and_then(|r| r.decision.clone()),
            Some("evacuate".into())
        );
    }

    #[test]
    fn records_merge_in_order() {
        let payload = json!([
            {"author": "a", "actions": {"stateDelta": {"persona-001": [{"decision": "stay"}]}}},
            {"author": "b", "actions": {"stateDelta": {"persona-002": [{"decision": "evacuate"}]}}},
            {"author": "c", "actions": {"stateDelta": {"persona-001": [{"decision": "stay"}, {"decision": "leave"}]}}},
            {"author": "d", "actions": {}}
        ]);
        let series = AdkPayload::detect(&payload).unwrap().persona_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series["persona-001"].len(), 2);
    }

    fn raw(v: Value) -> RawResponse {
        RawResponse::from_object(v.as_object().unwrap())
    }

    #[test]
    fn lenient_fields() {
        let r = raw(json!({
            "decision": "evacuate",
            "actions": "Packed the car",
            "concerns": null,
            "needs_assistance": true,
            "type": "The Elderly",
            "extra": 1
        }));
        assert_eq!(r.actions, vec!["Packed the car"]);
        assert!(r.concerns.is_empty());
        assert_eq!(r.needs_assistance, Some(true));
        assert_eq!(r.persona_type.as_deref(), Some("The Elderly"));
    }

    #[test]
    fn malformed_values_keep_the_rest() {
        let r = raw(json!({
            "decision": 3,
            "sentiment": {"mood": "calm"},
            "reasoning": "Got the alert",
            "actions": ["Filled the tank", 2, null],
            "needsAssistance": "yes",
            "position": "27.9, -82.4"
        }));
        assert_eq!(r.decision.as_deref(), Some("3"));
        assert_eq!(r.sentiment, None);
        assert_eq!(r.reasoning.as_deref(), Some("Got the alert"));
        assert_eq!(r.actions, vec!["Filled the tank", "2"]);
        assert_eq!(r.needs_assistance, None);
        assert_eq!(r.position, None);

        let r = raw(json!({"position": {"lat": 27.9, "lng": -82.4}, "needsAssistance": false}));
        assert_eq!(r.position, Some(LatLng::new(27.9, -82.4)));
        assert_eq!(r.needs_assistance, Some(false));
    }

    #[test]
    fn only_non_objects_become_gaps() {
        let state = json!({"persona-001": [{"decision": "evacuate"}, 7, {"decision": 5}]});
        let series = series_from_state(state.as_object().unwrap());
        let s = &series["persona-001"];
        assert!(s[0].is_some());
        assert!(s[1].is_none());
        assert_eq!(s[2].as_ref().and_then(|r| r.decision.clone()), Some("5".into()));
    }

    #[test]
    fn other_arrays_are_not_personas() {
        let injects: Vec<Value> = (1..=5)
            .map(|i| json!({"id": format!("inj-{i}"), "title": "Storm surge", "severity": "high"}))
            .collect();
        let state = json!({
            "persona-001": [{"decision": "evacuate"}, {"sentiment": "calm"}],
            "injects": injects,
            "log": ["started"]
        });
        let series = series_from_state(state.as_object().unwrap());
        assert_eq!(series.keys().collect::<Vec<_>>(), vec!["persona-001"]);
    }
}
