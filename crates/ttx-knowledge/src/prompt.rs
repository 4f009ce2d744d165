//! Plain-text rendering of a persona's knowledge for a dialogue agent.
//!
//! Downstream prompts match on the section headers; keep them stable.

use crate::PersonaKnowledge;
use std::fmt::Write;
use ttx_core::EocAction;

pub const HEADER_AWARENESS: &str = "SCENARIO AWARENESS";
pub const HEADER_SOURCES: &str = "YOUR INFORMATION SOURCES";
pub const HEADER_NEWS: &str = "RECENT NEWS/UPDATES YOU'VE HEARD";
pub const HEADER_ACTIONS: &str = "GOVERNMENT ACTIONS/ANNOUNCEMENTS YOU'RE AWARE OF";

fn humanize(action_type: &str) -> String {
    let spaced = action_type.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn action_line(a: &EocAction) -> String {
    let mut tags = Vec::new();
    if let Some(zone) = &a.zone {
        tags.push(zone.clone());
    }
    if let Some(urgency) = a.urgency {
        tags.push(urgency.as_str().to_ascii_uppercase());
    }
    let head = humanize(&a.action_type);
    if tags.is_empty() {
        format!("- {head}: {}", a.details)
    } else {
        format!("- {head} ({}): {}", tags.join(", "), a.details)
    }
}

/// Render the four fixed sections. Pure; same knowledge, same text.
pub fn format_knowledge_for_prompt(k: &PersonaKnowledge) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = writeln!(out, "{HEADER_AWARENESS}:");
    let _ = writeln!(out, "{}", k.scenario_awareness);
    let _ = writeln!(out);

    let _ = writeln!(out, "{HEADER_SOURCES}:");
    for s in &k.information_sources {
        let _ = writeln!(out, "- {s}");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{HEADER_NEWS}:");
    if k.known_injects.is_empty() {
        let _ = writeln!(out, "- Nothing specific yet.");
    }
    for i in &k.known_injects {
        let _ = writeln!(
            out,
            "- [{}] {}: {}",
            i.severity.as_str().to_ascii_uppercase(),
            i.title,
            i.description
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{HEADER_ACTIONS}:");
    if k.known_eoc_actions.is_empty() {
        let _ = write!(out, "- None that you know of.");
    }
    let lines: Vec<String> = k.known_eoc_actions.iter().map(action_line).collect();
    out.push_str(&lines.join("\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AwarenessLevel, InformationSource};
    use ttx_core::{HourOffset, Inject, Severity, Urgency};

    fn knowledge() -> PersonaKnowledge {
        PersonaKnowledge {
            persona_id: "persona-002".into(),
            period_number: 5,
            known_injects: vec![Inject {
                id: "inject-5-1".into(),
                period_number: 5,
                time: HourOffset(-70),
                inject_type: "weather_update".into(),
                title: "Track shifts north".into(),
                description: "Landfall now expected near Tampa Bay.".into(),
                severity: Severity::High,
            }],
            known_eoc_actions: vec![
                EocAction {
                    id: "eoc-5-1".into(),
                    period_number: 5,
                    time: HourOffset(-68),
                    action_type: "evacuation_order".into(),
                    zone: Some("Zone A".into()),
                    urgency: Some(Urgency::Mandatory),
                    details: "Leave coastal Zone A now.".into(),
                    target_population: "Zone A residents".into(),
                },
                EocAction {
                    id: "eoc-5-2".into(),
                    period_number: 5,
                    time: HourOffset(-66),
                    action_type: "shelter".into(),
                    zone: None,
                    urgency: None,
                    details: "Four shelters open at noon.".into(),
                    target_population: "All residents".into(),
                },
            ],
            information_sources: vec![
                InformationSource::EmergencyAlerts,
                InformationSource::LocalRadio,
            ],
            awareness_level: AwarenessLevel::Low,
            scenario_awareness: "You have only heard bits and pieces.".into(),
        }
    }

    #[test]
    fn exact_layout() {
        let expected = "\
SCENARIO AWARENESS:
You have only heard bits and pieces.

YOUR INFORMATION SOURCES:
- Emergency alerts on your phone
- Local radio

RECENT NEWS/UPDATES YOU'VE HEARD:
- [HIGH] Track shifts north: Landfall now expected near Tampa Bay.

GOVERNMENT ACTIONS/ANNOUNCEMENTS YOU'RE AWARE OF:
- Evacuation order (Zone A, MANDATORY): Leave coastal Zone A now.
- Shelter: Four shelters open at noon.";
        assert_eq!(format_knowledge_for_prompt(&knowledge()), expected);
    }

    #[test]
    fn empty_sections_have_placeholders() {
        let mut k = knowledge();
        k.known_injects.clear();
        k.known_eoc_actions.clear();
        let text = format_knowledge_for_prompt(&k);
        assert!(text.contains("RECENT NEWS/UPDATES YOU'VE HEARD:\n- Nothing specific yet.\n"));
        assert!(text.ends_with("GOVERNMENT ACTIONS/ANNOUNCEMENTS YOU'RE AWARE OF:\n- None that you know of."));
    }

    #[test]
    fn rendering_is_stable() {
        let k = knowledge();
        assert_eq!(format_knowledge_for_prompt(&k), format_knowledge_for_prompt(&k));
    }
}
