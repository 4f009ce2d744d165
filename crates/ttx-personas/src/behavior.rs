//! Table-driven decision, sentiment and narrative rules.
//!
//! All rules are pure functions of persona type, movement status and the
//! 1-based period number. Responses are rebuilt from scratch every period.

use crate::location::{calculate_position, location_status};
use ttx_core::{
    Decision, MovementStatus, OperationalPeriod, Persona, PersonaLocation, PersonaResponse,
    PersonaType, Phase, Sentiment,
};

/// Last period of the calm stage.
pub const CALM_UNTIL: u32 = 3;
/// Last period of the concerned stage.
pub const CONCERNED_UNTIL: u32 = 6;
/// Last period of the anxious stage; later periods are panicked.
pub const ANXIOUS_UNTIL: u32 = 9;
/// From this period on, personas still at home shelter in place.
pub const LATE_PERIOD_THRESHOLD: u32 = 8;

fn base_sentiment(period: u32) -> Sentiment {
    if period <= CALM_UNTIL {
        Sentiment::Calm
    } else if period <= CONCERNED_UNTIL {
        Sentiment::Concerned
    } else if period <= ANXIOUS_UNTIL {
        Sentiment::Anxious
    } else {
        Sentiment::Panicked
    }
}

/// Sentiment escalation with per-type overrides.
pub fn sentiment(t: PersonaType, period: u32) -> Sentiment {
    let base = base_sentiment(period);
    match t {
        PersonaType::Anxious => {
            if period <= CONCERNED_UNTIL {
                Sentiment::Anxious
            } else {
                Sentiment::Panicked
            }
        }
        PersonaType::Skeptic => match base {
            Sentiment::Anxious => Sentiment::Skeptical,
            other => other,
        },
        PersonaType::Stubborn => {
            if period <= CONCERNED_UNTIL {
                Sentiment::Calm
            } else {
                Sentiment::Defiant
            }
        }
        PersonaType::Optimist => {
            if period <= CONCERNED_UNTIL {
                Sentiment::Calm
            } else if period <= ANXIOUS_UNTIL {
                Sentiment::Concerned
            } else {
                Sentiment::Anxious
            }
        }
        PersonaType::Planner => {
            if period <= CALM_UNTIL {
                Sentiment::Calm
            } else {
                Sentiment::Concerned
            }
        }
        _ => base,
    }
}

/// Decision driven by movement status, with a few at-home overrides.
pub fn decision(t: PersonaType, status: MovementStatus, period: u32) -> Decision {
    match status {
        MovementStatus::Evacuating => Decision::Evacuate,
        MovementStatus::Shelter => Decision::ShelterInPlace,
        MovementStatus::Home => match t {
            PersonaType::InformationSeeker if period <= 4 => Decision::GatherInfo,
            PersonaType::Skeptic if (4..LATE_PERIOD_THRESHOLD).contains(&period) => {
                Decision::WaitAndSee
            }
            PersonaType::Caregiver if (5..=LATE_PERIOD_THRESHOLD).contains(&period) => {
                Decision::HelpNeighbors
            }
            _ if period >= LATE_PERIOD_THRESHOLD => Decision::ShelterInPlace,
            _ => Decision::StayHome,
        },
    }
}

/// Reported location; refines the movement status with the decision.
pub fn reported_location(t: PersonaType, status: MovementStatus, d: Decision) -> PersonaLocation {
    match (status, d) {
        (_, Decision::HelpNeighbors) => PersonaLocation::HelpingOthers,
        (MovementStatus::Shelter, _) if t == PersonaType::Elderly => PersonaLocation::WithFamily,
        _ => status.into(),
    }
}

fn type_outlook(t: PersonaType) -> &'static str {
    match t {
        PersonaType::Planner => "I made a plan weeks ago and I'm following it",
        PersonaType::Skeptic => "officials always overhype these things",
        PersonaType::Anxious => "I can't stop checking the news",
        PersonaType::Elderly => "getting around is hard for me and I rely on others",
        PersonaType::ResourceConstrained => "leaving costs money I don't have",
        PersonaType::InformationSeeker => "I want to know exactly what the experts are saying",
        PersonaType::TechSavvy => "the radar apps show exactly where this is heading",
        PersonaType::Optimist => "it will probably turn out fine",
        PersonaType::Caregiver => "my family and neighbors depend on me",
        PersonaType::Stubborn => "nobody is making me leave my home",
    }
}

/// One-paragraph explanation of the persona's choice.
pub fn reasoning(t: PersonaType, status: MovementStatus, period: u32) -> String {
    let outlook = type_outlook(t);
    let d = decision(t, status, period);
    let situation = match (status, d) {
        (MovementStatus::Evacuating, _) => "I'm on the road to the shelter now".to_string(),
        (MovementStatus::Shelter, _) => "I made it to the shelter and I'm staying put".to_string(),
        (MovementStatus::Home, Decision::GatherInfo) => {
            "I'm still home gathering information before deciding".to_string()
        }
        (MovementStatus::Home, Decision::WaitAndSee) => {
            "I'm going to wait and see how bad this gets".to_string()
        }
        (MovementStatus::Home, Decision::HelpNeighbors) => {
            "I'm checking on neighbors who may need help".to_string()
        }
        (MovementStatus::Home, Decision::ShelterInPlace) => {
            "it's too late to leave safely, so I'm sheltering at home".to_string()
        }
        (MovementStatus::Home, _) => format!("in period {period} I'm staying home for now"),
    };
    format!("{}; {}.", capitalize(&situation), outlook)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn status_actions(status: MovementStatus, d: Decision) -> &'static [&'static str] {
    match (status, d) {
        (MovementStatus::Evacuating, _) => &[
            "Loading the car with essentials",
            "Following the posted evacuation route",
            "Texting family my location",
            "Stopping for fuel when possible",
        ],
        (MovementStatus::Shelter, _) => &[
            "Checking in with shelter staff",
            "Charging phone at the shelter",
            "Listening for re-entry updates",
            "Helping set up cots",
        ],
        (_, Decision::GatherInfo) => &[
            "Reading official advisories",
            "Comparing forecast models",
            "Calling the county information line",
        ],
        (_, Decision::HelpNeighbors) => &[
            "Checking on elderly neighbors",
            "Sharing supplies",
            "Helping neighbors board windows",
            "Offering rides to the shelter",
        ],
        (_, Decision::ShelterInPlace) => &[
            "Moving to an interior room",
            "Filling bathtubs with water",
            "Keeping a battery radio on",
            "Staying away from windows",
        ],
        _ => &[
            "Watching the news",
            "Buying water and batteries",
            "Securing outdoor furniture",
            "Charging devices",
        ],
    }
}

/// Actions taken this period; more of the list is revealed over time.
pub fn actions(t: PersonaType, status: MovementStatus, period: u32) -> Vec<String> {
    let d = decision(t, status, period);
    let list = status_actions(status, d);
    let n = (1 + period as usize / 4).min(list.len());
    list.iter().take(n).map(|s| s.to_string()).collect()
}

fn type_concerns(t: PersonaType) -> &'static [&'static str] {
    match t {
        PersonaType::Planner => &["Keeping to the timeline", "Fuel availability", "Home damage"],
        PersonaType::Skeptic => &[
            "Being inconvenienced for nothing",
            "Looting while away",
            "Cost of evacuating",
        ],
        PersonaType::Anxious => &[
            "Family safety",
            "Getting stuck in traffic",
            "Shelters being full",
            "Losing everything",
        ],
        PersonaType::Elderly => &[
            "Access to medication",
            "Transportation",
            "Medical equipment power",
            "Being alone",
        ],
        PersonaType::ResourceConstrained => &[
            "Cost of travel",
            "Losing wages",
            "No vehicle",
            "Food running out",
        ],
        PersonaType::InformationSeeker => &[
            "Conflicting information",
            "Forecast accuracy",
            "Official guidance changing",
        ],
        PersonaType::TechSavvy => &[
            "Cell service outages",
            "Power for devices",
            "Misinformation online",
        ],
        PersonaType::Optimist => &["Missing work", "Traffic"],
        PersonaType::Caregiver => &[
            "Children's safety",
            "Neighbors without transport",
            "Supplies for the household",
        ],
        PersonaType::Stubborn => &["Protecting the property", "Government overreach", "Looting"],
    }
}

/// Concerns voiced this period; one more surfaces every three periods.
pub fn concerns(t: PersonaType, status: MovementStatus, period: u32) -> Vec<String> {
    let list = type_concerns(t);
    let n = (1 + period as usize / 3).min(list.len());
    let mut out: Vec<String> = list.iter().take(n).map(|s| s.to_string()).collect();
    if status == MovementStatus::Shelter {
        out.push("When we can return home".to_string());
    }
    out
}

/// Full response of one persona for one period.
pub fn respond(persona: &Persona, period: &OperationalPeriod) -> PersonaResponse {
    let n = period.period_number;
    let t = persona.persona_type;
    let status = location_status(&persona.location, n);
    let d = decision(t, status, n);
    let mut reasoning = reasoning(t, status, n);
    if period.phase == Phase::Recovery && status != MovementStatus::Evacuating {
        reasoning.push_str(" The worst seems to be over.");
    }
    PersonaResponse {
        persona_id: persona.id.clone(),
        persona_name: persona.name.clone(),
        persona_type: t.label().to_string(),
        demographics: persona.demographics.clone(),
        decision: d,
        sentiment: sentiment(t, n),
        reasoning,
        actions: actions(t, status, n),
        concerns: concerns(t, status, n),
        needs_assistance: t.needs_assistance(),
        location: reported_location(t, status, d),
        position: calculate_position(&persona.location, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_escalates_for_base_types() {
        let seq: Vec<Sentiment> = (1..=12).map(|p| sentiment(PersonaType::Elderly, p)).collect();
        assert_eq!(seq[0], Sentiment::Calm);
        assert_eq!(seq[4], Sentiment::Concerned);
        assert_eq!(seq[7], Sentiment::Anxious);
        assert_eq!(seq[11], Sentiment::Panicked);
    }

    #[test]
    fn type_overrides() {
        assert_eq!(sentiment(PersonaType::Anxious, 1), Sentiment::Anxious);
        assert_eq!(sentiment(PersonaType::Skeptic, 8), Sentiment::Skeptical);
        assert!((1..=12).all(|p| sentiment(PersonaType::Skeptic, p) != Sentiment::Anxious));
        assert_eq!(sentiment(PersonaType::Stubborn, 10), Sentiment::Defiant);
    }

    #[test]
    fn decision_follows_status() {
        for t in PersonaType::ALL {
            assert_eq!(decision(t, MovementStatus::Evacuating, 5), Decision::Evacuate);
            assert_eq!(decision(t, MovementStatus::Shelter, 5), Decision::ShelterInPlace);
        }
        assert_eq!(decision(PersonaType::Optimist, MovementStatus::Home, 2), Decision::StayHome);
        assert_eq!(
            decision(PersonaType::Optimist, MovementStatus::Home, LATE_PERIOD_THRESHOLD),
            Decision::ShelterInPlace
        );
        assert_eq!(
            decision(PersonaType::InformationSeeker, MovementStatus::Home, 2),
            Decision::GatherInfo
        );
        assert_eq!(decision(PersonaType::Skeptic, MovementStatus::Home, 5), Decision::WaitAndSee);
        assert_eq!(
            decision(PersonaType::Caregiver, MovementStatus::Home, 6),
            Decision::HelpNeighbors
        );
    }

    #[test]
    fn assistance_is_static() {
        assert!(PersonaType::Elderly.needs_assistance());
        assert!(PersonaType::ResourceConstrained.needs_assistance());
        assert!(!PersonaType::Planner.needs_assistance());
    }

    #[test]
    fn lists_grow_with_period() {
        let early = concerns(PersonaType::Anxious, MovementStatus::Home, 1);
        let late = concerns(PersonaType::Anxious, MovementStatus::Home, 12);
        assert!(early.len() < late.len());
        let a1 = actions(PersonaType::Planner, MovementStatus::Home, 1);
        let a9 = actions(PersonaType::Planner, MovementStatus::Home, 9);
        assert!(a1.len() < a9.len());
    }

    #[test]
    fn reported_location_refinements() {
        assert_eq!(
            reported_location(
                PersonaType::Caregiver,
                MovementStatus::Home,
                Decision::HelpNeighbors,
            ),
            PersonaLocation::HelpingOthers
        );
        assert_eq!(
            reported_location(
                PersonaType::Elderly,
                MovementStatus::Shelter,
                Decision::ShelterInPlace,
            ),
            PersonaLocation::WithFamily
        );
        assert_eq!(
            reported_location(PersonaType::Planner, MovementStatus::Evacuating, Decision::Evacuate),
            PersonaLocation::Evacuating
        );
    }

    #[test]
    fn reasoning_mentions_outlook() {
        let r = reasoning(PersonaType::Stubborn, MovementStatus::Home, 3);
        assert!(r.contains("nobody is making me leave"));
        assert!(r.starts_with("In period 3"));
    }
}
