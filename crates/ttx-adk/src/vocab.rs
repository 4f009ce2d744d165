//! Free-text values from the agent backend mapped onto the fixed enums.
//!
//! Unrecognized text maps to the safe default of each enum.

use tracing::debug;
use ttx_core::{Decision, PersonaLocation, Sentiment};

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['_', '-'], " ")
}

fn any_of(s: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| s.contains(n))
}

/// Defaults to `stay_home`.
pub fn map_decision(raw: &str) -> Decision {
    let s = normalize(raw);
    if let Some(d) = Decision::ALL
        .iter()
        .find(|d| d.as_str().replace('_', " ") == s)
    {
        return *d;
    }
    if any_of(&s, &["shelter in place", "hunker", "ride it out"]) {
        Decision::ShelterInPlace
    } else if any_of(&s, &["evacuat", "leave", "leaving", "relocat", "go to shelter", "head to"]) {
        Decision::Evacuate
    } else if any_of(&s, &["help", "neighbor", "assist", "volunteer"]) {
        Decision::HelpNeighbors
    } else if any_of(&s, &["gather", "info", "research", "monitor"]) {
        Decision::GatherInfo
    } else if any_of(&s, &["wait", "watch"]) {
        Decision::WaitAndSee
    } else if s.contains("shelter") {
        Decision::ShelterInPlace
    } else {
        if !s.contains("stay") {
            debug!(value = raw, "unrecognized decision, using stay_home");
        }
        Decision::StayHome
    }
}

/// Defaults to `calm`.
pub fn map_sentiment(raw: &str) -> Sentiment {
    let s = normalize(raw);
    if any_of(&s, &["panic", "terrified", "hysteric"]) {
        Sentiment::Panicked
    } else if any_of(&s, &["anxi", "nervous", "scared", "afraid", "fear"]) {
        Sentiment::Anxious
    } else if any_of(&s, &["concern", "worr", "uneasy", "cautious"]) {
        Sentiment::Concerned
    } else if any_of(&s, &["skeptic", "doubt", "unconvinced", "distrust"]) {
        Sentiment::Skeptical
    } else if any_of(&s, &["defian", "angry", "refus", "stubborn", "resist"]) {
        Sentiment::Defiant
    } else {
        if !any_of(&s, &["calm", "relaxed", "fine", "confident"]) {
            debug!(value = raw, "unrecognized sentiment, using calm");
        }
        Sentiment::Calm
    }
}

/// Defaults to `home`.
pub fn map_location(raw: &str) -> PersonaLocation {
    let s = normalize(raw);
    if let Some(l) = PersonaLocation::ALL
        .iter()
        .find(|l| l.as_str().replace('_', " ") == s)
    {
        return *l;
    }
    if any_of(&s, &["family", "relative", "friend"]) {
        PersonaLocation::WithFamily
    } else if any_of(&s, &["helping", "neighbor", "volunteer"]) {
        PersonaLocation::HelpingOthers
    } else if s.contains("shelter") && !s.contains("in place") {
        PersonaLocation::Shelter
    } else if any_of(&s, &["evacuat", "road", "driving", "transit", "en route", "highway"]) {
        PersonaLocation::Evacuating
    } else {
        if !any_of(&s, &["home", "house", "in place"]) {
            debug!(value = raw, "unrecognized location, using home");
        }
        PersonaLocation::Home
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decisions() {
        assert_eq!(map_decision("stay_home"), Decision::StayHome);
        assert_eq!(map_decision("Shelter-In-Place"), Decision::ShelterInPlace);
        assert_eq!(map_decision("Evacuating to Orlando"), Decision::Evacuate);
        assert_eq!(map_decision("checking on my neighbors"), Decision::HelpNeighbors);
        assert_eq!(map_decision("monitoring the news"), Decision::GatherInfo);
        assert_eq!(map_decision("wait and see"), Decision::WaitAndSee);
        assert_eq!(map_decision("dance"), Decision::StayHome);
    }

    #[test]
    fn sentiments() {
        assert_eq!(map_sentiment("PANICKED"), Sentiment::Panicked);
        assert_eq!(map_sentiment("worried"), Sentiment::Concerned);
        assert_eq!(map_sentiment("very nervous"), Sentiment::Anxious);
        assert_eq!(map_sentiment("doubtful"), Sentiment::Skeptical);
        assert_eq!(map_sentiment("refusing"), Sentiment::Defiant);
        assert_eq!(map_sentiment("???"), Sentiment::Calm);
    }

    #[test]
    fn locations() {
        assert_eq!(map_location("with_family"), PersonaLocation::WithFamily);
        assert_eq!(map_location("at my sister's, a relative"), PersonaLocation::WithFamily);
        assert_eq!(map_location("Red Cross shelter"), PersonaLocation::Shelter);
        assert_eq!(map_location("sheltering in place"), PersonaLocation::Home);
        assert_eq!(map_location("on the highway"), PersonaLocation::Evacuating);
        assert_eq!(map_location("moon"), PersonaLocation::Home);
    }

    proptest! {
        #[test]
        fn wire_names_map_to_themselves(d in 0usize..6, s in 0usize..6, l in 0usize..5) {
            prop_assert_eq!(map_decision(Decision::ALL[d].as_str()), Decision::ALL[d]);
            prop_assert_eq!(map_sentiment(Sentiment::ALL[s].as_str()), Sentiment::ALL[s]);
            prop_assert_eq!(map_location(PersonaLocation::ALL[l].as_str()), PersonaLocation::ALL[l]);
        }

        #[test]
        fn arbitrary_text_never_panics(raw in ".{0,40}") {
            let _ = (map_decision(&raw), map_sentiment(&raw), map_location(&raw));
        }
    }
}
