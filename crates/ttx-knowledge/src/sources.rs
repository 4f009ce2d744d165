//! Information channels available to a persona.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use ttx_core::{Persona, PersonaType, SocialStatus, TrustLevel};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InformationSource {
    EmergencyAlerts,
    LocalRadio,
    LocalTv,
    InternetNews,
    SocialMedia,
    CableNews,
    WeatherApps,
    RadarApps,
    TraditionalTv,
    OfficialWebsites,
    GovernmentBriefings,
    WordOfMouth,
}

impl InformationSource {
    pub fn label(self) -> &'static str {
        match self {
            InformationSource::EmergencyAlerts => "Emergency alerts on your phone",
            InformationSource::LocalRadio => "Local radio",
            InformationSource::LocalTv => "Local TV news",
            InformationSource::InternetNews => "Online news sites",
            InformationSource::SocialMedia => "Social media",
            InformationSource::CableNews => "Cable news",
            InformationSource::WeatherApps => "Weather apps",
            InformationSource::RadarApps => "Radar and storm-tracking apps",
            InformationSource::TraditionalTv => "Broadcast TV",
            InformationSource::OfficialWebsites => "Official government websites",
            InformationSource::GovernmentBriefings => "Government press briefings",
            InformationSource::WordOfMouth => "Neighbors and word of mouth",
        }
    }

    /// Channels that carry official government messaging directly.
    pub fn is_official(self) -> bool {
        matches!(
            self,
            InformationSource::OfficialWebsites | InformationSource::GovernmentBriefings
        )
    }
}

impl fmt::Display for InformationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Channels unlocked additively by income tier, persona type and trust.
pub fn information_sources(persona: &Persona) -> Vec<InformationSource> {
    use InformationSource::*;
    let mut set = BTreeSet::from([LocalRadio, EmergencyAlerts]);

    let income: &[InformationSource] = match persona.demographics.social_status {
        SocialStatus::LowIncome => &[],
        SocialStatus::MiddleIncome => &[LocalTv, InternetNews, SocialMedia],
        SocialStatus::HighIncome => &[LocalTv, InternetNews, SocialMedia, CableNews, WeatherApps],
    };
    set.extend(income.iter().copied());

    let by_type: &[InformationSource] = match persona.persona_type {
        PersonaType::InformationSeeker | PersonaType::Planner => {
            &[OfficialWebsites, GovernmentBriefings]
        }
        PersonaType::TechSavvy => &[SocialMedia, RadarApps],
        PersonaType::Elderly => &[TraditionalTv, LocalRadio],
        PersonaType::Caregiver => &[WordOfMouth],
        _ => &[],
    };
    set.extend(by_type.iter().copied());

    if persona.demographics.trust_in_government == TrustLevel::High {
        set.insert(OfficialWebsites);
    }
    set.into_iter().collect()
}
