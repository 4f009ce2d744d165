//! Scenario template tables keyed by hazard type and phase.
//!
//! Text may contain `{location}`, `{population}` and `{period}` placeholders.

use ttx_core::action_types as act;
use ttx_core::inject_types as inj;
use ttx_core::{Phase, ScenarioType};

#[derive(Clone, Copy, Debug)]
pub struct InjectTemplate {
    pub inject_type: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct ActionTemplate {
    pub action_type: &'static str,
    pub zone: Option<&'static str>,
    pub details: &'static str,
    pub target_population: &'static str,
}

#[derive(Debug)]
pub struct PhaseTemplates {
    pub injects: &'static [InjectTemplate],
    pub actions: &'static [ActionTemplate],
}

/// One table per phase, indexed by `Phase::index`.
#[derive(Debug)]
pub struct ScenarioTemplates(pub [PhaseTemplates; 4]);

impl ScenarioTemplates {
    pub fn phase(&self, phase: Phase) -> &PhaseTemplates {
        &self.0[phase.index() as usize]
    }
}

const fn i(
    inject_type: &'static str,
    title: &'static str,
    description: &'static str,
) -> InjectTemplate {
    InjectTemplate {
        inject_type,
        title,
        description,
    }
}

const fn a(
    action_type: &'static str,
    zone: Option<&'static str>,
    details: &'static str,
    target_population: &'static str,
) -> ActionTemplate {
    ActionTemplate {
        action_type,
        zone,
        details,
        target_population,
    }
}

static HURRICANE: ScenarioTemplates = ScenarioTemplates([
    PhaseTemplates {
        injects: &[
            i(
                inj::WEATHER_UPDATE,
                "Tropical Disturbance Identified",
                "Forecasters are monitoring a tropical system that could threaten {location} within five days.",
            ),
            i(
                inj::FORECAST_CHANGE,
                "Cone of Uncertainty Includes {location}",
                "The latest advisory places {location} inside the forecast cone; intensification is likely.",
            ),
            i(
                inj::MEDIA,
                "Local Media Begin Storm Coverage",
                "Television stations serving {population} residents start continuous storm coverage.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Early Supply Purchases",
                "Retailers report rising sales of water, batteries and plywood.",
            ),
        ],
        actions: &[
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "EOC activates at Level 3 and urges residents to review hurricane plans.",
                "All residents",
            ),
            a(
                act::RESOURCE_DEPLOYMENT,
                None,
                "Pre-position generators and water at county staging areas.",
                "Emergency responders",
            ),
            a(
                act::SHELTER,
                None,
                "Identify and inspect hurricane shelters; publish shelter list.",
                "Residents without safe housing",
            ),
            a(
                act::PUBLIC_ANNOUNCEMENT,
                Some("Zone A"),
                "Know-your-zone campaign launched for coastal neighborhoods.",
                "Coastal residents",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::WEATHER_UPDATE,
                "Hurricane Watch Issued",
                "A hurricane watch is in effect for {location}; hurricane conditions possible within 48 hours.",
            ),
            i(
                inj::FORECAST_CHANGE,
                "Storm Rapidly Intensifies",
                "The hurricane strengthened overnight and is forecast to make landfall as a major hurricane.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Fuel Shortages Reported",
                "Gas stations across {location} report long lines and empty pumps.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Traffic Congestion on Evacuation Routes",
                "Outbound interstates are heavily congested as residents leave early.",
            ),
            i(
                inj::MEDIA,
                "Rumors Spread on Social Media",
                "Unverified posts claim shelters are already full.",
            ),
        ],
        actions: &[
            a(
                act::EVACUATION_ORDER,
                Some("Zone A"),
                "Evacuation ordered for Zone A coastal and low-lying areas.",
                "Zone A residents",
            ),
            a(
                act::EVACUATION_ORDER,
                Some("Zone B"),
                "Evacuation ordered for Zone B and mobile home parks.",
                "Zone B residents",
            ),
            a(
                act::SHELTER,
                None,
                "General population and special-needs shelters open at noon.",
                "Evacuees",
            ),
            a(
                act::CONTRAFLOW,
                None,
                "Contraflow lanes activated on the main interstate corridor.",
                "Evacuating motorists",
            ),
            a(
                act::SCHOOL_CLOSURE,
                None,
                "All public schools closed until further notice.",
                "Families with children",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::WEATHER_UPDATE,
                "Landfall Imminent",
                "Hurricane-force winds and life-threatening storm surge are reaching {location}.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Widespread Power Outages",
                "More than half of {population} residents are without power.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Bridges Closed",
                "All causeways and bridges are closed due to sustained winds.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "911 Calls From Stranded Residents",
                "Dispatch reports calls from residents trapped by rising water.",
            ),
        ],
        actions: &[
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Shelter in place now; emergency services are suspended until winds subside.",
                "All residents",
            ),
            a(act::CURFEW, None, "Countywide curfew in effect.", "All residents"),
            a(
                act::RESOURCE_DEPLOYMENT,
                None,
                "Urban search and rescue teams staged for deployment.",
                "Emergency responders",
            ),
            a(
                act::EVACUATION_ORDER,
                Some("Zone C"),
                "Last-chance evacuation for Zone C residents in surge areas.",
                "Zone C residents",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::INFRASTRUCTURE,
                "Damage Assessment Underway",
                "Initial assessments show severe damage across coastal {location}.",
            ),
            i(
                inj::RESOURCE_SHORTAGE,
                "Water Boil Notice",
                "A boil-water notice is issued for most of the service area.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Residents Attempt Early Return",
                "Residents are trying to return before roads are cleared.",
            ),
            i(
                inj::HEALTH_UPDATE,
                "Heat and Generator Hazards",
                "Hospitals report heat illness and carbon monoxide exposures.",
            ),
        ],
        actions: &[
            a(
                act::RECOVERY_OPERATIONS,
                None,
                "Points of distribution open for food, water and ice.",
                "Affected residents",
            ),
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Re-entry remains restricted in damaged zones.",
                "Evacuated residents",
            ),
            a(
                act::RESOURCE_DEPLOYMENT,
                None,
                "Debris clearance crews assigned to primary routes.",
                "Public works",
            ),
        ],
    },
]);

static FLOOD: ScenarioTemplates = ScenarioTemplates([
    PhaseTemplates {
        injects: &[
            i(
                inj::WEATHER_UPDATE,
                "Heavy Rain Outlook",
                "Several days of heavy rain are forecast upstream of {location}.",
            ),
            i(
                inj::FORECAST_CHANGE,
                "River Forecast Raised",
                "River forecasts now show minor flooding near {location}.",
            ),
            i(
                inj::MEDIA,
                "Flood Insurance Reminders",
                "Local outlets remind residents that flood insurance takes time to activate.",
            ),
        ],
        actions: &[
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Residents in floodplains urged to prepare go-kits.",
                "Floodplain residents",
            ),
            a(
                act::RESOURCE_DEPLOYMENT,
                None,
                "Sandbag stations opened at fire stations.",
                "All residents",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::FORECAST_CHANGE,
                "Major Flood Stage Expected",
                "The river is forecast to crest at major flood stage in {location}.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Levee Seepage Reported",
                "Engineers report seepage along the north levee.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Residents Moving Valuables Upstairs",
                "Many residents plan to ride out the flood on upper floors.",
            ),
            i(
                inj::WEATHER_UPDATE,
                "Flash Flood Warning",
                "Flash flooding is occurring on low-water crossings.",
            ),
        ],
        actions: &[
            a(
                act::EVACUATION_ORDER,
                Some("Riverside District"),
                "Evacuation ordered for properties within the levee protection area.",
                "Riverside residents",
            ),
            a(act::SHELTER, None, "Shelters open at high-ground schools.", "Evacuees"),
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Turn around, don't drown: avoid flooded roads.",
                "All motorists",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::INFRASTRUCTURE,
                "Levee Breach",
                "A section of the levee has failed; water is entering neighborhoods.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Rooftop Rescues",
                "Residents are calling for rescue from rooftops.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Water Treatment Plant Offline",
                "The treatment plant serving {population} residents is offline.",
            ),
        ],
        actions: &[
            a(
                act::RESOURCE_DEPLOYMENT,
                None,
                "Swift-water rescue teams deployed.",
                "Stranded residents",
            ),
            a(
                act::EVACUATION_ORDER,
                Some("Lowland District"),
                "Immediate evacuation for the lowland district.",
                "Lowland residents",
            ),
            a(
                act::CURFEW,
                None,
                "Curfew in flooded areas to prevent looting.",
                "Flood zone residents",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::HEALTH_UPDATE,
                "Mold and Contamination Risk",
                "Health officials warn of mold and contaminated floodwater.",
            ),
            i(
                inj::RESOURCE_SHORTAGE,
                "Contractor Shortage",
                "Residents report long waits for cleanup contractors.",
            ),
            i(inj::INFRASTRUCTURE, "Roads Reopening", "Major routes reopen as water recedes."),
        ],
        actions: &[
            a(
                act::RECOVERY_OPERATIONS,
                None,
                "Disaster recovery centers open.",
                "Affected residents",
            ),
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Guidance issued on safe re-entry and cleanup.",
                "Returning residents",
            ),
        ],
    },
]);

static EPIDEMIC: ScenarioTemplates = ScenarioTemplates([
    PhaseTemplates {
        injects: &[
            i(
                inj::HEALTH_UPDATE,
                "Cluster of Respiratory Illness",
                "Hospitals in {location} report an unusual cluster of severe respiratory cases.",
            ),
            i(
                inj::MEDIA,
                "National Coverage of Outbreak",
                "National outlets report the outbreak spreading in neighboring states.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Pharmacy Runs",
                "Pharmacies report shortages of masks and fever reducers.",
            ),
        ],
        actions: &[
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Health department issues hygiene and symptom guidance.",
                "All residents",
            ),
            a(
                act::RESOURCE_DEPLOYMENT,
                None,
                "Testing sites planned at community health centers.",
                "Public health staff",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::HEALTH_UPDATE,
                "Community Transmission Confirmed",
                "Community spread is confirmed in {location}.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Hospital Capacity Strained",
                "ICU occupancy exceeds 85 percent.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Schools Report Absences",
                "Absenteeism is rising sharply in schools.",
            ),
            i(
                inj::MEDIA,
                "Misinformation About Treatments",
                "False treatment claims circulate widely online.",
            ),
        ],
        actions: &[
            a(
                act::SCHOOL_CLOSURE,
                None,
                "Schools move to remote learning for two weeks.",
                "Families with children",
            ),
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Residents asked to limit gatherings.",
                "All residents",
            ),
            a(
                act::RESOURCE_DEPLOYMENT,
                None,
                "Mobile testing units deployed to high-risk neighborhoods.",
                "High-risk residents",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::HEALTH_UPDATE,
                "Hospitals at Surge Capacity",
                "Hospitals activate crisis standards of care.",
            ),
            i(
                inj::RESOURCE_SHORTAGE,
                "Ventilator Shortage",
                "Regional stockpile of ventilators is nearly exhausted.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Essential Workers Absent",
                "Transit and grocery staffing falls below safe levels.",
            ),
        ],
        actions: &[
            a(act::SHELTER, None, "Stay-at-home order issued for {location}.", "All residents"),
            a(act::CURFEW, None, "Nighttime curfew to reduce gatherings.", "All residents"),
            a(
                act::RESOURCE_DEPLOYMENT,
                None,
                "Field hospital opened at the convention center.",
                "Patients",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::HEALTH_UPDATE,
                "Case Counts Declining",
                "New cases have declined for seven consecutive days.",
            ),
            i(inj::PUBLIC_BEHAVIOR, "Businesses Reopen", "Businesses begin phased reopening."),
            i(
                inj::RESOURCE_SHORTAGE,
                "Backlog of Deferred Care",
                "Clinics report long backlogs of deferred procedures.",
            ),
        ],
        actions: &[
            a(
                act::RECOVERY_OPERATIONS,
                None,
                "Phased reopening plan published.",
                "Businesses and residents",
            ),
            a(act::PUBLIC_ANNOUNCEMENT, None, "Vaccination clinics open to all adults.", "Adults"),
        ],
    },
]);

static WILDFIRE: ScenarioTemplates = ScenarioTemplates([
    PhaseTemplates {
        injects: &[
            i(
                inj::WEATHER_UPDATE,
                "Red Flag Warning",
                "Low humidity and high winds create critical fire weather near {location}.",
            ),
            i(
                inj::MEDIA,
                "Smoke Visible From Town",
                "Residents post photos of smoke on the ridge.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Utility Considers Power Shutoff",
                "The utility may de-energize lines serving {location}.",
            ),
        ],
        actions: &[
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Residents urged to sign up for emergency alerts.",
                "All residents",
            ),
            a(act::RESOURCE_DEPLOYMENT, None, "Strike teams pre-positioned.", "Fire agencies"),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::FORECAST_CHANGE,
                "Fire Spreading Toward Homes",
                "The fire has jumped containment lines and is moving toward neighborhoods.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Public Safety Power Shutoff",
                "Power is shut off for 40,000 customers.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Residents Watching and Waiting",
                "Many residents are waiting to see if the wind shifts.",
            ),
            i(inj::MEDIA, "Air Quality Hazardous", "Air quality index exceeds hazardous levels."),
        ],
        actions: &[
            a(
                act::EVACUATION_ORDER,
                Some("Ridge Zone"),
                "Evacuation order for ridge-top neighborhoods.",
                "Ridge Zone residents",
            ),
            a(act::SHELTER, None, "Evacuation center opened at the fairgrounds.", "Evacuees"),
            a(
                act::CONTRAFLOW,
                None,
                "All lanes of the canyon road converted to outbound.",
                "Evacuating motorists",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::INFRASTRUCTURE,
                "Structures Lost",
                "Dozens of structures have burned in {location}.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Residents Trapped by Fire",
                "Residents report being trapped on a dead-end road.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Cell Towers Down",
                "Cell service is failing across the burn area.",
            ),
        ],
        actions: &[
            a(
                act::EVACUATION_ORDER,
                Some("Valley Zone"),
                "Immediate evacuation for the valley.",
                "Valley Zone residents",
            ),
            a(
                act::RESOURCE_DEPLOYMENT,
                None,
                "Air tankers and additional strike teams requested.",
                "Fire agencies",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::HEALTH_UPDATE,
                "Ash and Debris Hazard",
                "Ash contains hazardous materials; protective equipment required.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Debris Flow Risk",
                "Burn scars raise debris-flow risk in the next storm.",
            ),
            i(
                inj::RESOURCE_SHORTAGE,
                "Housing Shortage",
                "Displaced residents struggle to find rentals.",
            ),
        ],
        actions: &[
            a(
                act::RECOVERY_OPERATIONS,
                None,
                "Local assistance center opened for displaced residents.",
                "Displaced residents",
            ),
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Re-entry schedule published by zone.",
                "Evacuated residents",
            ),
        ],
    },
]);

static GENERIC: ScenarioTemplates = ScenarioTemplates([
    PhaseTemplates {
        injects: &[
            i(
                inj::INFORMATION,
                "Hazard Advisory",
                "Officials are monitoring a developing hazard affecting {location}.",
            ),
            i(
                inj::MEDIA,
                "Media Inquiries",
                "Reporters request briefings on readiness in {location}.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Residents Seek Guidance",
                "Call centers report rising questions from the public.",
            ),
        ],
        actions: &[
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "EOC activated; residents advised to stay informed.",
                "All residents",
            ),
            a(
                act::RESOURCE_DEPLOYMENT,
                None,
                "Resources inventoried and staged.",
                "Emergency responders",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::FORECAST_CHANGE,
                "Hazard Escalating",
                "The hazard is escalating faster than expected.",
            ),
            i(
                inj::INFRASTRUCTURE,
                "Critical Facilities at Risk",
                "Hospitals and utilities report elevated risk.",
            ),
            i(inj::PUBLIC_BEHAVIOR, "Supply Hoarding", "Stores report empty shelves."),
        ],
        actions: &[
            a(
                act::EVACUATION_ORDER,
                Some("Zone 1"),
                "Evacuation ordered for the highest-risk zone.",
                "Zone 1 residents",
            ),
            a(act::SHELTER, None, "Shelters opened across {location}.", "Evacuees"),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::INFRASTRUCTURE,
                "Impact Underway",
                "The hazard is impacting {location}; services disrupted.",
            ),
            i(
                inj::PUBLIC_BEHAVIOR,
                "Requests for Rescue",
                "Residents report being unable to leave.",
            ),
            i(
                inj::RESOURCE_SHORTAGE,
                "Supply Chain Disruption",
                "Deliveries to {location} are halted.",
            ),
        ],
        actions: &[
            a(act::RESOURCE_DEPLOYMENT, None, "Rescue teams deployed.", "Affected residents"),
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Shelter in place unless instructed otherwise.",
                "All residents",
            ),
        ],
    },
    PhaseTemplates {
        injects: &[
            i(
                inj::INFRASTRUCTURE,
                "Damage Assessment",
                "Damage assessments begin across {location}.",
            ),
            i(
                inj::HEALTH_UPDATE,
                "Public Health Concerns",
                "Officials warn of secondary health hazards.",
            ),
            i(
                inj::RESOURCE_SHORTAGE,
                "Recovery Resources Strained",
                "Aid requests exceed available resources.",
            ),
        ],
        actions: &[
            a(act::RECOVERY_OPERATIONS, None, "Recovery centers opened.", "Affected residents"),
            a(
                act::PUBLIC_ANNOUNCEMENT,
                None,
                "Recovery timeline communicated to residents.",
                "All residents",
            ),
        ],
    },
]);

/// Template tables for a hazard type.
pub fn templates_for(scenario_type: ScenarioType) -> &'static ScenarioTemplates {
    match scenario_type {
        ScenarioType::Hurricane => &HURRICANE,
        ScenarioType::Flood => &FLOOD,
        ScenarioType::Epidemic => &EPIDEMIC,
        ScenarioType::Wildfire => &WILDFIRE,
        ScenarioType::Generic => &GENERIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_can_fill_minimums() {
        for st in [
            ScenarioType::Hurricane,
            ScenarioType::Flood,
            ScenarioType::Epidemic,
            ScenarioType::Wildfire,
            ScenarioType::Generic,
        ] {
            for phase in Phase::ALL {
                let t = templates_for(st).phase(phase);
                assert!(t.injects.len() >= 3, "{st} {phase} injects");
                assert!(!t.actions.is_empty(), "{st} {phase} actions");
            }
        }
    }
}
