#![deny(warnings)]

//! Core domain model for the tabletop-exercise (TTX) simulator.
//!
//! This crate defines the serializable types shared across the workspace:
//! operational periods, injects, EOC actions, persona profiles and
//! per-period responses, plus the canonical period schedule. Enums that
//! arrive from untrusted sources carry lenient parsers that never fail.

mod config;
mod offset;
pub mod schedule;

pub use config::{
    validate_sim_config, CriticalIssueThresholds, KnowledgeParams, PhasePolicy, ScenarioConfig,
    ShelterSite, SimConfig, ValidationError,
};
pub use offset::HourOffset;
pub use schedule::{build_schedule, phase_for_period, PERIOD_HOURS};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Lifecycle stage of the exercise. Ordering follows the progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Planning,
    Preparation,
    Response,
    Recovery,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Planning,
        Phase::Preparation,
        Phase::Response,
        Phase::Recovery,
    ];

    /// Position in the progression (planning = 0 .. recovery = 3).
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::Preparation => "preparation",
            Phase::Response => "response",
            Phase::Recovery => "recovery",
        }
    }

    /// Case-insensitive match with prefix tolerance; unknown values become `Planning`.
    pub fn parse_lenient(raw: &str) -> Phase {
        let s = raw.trim().to_ascii_lowercase();
        if let Some(p) = Phase::ALL.iter().find(|p| p.as_str() == s) {
            return *p;
        }
        let guess = if s.starts_with("prep") {
            Some(Phase::Preparation)
        } else if s.starts_with("respon") {
            Some(Phase::Response)
        } else if s.starts_with("recov") {
            Some(Phase::Recovery)
        } else if s.starts_with("plan") {
            Some(Phase::Planning)
        } else {
            None
        };
        guess.unwrap_or_else(|| {
            debug!(value = raw, "unrecognized phase, defaulting to planning");
            Phase::Planning
        })
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of an inject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn is_high_or_critical(self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }

    /// Case-insensitive match, then common synonyms; anything else is `Medium`.
    pub fn parse_lenient(raw: &str) -> Severity {
        let s = raw.trim().to_ascii_lowercase();
        if let Some(v) = Severity::ALL.iter().find(|v| v.as_str() == s) {
            return *v;
        }
        match s.as_str() {
            "minor" | "minimal" | "info" | "informational" => Severity::Low,
            "moderate" | "elevated" | "normal" => Severity::Medium,
            "severe" | "major" | "serious" | "significant" => Severity::High,
            "extreme" | "catastrophic" | "emergency" => Severity::Critical,
            _ => {
                debug!(value = raw, "unrecognized severity, defaulting to medium");
                Severity::Medium
            }
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency attached to evacuation-type EOC actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Voluntary,
    Mandatory,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Voluntary => "voluntary",
            Urgency::Mandatory => "mandatory",
        }
    }

    /// Returns `None` for values that name neither urgency.
    pub fn parse_lenient(raw: &str) -> Option<Urgency> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mandatory" | "required" | "compulsory" | "ordered" => Some(Urgency::Mandatory),
            "voluntary" | "recommended" | "advisory" | "optional" => Some(Urgency::Voluntary),
            _ => None,
        }
    }
}

/// Hazard family used to pick template tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioType {
    Hurricane,
    Flood,
    Epidemic,
    Wildfire,
    Generic,
}

impl ScenarioType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioType::Hurricane => "hurricane",
            ScenarioType::Flood => "flood",
            ScenarioType::Epidemic => "epidemic",
            ScenarioType::Wildfire => "wildfire",
            ScenarioType::Generic => "generic",
        }
    }

    pub fn parse_lenient(raw: &str) -> ScenarioType {
        let s = raw.trim().to_ascii_lowercase();
        if s.contains("hurricane") || s.contains("tropical") || s.contains("cyclone") {
            ScenarioType::Hurricane
        } else if s.contains("flood") {
            ScenarioType::Flood
        } else if s.contains("epidemic") || s.contains("pandemic") || s.contains("outbreak") {
            ScenarioType::Epidemic
        } else if s.contains("wildfire") || s.contains("fire") {
            ScenarioType::Wildfire
        } else {
            ScenarioType::Generic
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a persona decided to do in a period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    StayHome,
    Evacuate,
    ShelterInPlace,
    HelpNeighbors,
    GatherInfo,
    WaitAndSee,
}

impl Decision {
    pub const ALL: [Decision; 6] = [
        Decision::StayHome,
        Decision::Evacuate,
        Decision::ShelterInPlace,
        Decision::HelpNeighbors,
        Decision::GatherInfo,
        Decision::WaitAndSee,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::StayHome => "stay_home",
            Decision::Evacuate => "evacuate",
            Decision::ShelterInPlace => "shelter_in_place",
            Decision::HelpNeighbors => "help_neighbors",
            Decision::GatherInfo => "gather_info",
            Decision::WaitAndSee => "wait_and_see",
        }
    }
}

/// Emotional state reported by a persona.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Calm,
    Concerned,
    Anxious,
    Panicked,
    Skeptical,
    Defiant,
}

impl Sentiment {
    pub const ALL: [Sentiment; 6] = [
        Sentiment::Calm,
        Sentiment::Concerned,
        Sentiment::Anxious,
        Sentiment::Panicked,
        Sentiment::Skeptical,
        Sentiment::Defiant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Calm => "calm",
            Sentiment::Concerned => "concerned",
            Sentiment::Anxious => "anxious",
            Sentiment::Panicked => "panicked",
            Sentiment::Skeptical => "skeptical",
            Sentiment::Defiant => "defiant",
        }
    }
}

/// Where a persona is in a period, as reported downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaLocation {
    Home,
    Evacuating,
    Shelter,
    WithFamily,
    HelpingOthers,
}

impl PersonaLocation {
    pub const ALL: [PersonaLocation; 5] = [
        PersonaLocation::Home,
        PersonaLocation::Evacuating,
        PersonaLocation::Shelter,
        PersonaLocation::WithFamily,
        PersonaLocation::HelpingOthers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PersonaLocation::Home => "home",
            PersonaLocation::Evacuating => "evacuating",
            PersonaLocation::Shelter => "shelter",
            PersonaLocation::WithFamily => "with_family",
            PersonaLocation::HelpingOthers => "helping_others",
        }
    }
}

/// Coarse three-way movement state derived from the evacuation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    Home,
    Evacuating,
    Shelter,
}

impl From<MovementStatus> for PersonaLocation {
    fn from(s: MovementStatus) -> Self {
        match s {
            MovementStatus::Home => PersonaLocation::Home,
            MovementStatus::Evacuating => PersonaLocation::Evacuating,
            MovementStatus::Shelter => PersonaLocation::Shelter,
        }
    }
}

/// Geographic coordinate in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation; `t` is not clamped.
    pub fn lerp(self, to: LatLng, t: f64) -> LatLng {
        LatLng {
            lat: self.lat + (to.lat - self.lat) * t,
            lng: self.lng + (to.lng - self.lng) * t,
        }
    }

    /// Planar distance in degrees, sufficient for ordering nearby points.
    pub fn distance_deg(self, other: LatLng) -> f64 {
        ((self.lat - other.lat).powi(2) + (self.lng - other.lng).powi(2)).sqrt()
    }
}

/// A 12-hour slice of the exercise timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalPeriod {
    /// 1-based, contiguous.
    pub period_number: u32,
    pub start_time: HourOffset,
    pub end_time: HourOffset,
    pub phase: Phase,
    pub label: String,
}

impl OperationalPeriod {
    pub fn duration_hours(&self) -> i32 {
        self.end_time.hours() - self.start_time.hours()
    }
}

/// Well-known inject type strings. External plans may use others.
pub mod inject_types {
    pub const WEATHER_UPDATE: &str = "weather_update";
    pub const FORECAST_CHANGE: &str = "forecast_change";
    pub const INFRASTRUCTURE: &str = "infrastructure";
    pub const MEDIA: &str = "media";
    pub const PUBLIC_BEHAVIOR: &str = "public_behavior";
    pub const HEALTH_UPDATE: &str = "health_update";
    pub const RESOURCE_SHORTAGE: &str = "resource_shortage";
    pub const INFORMATION: &str = "information";
}

/// Well-known EOC action type strings. External plans may use others.
pub mod action_types {
    pub const EVACUATION_ORDER: &str = "evacuation_order";
    pub const SHELTER: &str = "shelter";
    pub const CONTRAFLOW: &str = "contraflow";
    pub const PUBLIC_ANNOUNCEMENT: &str = "public_announcement";
    pub const RESOURCE_DEPLOYMENT: &str = "resource_deployment";
    pub const SCHOOL_CLOSURE: &str = "school_closure";
    pub const CURFEW: &str = "curfew";
    pub const RECOVERY_OPERATIONS: &str = "recovery_operations";

    /// Action types whose urgency follows the evacuation rule.
    pub fn is_evacuation_type(action_type: &str) -> bool {
        matches!(action_type, EVACUATION_ORDER | CONTRAFLOW)
    }
}

/// Objective scripted event. Ground truth once generated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inject {
    /// Template and defaulted ids read `inject-{period}-{n}`.
    pub id: String,
    /// Operational period the inject belongs to (1-based).
    pub period_number: u32,
    /// When the inject occurs, inside its period.
    pub time: HourOffset,
    /// Category such as `weather_update` or `infrastructure`.
    #[serde(rename = "type")]
    pub inject_type: String,
    /// Headline shown to participants.
    pub title: String,
    /// Narrative text with location and population filled in.
    pub description: String,
    /// High and critical injects reach every persona.
    pub severity: Severity,
}

/// Official EOC decision or announcement. Ground truth once generated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EocAction {
    /// Template and defaulted ids read `eoc-{period}-{n}`.
    pub id: String,
    /// Operational period the action belongs to (1-based).
    pub period_number: u32,
    /// When the action is taken, inside its period.
    pub time: HourOffset,
    /// One of the [`action_types`] constants.
    pub action_type: String,
    /// Evacuation zone the action targets, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Set on evacuation-type actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    /// Announcement text.
    pub details: String,
    /// Who the action is addressed to.
    pub target_population: String,
}

impl EocAction {
    pub fn is_mandatory(&self) -> bool {
        self.urgency == Some(Urgency::Mandatory)
    }
}

/// Synthetic persona archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PersonaType {
    #[serde(rename = "The Planner")]
    Planner,
    #[serde(rename = "The Skeptic")]
    Skeptic,
    #[serde(rename = "The Anxious")]
    Anxious,
    #[serde(rename = "The Elderly")]
    Elderly,
    #[serde(rename = "Resource Constrained")]
    ResourceConstrained,
    #[serde(rename = "Information Seeker")]
    InformationSeeker,
    #[serde(rename = "Tech Savvy")]
    TechSavvy,
    #[serde(rename = "The Optimist")]
    Optimist,
    #[serde(rename = "The Caregiver")]
    Caregiver,
    #[serde(rename = "The Stubborn")]
    Stubborn,
}

impl PersonaType {
    pub const ALL: [PersonaType; 10] = [
        PersonaType::Planner,
        PersonaType::Skeptic,
        PersonaType::Anxious,
        PersonaType::Elderly,
        PersonaType::ResourceConstrained,
        PersonaType::InformationSeeker,
        PersonaType::TechSavvy,
        PersonaType::Optimist,
        PersonaType::Caregiver,
        PersonaType::Stubborn,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PersonaType::Planner => "The Planner",
            PersonaType::Skeptic => "The Skeptic",
            PersonaType::Anxious => "The Anxious",
            PersonaType::Elderly => "The Elderly",
            PersonaType::ResourceConstrained => "Resource Constrained",
            PersonaType::InformationSeeker => "Information Seeker",
            PersonaType::TechSavvy => "Tech Savvy",
            PersonaType::Optimist => "The Optimist",
            PersonaType::Caregiver => "The Caregiver",
            PersonaType::Stubborn => "The Stubborn",
        }
    }

    /// Matches labels and ids such as `the_skeptic`, `tech-savvy`, `Elderly`.
    pub fn parse_label(raw: &str) -> Option<PersonaType> {
        let norm: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let norm = norm.strip_prefix("the").unwrap_or(&norm);
        PersonaType::ALL.iter().copied().find(|t| {
            let key: String = t
                .label()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();
            let key = key.strip_prefix("the").unwrap_or(&key);
            !norm.is_empty() && norm.starts_with(key)
        })
    }

    /// Static assistance need; not dynamic over time.
    pub fn needs_assistance(self) -> bool {
        matches!(self, PersonaType::ResourceConstrained | PersonaType::Elderly)
    }
}

impl fmt::Display for PersonaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Income tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialStatus {
    LowIncome,
    MiddleIncome,
    HighIncome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeOwnership {
    Own,
    Rent,
}

/// Demographic profile; fixed per persona.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaDemographics {
    /// Age in years.
    pub age: u32,
    pub race: String,
    /// Income tier; drives which media a persona follows.
    pub social_status: SocialStatus,
    pub political_leaning: String,
    /// Low trust narrows which official actions a persona registers.
    pub trust_in_government: TrustLevel,
    pub education_level: String,
    /// People in the household, including the persona (>= 1).
    pub household_size: u32,
    pub has_children: bool,
    pub has_vehicle: bool,
    pub home_ownership: HomeOwnership,
}

/// Home, shelter and evacuation window for one persona.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaLocationData {
    pub home_location: LatLng,
    pub shelter_location: LatLng,
    /// `None` means the persona never evacuates.
    pub evacuation_start_period: Option<u32>,
    pub evacuation_end_period: Option<u32>,
}

/// Static persona profile; per-period responses are derived from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub persona_type: PersonaType,
    /// 0-based position in the roster.
    pub index: u32,
    pub demographics: PersonaDemographics,
    pub location: PersonaLocationData,
}

/// Snapshot of one persona in one period. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaResponse {
    pub persona_id: String,
    pub persona_name: String,
    pub persona_type: String,
    pub demographics: PersonaDemographics,
    pub decision: Decision,
    pub sentiment: Sentiment,
    pub reasoning: String,
    pub actions: Vec<String>,
    pub concerns: Vec<String>,
    pub needs_assistance: bool,
    pub location: PersonaLocation,
    pub position: LatLng,
}

/// Dense counts over a period's responses: every enum key is present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub total_personas: u32,
    pub decisions: BTreeMap<Decision, u32>,
    pub sentiments: BTreeMap<Sentiment, u32>,
    pub locations: BTreeMap<PersonaLocation, u32>,
    pub needing_assistance: u32,
    pub critical_issues: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodResult {
    pub period_number: u32,
    pub operational_period: OperationalPeriod,
    pub injects: Vec<Inject>,
    pub eoc_actions: Vec<EocAction>,
    pub persona_responses: Vec<PersonaResponse>,
    pub aggregates: Aggregates,
}

/// Where the injects and EOC actions of a run came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    Template,
    External,
    Adk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Completed,
    /// Completed at reduced fidelity, e.g. after a provider fallback.
    Degraded,
}

/// Scenario metadata carried alongside the results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtxScript {
    /// Display title, e.g. "Major Hurricane Exercise: Tampa Bay, FL".
    pub title: String,
    /// Normalized hazard type.
    pub scenario_type: ScenarioType,
    /// Affected area as given in the scenario config.
    pub location: String,
    /// Free-text severity as given in the scenario config.
    pub severity: String,
    /// Residents of the affected area.
    pub population: u64,
    /// Number of operational periods in the results.
    pub total_periods: u32,
    /// Personas responding in every period.
    pub persona_count: u32,
    /// Run seed; replaying with it reproduces the roster and knowledge.
    pub seed: u64,
    /// Where the injects and EOC actions came from.
    pub source: GenerationSource,
}

/// Top-level output; replaced wholesale on regeneration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResults {
    pub ttx_script: TtxScript,
    pub period_results: Vec<PeriodResult>,
    pub status: ScenarioStatus,
    pub generated_at: DateTime<Utc>,
}

impl ScenarioResults {
    pub fn period(&self, period_number: u32) -> Option<&PeriodResult> {
        self.period_results
            .iter()
            .find(|p| p.period_number == period_number)
    }
}
