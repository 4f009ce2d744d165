//! Scenario input and engine configuration.

use crate::{LatLng, Phase};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scenario parameters supplied by the operator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    /// Free-text hazard, e.g. "hurricane" or "Category 4 Hurricane".
    pub scenario_type: String,
    pub location: String,
    /// Free-text severity, e.g. "major".
    pub severity: String,
    pub population: u64,
    /// Number of personas to simulate; overrides `SimConfig::persona_count`.
    #[serde(default)]
    pub agents: Option<u32>,
    /// Optional label for the reference instant, e.g. "2025-09-10T00:00Z".
    #[serde(default)]
    pub time: Option<String>,
}

/// How phases are assigned to period indices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhasePolicy {
    /// Phase = number of thresholds reached by `index / total`, with each
    /// threshold expressed as `numerator / denominator`.
    Proportional {
        thresholds: [u32; 3],
        denominator: u32,
    },
    /// Explicit phase per index; indices past the end repeat the last phase.
    FixedList { phases: Vec<Phase> },
}

impl PhasePolicy {
    /// Thirds-based cutoffs (1/3, 2/3, 5/6). For 12 periods this yields the
    /// planning(4) / preparation(4) / response(2) / recovery(2) split.
    pub fn canonical() -> Self {
        PhasePolicy::Proportional {
            thresholds: [2, 4, 5],
            denominator: 6,
        }
    }

    /// Equal quarters.
    pub fn quartiles() -> Self {
        PhasePolicy::Proportional {
            thresholds: [1, 2, 3],
            denominator: 4,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            PhasePolicy::Proportional {
                thresholds,
                denominator,
            } => {
                if *denominator == 0 {
                    return Err(ValidationError::InvalidPhasePolicy(
                        "denominator must be > 0".into(),
                    ));
                }
                if thresholds.windows(2).any(|w| w[0] > w[1]) {
                    return Err(ValidationError::InvalidPhasePolicy(
                        "thresholds must be non-decreasing".into(),
                    ));
                }
                if thresholds.iter().any(|t| t > denominator) {
                    return Err(ValidationError::InvalidPhasePolicy(
                        "thresholds must not exceed the denominator".into(),
                    ));
                }
            }
            PhasePolicy::FixedList { phases } => {
                if phases.is_empty() {
                    return Err(ValidationError::InvalidPhasePolicy(
                        "fixed phase list is empty".into(),
                    ));
                }
                if phases.windows(2).any(|w| w[0] > w[1]) {
                    return Err(ValidationError::InvalidPhasePolicy(
                        "fixed phase list regresses".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for PhasePolicy {
    fn default() -> Self {
        PhasePolicy::canonical()
    }
}

/// Inclusion probabilities for the knowledge filter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeParams {
    /// Chance that a non-high inject reaches a default persona.
    pub low_severity_keep_probability: f64,
    /// Chance that a medium inject reaches a skeptical Skeptic.
    pub skeptic_medium_keep_probability: f64,
}

impl Default for KnowledgeParams {
    fn default() -> Self {
        Self {
            low_severity_keep_probability: 0.7,
            skeptic_medium_keep_probability: 0.5,
        }
    }
}

/// Absolute counts above which a period raises a critical issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalIssueThresholds {
    pub needing_assistance: u32,
    pub staying_home: u32,
    pub panicked: u32,
}

impl Default for CriticalIssueThresholds {
    fn default() -> Self {
        Self {
            needing_assistance: 10,
            staying_home: 25,
            panicked: 15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShelterSite {
    pub name: String,
    pub position: LatLng,
}

fn default_shelters() -> Vec<ShelterSite> {
    vec![
        ShelterSite {
            name: "Northside Middle School".into(),
            position: LatLng::new(28.132, -82.461),
        },
        ShelterSite {
            name: "County Fairgrounds Arena".into(),
            position: LatLng::new(28.021, -82.297),
        },
        ShelterSite {
            name: "Eastlake High School".into(),
            position: LatLng::new(28.104, -82.338),
        },
        ShelterSite {
            name: "Civic Center Annex".into(),
            position: LatLng::new(28.185, -82.402),
        },
    ]
}

/// Engine parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub period_count: u32,
    /// Start of period 1 relative to landfall, in hours.
    pub base_hour_offset: i32,
    /// Seed for every random draw in a generation run.
    pub rng_seed: u64,
    pub persona_count: u32,
    pub phase_policy: PhasePolicy,
    pub map_center: LatLng,
    /// Home radius range around `map_center`, in degrees.
    pub radius_spread: (f64, f64),
    pub shelters: Vec<ShelterSite>,
    /// Periods between leaving home and reaching the shelter.
    pub evacuation_duration: u32,
    pub knowledge: KnowledgeParams,
    pub critical_issues: CriticalIssueThresholds,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            period_count: 12,
            base_hour_offset: -120,
            rng_seed: 42,
            persona_count: 50,
            phase_policy: PhasePolicy::canonical(),
            map_center: LatLng::new(27.9506, -82.4572),
            radius_spread: (0.02, 0.12),
            shelters: default_shelters(),
            evacuation_duration: 2,
            knowledge: KnowledgeParams::default(),
            critical_issues: CriticalIssueThresholds::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("period count must be >= 1")]
    ZeroPeriods,
    #[error("persona count must be >= 1")]
    ZeroPersonas,
    #[error("at least one shelter site is required")]
    NoShelters,
    #[error("probability {name} = {value} is outside [0,1]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("radius spread must satisfy 0 <= min <= max")]
    InvalidRadiusSpread,
    #[error("invalid phase policy: {0}")]
    InvalidPhasePolicy(String),
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::ProbabilityOutOfRange { name, value });
    }
    Ok(())
}

/// Validate engine configuration before a generation run.
pub fn validate_sim_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    if cfg.period_count == 0 {
        return Err(ValidationError::ZeroPeriods);
    }
    if cfg.persona_count == 0 {
        return Err(ValidationError::ZeroPersonas);
    }
    if cfg.shelters.is_empty() {
        return Err(ValidationError::NoShelters);
    }
    let (lo, hi) = cfg.radius_spread;
    if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi) {
        return Err(ValidationError::InvalidRadiusSpread);
    }
    check_probability(
        "low_severity_keep_probability",
        cfg.knowledge.low_severity_keep_probability,
    )?;
    check_probability(
        "skeptic_medium_keep_probability",
        cfg.knowledge.skeptic_medium_keep_probability,
    )?;
    cfg.phase_policy.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        validate_sim_config(&SimConfig::default()).unwrap();
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = SimConfig {
            period_count: 0,
            ..SimConfig::default()
        };
        assert_eq!(validate_sim_config(&cfg), Err(ValidationError::ZeroPeriods));

        let mut cfg = SimConfig::default();
        cfg.knowledge.low_severity_keep_probability = 1.5;
        assert!(matches!(
            validate_sim_config(&cfg),
            Err(ValidationError::ProbabilityOutOfRange { .. })
        ));

        let cfg = SimConfig {
            phase_policy: PhasePolicy::FixedList {
                phases: vec![Phase::Response, Phase::Planning],
            },
            ..SimConfig::default()
        };
        assert!(matches!(
            validate_sim_config(&cfg),
            Err(ValidationError::InvalidPhasePolicy(_))
        ));
    }

    #[test]
    fn yaml_overrides_merge_with_defaults() {
        let yaml = "period_count: 13\nrng_seed: 7\nphase_policy:\n  kind: fixed_list\n  phases: [planning, preparation, response]\n";
        let cfg: SimConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.period_count, 13);
        assert_eq!(cfg.rng_seed, 7);
        assert_eq!(cfg.persona_count, 50);
        assert_eq!(cfg.shelters.len(), 4);
        assert!(cfg.phase_policy.validate().is_ok());
    }

    #[test]
    fn scenario_config_reads_camel_case() {
        let yaml = "scenarioType: hurricane\nlocation: Tampa Bay\nseverity: major\npopulation: 2700000\nagents: 20\n";
        let sc: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(sc.population, 2_700_000);
        assert_eq!(sc.agents, Some(20));
        assert!(sc.time.is_none());
    }
}
