//! Seam for external action-plan generators.

use thiserror::Error;
use ttx_core::{OperationalPeriod, ScenarioConfig};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Backend could not be reached or did not answer; callers fall back to
    /// template generation.
    #[error("plan provider unavailable: {0}")]
    Unavailable(String),
    /// Backend answered with something that is not a plan at all.
    #[error("plan provider rejected the request: {0}")]
    Rejected(String),
}

/// Source of a raw, untrusted action-plan payload.
pub trait PlanProvider {
    fn name(&self) -> &str;

    /// Raw JSON text for `schedule`. Validation happens in the caller.
    fn fetch_plan(
        &self,
        scenario: &ScenarioConfig,
        schedule: &[OperationalPeriod],
    ) -> Result<String, ProviderError>;
}

/// Serves a payload loaded ahead of time, e.g. from a file.
#[derive(Clone, Debug)]
pub struct StaticPlan {
    label: String,
    payload: String,
}

impl StaticPlan {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

impl PlanProvider for StaticPlan {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch_plan(
        &self,
        _scenario: &ScenarioConfig,
        _schedule: &[OperationalPeriod],
    ) -> Result<String, ProviderError> {
        Ok(self.payload.clone())
    }
}

/// A provider that never answers. Used for offline runs and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineProvider;

impl PlanProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    fn fetch_plan(
        &self,
        _scenario: &ScenarioConfig,
        _schedule: &[OperationalPeriod],
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable("no backend configured".into()))
    }
}
