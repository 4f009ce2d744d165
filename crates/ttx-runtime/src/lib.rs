#![deny(warnings)]

//! Scenario runtime: orchestration, aggregation and the scenario store.

pub mod aggregate;
pub mod provider;
pub mod scenario;
pub mod store;
pub mod summary;

pub use aggregate::aggregate;
pub use provider::{OfflineProvider, PlanProvider, ProviderError, StaticPlan};
pub use scenario::{
    exercise_title, generate_scenario, persona_knowledge, scenario_roster, simulate_periods,
    ROSTER_STREAM,
};
pub use store::{ScenarioStore, SubscriptionId};
pub use summary::{summarize, AfterActionSummary};

use thiserror::Error;
use ttx_core::ValidationError;
use ttx_events::PlanError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),
    #[error("external action plan rejected: {0}")]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("scenario has no period {0}")]
    UnknownPeriod(u32),
    #[error("scenario has no persona {0}")]
    UnknownPersona(String),
}
