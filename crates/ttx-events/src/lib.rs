#![deny(warnings)]

//! Event synthesis for the TTX simulator.
//!
//! Two sources of ground truth per operational period:
//! - template mode, selecting injects and EOC actions from hazard tables
//!   with a seeded RNG;
//! - external mode, validating and normalizing an untrusted action plan
//!   produced by a generative backend.

pub mod external;
pub mod synth;
pub mod templates;

pub use external::{
    parse_action_plan, validate_action_plan, ActionPlan, PlanError, PlannedPeriod,
    MIN_EOC_ACTIONS_PER_PERIOD, MIN_INJECTS_PER_PERIOD,
};
pub use synth::{
    format_population, severity_for_phase, synthesize_period, synthesize_timeline,
    urgency_for, PeriodEvents, SynthesisContext,
};

impl From<PlannedPeriod> for PeriodEvents {
    fn from(p: PlannedPeriod) -> Self {
        PeriodEvents {
            injects: p.injects,
            eoc_actions: p.eoc_actions,
        }
    }
}
