//! Holder for the current scenario with change notification.

use crate::provider::PlanProvider;
use crate::scenario::generate_scenario;
use crate::RuntimeError;
use std::fmt;
use tracing::debug;
use ttx_core::{ScenarioConfig, ScenarioResults, SimConfig};

type Listener = Box<dyn FnMut(&ScenarioResults, u64) + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns the latest `ScenarioResults`. Results are replaced wholesale, never
/// patched; every replacement bumps the revision and notifies subscribers.
#[derive(Default)]
pub struct ScenarioStore {
    current: Option<ScenarioResults>,
    revision: u64,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl fmt::Debug for ScenarioStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioStore")
            .field("has_current", &self.current.is_some())
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ScenarioResults> {
        self.current.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a callback run after every replacement with the new results
    /// and revision.
    pub fn subscribe<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&ScenarioResults, u64) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Swap in new results and notify. Returns the new revision.
    pub fn replace(&mut self, results: ScenarioResults) -> u64 {
        self.revision += 1;
        let results = self.current.insert(results);
        for (_, listener) in self.listeners.iter_mut() {
            listener(results, self.revision);
        }
        debug!(
            revision = self.revision,
            listeners = self.listeners.len(),
            "scenario replaced"
        );
        self.revision
    }

    /// Generate and replace. On error the current results stay in place.
    pub fn regenerate(
        &mut self,
        scenario: &ScenarioConfig,
        sim: &SimConfig,
        provider: Option<&dyn PlanProvider>,
    ) -> Result<u64, RuntimeError> {
        let results = generate_scenario(scenario, sim, provider)?;
        Ok(self.replace(results))
    }
}
