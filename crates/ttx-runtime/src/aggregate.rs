//! Per-period statistics over persona responses.

use std::collections::BTreeMap;
use ttx_core::{
    Aggregates, CriticalIssueThresholds, Decision, PersonaLocation, PersonaResponse, Sentiment,
};

fn dense<K: Ord + Copy>(keys: &[K]) -> BTreeMap<K, u32> {
    keys.iter().map(|k| (*k, 0)).collect()
}

/// Count responses by decision, sentiment and location. Every enum value is
/// present in the maps, observed or not.
pub fn aggregate(
    responses: &[PersonaResponse],
    thresholds: &CriticalIssueThresholds,
) -> Aggregates {
    let mut decisions = dense(&Decision::ALL);
    let mut sentiments = dense(&Sentiment::ALL);
    let mut locations = dense(&PersonaLocation::ALL);
    let mut needing_assistance = 0u32;

    for r in responses {
        *decisions.entry(r.decision).or_default() += 1;
        *sentiments.entry(r.sentiment).or_default() += 1;
        *locations.entry(r.location).or_default() += 1;
        if r.needs_assistance {
            needing_assistance += 1;
        }
    }

    let staying_home = decisions[&Decision::StayHome];
    let panicked = sentiments[&Sentiment::Panicked];
    let mut critical_issues = Vec::new();
    if needing_assistance > thresholds.needing_assistance {
        critical_issues.push(format!(
            "{needing_assistance} residents need assistance to evacuate"
        ));
    }
    if staying_home > thresholds.staying_home {
        critical_issues.push(format!("{staying_home} residents are refusing to evacuate"));
    }
    if panicked > thresholds.panicked {
        critical_issues.push(format!("{panicked} residents report panic"));
    }

    Aggregates {
        total_personas: responses.len() as u32,
        decisions,
        sentiments,
        locations,
        needing_assistance,
        critical_issues,
    }
}
