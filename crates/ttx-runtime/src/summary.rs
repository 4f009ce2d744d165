//! After-action reduction over a finished scenario.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ttx_core::{PersonaLocation, ScenarioResults, Sentiment};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterActionSummary {
    /// First period with the most personas on the road; `None` if nobody moved.
    pub peak_evacuation_period: Option<u32>,
    pub peak_evacuating: u32,
    /// Personas in a shelter or with family at the end of the exercise.
    pub final_sheltered: u32,
    pub final_at_home: u32,
    pub periods_with_critical_issues: Vec<u32>,
    pub peak_assistance: u32,
    pub dominant_final_sentiment: Option<Sentiment>,
}

fn count(m: &BTreeMap<PersonaLocation, u32>, k: PersonaLocation) -> u32 {
    m.get(&k).copied().unwrap_or_default()
}

pub fn summarize(results: &ScenarioResults) -> AfterActionSummary {
    let mut peak_evacuation_period = None;
    let mut peak_evacuating = 0;
    for p in &results.period_results {
        let n = count(&p.aggregates.locations, PersonaLocation::Evacuating);
        if n > peak_evacuating {
            peak_evacuating = n;
            peak_evacuation_period = Some(p.period_number);
        }
    }

    let last = results.period_results.last();
    let (final_sheltered, final_at_home) = last
        .map(|p| {
            let l = &p.aggregates.locations;
            (
                count(l, PersonaLocation::Shelter) + count(l, PersonaLocation::WithFamily),
                count(l, PersonaLocation::Home),
            )
        })
        .unwrap_or_default();

    // ties resolve to the earliest sentiment in escalation order
    let dominant_final_sentiment = last.and_then(|p| {
        p.aggregates
            .sentiments
            .iter()
            .filter(|(_, n)| **n > 0)
            .fold(None, |best: Option<(Sentiment, u32)>, (s, n)| match best {
                Some((_, m)) if m >= *n => best,
                _ => Some((*s, *n)),
            })
            .map(|(s, _)| s)
    });

    AfterActionSummary {
        peak_evacuation_period,
        peak_evacuating,
        final_sheltered,
        final_at_home,
        periods_with_critical_issues: results
            .period_results
            .iter()
            .filter(|p| !p.aggregates.critical_issues.is_empty())
            .map(|p| p.period_number)
            .collect(),
        peak_assistance: results
            .period_results
            .iter()
            .map(|p| p.aggregates.needing_assistance)
            .max()
            .unwrap_or_default(),
        dominant_final_sentiment,
    }
}
