//! Operational-period schedule builder.
//!
//! Every generator in the workspace obtains phases through
//! [`phase_for_period`], so a scenario never mixes two bucketing rules.

use crate::{HourOffset, OperationalPeriod, Phase, PhasePolicy};

/// Length of one operational period.
pub const PERIOD_HOURS: i32 = 12;

/// Phase for the 0-based `index` of a schedule with `total` periods.
pub fn phase_for_period(policy: &PhasePolicy, index: u32, total: u32) -> Phase {
    match policy {
        PhasePolicy::Proportional {
            thresholds,
            denominator,
        } => {
            let total = u64::from(total.max(1));
            let scaled = u64::from(index) * u64::from(*denominator);
            let reached = thresholds
                .iter()
                .filter(|t| scaled >= u64::from(**t) * total)
                .count();
            Phase::ALL[reached.min(3)]
        }
        PhasePolicy::FixedList { phases } => phases
            .get(index as usize)
            .or_else(|| phases.last())
            .copied()
            .unwrap_or(Phase::Planning),
    }
}

/// Build `count` contiguous 12-hour periods starting at `base_hour_offset`.
pub fn build_schedule(
    count: u32,
    base_hour_offset: i32,
    policy: &PhasePolicy,
) -> Vec<OperationalPeriod> {
    (0..count)
        .map(|i| {
            let start = HourOffset(base_hour_offset + i as i32 * PERIOD_HOURS);
            let end = start.plus(PERIOD_HOURS);
            let phase = phase_for_period(policy, i, count);
            let mut phase_name = phase.as_str().to_string();
            if let Some(first) = phase_name.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            OperationalPeriod {
                period_number: i + 1,
                start_time: start,
                end_time: end,
                phase,
                label: format!("Period {}: {} to {} ({})", i + 1, start, end, phase_name),
            }
        })
        .collect()
}
