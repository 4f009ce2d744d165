//! Home/shelter placement and movement along the evacuation window.

use rand::Rng;
use std::f64::consts::TAU;
use ttx_core::{LatLng, MovementStatus, PersonaLocationData, PersonaType, ShelterSite};

/// Period in which a persona type typically leaves, on a 12-period timeline.
/// `None` never evacuates.
pub fn evacuation_base_period(t: PersonaType) -> Option<u32> {
    match t {
        PersonaType::Planner => Some(3),
        PersonaType::InformationSeeker => Some(4),
        PersonaType::Anxious => Some(4),
        PersonaType::Elderly => Some(5),
        PersonaType::TechSavvy => Some(5),
        PersonaType::Caregiver => Some(7),
        PersonaType::ResourceConstrained => Some(7),
        PersonaType::Optimist => Some(7),
        PersonaType::Skeptic => Some(8),
        PersonaType::Stubborn => None,
    }
}

/// Placement parameters shared by every persona of a run.
#[derive(Clone, Debug)]
pub struct PlacementParams<'a> {
    pub center: LatLng,
    pub radius_spread: (f64, f64),
    pub shelters: &'a [ShelterSite],
    pub period_count: u32,
    pub evacuation_duration: u32,
}

/// Home on a ring around `center` (angle fixed by roster position, radius
/// drawn from `rng`), shelter assigned round-robin, evacuation window from
/// the type table with +/-1 period jitter.
pub fn generate_location<R: Rng + ?Sized>(
    t: PersonaType,
    index: u32,
    total: u32,
    params: &PlacementParams<'_>,
    rng: &mut R,
) -> PersonaLocationData {
    let angle = f64::from(index) / f64::from(total.max(1)) * TAU;
    let (lo, hi) = params.radius_spread;
    let radius = if hi > lo { rng.gen_range(lo..hi) } else { lo };
    let home = LatLng::new(
        params.center.lat + radius * angle.sin(),
        params.center.lng + radius * angle.cos(),
    );
    let shelter = if params.shelters.is_empty() {
        home
    } else {
        params.shelters[index as usize % params.shelters.len()].position
    };

    let last = params.period_count.max(1);
    let (start, end) = match evacuation_base_period(t) {
        Some(base) => {
            let jitter: i64 = rng.gen_range(-1..=1);
            let start = (i64::from(base) + jitter).clamp(1, i64::from(last)) as u32;
            let end = (start + params.evacuation_duration).min(last);
            (Some(start), Some(end))
        }
        None => (None, None),
    };

    PersonaLocationData {
        home_location: home,
        shelter_location: shelter,
        evacuation_start_period: start,
        evacuation_end_period: end,
    }
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Coarse status for a period.
pub fn location_status(loc: &PersonaLocationData, period_number: u32) -> MovementStatus {
    let Some(start) = loc.evacuation_start_period else {
        return MovementStatus::Home;
    };
    let end = loc.evacuation_end_period.unwrap_or(start).max(start);
    if period_number < start {
        MovementStatus::Home
    } else if period_number >= end {
        MovementStatus::Shelter
    } else {
        MovementStatus::Evacuating
    }
}

/// Position for a period: home before the window, shelter from its end,
/// eased interpolation in between.
pub fn calculate_position(loc: &PersonaLocationData, period_number: u32) -> LatLng {
    match location_status(loc, period_number) {
        MovementStatus::Home => loc.home_location,
        MovementStatus::Shelter => loc.shelter_location,
        MovementStatus::Evacuating => {
            let start = loc.evacuation_start_period.unwrap_or(period_number);
            let end = loc.evacuation_end_period.unwrap_or(start);
            let span = f64::from(end.saturating_sub(start).max(1));
            let progress = f64::from(period_number - start) / span;
            loc.home_location
                .lerp(loc.shelter_location, ease_in_out_cubic(progress))
        }
    }
}
