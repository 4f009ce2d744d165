//! Deterministic demographics.
//!
//! Each persona draws from a private ChaCha stream seeded only by its type
//! and roster index, so the same `(type, index)` always yields the same
//! profile regardless of the scenario seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ttx_core::{HomeOwnership, PersonaDemographics, PersonaType, SocialStatus, TrustLevel};

const RACES: [&str; 6] = [
    "White",
    "Black",
    "Hispanic",
    "Asian",
    "Multiracial",
    "Native American",
];
const LEANINGS: [&str; 3] = ["liberal", "moderate", "conservative"];
const EDUCATION: [&str; 4] = ["high_school", "some_college", "bachelors", "graduate"];

fn type_ordinal(t: PersonaType) -> u64 {
    PersonaType::ALL
        .iter()
        .position(|x| *x == t)
        .unwrap_or_default() as u64
}

/// Seed for the demographics stream of one persona.
pub fn demographics_seed(t: PersonaType, index: u32) -> u64 {
    (type_ordinal(t) + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ u64::from(index)
}

fn age_range(t: PersonaType) -> (u32, u32) {
    match t {
        PersonaType::Elderly => (68, 90),
        PersonaType::Planner => (35, 60),
        PersonaType::Skeptic => (30, 65),
        PersonaType::Anxious => (25, 55),
        PersonaType::ResourceConstrained => (20, 70),
        PersonaType::InformationSeeker => (25, 55),
        PersonaType::TechSavvy => (19, 38),
        PersonaType::Optimist => (22, 60),
        PersonaType::Caregiver => (30, 55),
        PersonaType::Stubborn => (45, 80),
    }
}

/// `items` must be non-empty; every table here is a constant.
fn pick<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> T {
    items[rng.gen_range(0..items.len())]
}

/// Demographics for the `index`-th persona of type `t`.
pub fn generate_demographics(t: PersonaType, index: u32) -> PersonaDemographics {
    let mut rng = ChaCha8Rng::seed_from_u64(demographics_seed(t, index));
    let (lo, hi) = age_range(t);
    let age = rng.gen_range(lo..=hi);

    use SocialStatus::*;
    let social_status = match t {
        PersonaType::ResourceConstrained => LowIncome,
        PersonaType::Planner | PersonaType::TechSavvy => {
            pick(&[MiddleIncome, HighIncome], &mut rng)
        }
        _ => pick(&[LowIncome, MiddleIncome, MiddleIncome, HighIncome], &mut rng),
    };

    use TrustLevel::*;
    let trust_in_government = match t {
        PersonaType::Skeptic | PersonaType::Stubborn => Low,
        PersonaType::Planner | PersonaType::InformationSeeker => High,
        PersonaType::Elderly => pick(&[Medium, High], &mut rng),
        _ => pick(&[Low, Medium, Medium, High], &mut rng),
    };

    let education_level = match t {
        PersonaType::InformationSeeker | PersonaType::TechSavvy => pick(&EDUCATION[2..], &mut rng),
        _ => pick(&EDUCATION, &mut rng),
    };

    let household_size = match t {
        PersonaType::Elderly => rng.gen_range(1..=2),
        PersonaType::Caregiver => rng.gen_range(3..=6),
        _ => rng.gen_range(1..=5),
    };
    let has_children = match t {
        PersonaType::Caregiver => true,
        PersonaType::Elderly => false,
        _ => household_size > 1 && rng.gen_bool(0.4),
    };
    let has_vehicle = match t {
        PersonaType::ResourceConstrained => rng.gen_bool(0.3),
        PersonaType::Elderly => rng.gen_bool(0.6),
        _ => rng.gen_bool(0.9),
    };
    let home_ownership = match t {
        PersonaType::ResourceConstrained => HomeOwnership::Rent,
        PersonaType::Elderly if rng.gen_bool(0.8) => HomeOwnership::Own,
        PersonaType::Elderly => HomeOwnership::Rent,
        _ if rng.gen_bool(0.6) => HomeOwnership::Own,
        _ => HomeOwnership::Rent,
    };

    PersonaDemographics {
        age,
        race: pick(&RACES, &mut rng).to_string(),
        social_status,
        political_leaning: pick(&LEANINGS, &mut rng).to_string(),
        trust_in_government,
        education_level: education_level.to_string(),
        household_size,
        has_children,
        has_vehicle,
        home_ownership,
    }
}
