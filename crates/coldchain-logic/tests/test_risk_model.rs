//! Integration tests for the excursion probability model.
//!
//! Exercises: Catalog → FacilityRiskMap → RiskInputs → excursion_probability
//! → per-reading probability → sample_temperature
//!
//! All tests are pure logic — no dataset assembly, no files.

use coldchain_logic::calendar::{Season, WEEKDAY_NAMES};
use coldchain_logic::catalog::Catalog;
use coldchain_logic::facility_map::FacilityRiskMap;
use coldchain_logic::risk::{excursion_probability, RiskInputs, MAX_EXCURSION_PROBABILITY};
use coldchain_logic::sampler::{
    is_excursion, journey_factor, reading_count, sample_temperature, TemperatureBands,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Helpers ────────────────────────────────────────────────────────────

const SEASONS: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

fn random_inputs<'a>(catalog: &'a Catalog, rng: &mut StdRng) -> RiskInputs<'a> {
    let pick = |list: &'a [String], rng: &mut StdRng| list[rng.gen_range(0..list.len())].as_str();
    RiskInputs {
        origin: pick(&catalog.facilities, rng),
        destination: pick(&catalog.facilities, rng),
        carrier: pick(&catalog.carriers, rng),
        product_type: pick(&catalog.product_types, rng),
        day_of_week: WEEKDAY_NAMES[rng.gen_range(0..7)],
        season: SEASONS[rng.gen_range(0..4)].as_str(),
        delay_minutes: rng.gen_range(0..=180) as f64,
        departure_airport: pick(&catalog.airports, rng),
        arrival_airport: pick(&catalog.airports, rng),
        flight_duration_hours: rng.gen_range(1.5..=4.5),
        had_customs_hold: rng.gen_bool(0.1),
        shipment_duration_hours: rng.gen_range(8..=48) as f64,
    }
}

// ── Bounds ─────────────────────────────────────────────────────────────

#[test]
fn probability_always_within_bounds() {
    let mut rng = StdRng::seed_from_u64(2024);
    let catalog = Catalog::default();
    let map = FacilityRiskMap::generate(&catalog.facilities, &mut rng);

    for base_rate in [0.0, 0.01, 0.15, 0.5, 1.0, 3.0] {
        for _ in 0..2_000 {
            let inputs = random_inputs(&catalog, &mut rng);
            let p = excursion_probability(&inputs, &map, base_rate);
            assert!(
                (0.0..=MAX_EXCURSION_PROBABILITY).contains(&p),
                "p = {} for base rate {}",
                p,
                base_rate
            );
        }
    }
}

#[test]
fn model_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(5);
    let catalog = Catalog::default();
    let map = FacilityRiskMap::generate(&catalog.facilities, &mut rng);
    let inputs = random_inputs(&catalog, &mut rng);

    let first = excursion_probability(&inputs, &map, 0.01);
    let second = excursion_probability(&inputs, &map, 0.01);
    assert_eq!(first, second);
}

#[test]
fn reversed_airport_pair_gives_same_probability() {
    let map = FacilityRiskMap::from_entries([(("A", "B"), 0.03)]);
    let forward = RiskInputs {
        departure_airport: "CLE",
        arrival_airport: "JFK",
        ..RiskInputs::neutral("A", "B")
    };
    let reverse = RiskInputs {
        departure_airport: "JFK",
        arrival_airport: "CLE",
        ..forward
    };
    assert_eq!(
        excursion_probability(&forward, &map, 0.02),
        excursion_probability(&reverse, &map, 0.02)
    );
}

#[test]
fn riskier_profile_scores_higher() {
    let map = FacilityRiskMap::from_entries([(("A", "B"), 0.03)]);
    let safe = RiskInputs {
        carrier: "Cryoport",
        product_type: "iPSC-derived",
        day_of_week: "Wednesday",
        season: "winter",
        ..RiskInputs::neutral("A", "B")
    };
    let risky = RiskInputs {
        carrier: "FedEx Health",
        product_type: "Stem Cell",
        day_of_week: "Saturday",
        season: "summer",
        ..safe
    };
    assert!(excursion_probability(&risky, &map, 0.01) > excursion_probability(&safe, &map, 0.01));
}

// ── Model → sampler ────────────────────────────────────────────────────

#[test]
fn zero_base_rate_never_produces_excursions() {
    let mut rng = StdRng::seed_from_u64(11);
    let catalog = Catalog::default();
    let map = FacilityRiskMap::generate(&catalog.facilities, &mut rng);
    let bands = TemperatureBands::default();

    for _ in 0..200 {
        let inputs = random_inputs(&catalog, &mut rng);
        let p = excursion_probability(&inputs, &map, 0.0);
        assert_eq!(p, 0.0);

        let count = reading_count(inputs.shipment_duration_hours as u32);
        for j in 0..count {
            let t = sample_temperature(p * journey_factor(j, count), &bands, &mut rng);
            assert!(!is_excursion(t));
        }
    }
}

#[test]
fn capped_probability_saturates_mid_journey() {
    // 0.95 * 1.2 > 1: mid-journey readings are certain excursions
    let mut rng = StdRng::seed_from_u64(8);
    let bands = TemperatureBands::default();
    let count = reading_count(48);
    for _ in 0..200 {
        for j in 0..count {
            let p = MAX_EXCURSION_PROBABILITY * journey_factor(j, count);
            let t = sample_temperature(p, &bands, &mut rng);
            if journey_factor(j, count) > 1.0 {
                assert!(is_excursion(t));
            }
        }
    }
}
