//! Cold-chain Headless Validation Harness
//!
//! Checks model invariants and a full generated dataset without writing any
//! files. Runs entirely in-process with a fixed seed.
//!
//! Usage:
//!   cargo run -p coldchain-simtest
//!   cargo run -p coldchain-simtest -- --verbose

use std::collections::BTreeMap;

use coldchain_logic::calendar::WEEKDAY_NAMES;
use coldchain_logic::catalog::Catalog;
use coldchain_logic::facility_map::{FacilityRiskMap, MAX_PAIR_RISK, MIN_PAIR_RISK};
use coldchain_logic::risk::{excursion_probability, RiskInputs, MAX_EXCURSION_PROBABILITY};
use coldchain_logic::sampler::{is_excursion, sample_temperature, TemperatureBands};
use coldchain_synth::prelude::*;
use coldchain_synth::records::EventType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 20240101;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Cold-Chain Validation Harness ===\n");

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut results = Vec::new();

    // 1. Facility risk map
    results.extend(validate_facility_map(&mut rng));

    // 2. Probability model bounds and identities
    results.extend(validate_probability_model(&mut rng));

    // 3. Temperature sampler distribution
    results.extend(validate_sampler(&mut rng));

    // 4. Full dataset, risk-factor strategy
    results.extend(validate_dataset(verbose));

    // 5. Flagged strategy
    results.extend(validate_flagged_strategy());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Facility Risk Map ────────────────────────────────────────────────

fn validate_facility_map(rng: &mut StdRng) -> Vec<TestResult> {
    println!("--- Facility Risk Map ---");
    let mut results = Vec::new();
    let catalog = Catalog::default();
    let map = FacilityRiskMap::generate(&catalog.facilities, rng);

    let n = catalog.facilities.len();
    results.push(TestResult {
        name: "facility_map_pair_count".into(),
        passed: map.len() == n * (n - 1),
        detail: format!("{} pairs for {} facilities", map.len(), n),
    });

    let self_pairs = catalog
        .facilities
        .iter()
        .filter(|f| map.get(f, f).is_some())
        .count();
    results.push(TestResult {
        name: "facility_map_no_self_pairs".into(),
        passed: self_pairs == 0,
        detail: format!("{} self-pairs", self_pairs),
    });

    let out_of_range: Vec<_> = map
        .iter()
        .filter(|(_, _, r)| !(MIN_PAIR_RISK..=MAX_PAIR_RISK).contains(r))
        .collect();
    results.push(TestResult {
        name: "facility_map_increment_range".into(),
        passed: out_of_range.is_empty(),
        detail: if out_of_range.is_empty() {
            format!("all increments in [{}, {}]", MIN_PAIR_RISK, MAX_PAIR_RISK)
        } else {
            format!("{} increments out of range", out_of_range.len())
        },
    });

    results
}

// ── 2. Probability Model ────────────────────────────────────────────────

fn validate_probability_model(rng: &mut StdRng) -> Vec<TestResult> {
    println!("--- Probability Model ---");
    let mut results = Vec::new();
    let catalog = Catalog::default();
    let map = FacilityRiskMap::generate(&catalog.facilities, rng);
    let seasons = ["winter", "spring", "summer", "fall"];

    // Bounds sweep over random inputs and base rates
    let mut max_seen: f64 = 0.0;
    let mut min_seen: f64 = f64::MAX;
    for _ in 0..20_000 {
        let pick = |list: &[String], rng: &mut StdRng| list[rng.gen_range(0..list.len())].clone();
        let (origin, destination) = (pick(&catalog.facilities, rng), pick(&catalog.facilities, rng));
        let carrier = pick(&catalog.carriers, rng);
        let product = pick(&catalog.product_types, rng);
        let (dep, arr) = (pick(&catalog.airports, rng), pick(&catalog.airports, rng));
        let inputs = RiskInputs {
            origin: &origin,
            destination: &destination,
            carrier: &carrier,
            product_type: &product,
            day_of_week: WEEKDAY_NAMES[rng.gen_range(0..7)],
            season: seasons[rng.gen_range(0..4)],
            delay_minutes: rng.gen_range(0..=180) as f64,
            departure_airport: &dep,
            arrival_airport: &arr,
            flight_duration_hours: rng.gen_range(1.5..=4.5),
            had_customs_hold: rng.gen_bool(0.1),
            shipment_duration_hours: rng.gen_range(8..=48) as f64,
        };
        let p = excursion_probability(&inputs, &map, rng.gen_range(0.0..=2.0));
        max_seen = max_seen.max(p);
        min_seen = min_seen.min(p);
    }
    results.push(TestResult {
        name: "probability_bounds".into(),
        passed: min_seen >= 0.0 && max_seen <= MAX_EXCURSION_PROBABILITY,
        detail: format!("observed range [{:.4}, {:.4}]", min_seen, max_seen),
    });

    // Neutral identity
    let zero_map = FacilityRiskMap::from_entries([(("A", "B"), 0.0)]);
    let neutral = RiskInputs::neutral("A", "B");
    let p = excursion_probability(&neutral, &zero_map, 0.123);
    results.push(TestResult {
        name: "probability_neutral_identity".into(),
        passed: p == 0.123,
        detail: format!("neutral inputs at 0.123 → {}", p),
    });

    // Customs monotonicity
    let held = RiskInputs {
        had_customs_hold: true,
        ..neutral
    };
    let (without, with) = (
        excursion_probability(&neutral, &zero_map, 0.05),
        excursion_probability(&held, &zero_map, 0.05),
    );
    results.push(TestResult {
        name: "probability_customs_increases".into(),
        passed: with > without,
        detail: format!("{:.4} → {:.4}", without, with),
    });

    // Airport symmetry
    let forward = RiskInputs {
        departure_airport: "BWI",
        arrival_airport: "IAH",
        ..neutral
    };
    let reverse = RiskInputs {
        departure_airport: "IAH",
        arrival_airport: "BWI",
        ..neutral
    };
    let (pf, pr) = (
        excursion_probability(&forward, &zero_map, 0.05),
        excursion_probability(&reverse, &zero_map, 0.05),
    );
    results.push(TestResult {
        name: "probability_airport_order_tolerant".into(),
        passed: pf == pr,
        detail: format!("BWI→IAH {:.4}, IAH→BWI {:.4}", pf, pr),
    });

    results
}

// ── 3. Temperature Sampler ──────────────────────────────────────────────

fn validate_sampler(rng: &mut StdRng) -> Vec<TestResult> {
    println!("--- Temperature Sampler ---");
    let mut results = Vec::new();
    let bands = TemperatureBands::default();
    let draws = 20_000;

    for (p, expected, tolerance) in [(0.0, 0.0, 0.0), (1.0, 1.0, 0.0), (0.5, 0.5, 0.02)] {
        let excursions = (0..draws)
            .filter(|_| is_excursion(sample_temperature(p, &bands, rng)))
            .count();
        let share = excursions as f64 / draws as f64;
        results.push(TestResult {
            name: format!("sampler_share_p{}", p),
            passed: (share - expected).abs() <= tolerance,
            detail: format!("{:.4} excursion share at p = {}", share, p),
        });
    }

    results
}

// ── 4. Dataset ──────────────────────────────────────────────────────────

fn validate_dataset(verbose: bool) -> Vec<TestResult> {
    println!("--- Dataset (risk factor) ---");
    let mut results = Vec::new();
    let config = GeneratorConfig {
        seed: Some(SEED),
        ..Default::default()
    };

    let dataset = match generate_dataset(&config) {
        Ok(d) => d,
        Err(e) => {
            results.push(TestResult {
                name: "dataset_generate".into(),
                passed: false,
                detail: format!("generation failed: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "dataset_route_rows".into(),
        passed: dataset.routes.len() == config.shipments,
        detail: format!("{} routes", dataset.routes.len()),
    });
    results.push(TestResult {
        name: "dataset_flight_rows".into(),
        passed: dataset.flights.len() == config.shipments,
        detail: format!("{} flights", dataset.flights.len()),
    });
    results.push(TestResult {
        name: "dataset_event_rows".into(),
        passed: (3 * config.shipments..=4 * config.shipments).contains(&dataset.events.len()),
        detail: format!("{} events", dataset.events.len()),
    });
    results.push(TestResult {
        name: "dataset_temperature_rows".into(),
        passed: dataset.temperatures.len() >= 6 * config.shipments,
        detail: format!("{} readings", dataset.temperatures.len()),
    });

    // Customs events line up with the flag
    let mut customs_events: BTreeMap<&str, usize> = BTreeMap::new();
    for e in dataset.events.iter().filter(|e| e.event_type == EventType::CustomsHold) {
        *customs_events.entry(e.shipment_id.as_str()).or_default() += 1;
    }
    let mismatched = dataset
        .routes
        .iter()
        .filter(|r| {
            let count = customs_events.get(r.shipment_id.as_str()).copied().unwrap_or(0);
            count != usize::from(r.had_customs_hold)
        })
        .count();
    results.push(TestResult {
        name: "dataset_customs_events".into(),
        passed: mismatched == 0,
        detail: format!(
            "{} customs holds, {} mismatched",
            customs_events.len(),
            mismatched
        ),
    });

    let report = Report::from_dataset(&dataset);
    if verbose {
        report.log();
        println!(
            "    mean modeled p = {:.4}, observed rate = {:.4}",
            report.mean_excursion_probability, report.excursion_rate
        );
    }
    results.push(TestResult {
        name: "dataset_observed_rate_plausible".into(),
        passed: report.excursion_rate > 0.0 && report.excursion_rate < 0.5,
        detail: format!(
            "{} of {} shipments observed an excursion",
            report.excursion_count, report.total_shipments
        ),
    });

    results
}

// ── 5. Flagged Strategy ─────────────────────────────────────────────────

fn validate_flagged_strategy() -> Vec<TestResult> {
    println!("--- Dataset (flagged) ---");
    let mut results = Vec::new();
    let config = GeneratorConfig {
        strategy: StrategyKind::Flagged,
        seed: Some(SEED),
        ..Default::default()
    };

    let dataset = match generate_dataset(&config) {
        Ok(d) => d,
        Err(e) => {
            results.push(TestResult {
                name: "flagged_generate".into(),
                passed: false,
                detail: format!("generation failed: {}", e),
            });
            return results;
        }
    };

    let disagreements = dataset
        .routes
        .iter()
        .filter(|r| (r.excursion_probability == 1.0) != dataset.had_excursion(&r.shipment_id))
        .count();
    results.push(TestResult {
        name: "flagged_outcome_matches_readings".into(),
        passed: disagreements == 0,
        detail: format!("{} shipments disagree", disagreements),
    });

    let share = dataset.excursions.len() as f64 / dataset.len() as f64;
    results.push(TestResult {
        name: "flagged_share_near_base_rate".into(),
        passed: (share - dataset.base_rate).abs() < 0.05,
        detail: format!("{:.3} flagged vs base rate {}", share, dataset.base_rate),
    });

    results
}
