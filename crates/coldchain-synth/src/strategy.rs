//! Excursion strategies — how a shipment's delay and excursion odds are decided.
//!
//! Record assembly is shared; a strategy only answers three questions:
//! how late the flight leaves, what excursion probability the route row
//! carries, and what probability each individual reading is sampled with.
//!
//! - [`RiskFactorStrategy`] composes the ten-factor model from
//!   `coldchain_logic::risk` and weights mid-journey readings up.
//! - [`FlaggedStrategy`] decides a single `had_excursion` flag at the base
//!   rate and derives delay and readings from fixed categories.

use coldchain_logic::catalog::Catalog;
use coldchain_logic::facility_map::FacilityRiskMap;
use coldchain_logic::risk::{excursion_probability, RiskInputs};
use coldchain_logic::sampler::journey_factor;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Selectable strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    RiskFactor,
    Flagged,
}

impl StrategyKind {
    pub fn default_base_rate(&self) -> f64 {
        match self {
            Self::RiskFactor => 0.01,
            Self::Flagged => 0.15,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RiskFactor => "risk_factor",
            Self::Flagged => "flagged",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shipment attributes drawn before a strategy is consulted.
#[derive(Debug, Clone, Copy)]
pub struct ShipmentProfile<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    pub carrier: &'a str,
    pub product_type: &'a str,
    pub day_of_week: &'a str,
    pub season: &'a str,
    pub departure_airport: &'a str,
    pub arrival_airport: &'a str,
    pub flight_duration_hours: f64,
    pub had_customs_hold: bool,
    pub shipment_duration_hours: u32,
}

/// A strategy's verdict for one shipment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub delay_minutes: u32,
    /// Stored on the route row.
    pub excursion_probability: f64,
    /// Declared outcome, for strategies that decide one up front.
    pub had_excursion: Option<bool>,
}

pub trait ExcursionStrategy {
    fn kind(&self) -> StrategyKind;

    /// Draw the flight delay and settle the shipment-level probability.
    fn assess<R: Rng>(&self, profile: &ShipmentProfile, rng: &mut R) -> Assessment;

    /// Probability reading `index` of `count` is sampled with. May exceed 1.0,
    /// which the sampler treats as a certain excursion.
    fn reading_probability(&self, assessment: &Assessment, index: u32, count: u32) -> f64;
}

// ============================================================================
// RISK FACTOR
// ============================================================================

pub const MAX_DELAY_MINUTES: u32 = 180;

#[derive(Debug, Clone)]
pub struct RiskFactorStrategy {
    base_rate: f64,
    facility_map: FacilityRiskMap,
}

impl RiskFactorStrategy {
    pub fn new(base_rate: f64, facility_map: FacilityRiskMap) -> Self {
        Self {
            base_rate,
            facility_map,
        }
    }

    /// Draws a fresh facility risk map for the catalog.
    pub fn for_catalog(base_rate: f64, catalog: &Catalog, rng: &mut impl Rng) -> Self {
        Self::new(base_rate, FacilityRiskMap::generate(&catalog.facilities, rng))
    }

    pub fn facility_map(&self) -> &FacilityRiskMap {
        &self.facility_map
    }

    pub fn base_rate(&self) -> f64 {
        self.base_rate
    }
}

impl ExcursionStrategy for RiskFactorStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RiskFactor
    }

    fn assess<R: Rng>(&self, profile: &ShipmentProfile, rng: &mut R) -> Assessment {
        let delay_minutes = rng.gen_range(0..=MAX_DELAY_MINUTES);
        let inputs = RiskInputs {
            origin: profile.origin,
            destination: profile.destination,
            carrier: profile.carrier,
            product_type: profile.product_type,
            day_of_week: profile.day_of_week,
            season: profile.season,
            delay_minutes: delay_minutes as f64,
            departure_airport: profile.departure_airport,
            arrival_airport: profile.arrival_airport,
            flight_duration_hours: profile.flight_duration_hours,
            had_customs_hold: profile.had_customs_hold,
            shipment_duration_hours: profile.shipment_duration_hours as f64,
        };

        Assessment {
            delay_minutes,
            excursion_probability: excursion_probability(&inputs, &self.facility_map, self.base_rate),
            had_excursion: None,
        }
    }

    fn reading_probability(&self, assessment: &Assessment, index: u32, count: u32) -> f64 {
        assessment.excursion_probability * journey_factor(index, count)
    }
}

// ============================================================================
// FLAGGED
// ============================================================================

/// Delay range for shipments flagged with an excursion.
pub const FLAGGED_DELAY_MINUTES: (u32, u32) = (60, 240);
/// Delay range for clean shipments.
pub const CLEAN_DELAY_MINUTES: (u32, u32) = (0, 30);

#[derive(Debug, Clone, Copy)]
pub struct FlaggedStrategy {
    base_rate: f64,
}

impl FlaggedStrategy {
    pub fn new(base_rate: f64) -> Self {
        Self { base_rate }
    }

    /// The reading forced into the excursion band on a flagged shipment.
    pub fn excursion_reading(count: u32) -> u32 {
        count / 2
    }
}

impl ExcursionStrategy for FlaggedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Flagged
    }

    fn assess<R: Rng>(&self, _profile: &ShipmentProfile, rng: &mut R) -> Assessment {
        let had_excursion = rng.gen::<f64>() < self.base_rate;
        let (lo, hi) = if had_excursion {
            FLAGGED_DELAY_MINUTES
        } else {
            CLEAN_DELAY_MINUTES
        };

        Assessment {
            delay_minutes: rng.gen_range(lo..=hi),
            excursion_probability: if had_excursion { 1.0 } else { 0.0 },
            had_excursion: Some(had_excursion),
        }
    }

    fn reading_probability(&self, assessment: &Assessment, index: u32, count: u32) -> f64 {
        let flagged = assessment.had_excursion.unwrap_or(false);
        if flagged && index == Self::excursion_reading(count) {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ORIGIN: &str = "Cleveland Clinic (Cleveland, OH)";
    const DESTINATION: &str = "MD Anderson (Houston, TX)";

    fn profile() -> ShipmentProfile<'static> {
        ShipmentProfile {
            origin: ORIGIN,
            destination: DESTINATION,
            carrier: "FedEx Health",
            product_type: "Stem Cell",
            day_of_week: "Saturday",
            season: "summer",
            departure_airport: "ORD",
            arrival_airport: "JFK",
            flight_duration_hours: 3.0,
            had_customs_hold: false,
            shipment_duration_hours: 24,
        }
    }

    fn fixed_map() -> FacilityRiskMap {
        FacilityRiskMap::from_entries([((ORIGIN, DESTINATION), 0.03)])
    }

    #[test]
    fn risk_factor_delay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let strategy = RiskFactorStrategy::new(0.01, fixed_map());
        for _ in 0..500 {
            let a = strategy.assess(&profile(), &mut rng);
            assert!(a.delay_minutes <= MAX_DELAY_MINUTES);
            assert!(a.had_excursion.is_none());
            assert!(a.excursion_probability > 0.0 && a.excursion_probability <= 0.95);
        }
    }

    #[test]
    fn risk_factor_zero_rate_feeds_zero() {
        let mut rng = StdRng::seed_from_u64(2);
        let strategy = RiskFactorStrategy::new(0.0, fixed_map());
        let a = strategy.assess(&profile(), &mut rng);
        assert_eq!(a.excursion_probability, 0.0);
        for j in 0..6 {
            assert_eq!(strategy.reading_probability(&a, j, 6), 0.0);
        }
    }

    #[test]
    fn risk_factor_weights_mid_journey() {
        let strategy = RiskFactorStrategy::new(0.01, fixed_map());
        let a = Assessment {
            delay_minutes: 0,
            excursion_probability: 0.5,
            had_excursion: None,
        };
        assert_eq!(strategy.reading_probability(&a, 0, 6), 0.5);
        assert!((strategy.reading_probability(&a, 2, 6) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn flagged_rate_zero_never_flags() {
        let mut rng = StdRng::seed_from_u64(3);
        let strategy = FlaggedStrategy::new(0.0);
        for _ in 0..500 {
            let a = strategy.assess(&profile(), &mut rng);
            assert_eq!(a.had_excursion, Some(false));
            assert_eq!(a.excursion_probability, 0.0);
            assert!(a.delay_minutes <= CLEAN_DELAY_MINUTES.1);
        }
    }

    #[test]
    fn flagged_rate_one_always_flags() {
        let mut rng = StdRng::seed_from_u64(4);
        let strategy = FlaggedStrategy::new(1.0);
        for _ in 0..500 {
            let a = strategy.assess(&profile(), &mut rng);
            assert_eq!(a.had_excursion, Some(true));
            assert!(a.delay_minutes >= FLAGGED_DELAY_MINUTES.0);
            assert!(a.delay_minutes <= FLAGGED_DELAY_MINUTES.1);
        }
    }

    #[test]
    fn flagged_forces_exactly_one_reading() {
        let strategy = FlaggedStrategy::new(0.15);
        let a = Assessment {
            delay_minutes: 90,
            excursion_probability: 1.0,
            had_excursion: Some(true),
        };
        let forced: Vec<u32> = (0..8)
            .filter(|&j| strategy.reading_probability(&a, j, 8) >= 1.0)
            .collect();
        assert_eq!(forced, vec![4]);
    }

    #[test]
    fn strategy_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&StrategyKind::RiskFactor).unwrap(),
            "\"risk_factor\""
        );
        assert_eq!(StrategyKind::Flagged.to_string(), "flagged");
    }
}
