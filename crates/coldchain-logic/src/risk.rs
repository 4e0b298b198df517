//! Excursion probability model — multiplicative risk factors.
//!
//! A shipment starts from a base excursion rate and every attribute scales it
//! by a factor: above 1.0 raises the risk, below 1.0 lowers it. Ten factors
//! are applied in a fixed order and the product is capped at
//! [`MAX_EXCURSION_PROBABILITY`].
//!
//! Categorical attributes are looked up in label tables. Every table carries
//! its own fallback so a label the table doesn't know contributes a neutral
//! factor instead of failing.

use crate::calendar::Season;
use crate::facility_map::FacilityRiskMap;

/// Upper bound on any modeled shipment probability.
pub const MAX_EXCURSION_PROBABILITY: f64 = 0.95;

/// Multiplier contributed by an attribute that carries no risk signal.
pub const NEUTRAL_FACTOR: f64 = 1.0;

/// Multiplier applied when a customs hold occurred.
pub const CUSTOMS_HOLD_FACTOR: f64 = 1.8;

// ============================================================================
// FACTOR TABLES
// ============================================================================

/// Label → multiplier table with a fallback for unknown labels.
#[derive(Debug, Clone, Copy)]
pub struct FactorTable {
    pub entries: &'static [(&'static str, f64)],
    pub fallback: f64,
}

impl FactorTable {
    pub fn factor(&self, label: &str) -> f64 {
        self.entries
            .iter()
            .find(|(key, _)| *key == label)
            .map(|(_, factor)| *factor)
            .unwrap_or(self.fallback)
    }
}

pub const CARRIER_FACTORS: FactorTable = FactorTable {
    entries: &[
        ("Cryoport", 0.7),
        ("FedEx Health", 1.2),
        ("UPS ColdChain", 1.0),
    ],
    fallback: NEUTRAL_FACTOR,
};

/// Stem cells are the most temperature-sensitive, iPSC-derived the most stable.
pub const PRODUCT_FACTORS: FactorTable = FactorTable {
    entries: &[("Stem Cell", 1.5), ("CAR-T", 1.2), ("iPSC-derived", 0.8)],
    fallback: NEUTRAL_FACTOR,
};

/// Weekend handoffs are the riskiest, midweek the safest.
pub const WEEKDAY_FACTORS: FactorTable = FactorTable {
    entries: &[
        ("Monday", 0.9),
        ("Tuesday", 0.85),
        ("Wednesday", 0.8),
        ("Thursday", 0.9),
        ("Friday", 1.1),
        ("Saturday", 1.3),
        ("Sunday", 1.2),
    ],
    fallback: NEUTRAL_FACTOR,
};

pub const SEASON_FACTORS: FactorTable = FactorTable {
    entries: &[
        ("winter", 0.8),
        ("spring", 1.0),
        ("summer", 1.5),
        ("fall", 1.1),
    ],
    fallback: NEUTRAL_FACTOR,
};

/// Ordered airport pairs with a known risk profile.
pub const AIRPORT_PAIR_FACTORS: &[((&str, &str), f64)] = &[
    (("JFK", "IAH"), 1.2),
    (("ORD", "JFK"), 1.3),
    (("BWI", "IAH"), 0.9),
    (("CLE", "JFK"), 1.1),
    (("IAH", "ORD"), 1.2),
];

// ============================================================================
// INDIVIDUAL FACTORS
// ============================================================================

pub fn facility_factor(map: &FacilityRiskMap, origin: &str, destination: &str) -> f64 {
    1.0 + map.increment(origin, destination)
}

pub fn carrier_factor(carrier: &str) -> f64 {
    CARRIER_FACTORS.factor(carrier)
}

pub fn product_factor(product_type: &str) -> f64 {
    PRODUCT_FACTORS.factor(product_type)
}

pub fn weekday_factor(day_of_week: &str) -> f64 {
    WEEKDAY_FACTORS.factor(day_of_week)
}

pub fn season_factor(season: &str) -> f64 {
    SEASON_FACTORS.factor(season)
}

/// Linear in the delay, uncapped: one hour late is 1.2x, three hours 1.6x.
pub fn delay_factor(delay_minutes: f64) -> f64 {
    1.0 + delay_minutes / 300.0
}

/// Looks up the exact ordered pair, then the reversed pair, then falls back
/// to neutral.
pub fn airport_pair_factor(departure: &str, arrival: &str) -> f64 {
    let find = |a: &str, b: &str| {
        AIRPORT_PAIR_FACTORS
            .iter()
            .find(|((x, y), _)| *x == a && *y == b)
            .map(|(_, factor)| *factor)
    };
    find(departure, arrival)
        .or_else(|| find(arrival, departure))
        .unwrap_or(NEUTRAL_FACTOR)
}

/// 1.5h flight is ~1.1x, 4.5h ~1.2x.
pub fn flight_duration_factor(hours: f64) -> f64 {
    1.0 + hours / 20.0
}

pub fn customs_factor(had_customs_hold: bool) -> f64 {
    if had_customs_hold {
        CUSTOMS_HOLD_FACTOR
    } else {
        NEUTRAL_FACTOR
    }
}

/// 24h shipment is 1.2x, 48h 1.4x.
pub fn shipment_duration_factor(hours: f64) -> f64 {
    1.0 + hours / 120.0
}

// ============================================================================
// COMPOSED MODEL
// ============================================================================

/// Every shipment attribute the probability model reads.
#[derive(Debug, Clone, Copy)]
pub struct RiskInputs<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    pub carrier: &'a str,
    pub product_type: &'a str,
    pub day_of_week: &'a str,
    pub season: &'a str,
    pub delay_minutes: f64,
    pub departure_airport: &'a str,
    pub arrival_airport: &'a str,
    pub flight_duration_hours: f64,
    pub had_customs_hold: bool,
    pub shipment_duration_hours: f64,
}

impl<'a> RiskInputs<'a> {
    /// Inputs for which every categorical factor is neutral and every
    /// continuous factor is 1.0. The facility factor still depends on the map.
    pub fn neutral(origin: &'a str, destination: &'a str) -> Self {
        Self {
            origin,
            destination,
            carrier: "UPS ColdChain",
            product_type: "",
            day_of_week: "",
            season: Season::Spring.as_str(),
            delay_minutes: 0.0,
            departure_airport: "",
            arrival_airport: "",
            flight_duration_hours: 0.0,
            had_customs_hold: false,
            shipment_duration_hours: 0.0,
        }
    }

    /// The ten factors in application order.
    pub fn factors(&self, map: &FacilityRiskMap) -> [f64; 10] {
        [
            facility_factor(map, self.origin, self.destination),
            carrier_factor(self.carrier),
            product_factor(self.product_type),
            weekday_factor(self.day_of_week),
            season_factor(self.season),
            delay_factor(self.delay_minutes),
            airport_pair_factor(self.departure_airport, self.arrival_airport),
            flight_duration_factor(self.flight_duration_hours),
            customs_factor(self.had_customs_hold),
            shipment_duration_factor(self.shipment_duration_hours),
        ]
    }
}

/// Probability of a temperature excursion for one shipment, in
/// `[0, MAX_EXCURSION_PROBABILITY]` for any non-negative base rate.
pub fn excursion_probability(inputs: &RiskInputs, map: &FacilityRiskMap, base_rate: f64) -> f64 {
    let probability = inputs
        .factors(map)
        .iter()
        .fold(base_rate, |acc, factor| acc * factor);
    probability.min(MAX_EXCURSION_PROBABILITY)
}
