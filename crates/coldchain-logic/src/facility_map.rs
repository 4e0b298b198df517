//! Pairwise facility risk — one increment per ordered (origin, destination).
//!
//! Generated once per dataset run and read-only afterward. (A, B) and (B, A)
//! are drawn independently; a facility is never paired with itself.

use std::collections::BTreeMap;

use rand::Rng;

/// Lower bound of a drawn pair increment.
pub const MIN_PAIR_RISK: f64 = 0.01;
/// Upper bound of a drawn pair increment.
pub const MAX_PAIR_RISK: f64 = 0.05;
/// Increment used for a pair that isn't in the map.
pub const DEFAULT_PAIR_RISK: f64 = 0.02;

/// Risk increment per ordered facility pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityRiskMap {
    // origin -> destination -> increment
    risks: BTreeMap<String, BTreeMap<String, f64>>,
}

impl FacilityRiskMap {
    /// Draw an increment uniformly from `[MIN_PAIR_RISK, MAX_PAIR_RISK]` for
    /// every ordered pair of distinct facilities.
    pub fn generate<S: AsRef<str>>(facilities: &[S], rng: &mut impl Rng) -> Self {
        let mut map = Self::default();
        for (i, origin) in facilities.iter().enumerate() {
            for (j, destination) in facilities.iter().enumerate() {
                if i == j {
                    continue;
                }
                let increment = rng.gen_range(MIN_PAIR_RISK..=MAX_PAIR_RISK);
                map.insert(origin.as_ref(), destination.as_ref(), increment);
            }
        }
        map
    }

    /// Build a map from explicit entries. Self-pairs are skipped.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = ((&'a str, &'a str), f64)>) -> Self {
        let mut map = Self::default();
        for ((origin, destination), increment) in entries {
            map.insert(origin, destination, increment);
        }
        map
    }

    fn insert(&mut self, origin: &str, destination: &str, increment: f64) {
        if origin == destination {
            return;
        }
        self.risks
            .entry(origin.to_string())
            .or_default()
            .insert(destination.to_string(), increment);
    }

    pub fn get(&self, origin: &str, destination: &str) -> Option<f64> {
        self.risks.get(origin)?.get(destination).copied()
    }

    /// Increment for a pair, [`DEFAULT_PAIR_RISK`] when the pair is unknown.
    pub fn increment(&self, origin: &str, destination: &str) -> f64 {
        self.get(origin, destination).unwrap_or(DEFAULT_PAIR_RISK)
    }

    /// Number of ordered pairs.
    pub fn len(&self) -> usize {
        self.risks.values().map(|row| row.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.risks.iter().flat_map(|(origin, row)| {
            row.iter()
                .map(move |(destination, increment)| (origin.as_str(), destination.as_str(), *increment))
        })
    }
}
