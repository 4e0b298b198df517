//! Temperature sampling — draws readings from a normal or an excursion band.
//!
//! Biologics ship on dry ice / LN2 vapor, so the safe band sits well below
//! freezing. A reading strictly above [`EXCURSION_THRESHOLD_C`] counts as an
//! excursion.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Readings strictly above this temperature are excursions.
pub const EXCURSION_THRESHOLD_C: f64 = -60.0;

/// Every shipment gets at least this many readings.
pub const MIN_READINGS: u32 = 6;

/// One reading per this many hours of shipment time, above the minimum.
pub const HOURS_PER_READING: u32 = 4;

/// Multiplier applied to readings in the middle of the journey.
pub const MID_JOURNEY_FACTOR: f64 = 1.2;

/// Inclusive temperature range in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureBand {
    pub min_c: f64,
    pub max_c: f64,
}

impl TemperatureBand {
    pub const fn new(min_c: f64, max_c: f64) -> Self {
        Self { min_c, max_c }
    }

    pub fn contains(&self, temperature_c: f64) -> bool {
        (self.min_c..=self.max_c).contains(&temperature_c)
    }

    pub fn is_valid(&self) -> bool {
        self.min_c.is_finite() && self.max_c.is_finite() && self.min_c <= self.max_c
    }

    fn sample(&self, rng: &mut impl Rng) -> f64 {
        round_to(rng.gen_range(self.min_c..=self.max_c), 2)
    }
}

/// The two bands a reading is drawn from, split at [`EXCURSION_THRESHOLD_C`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureBands {
    pub normal: TemperatureBand,
    pub excursion: TemperatureBand,
}

impl Default for TemperatureBands {
    fn default() -> Self {
        Self {
            normal: TemperatureBand::new(-80.0, -60.0),
            excursion: TemperatureBand::new(-59.0, -50.0),
        }
    }
}

impl TemperatureBands {
    /// Both bands well-formed, the normal band at or below the threshold and
    /// every rounded excursion reading strictly above it.
    pub fn is_valid(&self) -> bool {
        self.normal.is_valid()
            && self.excursion.is_valid()
            && self.normal.max_c <= EXCURSION_THRESHOLD_C
            && round_to(self.excursion.min_c, 2) > EXCURSION_THRESHOLD_C
    }
}

/// Draw one reading: from the excursion band with probability `p`, otherwise
/// from the normal band. The draw `u` in `[0, 1)` selects the excursion band
/// when `u < p`, so `p >= 1.0` always yields an excursion reading and
/// `p <= 0.0` never does.
pub fn sample_temperature(p: f64, bands: &TemperatureBands, rng: &mut impl Rng) -> f64 {
    if rng.gen::<f64>() < p {
        bands.excursion.sample(rng)
    } else {
        bands.normal.sample(rng)
    }
}

/// Number of readings for a shipment of `duration_hours`.
pub fn reading_count(duration_hours: u32) -> u32 {
    (duration_hours / HOURS_PER_READING).max(MIN_READINGS)
}

/// Journey-position weight for reading `index` out of `count`.
///
/// Readings strictly between the first and third quarter marks (integer
/// division) are weighted by [`MID_JOURNEY_FACTOR`].
pub fn journey_factor(index: u32, count: u32) -> f64 {
    if index > count / 4 && index < 3 * count / 4 {
        MID_JOURNEY_FACTOR
    } else {
        1.0
    }
}

pub fn is_excursion(temperature_c: f64) -> bool {
    temperature_c > EXCURSION_THRESHOLD_C
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DRAWS: usize = 10_000;

    #[test]
    fn zero_probability_is_always_normal() {
        let mut rng = StdRng::seed_from_u64(42);
        let bands = TemperatureBands::default();
        for _ in 0..DRAWS {
            let t = sample_temperature(0.0, &bands, &mut rng);
            assert!(bands.normal.contains(t), "{} outside normal band", t);
            assert!(!is_excursion(t));
        }
    }

    #[test]
    fn certain_probability_is_always_excursion() {
        let mut rng = StdRng::seed_from_u64(42);
        let bands = TemperatureBands::default();
        for _ in 0..DRAWS {
            let t = sample_temperature(1.0, &bands, &mut rng);
            assert!(bands.excursion.contains(t), "{} outside excursion band", t);
            assert!(is_excursion(t));
        }
    }

    #[test]
    fn probability_above_one_is_certain() {
        let mut rng = StdRng::seed_from_u64(3);
        let bands = TemperatureBands::default();
        for _ in 0..1000 {
            assert!(is_excursion(sample_temperature(1.14, &bands, &mut rng)));
        }
    }

    #[test]
    fn even_probability_splits_evenly() {
        let mut rng = StdRng::seed_from_u64(42);
        let bands = TemperatureBands::default();
        let excursions = (0..DRAWS)
            .filter(|_| is_excursion(sample_temperature(0.5, &bands, &mut rng)))
            .count();
        let share = excursions as f64 / DRAWS as f64;
        // ~6 standard deviations at n = 10k
        assert!((share - 0.5).abs() < 0.03, "excursion share {}", share);
    }

    #[test]
    fn readings_have_two_decimals() {
        let mut rng = StdRng::seed_from_u64(9);
        let bands = TemperatureBands::default();
        for _ in 0..100 {
            let t = sample_temperature(0.5, &bands, &mut rng);
            assert!((t * 100.0 - (t * 100.0).round()).abs() < 1e-6);
        }
    }

    #[test]
    fn reading_count_has_floor() {
        assert_eq!(reading_count(8), 6);
        assert_eq!(reading_count(24), 6);
        assert_eq!(reading_count(28), 7);
        assert_eq!(reading_count(48), 12);
    }

    #[test]
    fn journey_factor_weights_middle() {
        // count = 6: quarter marks are 1 and 4
        let weights: Vec<f64> = (0..6).map(|j| journey_factor(j, 6)).collect();
        assert_eq!(weights, vec![1.0, 1.0, 1.2, 1.2, 1.0, 1.0]);

        // count = 12: quarter marks are 3 and 9
        let boosted = (0..12).filter(|&j| journey_factor(j, 12) > 1.0).count();
        assert_eq!(boosted, 5);
    }

    #[test]
    fn default_bands_are_valid_and_disjoint() {
        let bands = TemperatureBands::default();
        assert!(bands.is_valid());
        assert!(!is_excursion(bands.normal.max_c));
        assert!(is_excursion(bands.excursion.min_c));
    }

    #[test]
    fn overlapping_bands_are_invalid() {
        let bands = TemperatureBands {
            normal: TemperatureBand::new(-80.0, -55.0),
            excursion: TemperatureBand::new(-59.0, -50.0),
        };
        assert!(!bands.is_valid());
    }

    #[test]
    fn normal_band_above_threshold_is_invalid() {
        let bands = TemperatureBands {
            normal: TemperatureBand::new(-80.0, -55.0),
            excursion: TemperatureBand::new(-50.0, -40.0),
        };
        assert!(!bands.is_valid());
    }

    #[test]
    fn excursion_band_below_threshold_is_invalid() {
        let below = TemperatureBands {
            normal: TemperatureBand::new(-80.0, -75.0),
            excursion: TemperatureBand::new(-70.0, -62.0),
        };
        assert!(!below.is_valid());

        let swapped = TemperatureBands {
            normal: TemperatureBand::new(-59.0, -50.0),
            excursion: TemperatureBand::new(-80.0, -60.0),
        };
        assert!(!swapped.is_valid());

        // rounds onto the threshold itself
        let edge = TemperatureBands {
            excursion: TemperatureBand::new(-60.001, -50.0),
            ..Default::default()
        };
        assert!(!edge.is_valid());
    }

    #[test]
    fn shifted_bands_around_threshold_are_valid() {
        let bands = TemperatureBands {
            normal: TemperatureBand::new(-90.0, -70.0),
            excursion: TemperatureBand::new(-55.0, -20.0),
        };
        assert!(bands.is_valid());
    }
}
