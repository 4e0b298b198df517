//! Generator configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration: 1000 shipments, risk-factor strategy at its default
//! base rate, unseeded, written to `data/`.

use std::path::{Path, PathBuf};

use coldchain_logic::catalog::Catalog;
use coldchain_logic::sampler::{TemperatureBands, EXCURSION_THRESHOLD_C};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};
use crate::strategy::StrategyKind;

pub const DEFAULT_SHIPMENTS: usize = 1000;
pub const MAX_SHIPMENTS: usize = 1_000_000;
pub const DEFAULT_OUTPUT_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of shipments to generate.
    pub shipments: usize,
    /// Base excursion rate. `None` uses the strategy's default.
    pub base_excursion_rate: Option<f64>,
    pub strategy: StrategyKind,
    /// Seed for a reproducible run. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
    pub catalog: Catalog,
    pub bands: TemperatureBands,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            shipments: DEFAULT_SHIPMENTS,
            base_excursion_rate: None,
            strategy: StrategyKind::default(),
            seed: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            catalog: Catalog::default(),
            bands: TemperatureBands::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> SynthResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> SynthResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| SynthError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// The base rate this run uses.
    pub fn base_rate(&self) -> f64 {
        self.base_excursion_rate
            .unwrap_or_else(|| self.strategy.default_base_rate())
    }

    /// Random source for a run: seeded when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Reject configurations generation can't run with.
    pub fn validate(&self) -> SynthResult<()> {
        if self.shipments == 0 || self.shipments > MAX_SHIPMENTS {
            return Err(SynthError::InvalidShipmentCount(self.shipments));
        }

        let rate = self.base_rate();
        if !rate.is_finite() || rate < 0.0 {
            return Err(SynthError::InvalidBaseRate(rate));
        }

        for (catalog, len, min) in self.catalog.requirements() {
            if len < min {
                return Err(SynthError::CatalogTooSmall { catalog, len, min });
            }
        }

        if !self.bands.is_valid() {
            return Err(SynthError::InvalidBand(format!(
                "normal [{}, {}] must end at or below {} and excursion [{}, {}] must start above it",
                self.bands.normal.min_c,
                self.bands.normal.max_c,
                EXCURSION_THRESHOLD_C,
                self.bands.excursion.min_c,
                self.bands.excursion.max_c
            )));
        }

        Ok(())
    }
}
