//! Dataset assembly — drives the shipment builder over N shipments.

use std::collections::BTreeSet;

use rand::Rng;

use crate::builder::ShipmentBuilder;
use crate::config::GeneratorConfig;
use crate::error::SynthResult;
use crate::records::{EventRecord, FlightRecord, RouteRecord, ShipmentRecords, TemperatureRecord};
use crate::strategy::{ExcursionStrategy, FlaggedStrategy, RiskFactorStrategy, StrategyKind};

/// The four generated tables plus the set of shipments that observed an
/// excursion in their readings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub strategy: StrategyKind,
    pub base_rate: f64,
    pub seed: Option<u64>,
    pub routes: Vec<RouteRecord>,
    pub flights: Vec<FlightRecord>,
    pub events: Vec<EventRecord>,
    pub temperatures: Vec<TemperatureRecord>,
    /// Shipment IDs with at least one reading above the excursion threshold.
    /// Can disagree with the modeled probability, since readings are sampled.
    pub excursions: BTreeSet<String>,
}

impl Dataset {
    fn new(strategy: StrategyKind, base_rate: f64, seed: Option<u64>) -> Self {
        Self {
            strategy,
            base_rate,
            seed,
            ..Default::default()
        }
    }

    fn push(&mut self, records: ShipmentRecords) {
        if records.observed_excursion {
            self.excursions.insert(records.route.shipment_id.clone());
        }
        self.routes.push(records.route);
        self.flights.push(records.flight);
        self.events.extend(records.events);
        self.temperatures.extend(records.temperatures);
    }

    /// Number of shipments.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn had_excursion(&self, shipment_id: &str) -> bool {
        self.excursions.contains(shipment_id)
    }
}

/// Generate a dataset with the random source the config describes.
pub fn generate_dataset(config: &GeneratorConfig) -> SynthResult<Dataset> {
    let mut rng = config.rng();
    generate_with_rng(config, &mut rng)
}

/// Generate a dataset drawing from `rng`. Validates the config first, so a
/// bad catalog fails before any record exists.
pub fn generate_with_rng<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> SynthResult<Dataset> {
    config.validate()?;
    let base_rate = config.base_rate();

    log::info!(
        "Generating {} shipments ({} strategy, base rate {}, seed {:?})",
        config.shipments,
        config.strategy,
        base_rate,
        config.seed
    );

    match config.strategy {
        StrategyKind::RiskFactor => {
            let strategy = RiskFactorStrategy::for_catalog(base_rate, &config.catalog, rng);
            log::debug!(
                "Facility risk map: {} pairs over {} facilities",
                strategy.facility_map().len(),
                config.catalog.facilities.len()
            );
            assemble(config, &strategy, rng)
        }
        StrategyKind::Flagged => assemble(config, &FlaggedStrategy::new(base_rate), rng),
    }
}

/// Run the builder `config.shipments` times with a prepared strategy.
pub fn assemble<S: ExcursionStrategy, R: Rng>(
    config: &GeneratorConfig,
    strategy: &S,
    rng: &mut R,
) -> SynthResult<Dataset> {
    let builder = ShipmentBuilder::new(&config.catalog, config.bands, strategy);
    let mut dataset = Dataset::new(strategy.kind(), config.base_rate(), config.seed);

    for index in 0..config.shipments {
        dataset.push(builder.build(index, rng)?);
    }

    log::info!(
        "Generated {} routes, {} flights, {} events, {} temperature readings ({} with excursions)",
        dataset.routes.len(),
        dataset.flights.len(),
        dataset.events.len(),
        dataset.temperatures.len(),
        dataset.excursions.len()
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;

    fn seeded(shipments: usize, seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            shipments,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn one_row_per_shipment() {
        let dataset = generate_dataset(&seeded(50, 1)).unwrap();
        assert_eq!(dataset.len(), 50);
        assert_eq!(dataset.flights.len(), 50);
        assert!(dataset.events.len() >= 150 && dataset.events.len() <= 200);
        assert!(dataset.temperatures.len() >= 300);
    }

    #[test]
    fn excursion_set_matches_readings() {
        let config = GeneratorConfig {
            base_excursion_rate: Some(0.2),
            ..seeded(200, 2)
        };
        let dataset = generate_dataset(&config).unwrap();
        for route in &dataset.routes {
            let observed = dataset
                .temperatures
                .iter()
                .filter(|t| t.shipment_id == route.shipment_id)
                .any(|t| t.temperature_c > -60.0);
            assert_eq!(observed, dataset.had_excursion(&route.shipment_id));
        }
        assert!(!dataset.excursions.is_empty());
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = generate_dataset(&seeded(20, 3)).unwrap();
        let b = generate_dataset(&seeded(20, 3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn records_dataset_metadata() {
        let config = GeneratorConfig {
            strategy: StrategyKind::Flagged,
            ..seeded(5, 4)
        };
        let dataset = generate_dataset(&config).unwrap();
        assert_eq!(dataset.strategy, StrategyKind::Flagged);
        assert_eq!(dataset.base_rate, 0.15);
        assert_eq!(dataset.seed, Some(4));
    }

    #[test]
    fn invalid_config_generates_nothing() {
        let mut config = seeded(5, 5);
        config.catalog.airports = vec!["JFK".into()];
        assert!(matches!(
            generate_dataset(&config),
            Err(SynthError::CatalogTooSmall { catalog: "airports", .. })
        ));
    }
}
