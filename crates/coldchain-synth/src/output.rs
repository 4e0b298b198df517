//! CSV output — the four tables plus a JSON manifest describing the run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{SynthError, SynthResult};
use crate::records::{
    EVENT_COLUMNS, FLIGHT_COLUMNS, ROUTE_COLUMNS, SCHEMA_VERSION, TEMPERATURE_COLUMNS,
};

pub const ROUTES_FILE: &str = "shipment_routes.csv";
pub const FLIGHTS_FILE: &str = "shipment_flights.csv";
pub const EVENTS_FILE: &str = "shipment_events.csv";
pub const TEMPERATURES_FILE: &str = "shipment_temperatures.csv";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Row counts per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub routes: usize,
    pub flights: usize,
    pub events: usize,
    pub temperatures: usize,
}

/// Describes a written dataset so consumers can check the layout they read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub schema_version: u32,
    pub strategy: String,
    pub shipments: usize,
    pub base_excursion_rate: f64,
    pub seed: Option<u64>,
    pub tables: TableCounts,
    pub observed_excursions: usize,
}

impl DatasetManifest {
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            strategy: dataset.strategy.to_string(),
            shipments: dataset.len(),
            base_excursion_rate: dataset.base_rate,
            seed: dataset.seed,
            tables: TableCounts {
                routes: dataset.routes.len(),
                flights: dataset.flights.len(),
                events: dataset.events.len(),
                temperatures: dataset.temperatures.len(),
            },
            observed_excursions: dataset.excursions.len(),
        }
    }
}

/// Write `rows` to a CSV at `path` under an explicit header row.
fn write_table<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> SynthResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| SynthError::io(path, e))?;
    Ok(())
}

/// Write the dataset's tables and manifest into `dir`, creating it if needed.
/// Returns the paths written, manifest last.
pub fn write_dataset(dataset: &Dataset, dir: &Path) -> SynthResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| SynthError::io(dir, e))?;

    let routes = dir.join(ROUTES_FILE);
    let flights = dir.join(FLIGHTS_FILE);
    let events = dir.join(EVENTS_FILE);
    let temperatures = dir.join(TEMPERATURES_FILE);
    let manifest = dir.join(MANIFEST_FILE);

    write_table(&routes, ROUTE_COLUMNS, &dataset.routes)?;
    write_table(&flights, FLIGHT_COLUMNS, &dataset.flights)?;
    write_table(&events, EVENT_COLUMNS, &dataset.events)?;
    write_table(&temperatures, TEMPERATURE_COLUMNS, &dataset.temperatures)?;

    let json = serde_json::to_string_pretty(&DatasetManifest::for_dataset(dataset))?;
    std::fs::write(&manifest, json).map_err(|e| SynthError::io(&manifest, e))?;

    log::info!("Wrote dataset to {}", dir.display());
    Ok(vec![routes, flights, events, temperatures, manifest])
}
