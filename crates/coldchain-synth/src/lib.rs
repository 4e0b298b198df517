//! Cold-chain shipment dataset generator.
//!
//! Produces four related tables — routes, flights, events and temperature
//! readings — for synthetic shipments of biologic products between medical
//! facilities. The excursion odds of each shipment come from an
//! [`strategy::ExcursionStrategy`]; the readings are sampled from those odds,
//! so the observed excursion set is consistent with, but not identical to,
//! the modeled probabilities.
//!
//! # Example
//!
//! ```rust,no_run
//! use coldchain_synth::config::GeneratorConfig;
//! use coldchain_synth::dataset::generate_dataset;
//! use coldchain_synth::output::write_dataset;
//!
//! let config = GeneratorConfig { shipments: 100, seed: Some(42), ..Default::default() };
//! let dataset = generate_dataset(&config)?;
//! write_dataset(&dataset, &config.output_dir)?;
//! # Ok::<(), coldchain_synth::error::SynthError>(())
//! ```
//!
//! Runs without a `seed` draw from OS entropy and are not reproducible.

pub mod builder;
pub mod config;
pub mod dataset;
pub mod error;
pub mod output;
pub mod records;
pub mod report;
pub mod strategy;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::GeneratorConfig;
    pub use crate::dataset::{generate_dataset, generate_with_rng, Dataset};
    pub use crate::error::{SynthError, SynthResult};
    pub use crate::output::write_dataset;
    pub use crate::report::Report;
    pub use crate::strategy::{ExcursionStrategy, StrategyKind};
}
