//! `coldchain-synth` — writes a synthetic cold-chain shipment dataset.
//!
//! Usage:
//!   cargo run -p coldchain-synth
//!   cargo run -p coldchain-synth -- --shipments 500 --strategy flagged --seed 7
//!   cargo run -p coldchain-synth -- --config run.json --report-json report.json
//!
//! Flags override values from the `--config` file; anything unset keeps its
//! default. Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use clap::Parser;
use coldchain_synth::prelude::*;

/// Synthetic cold-chain shipment dataset generator.
#[derive(Parser, Debug)]
#[command(name = "coldchain-synth", about = "Generate a synthetic cold-chain shipment dataset")]
struct Cli {
    /// JSON configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Number of shipments to generate.
    #[arg(short = 'n', long = "shipments")]
    shipments: Option<usize>,

    /// Base excursion rate (defaults depend on the strategy).
    #[arg(long = "base-rate")]
    base_rate: Option<f64>,

    #[arg(long = "strategy", value_enum)]
    strategy: Option<StrategyKind>,

    /// Seed for a reproducible run.
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Directory the CSV tables are written to.
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Also write the diagnostics report as JSON to this path.
    #[arg(long = "report-json")]
    report_json: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> SynthResult<(GeneratorConfig, Option<PathBuf>)> {
        let mut config = match &self.config {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                GeneratorConfig::from_json_file(path)?
            }
            None => GeneratorConfig::default(),
        };

        if let Some(shipments) = self.shipments {
            config.shipments = shipments;
        }
        if let Some(rate) = self.base_rate {
            config.base_excursion_rate = Some(rate);
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }

        Ok((config, self.report_json))
    }
}

fn run(cli: Cli) -> SynthResult<()> {
    let (config, report_json) = cli.into_config()?;

    let dataset = generate_dataset(&config)?;
    write_dataset(&dataset, &config.output_dir)?;

    let report = Report::from_dataset(&dataset);
    report.log();

    if let Some(path) = report_json {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json).map_err(|e| SynthError::io(&path, e))?;
        log::info!("Wrote report to {}", path.display());
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
