//! Post-run diagnostics — observed excursion rates by shipment attribute.
//!
//! Compares what the model intended (mean stored probability) with what the
//! sampled readings produced, and breaks the observed rate down by the
//! categorical factors of the model.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::records::RouteRecord;

/// Route columns the report groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFactor {
    Carrier,
    Season,
    DayOfWeek,
    HadCustomsHold,
    ProductType,
}

impl ReportFactor {
    /// Breakdown order of the report.
    pub const ALL: [ReportFactor; 5] = [
        Self::Carrier,
        Self::Season,
        Self::DayOfWeek,
        Self::HadCustomsHold,
        Self::ProductType,
    ];

    /// Column name in the routes table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Carrier => "carrier",
            Self::Season => "season",
            Self::DayOfWeek => "day_of_week",
            Self::HadCustomsHold => "had_customs_hold",
            Self::ProductType => "product_type",
        }
    }

    fn value(&self, route: &RouteRecord) -> String {
        match self {
            Self::Carrier => route.carrier.clone(),
            Self::Season => route.season.clone(),
            Self::DayOfWeek => route.day_of_week.clone(),
            Self::HadCustomsHold => route.had_customs_hold.to_string(),
            Self::ProductType => route.product_type.clone(),
        }
    }
}

impl std::fmt::Display for ReportFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRate {
    pub value: String,
    pub excursions: usize,
    pub total: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorBreakdown {
    pub factor: ReportFactor,
    /// Sorted by group value.
    pub groups: Vec<GroupRate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DelayComparison {
    pub with_excursion: f64,
    pub without_excursion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total_shipments: usize,
    pub excursion_count: usize,
    pub excursion_rate: f64,
    pub mean_excursion_probability: f64,
    pub breakdowns: Vec<FactorBreakdown>,
    /// Only present when both groups are non-empty.
    pub mean_delay_minutes: Option<DelayComparison>,
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

impl Report {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let total = dataset.len();
        let excursion_count = dataset.excursions.len();

        let breakdowns = ReportFactor::ALL
            .iter()
            .map(|&factor| {
                let mut groups: BTreeMap<String, (usize, usize)> = BTreeMap::new();
                for route in &dataset.routes {
                    let entry = groups.entry(factor.value(route)).or_default();
                    entry.1 += 1;
                    if dataset.had_excursion(&route.shipment_id) {
                        entry.0 += 1;
                    }
                }
                FactorBreakdown {
                    factor,
                    groups: groups
                        .into_iter()
                        .map(|(value, (excursions, total))| GroupRate {
                            value,
                            excursions,
                            total,
                            rate: ratio(excursions, total),
                        })
                        .collect(),
                }
            })
            .collect();

        let delays = |flag: bool| {
            mean(
                dataset
                    .routes
                    .iter()
                    .filter(|r| dataset.had_excursion(&r.shipment_id) == flag)
                    .map(|r| r.delay_minutes as f64),
            )
        };
        let mean_delay_minutes = match (delays(true), delays(false)) {
            (Some(with_excursion), Some(without_excursion)) => Some(DelayComparison {
                with_excursion,
                without_excursion,
            }),
            _ => None,
        };

        Self {
            total_shipments: total,
            excursion_count,
            excursion_rate: ratio(excursion_count, total),
            mean_excursion_probability: mean(
                dataset.routes.iter().map(|r| r.excursion_probability),
            )
            .unwrap_or(0.0),
            breakdowns,
            mean_delay_minutes,
        }
    }

    /// Log the report at info level, one line per group.
    pub fn log(&self) {
        log::info!("Total shipments: {}", self.total_shipments);
        log::info!(
            "Shipments with temperature excursions: {} ({:.2}%)",
            self.excursion_count,
            self.excursion_rate * 100.0
        );
        for breakdown in &self.breakdowns {
            log::info!("Excursion rates by {}:", breakdown.factor);
            for g in &breakdown.groups {
                log::info!(
                    "  {}: {:.2}% ({}/{})",
                    g.value,
                    g.rate * 100.0,
                    g.excursions,
                    g.total
                );
            }
        }
        log::info!(
            "Average calculated excursion probability: {:.4}",
            self.mean_excursion_probability
        );
        log::info!("Actual excursion rate: {:.4}", self.excursion_rate);
        if let Some(delay) = &self.mean_delay_minutes {
            log::info!("Average delay minutes:");
            log::info!("  Shipments with excursions: {:.2} minutes", delay.with_excursion);
            log::info!(
                "  Shipments without excursions: {:.2} minutes",
                delay.without_excursion
            );
        }
    }
}
