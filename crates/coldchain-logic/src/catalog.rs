//! Reference catalogs — facilities, sponsors, airports, carriers, products.
//!
//! The defaults mirror the six-facility network the dataset was designed
//! around. Catalogs are plain string lists so that a run can swap in its own
//! network; labels that the risk tables don't know fall back to neutral
//! factors (see [`crate::risk`]).

use serde::{Deserialize, Serialize};

/// Named catalogs every shipment draws its categorical attributes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Facility names with their city/state label, e.g. `"Mayo Clinic (Rochester, MN)"`.
    pub facilities: Vec<String>,
    /// Sponsor companies that own a shipment.
    pub companies: Vec<String>,
    /// IATA codes of airports used for the flight leg.
    pub airports: Vec<String>,
    pub carriers: Vec<String>,
    pub product_types: Vec<String>,
}

pub const DEFAULT_FACILITIES: &[&str] = &[
    "Johns Hopkins Cell Therapy Lab (Baltimore, MD)",
    "Cleveland Clinic (Cleveland, OH)",
    "Mayo Clinic (Rochester, MN)",
    "MD Anderson (Houston, TX)",
    "UPenn Cell Therapy Center (Philadelphia, PA)",
    "Dana-Farber Cancer Institute (Boston, MA)",
];

pub const DEFAULT_COMPANIES: &[&str] = &[
    "Johns Hopkins Cell Therapy Lab",
    "Bristol Myers Squibb",
    "Novartis",
    "Kit Pharma",
    "Legend Biotech",
];

pub const DEFAULT_AIRPORTS: &[&str] = &["BWI", "IAH", "JFK", "CLE", "ORD"];

pub const DEFAULT_CARRIERS: &[&str] = &["Cryoport", "FedEx Health", "UPS ColdChain"];

pub const DEFAULT_PRODUCT_TYPES: &[&str] = &["Stem Cell", "CAR-T", "iPSC-derived"];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            facilities: owned(DEFAULT_FACILITIES),
            companies: owned(DEFAULT_COMPANIES),
            airports: owned(DEFAULT_AIRPORTS),
            carriers: owned(DEFAULT_CARRIERS),
            product_types: owned(DEFAULT_PRODUCT_TYPES),
        }
    }
}

impl Catalog {
    /// Each catalog with the minimum number of entries generation needs.
    ///
    /// Facilities and airports need two entries because origin/destination
    /// and departure/arrival must differ.
    pub fn requirements(&self) -> [(&'static str, usize, usize); 5] {
        [
            ("facilities", self.facilities.len(), 2),
            ("airports", self.airports.len(), 2),
            ("companies", self.companies.len(), 1),
            ("carriers", self.carriers.len(), 1),
            ("product_types", self.product_types.len(), 1),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_sizes() {
        let catalog = Catalog::default();
        assert_eq!(catalog.facilities.len(), 6);
        assert_eq!(catalog.companies.len(), 5);
        assert_eq!(catalog.airports.len(), 5);
        assert_eq!(catalog.carriers.len(), 3);
        assert_eq!(catalog.product_types.len(), 3);
    }

    #[test]
    fn default_catalog_meets_requirements() {
        for (name, len, min) in Catalog::default().requirements() {
            assert!(len >= min, "{} has {} entries, needs {}", name, len, min);
        }
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let catalog: Catalog = serde_json::from_str(r#"{"airports": ["SFO", "LAX"]}"#).unwrap();
        assert_eq!(catalog.airports, vec!["SFO", "LAX"]);
        assert_eq!(catalog.facilities.len(), 6);
    }
}
