//! Pure cold-chain risk logic.
//!
//! This crate holds the parts of the shipment generator that have real
//! modeling decisions in them: the multiplicative excursion-probability model
//! and the temperature sampler that turns a probability into readings.
//! Functions take plain data (and an explicit random source where they draw),
//! so they are unit-testable without any dataset or file I/O.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`calendar`] | Season and weekday labels for a start date |
//! | [`catalog`] | Facilities, sponsors, airports, carriers, product types |
//! | [`facility_map`] | Per-run risk increment for every ordered facility pair |
//! | [`risk`] | Factor tables and the composed excursion probability |
//! | [`sampler`] | Normal/excursion temperature bands, reading schedule |

pub mod calendar;
pub mod catalog;
pub mod facility_map;
pub mod risk;
pub mod sampler;
