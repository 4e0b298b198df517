//! Row types for the four output tables.
//!
//! Timestamps are kept as naive `chrono` values and only turned into text on
//! serialization. The tables use ISO-8601 with a literal `Z` appended to the
//! naive value; it is a textual convention, not a UTC conversion.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};

/// Version of the table layout written by this crate.
///
/// Version 1 was the flagged-only layout with a `status` column on routes;
/// version 2 replaced it with the risk columns (`delay_minutes` through
/// `excursion_probability`) for every strategy.
pub const SCHEMA_VERSION: u32 = 2;

pub const ROUTE_COLUMNS: &[&str] = &[
    "shipment_id",
    "company",
    "origin_facility",
    "destination_facility",
    "start_time",
    "end_time",
    "carrier",
    "product_type",
    "delay_minutes",
    "had_customs_hold",
    "day_of_week",
    "season",
    "excursion_probability",
];

pub const FLIGHT_COLUMNS: &[&str] = &[
    "shipment_id",
    "flight_number",
    "departure_airport",
    "arrival_airport",
    "scheduled_departure",
    "actual_departure",
    "delay_minutes",
    "arrival_time",
    "flight_duration_hours",
];

pub const EVENT_COLUMNS: &[&str] = &["shipment_id", "timestamp", "event_type", "location"];

pub const TEMPERATURE_COLUMNS: &[&str] = &["shipment_id", "timestamp", "temperature_c"];

// ============================================================================
// TIMESTAMP FORMATTING
// ============================================================================

/// `YYYY-MM-DDTHH:MM:SS`, with `.ffffff` only when there is a sub-second part.
pub fn iso_timestamp(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() / 1_000 == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// [`iso_timestamp`] with the trailing `Z`.
pub fn zulu_timestamp(ts: &NaiveDateTime) -> String {
    format!("{}Z", iso_timestamp(ts))
}

fn serialize_iso<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&iso_timestamp(ts))
}

fn serialize_zulu<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&zulu_timestamp(ts))
}

// ============================================================================
// ROWS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub shipment_id: String,
    pub company: String,
    pub origin_facility: String,
    pub destination_facility: String,
    pub start_time: NaiveDate,
    #[serde(serialize_with = "serialize_iso")]
    pub end_time: NaiveDateTime,
    pub carrier: String,
    pub product_type: String,
    pub delay_minutes: u32,
    pub had_customs_hold: bool,
    pub day_of_week: String,
    pub season: String,
    pub excursion_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    pub shipment_id: String,
    pub flight_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    #[serde(serialize_with = "serialize_zulu")]
    pub scheduled_departure: NaiveDateTime,
    #[serde(serialize_with = "serialize_zulu")]
    pub actual_departure: NaiveDateTime,
    pub delay_minutes: u32,
    #[serde(serialize_with = "serialize_zulu")]
    pub arrival_time: NaiveDateTime,
    pub flight_duration_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Pickup,
    InTransit,
    Delivery,
    CustomsHold,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::InTransit => "in_transit",
            Self::Delivery => "delivery",
            Self::CustomsHold => "customs_hold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub shipment_id: String,
    #[serde(serialize_with = "serialize_zulu")]
    pub timestamp: NaiveDateTime,
    pub event_type: EventType,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureRecord {
    pub shipment_id: String,
    #[serde(serialize_with = "serialize_zulu")]
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
}

/// Everything generated for one shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRecords {
    pub route: RouteRecord,
    pub flight: FlightRecord,
    pub events: Vec<EventRecord>,
    pub temperatures: Vec<TemperatureRecord>,
    /// At least one reading exceeded the excursion threshold.
    pub observed_excursion: bool,
}
