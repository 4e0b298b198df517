//! Shipment record builder — draws one shipment and everything derived from it.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use coldchain_logic::calendar::{weekday_name, Season};
use coldchain_logic::catalog::Catalog;
use coldchain_logic::sampler::{
    is_excursion, reading_count, round_to, sample_temperature, TemperatureBands,
};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{SynthError, SynthResult};
use crate::records::{
    EventRecord, EventType, FlightRecord, RouteRecord, ShipmentRecords, TemperatureRecord,
};
use crate::strategy::{ExcursionStrategy, ShipmentProfile};

/// Shipments start on a day drawn from this many days after the schedule start.
pub const SCHEDULE_DAYS: i64 = 365;
pub const MIN_SHIPMENT_HOURS: u32 = 8;
pub const MAX_SHIPMENT_HOURS: u32 = 48;
pub const MIN_FLIGHT_HOURS: f64 = 1.5;
pub const MAX_FLIGHT_HOURS: f64 = 4.5;
/// Hours between pickup and the scheduled flight departure.
pub const PICKUP_TO_DEPARTURE_HOURS: f64 = 2.0;
/// Extra hours after landing before a customs hold is logged.
pub const CUSTOMS_LAG_HOURS: (f64, f64) = (0.5, 2.0);
pub const CUSTOMS_HOLD_RATE: f64 = 0.1;

/// First day of the shipment schedule.
pub fn schedule_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Sequential shipment identifier: `SHP0000`, `SHP0001`, ...
pub fn shipment_id(index: usize) -> String {
    format!("SHP{:04}", index)
}

/// Fractional hours as a duration, rounded to the microsecond.
pub fn hours(h: f64) -> Duration {
    Duration::microseconds((h * 3_600_000_000.0).round() as i64)
}

fn pick<'c, R: Rng>(list: &'c [String], catalog: &'static str, rng: &mut R) -> SynthResult<&'c str> {
    list.choose(rng)
        .map(String::as_str)
        .ok_or_else(|| SynthError::CatalogTooSmall {
            catalog,
            len: list.len(),
            min: 1,
        })
}

/// Pick an entry different from `exclude`.
fn pick_other<'c, R: Rng>(
    list: &'c [String],
    exclude: &str,
    catalog: &'static str,
    rng: &mut R,
) -> SynthResult<&'c str> {
    let candidates: Vec<&'c str> = list
        .iter()
        .map(String::as_str)
        .filter(|s| *s != exclude)
        .collect();
    candidates
        .choose(rng)
        .copied()
        .ok_or_else(|| SynthError::CatalogTooSmall {
            catalog,
            len: list.len(),
            min: 2,
        })
}

/// Builds the records of one shipment from a catalog, temperature bands and
/// an excursion strategy.
pub struct ShipmentBuilder<'a, S> {
    catalog: &'a Catalog,
    bands: TemperatureBands,
    strategy: &'a S,
}

impl<'a, S: ExcursionStrategy> ShipmentBuilder<'a, S> {
    pub fn new(catalog: &'a Catalog, bands: TemperatureBands, strategy: &'a S) -> Self {
        Self {
            catalog,
            bands,
            strategy,
        }
    }

    pub fn build<R: Rng>(&self, index: usize, rng: &mut R) -> SynthResult<ShipmentRecords> {
        let catalog = self.catalog;
        let id = shipment_id(index);

        // Route
        let origin = pick(&catalog.facilities, "facilities", rng)?;
        let destination = pick_other(&catalog.facilities, origin, "facilities", rng)?;
        let carrier = pick(&catalog.carriers, "carriers", rng)?;
        let product_type = pick(&catalog.product_types, "product_types", rng)?;
        let company = pick(&catalog.companies, "companies", rng)?;

        let start_date = schedule_start() + Duration::days(rng.gen_range(0..SCHEDULE_DAYS));
        let start: NaiveDateTime = start_date.and_time(NaiveTime::MIN);
        let duration_hours = rng.gen_range(MIN_SHIPMENT_HOURS..=MAX_SHIPMENT_HOURS);
        let end = start + hours(duration_hours as f64);

        let day_of_week = weekday_name(start.weekday().num_days_from_monday()).to_string();
        let season = Season::from_month(start.month());

        // Flight
        let departure_airport = pick(&catalog.airports, "airports", rng)?;
        let arrival_airport = pick_other(&catalog.airports, departure_airport, "airports", rng)?;
        let scheduled_departure = start + hours(PICKUP_TO_DEPARTURE_HOURS);
        let flight_hours = rng.gen_range(MIN_FLIGHT_HOURS..=MAX_FLIGHT_HOURS);
        let had_customs_hold = rng.gen::<f64>() < CUSTOMS_HOLD_RATE;

        let profile = ShipmentProfile {
            origin,
            destination,
            carrier,
            product_type,
            day_of_week: &day_of_week,
            season: season.as_str(),
            departure_airport,
            arrival_airport,
            flight_duration_hours: flight_hours,
            had_customs_hold,
            shipment_duration_hours: duration_hours,
        };
        let assessment = self.strategy.assess(&profile, rng);

        let actual_departure = scheduled_departure + Duration::minutes(assessment.delay_minutes as i64);
        let arrival_time = actual_departure + hours(flight_hours);

        let route = RouteRecord {
            shipment_id: id.clone(),
            company: company.to_string(),
            origin_facility: origin.to_string(),
            destination_facility: destination.to_string(),
            start_time: start_date,
            end_time: end,
            carrier: carrier.to_string(),
            product_type: product_type.to_string(),
            delay_minutes: assessment.delay_minutes,
            had_customs_hold,
            day_of_week,
            season: season.as_str().to_string(),
            excursion_probability: round_to(assessment.excursion_probability, 4),
        };

        let flight = FlightRecord {
            shipment_id: id.clone(),
            flight_number: format!("FX{}", rng.gen_range(1000..=9999)),
            departure_airport: departure_airport.to_string(),
            arrival_airport: arrival_airport.to_string(),
            scheduled_departure,
            actual_departure,
            delay_minutes: assessment.delay_minutes,
            arrival_time,
            flight_duration_hours: round_to(flight_hours, 2),
        };

        // Events
        let event = |timestamp, event_type, location: String| EventRecord {
            shipment_id: id.clone(),
            timestamp,
            event_type,
            location,
        };
        let mut events = vec![
            event(start, EventType::Pickup, origin.to_string()),
            event(
                start + hours(duration_hours as f64 / 2.0),
                EventType::InTransit,
                format!("En route to {}", destination),
            ),
            event(end, EventType::Delivery, destination.to_string()),
        ];
        if had_customs_hold {
            let lag = rng.gen_range(CUSTOMS_LAG_HOURS.0..=CUSTOMS_LAG_HOURS.1);
            events.push(event(
                actual_departure + hours(flight_hours + lag),
                EventType::CustomsHold,
                arrival_airport.to_string(),
            ));
        }
        events.sort_by_key(|e| e.timestamp);

        // Temperatures
        let count = reading_count(duration_hours);
        let interval = duration_hours as f64 / count as f64;
        let mut observed_excursion = false;
        let mut temperatures = Vec::with_capacity(count as usize);
        for j in 0..count {
            let p = self.strategy.reading_probability(&assessment, j, count);
            let temperature_c = sample_temperature(p, &self.bands, rng);
            observed_excursion |= is_excursion(temperature_c);
            temperatures.push(TemperatureRecord {
                shipment_id: id.clone(),
                timestamp: start + hours(j as f64 * interval),
                temperature_c,
            });
        }

        if observed_excursion {
            log::trace!("{} observed an excursion (p = {:.4})", id, route.excursion_probability);
        }

        Ok(ShipmentRecords {
            route,
            flight,
            events,
            temperatures,
            observed_excursion,
        })
    }
}
