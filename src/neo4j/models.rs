//! Row models for the query catalog.
//!
//! Each struct mirrors the RETURN clause of exactly one catalog query; field
//! names are the query's column aliases and are part of the external contract.
//! Numeric journey attributes are `Option<f64>` because the source data has
//! gaps (e.g. journeys without a food satisfaction score) and the catalog
//! passes store nulls through unmodified.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Row of `flights_from_airport`: `{flight, origin}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightFromRow {
    pub flight: String,
    pub origin: String,
}

/// Row of `flights_to_airport`: `{flight, destination}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightToRow {
    pub flight: String,
    pub destination: String,
}

/// Row of `passenger_journeys`: `{journey_id, delay}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyDelayRow {
    pub journey_id: String,
    pub delay: Option<f64>,
}

/// Row of `journey_flight`: `{journey_id, flight}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyFlightRow {
    pub journey_id: String,
    pub flight: String,
}

/// Row of `flights_between`, `flights_by_fleet`, and `long_flights`: `{flight}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRow {
    pub flight: String,
}

/// Row of `passengers_on_flight` and `passengers_by_generation`: `{passenger}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerRow {
    pub passenger: String,
}

/// Row of `food_scores_by_passenger`: `{journey_id, food_score}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodScoreRow {
    pub journey_id: String,
    pub food_score: Option<f64>,
}

/// Row of `top_food_flights`: `{flight, avg_food}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvgFoodRow {
    pub flight: String,
    pub avg_food: Option<f64>,
}

/// Row of `airports_used_by_passenger`: `{origin, destination}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportPairRow {
    pub origin: String,
    pub destination: String,
}

/// Row of `query_similar`: `{id, score}`, descending by score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarRow {
    pub id: String,
    pub score: f64,
}

/// Deserialize raw store rows into a typed row vector.
pub(crate) fn rows_into<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(Into::into))
        .collect()
}
