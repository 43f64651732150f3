//! Baseline retriever: the fixed catalog of parameterized graph queries.
//!
//! Stateless: each operation binds its identifiers into one fixed Cypher
//! pattern and materializes the full result. Nothing here mutates the graph,
//! paginates, caches, or post-processes rows. Result sizes are bounded by the
//! keyed MATCH in every query except `top_food_flights`, which carries its own
//! LIMIT.
//!
//! Unknown identifiers yield empty row sets, never errors; no existence check
//! is performed. Store failures propagate unmodified.

use crate::neo4j::models::*;
use crate::neo4j::GraphStore;
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;

/// Named query catalog over the airline operations graph.
pub struct BaselineRetriever {
    store: Arc<dyn GraphStore>,
}

impl BaselineRetriever {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Flights departing from an airport.
    pub async fn flights_from_airport(&self, origin_code: &str) -> Result<Vec<FlightFromRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (f:Flight)-[:DEPARTS_FROM]->(a:Airport {station_code: $code})
                RETURN f.flight_number AS flight, a.station_code AS origin
                "#,
                vec![("code", json!(origin_code))],
            )
            .await?;
        rows_into(rows)
    }

    /// Flights arriving at an airport.
    pub async fn flights_to_airport(&self, dest_code: &str) -> Result<Vec<FlightToRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (f:Flight)-[:ARRIVES_AT]->(a:Airport {station_code: $code})
                RETURN f.flight_number AS flight, a.station_code AS destination
                "#,
                vec![("code", json!(dest_code))],
            )
            .await?;
        rows_into(rows)
    }

    /// All journeys taken by a passenger, with arrival delay.
    pub async fn passenger_journeys(&self, record_locator: &str) -> Result<Vec<JourneyDelayRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (p:Passenger {record_locator: $rl})-[:TOOK]->(j:Journey)
                RETURN j.feedback_ID AS journey_id, j.arrival_delay_minutes AS delay
                "#,
                vec![("rl", json!(record_locator))],
            )
            .await?;
        rows_into(rows)
    }

    /// The flight a journey was on.
    pub async fn journey_flight(&self, feedback_id: &str) -> Result<Vec<JourneyFlightRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (j:Journey {feedback_ID: $fid})-[:ON]->(f:Flight)
                RETURN j.feedback_ID AS journey_id, f.flight_number AS flight
                "#,
                vec![("fid", json!(feedback_id))],
            )
            .await?;
        rows_into(rows)
    }

    /// Flights connecting an origin airport to a destination airport.
    pub async fn flights_between(&self, origin: &str, dest: &str) -> Result<Vec<FlightRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (f:Flight)-[:DEPARTS_FROM]->(o:Airport {station_code: $orig})
                MATCH (f)-[:ARRIVES_AT]->(d:Airport {station_code: $dest})
                RETURN f.flight_number AS flight
                "#,
                vec![("orig", json!(origin)), ("dest", json!(dest))],
            )
            .await?;
        rows_into(rows)
    }

    /// Passengers whose journeys were on a flight.
    pub async fn passengers_on_flight(&self, flight_number: &str) -> Result<Vec<PassengerRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (p:Passenger)-[:TOOK]->(j:Journey)-[:ON]->(f:Flight {flight_number: $fnum})
                RETURN p.record_locator AS passenger
                "#,
                vec![("fnum", json!(flight_number))],
            )
            .await?;
        rows_into(rows)
    }

    /// Flights operated by a fleet type.
    pub async fn flights_by_fleet(&self, fleet_type: &str) -> Result<Vec<FlightRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (f:Flight {fleet_type_description: $fleet})
                RETURN f.flight_number AS flight
                "#,
                vec![("fleet", json!(fleet_type))],
            )
            .await?;
        rows_into(rows)
    }

    /// A passenger's journeys ordered by food satisfaction, best first.
    ///
    /// Journeys without a score sort wherever the store puts nulls; the
    /// relative order of scored vs. unscored rows is store-dependent and not
    /// part of this contract.
    pub async fn food_scores_by_passenger(
        &self,
        record_locator: &str,
    ) -> Result<Vec<FoodScoreRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (p:Passenger {record_locator: $record_locator})-[:TOOK]->(j:Journey)
                RETURN j.feedback_ID AS journey_id,
                       j.food_satisfaction_score AS food_score
                ORDER BY food_score DESC
                "#,
                vec![("record_locator", json!(record_locator))],
            )
            .await?;
        rows_into(rows)
    }

    /// Top-k flights by average food satisfaction across all journeys.
    ///
    /// Ties are broken by the store's own (unspecified) order, so the exact
    /// row set under ties is non-deterministic.
    pub async fn top_food_flights(&self, k: i64) -> Result<Vec<AvgFoodRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (j:Journey)-[:ON]->(f:Flight)
                WITH f.flight_number AS flight,
                     avg(j.food_satisfaction_score) AS avg_food
                RETURN flight, avg_food
                ORDER BY avg_food DESC
                LIMIT $k
                "#,
                vec![("k", json!(k))],
            )
            .await?;
        rows_into(rows)
    }

    /// Passengers belonging to a generation cohort.
    pub async fn passengers_by_generation(&self, generation: &str) -> Result<Vec<PassengerRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (p:Passenger {generation: $g})
                RETURN p.record_locator AS passenger
                "#,
                vec![("g", json!(generation))],
            )
            .await?;
        rows_into(rows)
    }

    /// Distinct flights with at least one journey strictly longer than `min_miles`.
    pub async fn long_flights(&self, min_miles: f64) -> Result<Vec<FlightRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (j:Journey)-[:ON]->(f:Flight)
                WHERE j.actual_flown_miles > $m
                RETURN DISTINCT f.flight_number AS flight
                "#,
                vec![("m", json!(min_miles))],
            )
            .await?;
        rows_into(rows)
    }

    /// Distinct (origin, destination) airport pairs across a passenger's journeys.
    pub async fn airports_used_by_passenger(
        &self,
        record_locator: &str,
    ) -> Result<Vec<AirportPairRow>> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (p:Passenger {record_locator: $rl})-[:TOOK]->(j:Journey)-[:ON]->(f:Flight)
                MATCH (f)-[:DEPARTS_FROM]->(a1:Airport)
                MATCH (f)-[:ARRIVES_AT]->(a2:Airport)
                RETURN DISTINCT a1.station_code AS origin, a2.station_code AS destination
                "#,
                vec![("rl", json!(record_locator))],
            )
            .await?;
        rows_into(rows)
    }
}
