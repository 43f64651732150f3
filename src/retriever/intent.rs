//! Intent catalog.
//!
//! The closed set of retrieval requests the façade understands, as a tagged
//! enum: each variant carries exactly the entity keys its query needs, and
//! dispatch is an exhaustive match instead of a runtime string fallthrough.

use crate::error::RetrievalError;
use anyhow::Result;
use serde_json::{Map, Value};

/// Default neighbor count for `similar_nodes`.
pub const DEFAULT_SIMILAR_K: i64 = 5;

/// A parsed retrieval request.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    FlightsFrom {
        origin: String,
    },
    FlightsTo {
        destination: String,
    },
    PassengerJourneys {
        record_locator: String,
    },
    JourneyFlight {
        feedback_id: String,
    },
    FlightsBetween {
        origin: String,
        destination: String,
    },
    PassengersOnFlight {
        flight_number: String,
    },
    FlightsByFleet {
        fleet_type: String,
    },
    SimilarNodes {
        embedding_name: String,
        label: String,
        node_eid: String,
        k: i64,
    },
}

impl Intent {
    /// Parse an `(intent, entities)` pair into a typed request.
    ///
    /// Returns `Ok(None)` for an intent name outside the catalog; the caller
    /// answers that with the sentinel value, it is not a failure. A missing or
    /// wrong-typed required key is fatal and fails the call immediately.
    pub fn parse(intent: &str, entities: &Map<String, Value>) -> Result<Option<Self>> {
        let parsed = match intent {
            "flights_from" => Self::FlightsFrom {
                origin: required_str(intent, entities, "origin")?,
            },
            "flights_to" => Self::FlightsTo {
                destination: required_str(intent, entities, "destination")?,
            },
            "passenger_journeys" => Self::PassengerJourneys {
                record_locator: required_str(intent, entities, "record_locator")?,
            },
            "journey_flight" => Self::JourneyFlight {
                feedback_id: required_str(intent, entities, "feedback_id")?,
            },
            "flights_between" => Self::FlightsBetween {
                origin: required_str(intent, entities, "origin")?,
                destination: required_str(intent, entities, "destination")?,
            },
            "passengers_on_flight" => Self::PassengersOnFlight {
                flight_number: required_str(intent, entities, "flight_number")?,
            },
            "flights_by_fleet" => Self::FlightsByFleet {
                fleet_type: required_str(intent, entities, "fleet_type")?,
            },
            "similar_nodes" => Self::SimilarNodes {
                embedding_name: required_str(intent, entities, "embedding_name")?,
                label: required_str(intent, entities, "label")?,
                node_eid: required_str(intent, entities, "node_eid")?,
                k: optional_int(intent, entities, "k", DEFAULT_SIMILAR_K)?,
            },
            _ => return Ok(None),
        };
        Ok(Some(parsed))
    }
}

fn required_str(intent: &str, entities: &Map<String, Value>, key: &'static str) -> Result<String> {
    match entities.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(RetrievalError::InvalidEntity {
            intent: intent.to_string(),
            key,
        }
        .into()),
        None => Err(RetrievalError::MissingEntity {
            intent: intent.to_string(),
            key,
        }
        .into()),
    }
}

fn optional_int(
    intent: &str,
    entities: &Map<String, Value>,
    key: &'static str,
    default: i64,
) -> Result<i64> {
    match entities.get(key) {
        None => Ok(default),
        Some(value) => value.as_i64().ok_or_else(|| {
            RetrievalError::InvalidEntity {
                intent: intent.to_string(),
                key,
            }
            .into()
        }),
    }
}
