//! Graph retriever façade.
//!
//! One entry point over both retrieval strategies: [`GraphRetriever::retrieve`]
//! parses an `(intent, entities)` pair and dispatches to the baseline query
//! catalog or the vector-similarity path, and
//! [`GraphRetriever::build_embeddings`] drives the full embedding lifecycle
//! (export, train, store, index).

pub mod intent;

pub use intent::{Intent, DEFAULT_SIMILAR_K};

use crate::baseline::BaselineRetriever;
use crate::embedding::{EmbeddingMethod, EmbeddingRetriever};
use crate::neo4j::{GraphStore, Neo4jClient};
use crate::{Config, EmbeddingConfig};
use anyhow::Result;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Labels that get a vector index after every training run.
///
/// All four are indexed unconditionally, whether or not nodes of that label
/// exist yet, since CREATE VECTOR INDEX is declarative and idempotent.
pub const INDEXED_LABELS: [&str; 4] = ["Passenger", "Journey", "Flight", "Airport"];

/// Unified retrieval interface over the airline operations graph.
pub struct GraphRetriever {
    baseline: BaselineRetriever,
    embedder: EmbeddingRetriever,
}

impl GraphRetriever {
    /// Connect to the store described by `config`.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client =
            Neo4jClient::new(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
                .await?;
        Ok(Self::with_store(
            Arc::new(client),
            config.embedding.clone(),
        ))
    }

    /// Build a retriever over an existing store handle.
    pub fn with_store(store: Arc<dyn GraphStore>, embedding: EmbeddingConfig) -> Self {
        Self {
            baseline: BaselineRetriever::new(store.clone()),
            embedder: EmbeddingRetriever::new(store, embedding),
        }
    }

    /// Answer a retrieval request.
    ///
    /// An intent name outside the catalog yields the sentinel value
    /// `{"error": "Unknown intent"}`, successfully, so conversational callers
    /// can fall through to other strategies. A known intent with a missing or
    /// wrong-typed entity is a caller bug and fails instead.
    pub async fn retrieve(&self, intent: &str, entities: &Map<String, Value>) -> Result<Value> {
        let parsed = match Intent::parse(intent, entities)? {
            Some(parsed) => parsed,
            None => {
                tracing::warn!(intent, "unknown intent");
                return Ok(json!({"error": "Unknown intent"}));
            }
        };

        tracing::debug!(intent, "dispatching");
        let rows = match parsed {
            Intent::FlightsFrom { origin } => {
                serde_json::to_value(self.baseline.flights_from_airport(&origin).await?)?
            }
            Intent::FlightsTo { destination } => {
                serde_json::to_value(self.baseline.flights_to_airport(&destination).await?)?
            }
            Intent::PassengerJourneys { record_locator } => {
                serde_json::to_value(self.baseline.passenger_journeys(&record_locator).await?)?
            }
            Intent::JourneyFlight { feedback_id } => {
                serde_json::to_value(self.baseline.journey_flight(&feedback_id).await?)?
            }
            Intent::FlightsBetween {
                origin,
                destination,
            } => serde_json::to_value(
                self.baseline.flights_between(&origin, &destination).await?,
            )?,
            Intent::PassengersOnFlight { flight_number } => {
                serde_json::to_value(self.baseline.passengers_on_flight(&flight_number).await?)?
            }
            Intent::FlightsByFleet { fleet_type } => {
                serde_json::to_value(self.baseline.flights_by_fleet(&fleet_type).await?)?
            }
            Intent::SimilarNodes {
                embedding_name,
                label,
                node_eid,
                k,
            } => serde_json::to_value(
                self.embedder
                    .query_similar(&embedding_name, &label, &node_eid, k)
                    .await?,
            )?,
        };
        Ok(rows)
    }

    /// Run the full embedding lifecycle for one training method.
    ///
    /// Export the graph, train, write one vector property per node, then
    /// declare the vector index for every label in [`INDEXED_LABELS`]. The
    /// method name is validated before the store is touched, so a bad name
    /// costs nothing. Training replaces any previous vectors under the same
    /// property name; the two methods' properties never collide.
    pub async fn build_embeddings(&self, method: &str) -> Result<String> {
        let method: EmbeddingMethod = method.parse()?;
        let name = method.property_name();

        let graph = self.embedder.export_graph().await?;
        tracing::info!(
            method = name,
            nodes = graph.node_count(),
            "training embeddings"
        );

        let embeddings = method.train(&graph, self.embedder.config())?;
        self.embedder.store_embeddings(name, &embeddings).await?;

        for label in INDEXED_LABELS {
            self.embedder.create_vector_index(name, label).await?;
        }

        Ok(format!("Embedding model '{name}' trained and indexed."))
    }
}
