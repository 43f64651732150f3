//! Integration tests for flightgraph
//!
//! These tests require Neo4j to be running.
//! Run with: cargo test --test integration_tests

use flightgraph::neo4j::{GraphStore, Neo4jClient};
use flightgraph::retriever::GraphRetriever;
use flightgraph::{Config, EmbeddingConfig};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Get test configuration from environment or use defaults
fn test_config() -> Config {
    Config {
        neo4j_uri: std::env::var("NEO4J_URI").unwrap_or_else(|_| "bolt://localhost:7687".into()),
        neo4j_user: std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".into()),
        neo4j_password: std::env::var("NEO4J_PASSWORD")
            .unwrap_or_else(|_| "flightgraph123".into()),
        embedding: EmbeddingConfig {
            dim: 16,
            walks_per_node: 5,
            walk_epochs: 1,
            sage_epochs: 5,
            ..Default::default()
        },
    }
}

/// Check if Neo4j is available
async fn neo4j_available() -> bool {
    let config = test_config();
    let ok = neo4rs::Graph::new(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await
    .is_ok();

    if !ok {
        eprintln!("Neo4j not available at {}", config.neo4j_uri);
    }
    ok
}

async fn test_client() -> Arc<Neo4jClient> {
    let config = test_config();
    Arc::new(
        Neo4jClient::new(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
            .await
            .expect("connect"),
    )
}

fn entities(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Seed a minimal route: two airports and one flight between them.
/// Uses MERGE so reruns don't duplicate, and a test-only marker property
/// so cleanup can't touch real data.
async fn seed_route(client: &Arc<Neo4jClient>, origin: &str, dest: &str, flight: &str) {
    client
        .run(
            r#"
            MERGE (o:Airport {station_code: $orig}) SET o._fg_test = true
            MERGE (d:Airport {station_code: $dest}) SET d._fg_test = true
            MERGE (f:Flight {flight_number: $fnum}) SET f._fg_test = true
            MERGE (f)-[:DEPARTS_FROM]->(o)
            MERGE (f)-[:ARRIVES_AT]->(d)
            "#,
            vec![
                ("orig", json!(origin)),
                ("dest", json!(dest)),
                ("fnum", json!(flight)),
            ],
        )
        .await
        .expect("seed");
}

async fn cleanup(client: &Arc<Neo4jClient>) {
    client
        .run("MATCH (n) WHERE n._fg_test = true DETACH DELETE n", vec![])
        .await
        .expect("cleanup");
}

#[tokio::test]
async fn test_flights_between_live() {
    if !neo4j_available().await {
        eprintln!("Skipping test: Neo4j not available");
        return;
    }

    let client = test_client().await;
    seed_route(&client, "TJF", "TLX", "FG901").await;

    let retriever = GraphRetriever::with_store(client.clone(), test_config().embedding);
    let result = retriever
        .retrieve(
            "flights_between",
            &entities(&[("origin", json!("TJF")), ("destination", json!("TLX"))]),
        )
        .await
        .expect("retrieve");

    let rows = result.as_array().expect("array result");
    assert!(
        rows.iter().any(|r| r["flight"] == json!("FG901")),
        "seeded flight not found in {rows:?}"
    );

    cleanup(&client).await;
}

#[tokio::test]
async fn test_unknown_intent_live() {
    if !neo4j_available().await {
        eprintln!("Skipping test: Neo4j not available");
        return;
    }

    let client = test_client().await;
    let retriever = GraphRetriever::with_store(client, test_config().embedding);

    let result = retriever
        .retrieve("weather_at_airport", &Map::new())
        .await
        .expect("sentinel, not error");
    assert_eq!(result, json!({"error": "Unknown intent"}));
}

#[tokio::test]
async fn test_build_embeddings_live() {
    if !neo4j_available().await {
        eprintln!("Skipping test: Neo4j not available");
        return;
    }

    let client = test_client().await;
    seed_route(&client, "TAA", "TBB", "FG902").await;

    let retriever = GraphRetriever::with_store(client.clone(), test_config().embedding);
    let status = retriever
        .build_embeddings("node2vec")
        .await
        .expect("build embeddings");
    assert_eq!(status, "Embedding model 'node2vec_embed' trained and indexed.");

    // Seeded nodes now carry a vector of the configured dimensionality
    let rows = client
        .run(
            r#"
            MATCH (f:Flight {flight_number: $fnum})
            RETURN size(f.node2vec_embed) AS dim
            "#,
            vec![("fnum", json!("FG902"))],
        )
        .await
        .expect("read back");
    assert_eq!(rows[0]["dim"], json!(16));

    cleanup(&client).await;
}
