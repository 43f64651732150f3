//! Embedding retriever: the train, store, index, query lifecycle.
//!
//! Exports the full graph as an edge list, trains one of two node-embedding
//! strategies, writes the vectors back as node properties, maintains one
//! vector index per (label, embedding name) pair, and answers top-k cosine
//! similarity queries through those indexes.

pub mod graph;
pub mod node2vec;
pub mod sage;

pub use graph::ExportedGraph;

use crate::error::RetrievalError;
use crate::neo4j::models::{rows_into, SimilarRow};
use crate::neo4j::GraphStore;
use crate::EmbeddingConfig;
use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

/// Node embeddings keyed by store element id.
pub type NodeEmbeddings = HashMap<String, Vec<f32>>;

// ============================================================================
// Embedding method: closed set of training strategies
// ============================================================================

/// The two interchangeable training strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingMethod {
    /// Random-walk co-occurrence (skip-gram over uniform walks)
    Node2Vec,
    /// Two-layer mean-aggregation message-passing encoder
    GraphSage,
}

impl EmbeddingMethod {
    /// The node property (and index) name this method's vectors live under.
    ///
    /// These names are external contract: existing data and indexes are
    /// addressed by them.
    pub fn property_name(self) -> &'static str {
        match self {
            Self::Node2Vec => "node2vec_embed",
            Self::GraphSage => "sage_embed",
        }
    }

    /// Train this strategy over an exported graph.
    ///
    /// Returns one `cfg.dim`-length vector per node. CPU-bound; run it off
    /// the async path if that matters to the caller.
    pub fn train(self, graph: &ExportedGraph, cfg: &EmbeddingConfig) -> Result<NodeEmbeddings> {
        match self {
            Self::Node2Vec => node2vec::train(graph, cfg),
            Self::GraphSage => sage::train(graph, cfg),
        }
    }
}

impl FromStr for EmbeddingMethod {
    type Err = RetrievalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node2vec" => Ok(Self::Node2Vec),
            "graphsage" => Ok(Self::GraphSage),
            other => Err(RetrievalError::UnknownMethod(other.to_string())),
        }
    }
}

// ============================================================================
// Index naming
// ============================================================================

/// Derive the vector index name for a (label, embedding name) pair.
///
/// `{label_lowercased}_{embedding_name}_index` is part of the external
/// contract; existing indexes are addressed by this exact scheme.
pub fn index_name(label: &str, name: &str) -> String {
    format!("{}_{}_index", label.to_lowercase(), name)
}

// ============================================================================
// Embedding retriever
// ============================================================================

#[derive(Debug, Deserialize)]
struct EdgeRow {
    src: String,
    dst: String,
}

/// Embedding lifecycle operations over the graph store.
pub struct EmbeddingRetriever {
    store: Arc<dyn GraphStore>,
    config: EmbeddingConfig,
}

impl EmbeddingRetriever {
    pub fn new(store: Arc<dyn GraphStore>, config: EmbeddingConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    /// Read every directed edge in the graph and materialize it in memory.
    ///
    /// Full scan: cost and memory scale with total edge count. There is no
    /// incremental export.
    pub async fn export_graph(&self) -> Result<ExportedGraph> {
        let rows = self
            .store
            .run(
                r#"
                MATCH (a)-[]->(b)
                RETURN elementId(a) AS src, elementId(b) AS dst
                "#,
                vec![],
            )
            .await?;

        let mut graph = ExportedGraph::new();
        for row in rows_into::<EdgeRow>(rows)? {
            graph.add_edge(&row.src, &row.dst);
        }

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "exported graph"
        );
        Ok(graph)
    }

    /// Write each vector onto its node as a property named `name`.
    ///
    /// One round trip per node, no batching; this is an offline/batch path,
    /// not request-serving.
    pub async fn store_embeddings(&self, name: &str, embeddings: &NodeEmbeddings) -> Result<()> {
        let cypher = format!(
            r#"
            MATCH (n)
            WHERE elementId(n) = $eid
            SET n.{name} = $vec
            "#
        );

        for (eid, vector) in embeddings {
            self.store
                .run(&cypher, vec![("eid", json!(eid)), ("vec", json!(vector))])
                .await?;
        }

        tracing::info!(property = name, count = embeddings.len(), "stored embeddings");
        Ok(())
    }

    /// Declare (idempotently) the cosine vector index for `name` on `label`.
    pub async fn create_vector_index(&self, name: &str, label: &str) -> Result<()> {
        let cypher = format!(
            r#"
            CREATE VECTOR INDEX {index} IF NOT EXISTS
            FOR (n:{label})
            ON (n.{name})
            OPTIONS {{
                indexConfig: {{
                    `vector.dimensions`: {dim},
                    `vector.similarity_function`: 'cosine'
                }}
            }}
            "#,
            index = index_name(label, name),
            dim = self.config.dim,
        );

        self.store.run(&cypher, vec![]).await?;
        Ok(())
    }

    /// Top-k nearest neighbors of a node, through the (label, name) index.
    ///
    /// Fails if the index does not exist or the node lacks the property;
    /// the store's error propagates untranslated.
    pub async fn query_similar(
        &self,
        name: &str,
        label: &str,
        node_eid: &str,
        k: i64,
    ) -> Result<Vec<SimilarRow>> {
        let cypher = format!(
            r#"
            MATCH (n:{label}) WHERE elementId(n) = $eid
            WITH n.{name} AS embed
            CALL db.index.vector.queryNodes('{index}', $k, embed)
            YIELD node, score
            RETURN elementId(node) AS id, score
            "#,
            index = index_name(label, name),
        );

        let rows = self
            .store
            .run(&cypher, vec![("eid", json!(node_eid)), ("k", json!(k))])
            .await?;
        rows_into(rows)
    }
}
