//! Neo4j client for the airline operations graph

use super::traits::{GraphStore, Params};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use neo4rs::{query, BoltType, Graph};
use serde_json::Value;
use std::sync::Arc;

/// Client for Neo4j query execution.
///
/// Thin wrapper over the neo4rs driver. The driver manages its own connection
/// pool; every [`GraphStore::run`] call checks a connection out for the
/// duration of one query and returns it when the result stream is drained,
/// so a failure mid-stream cannot leak a session.
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        Ok(Self {
            graph: Arc::new(graph),
        })
    }
}

/// Convert a JSON parameter value to its Bolt representation.
///
/// Covers the shapes the query catalog actually binds: strings, integers,
/// floats, booleans, and numeric lists (embedding vectors). Anything else is
/// a programming error in the caller, not a runtime input.
fn to_bolt(value: &Value) -> Result<BoltType> {
    match value {
        Value::Null => Ok(BoltType::Null(neo4rs::BoltNull)),
        Value::Bool(b) => Ok(BoltType::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(BoltType::from(i))
            } else if let Some(f) = n.as_f64() {
                Ok(BoltType::from(f))
            } else {
                bail!("unrepresentable numeric parameter: {n}")
            }
        }
        Value::String(s) => Ok(BoltType::from(s.as_str())),
        Value::Array(items) => {
            let converted: Result<Vec<BoltType>> = items.iter().map(to_bolt).collect();
            Ok(BoltType::List(converted?.into()))
        }
        Value::Object(_) => bail!("object parameters are not supported"),
    }
}

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn run(&self, cypher: &str, params: Params) -> Result<Vec<Value>> {
        let mut q = query(cypher);
        for (name, value) in &params {
            q = q.param(name, to_bolt(value)?);
        }

        tracing::debug!(query = cypher, "executing cypher");

        let mut result = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row.to::<Value>()?);
        }
        Ok(rows)
    }
}
