//! In-memory stub implementation of GraphStore for testing.
//!
//! Records every `(cypher, params)` call, serves canned rows matched by query
//! fragment, and can be armed to fail on a matching query to simulate store
//! errors. Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::traits::{GraphStore, Params};
use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

/// One recorded query execution.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub cypher: String,
    pub params: Vec<(String, Value)>,
}

impl RecordedCall {
    /// Look up a recorded parameter by name.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Call-recording stub of [`GraphStore`] for tests.
///
/// Responses are matched in insertion order by substring of the query text;
/// unmatched queries return an empty row set, mirroring a keyed MATCH that
/// finds nothing.
#[derive(Default)]
pub struct StubGraphStore {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<Vec<(String, Vec<Value>)>>,
    failures: Mutex<Vec<String>>,
}

impl StubGraphStore {
    /// Create a new empty stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for any query whose text contains `fragment`.
    pub fn with_rows(self, fragment: &str, rows: Vec<Value>) -> Self {
        self.responses
            .try_lock()
            .expect("stub configured after sharing")
            .push((fragment.to_string(), rows));
        self
    }

    /// Fail any query whose text contains `fragment`.
    pub fn failing_on(self, fragment: &str) -> Self {
        self.failures
            .try_lock()
            .expect("stub configured after sharing")
            .push(fragment.to_string());
        self
    }

    /// All calls recorded so far.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Number of recorded calls.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Recorded calls whose query text contains `fragment`.
    pub async fn calls_matching(&self, fragment: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.cypher.contains(fragment))
            .cloned()
            .collect()
    }

    /// Number of recorded mutating calls (SET / CREATE statements).
    pub async fn write_count(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.cypher.contains("SET ") || c.cypher.contains("CREATE "))
            .count()
    }
}

#[async_trait]
impl GraphStore for StubGraphStore {
    async fn run(&self, cypher: &str, params: Params) -> Result<Vec<Value>> {
        self.calls.lock().await.push(RecordedCall {
            cypher: cypher.to_string(),
            params: params
                .into_iter()
                .map(|(n, v)| (n.to_string(), v))
                .collect(),
        });

        for fragment in self.failures.lock().await.iter() {
            if cypher.contains(fragment.as_str()) {
                bail!("stub store failure on query matching '{fragment}'");
            }
        }

        for (fragment, rows) in self.responses.lock().await.iter() {
            if cypher.contains(fragment.as_str()) {
                return Ok(rows.clone());
            }
        }

        Ok(Vec::new())
    }
}
