//! GraphStore trait definition
//!
//! The abstract interface this crate requires from the property graph store.
//! Minimal by design: one parameterized query execution method, so the
//! whole retrieval layer can be tested against a stub and the backend swapped.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Parameter list for a Cypher query: `(name, JSON value)` pairs.
///
/// JSON is the neutral interchange shape here; the real client converts these
/// to Bolt values, the test stub records them verbatim.
pub type Params = Vec<(&'static str, Value)>;

/// Abstract interface for graph database query execution.
///
/// Implementations must be thread-safe (`Send + Sync`) to be shared via
/// `Arc<dyn GraphStore>`.
///
/// # Contract
///
/// Each call is one self-contained round trip: the connection is acquired,
/// used, and released inside `run`; nothing is held across calls. There is no
/// retry, timeout, or error translation; a failed round trip surfaces as the
/// driver's own error and fails the enclosing retrieval call.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute a parameterized Cypher query and materialize the full result.
    ///
    /// Returns one JSON object per row, keyed by the query's RETURN aliases.
    /// A keyed MATCH that finds nothing yields an empty vector, not an error.
    async fn run(&self, cypher: &str, params: Params) -> Result<Vec<Value>>;
}
