//! Error taxonomy for the retrieval façade.
//!
//! Only the façade's own fatal paths get typed errors; store and driver
//! failures propagate as-is through `anyhow` with no translation, no retry,
//! and no partial results.

use thiserror::Error;

/// Fatal errors raised by the retrieval façade itself.
///
/// Note the asymmetry: an *unknown intent* is not an error at all;
/// `retrieve` answers it with the `{"error": "Unknown intent"}` sentinel value.
/// Unknown embedding methods and malformed entity maps, by contrast, fail the
/// call immediately.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// `build_embeddings` was called with a method name outside the closed set.
    #[error("unknown embedding method '{0}' (expected \"node2vec\" or \"graphsage\")")]
    UnknownMethod(String),

    /// The entity map is missing a key the intent requires.
    #[error("intent '{intent}' requires entity key '{key}'")]
    MissingEntity { intent: String, key: &'static str },

    /// An entity value is present but has the wrong JSON type.
    #[error("entity key '{key}' for intent '{intent}' has the wrong type")]
    InvalidEntity { intent: String, key: &'static str },
}
