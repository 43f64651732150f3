//! Flightgraph
//!
//! A retrieval layer over a Neo4j property graph of airline operational data:
//! - A fixed catalog of parameterized Cypher queries (baseline retriever)
//! - Node-embedding training (random-walk skip-gram / GraphSAGE) with
//!   per-label vector indexes and top-k similarity search
//! - A single intent-dispatch façade unifying both

pub mod baseline;
pub mod embedding;
pub mod error;
pub mod neo4j;
pub mod retriever;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub neo4j: Neo4jYamlConfig,
    pub embedding: EmbeddingConfig,
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "flightgraph123".into(),
        }
    }
}

/// Embedding training configuration.
///
/// Used both as a YAML section and as the runtime config handed to the
/// training strategies. Defaults suit an offline batch run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Output vector dimensionality (also the vector index dimensionality)
    pub dim: usize,
    /// Random-walk length (steps per walk)
    pub walk_length: usize,
    /// Number of walks started from every node
    pub walks_per_node: usize,
    /// Worker threads for walk generation
    pub workers: usize,
    /// Skip-gram context window
    pub window: usize,
    /// Skip-gram training passes over the generated pairs
    pub walk_epochs: usize,
    /// Negative samples per positive pair
    pub negatives: usize,
    /// Skip-gram SGD learning rate
    pub walk_lr: f64,
    /// GraphSAGE hidden layer width
    pub sage_hidden: usize,
    /// GraphSAGE training epochs
    pub sage_epochs: usize,
    /// GraphSAGE AdamW learning rate
    pub sage_lr: f64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dim: 128,
            walk_length: 10,
            walks_per_node: 50,
            workers: 2,
            window: 10,
            walk_epochs: 5,
            negatives: 5,
            walk_lr: 0.025,
            sage_hidden: 128,
            sage_epochs: 50,
            sage_lr: 0.01,
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub embedding: EmbeddingConfig,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let mut embedding = yaml.embedding;
        if let Some(dim) = std::env::var("EMBED_DIM")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            embedding.dim = dim;
        }

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            embedding,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_config_loading() {
        let yaml = r#"
neo4j:
  uri: bolt://db:7687
  user: admin
  password: secret

embedding:
  dim: 64
  walk_length: 5
  walks_per_node: 10
"#;
        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.neo4j.uri, "bolt://db:7687");
        assert_eq!(config.neo4j.user, "admin");
        assert_eq!(config.embedding.dim, 64);
        assert_eq!(config.embedding.walk_length, 5);
        assert_eq!(config.embedding.walks_per_node, 10);
        // Unspecified fields keep their defaults
        assert_eq!(config.embedding.window, 10);
        assert_eq!(config.embedding.sage_epochs, 50);
    }

    #[test]
    fn test_yaml_defaults() {
        let config = YamlConfig::default();
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.embedding.dim, 128);
        assert_eq!(config.embedding.walk_length, 10);
        assert_eq!(config.embedding.walks_per_node, 50);
        assert_eq!(config.embedding.workers, 2);
        assert_eq!(config.embedding.sage_hidden, 128);
    }

    /// Combined test for YAML file loading and env var overrides.
    /// Runs as a single test to avoid parallel env var race conditions.
    #[test]
    fn test_yaml_and_env_lifecycle() {
        fn clear_env() {
            for var in &["NEO4J_URI", "NEO4J_USER", "NEO4J_PASSWORD", "EMBED_DIM"] {
                std::env::remove_var(var);
            }
        }

        // --- Phase 1: YAML values loaded correctly ---
        let yaml = r#"
neo4j:
  uri: bolt://yaml-host:7687
  user: yaml-user
  password: yaml-pass
embedding:
  dim: 32
"#;
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&file_path).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        clear_env();

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://yaml-host:7687");
        assert_eq!(config.neo4j_user, "yaml-user");
        assert_eq!(config.embedding.dim, 32);

        // --- Phase 2: Env vars override YAML ---
        std::env::set_var("NEO4J_URI", "bolt://env-host:7687");
        std::env::set_var("EMBED_DIM", "16");

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://env-host:7687");
        assert_eq!(config.embedding.dim, 16);
        // YAML value still used where no env override
        assert_eq!(config.neo4j_user, "yaml-user");

        clear_env();

        // --- Phase 3: No YAML file → defaults ---
        let nonexistent = Path::new("/tmp/nonexistent-flightgraph-config.yaml");
        let config = Config::from_yaml_and_env(Some(nonexistent)).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://localhost:7687");
        assert_eq!(config.embedding.dim, 128);
    }
}
