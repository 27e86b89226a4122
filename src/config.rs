//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults (local Milvus and Neo4j, OpenAI models)
//! 2. User config: `~/.config/graphrag/config.toml` (XDG) or platform config dir
//! 3. Project config: `.graphrag.toml`
//! 4. Environment variables: `GRAPHRAG_*`, nested with `__`
//!    (e.g. `GRAPHRAG_COLLECTION__TOP_K=5`)
//! 5. Well-known variables: `MILVUS_HOST`, `MILVUS_PORT`, `NEO4J_URI`,
//!    `NEO4J_USER`, `NEO4J_PASSWORD`, `OPENAI_API_KEY`
//!
//! # Example
//!
//! ```toml
//! [milvus]
//! host = "milvus.internal"
//! port = 19530
//! timeout_secs = 30
//!
//! [neo4j]
//! uri = "bolt://neo4j.internal:7687"
//! user = "neo4j"
//! password = "secret"
//!
//! [collection]
//! name = "papers"
//! metric = "L2"
//! nlist = 1024
//! nprobe = 10
//! top_k = 3
//! ```
//!
//! The configuration is loaded once at startup and handed to every component
//! constructor; nothing else reads the process environment.

use std::ops::Deref;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::vector::{IndexType, MetricType};

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub milvus: MilvusConfig,
    pub neo4j: Neo4jConfig,
    pub openai: OpenAiConfig,
    pub collection: CollectionConfig,
    pub graph_qa: GraphQaConfig,
}

/// Milvus vector store connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MilvusConfig {
    /// Host name, or a full `http(s)://` base URL.
    pub host: String,
    /// REST port (Milvus serves its v2 REST API on the gRPC port).
    pub port: u16,
    /// Bearer token (`user:password` or an API key) when auth is enabled.
    pub token: Option<String>,
    /// Target database; Milvus uses `default` when unset.
    pub database: Option<String>,
    /// Per-request timeout for REST calls.
    pub timeout_secs: u64,
}

impl Default for MilvusConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 19530,
            token: None,
            database: None,
            timeout_secs: 30,
        }
    }
}

impl MilvusConfig {
    /// Base URL of the REST endpoint, without a trailing slash.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}:{}", host, self.port)
        }
    }
}

/// Neo4j graph store connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password123".to_string(),
        }
    }
}

/// OpenAI chat and embedding models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key. Requests fail with an LLM error when unset.
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f32,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

/// Vector collection schema, index and search parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Collection used by the CLI when `--collection` is not given.
    pub name: String,
    /// Embedding dimension; must match the embedding model.
    pub dimension: usize,
    pub metric: MetricType,
    pub index_type: IndexType,
    /// Number of IVF clusters built by the index.
    pub nlist: u32,
    /// Number of IVF clusters probed per search.
    pub nprobe: u32,
    /// Passages returned by the vector leg.
    pub top_k: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: "sample_collection".to_string(),
            dimension: 1536,
            metric: MetricType::L2,
            index_type: IndexType::IvfFlat,
            nlist: 1024,
            nprobe: 10,
            top_k: 3,
        }
    }
}

/// Natural-language-to-Cypher chain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQaConfig {
    /// Maximum number of result rows handed to the answer prompt.
    pub top_k: usize,
    /// Execute generated statements that contain write clauses.
    pub allow_writes: bool,
}

impl Default for GraphQaConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            allow_writes: false,
        }
    }
}

/// Well-known environment variables and the config keys they map to.
const WELL_KNOWN_ENV: &[(&str, &str)] = &[
    ("MILVUS_HOST", "milvus.host"),
    ("MILVUS_PORT", "milvus.port"),
    ("NEO4J_URI", "neo4j.uri"),
    ("NEO4J_USER", "neo4j.user"),
    ("NEO4J_PASSWORD", "neo4j.password"),
    ("OPENAI_API_KEY", "openai.api_key"),
];

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Builds the layered figment without extracting it.
    pub fn figment() -> Figment {
        let user_config = Self::user_config_path();

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(user_config))
            .merge(Toml::file(".graphrag.toml"))
            .merge(Env::prefixed("GRAPHRAG_").split("__"))
            .merge(
                Env::raw()
                    .only(&WELL_KNOWN_ENV.iter().map(|(var, _)| *var).collect::<Vec<_>>())
                    .map(|var| {
                        WELL_KNOWN_ENV
                            .iter()
                            .find(|(name, _)| var.as_str().eq_ignore_ascii_case(name))
                            .map(|(_, key)| (*key).into())
                            .unwrap_or_else(|| var.as_str().into())
                    }),
            )
    }

    /// Extracts a config from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(ConfigError::from)
    }

    /// User config path: ~/.config/graphrag/config.toml (XDG) or platform config dir.
    fn user_config_path() -> std::path::PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("graphrag").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("graphrag").join("config.toml"))
            .unwrap_or_default()
    }
}
