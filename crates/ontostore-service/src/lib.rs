//! Service layer for ontostore.
//!
//! Wraps any [`TripleStorePort`](ontostore_core::store::TripleStorePort) in a
//! [`TripleStoreService`] that announces changes on an event bus, and keeps
//! ontology files on disk in sync with the store through a
//! [`SchemaSynchronizer`].

pub mod error;
pub mod schema;
pub mod service;

pub use error::{Error, Result};
pub use schema::{SchemaCache, SchemaLoadReport, SchemaOutcome, SchemaRecord, SchemaSynchronizer};
pub use service::TripleStoreService;

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Environment variables with this prefix override the config file, e.g.
/// `ONTOSTORE_ENDPOINT_URL`.
pub const ENV_PREFIX: &str = "ONTOSTORE";

/// Runtime configuration, deserialised from `ontostore.toml`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ServiceConfig {
  /// Base URL of the SPARQL endpoint; `query`, `update` and `store` routes
  /// hang off it.
  #[serde(default = "default_endpoint_url")]
  pub endpoint_url: String,
  /// Per-request timeout.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  /// Ontology files `sync` loads when given none on the command line.
  #[serde(default)]
  pub schema_paths: Vec<PathBuf>,
}

fn default_endpoint_url() -> String { "http://localhost:7878".to_owned() }

fn default_timeout_secs() -> u64 { 60 }

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      endpoint_url: default_endpoint_url(),
      timeout_secs: default_timeout_secs(),
      schema_paths: Vec::new(),
    }
  }
}

impl ServiceConfig {
  /// Read `path` (optional) layered under `ONTOSTORE_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("schema_paths"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}
