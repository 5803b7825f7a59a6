//! Error type for `ontostore-sparql`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] ontostore_core::Error),

  /// The construction-time probe failed; no store handle was produced.
  #[error("cannot reach SPARQL endpoint at {url}: {source}")]
  Connection {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unexpected content type: {0:?}")]
  UnexpectedContentType(String),

  #[error("malformed SPARQL JSON results: {0}")]
  Json(#[from] serde_json::Error),

  #[error("bulk {operation} into named graph {graph} is not supported")]
  NamedGraphBulkUnsupported {
    operation: &'static str,
    graph:     String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
