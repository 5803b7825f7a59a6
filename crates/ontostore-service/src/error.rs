//! Error type for the service layer.

use std::path::PathBuf;

use ontostore_core::bus::BusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
  #[error("event bus error: {0}")]
  Bus(#[source] BusError),
  #[error("no event bus is wired to this service")]
  BusNotWired,
  #[error(transparent)]
  Core(#[from] ontostore_core::Error),
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("invalid base64 content: {0}")]
  Base64(#[from] base64::DecodeError),
  #[error("content is not valid UTF-8: {0}")]
  Utf8(#[from] std::string::FromUtf8Error),
  #[error("more than one schema record for {0}")]
  DuplicateSchemaRecord(String),
  #[error("malformed schema record {subject}: {reason}")]
  MalformedSchemaRecord { subject: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Box a backend error into [`Error::Store`].
pub(crate) fn store_error<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}
