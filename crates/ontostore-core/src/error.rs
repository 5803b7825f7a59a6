//! Error types for `ontostore-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("parse error: {0}")]
  Parse(#[from] rio_turtle::TurtleError),

  #[error("unsupported RDF construct: {0}")]
  Unsupported(&'static str),

  #[error("not an absolute IRI: {0:?}")]
  RelativeIri(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
