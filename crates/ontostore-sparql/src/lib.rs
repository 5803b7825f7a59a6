//! SPARQL 1.1 Protocol backend for the ontostore triple-store layer.
//!
//! [`SparqlStore`] speaks plain HTTP to an endpoint exposing `query`, `update`
//! and `store` routes (Oxigraph's layout). Each call is one request awaited to
//! completion; nothing is retried.

mod results;
mod store;
mod update;

pub mod error;

pub use error::{Error, Result};
pub use store::{DIRECT_BATCH_LIMIT, SparqlStore};

#[cfg(test)]
mod tests;
