//! The `TripleStorePort` trait.
//!
//! The trait is implemented by storage backends (e.g. `ontostore-sparql`).
//! Higher layers (`ontostore-service`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  event::OntologyEvent,
  graph::{Graph, TriplePattern},
  query::QueryResult,
  term::{Iri, Triple},
};

/// Abstraction over a triple-store backend.
///
/// `graph` arguments select a named graph; `None` is the default graph.
/// Inserting or removing the same triples twice is a no-op at the set level.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait TripleStorePort: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Add `triples` to the store. An empty graph is a no-op.
  fn insert<'a>(
    &'a self,
    triples: &'a Graph,
    graph: Option<&'a Iri>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove `triples` from the store. An empty graph is a no-op.
  fn remove<'a>(
    &'a self,
    triples: &'a Graph,
    graph: Option<&'a Iri>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Return the entire store contents. Expensive; meant for small stores.
  fn get(&self) -> impl Future<Output = Result<Graph, Self::Error>> + Send + '_;

  /// Run a SPARQL query or update.
  fn query<'a>(
    &'a self,
    sparql: &'a str,
  ) -> impl Future<Output = Result<QueryResult, Self::Error>> + Send + 'a;

  /// Run a SPARQL query scoped to `view`.
  fn query_view<'a>(
    &'a self,
    view: &'a str,
    sparql: &'a str,
  ) -> impl Future<Output = Result<QueryResult, Self::Error>> + Send + 'a;

  /// All triples whose subject is `subject`.
  fn get_subject_graph<'a>(
    &'a self,
    subject: &'a Iri,
  ) -> impl Future<Output = Result<Graph, Self::Error>> + Send + 'a;

  // ── Extension points ──────────────────────────────────────────────────

  /// Called when a triple matching a registered view changes. Backends that
  /// materialise views override this; the default does nothing.
  fn handle_view_event(
    &self,
    _view: &TriplePattern,
    _event: OntologyEvent,
    _triple: &Triple,
  ) {
  }
}
