//! [`TripleStoreService`]: the facade callers use instead of a backend.
//!
//! Every mutation goes to the wrapped [`TripleStorePort`] first. When an
//! [`EventBus`] is wired, each mutated triple is then published on its
//! [`ChangeTopic`] with the triple's N-Triples line as payload.

use std::sync::Arc;

use bytes::Bytes;
use ontostore_core::{
  Graph, Iri,
  bus::{Callback, EventBus},
  event::{ChangeTopic, DEFAULT_GRAPH_SEGMENT, OntologyEvent, TOPIC_DOMAIN},
  graph::TriplePattern,
  io::RdfFormat,
  query::QueryResult,
  store::TripleStorePort,
};

use crate::{
  Error, Result,
  error::store_error,
};

/// The store's own bookkeeping ontology, inserted on construction.
pub const INTERNAL_SCHEMA_TTL: &str = include_str!("internal_schema.ttl");

pub struct TripleStoreService<S> {
  store: S,
  bus:   Option<Arc<dyn EventBus>>,
}

impl<S: TripleStorePort> TripleStoreService<S> {
  /// Wrap `store` and load the internal ontology into it.
  ///
  /// Loading is idempotent, so constructing a service against a store that
  /// already holds the ontology changes nothing.
  pub async fn new(store: S) -> Result<Self> {
    let service = Self { store, bus: None };
    let schema = Graph::parse(INTERNAL_SCHEMA_TTL, RdfFormat::Turtle)?;
    service.insert(&schema).await?;
    Ok(service)
  }

  /// Publish change events on `bus` from now on.
  pub fn with_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
    self.bus = Some(bus);
    self
  }

  /// The wrapped backend, for operations the facade does not expose.
  pub fn store(&self) -> &S { &self.store }

  // ── Mutations ─────────────────────────────────────────────────────────────

  pub async fn insert(&self, triples: &Graph) -> Result<()> {
    self.store.insert(triples, None).await.map_err(store_error)?;
    self.publish(OntologyEvent::Insert, triples)
  }

  pub async fn remove(&self, triples: &Graph) -> Result<()> {
    self.store.remove(triples, None).await.map_err(store_error)?;
    self.publish(OntologyEvent::Delete, triples)
  }

  /// Publish one event per triple. The store has already been mutated, so a
  /// failure here leaves the change applied but unannounced.
  fn publish(&self, event: OntologyEvent, triples: &Graph) -> Result<()> {
    let Some(bus) = &self.bus else {
      return Ok(());
    };
    for triple in triples {
      let topic = ChangeTopic::for_triple(event, DEFAULT_GRAPH_SEGMENT, triple);
      let payload = format!("{triple}\n");
      tracing::debug!(%topic, triple = %triple, "publishing triple");
      if let Err(e) = bus.publish(TOPIC_DOMAIN, topic.as_str(), Bytes::from(payload)) {
        tracing::error!(error = %e, %topic, "failed to publish triple");
        return Err(Error::Bus(e));
      }
    }
    Ok(())
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  /// Register `callback` for changes matching `pattern`. `None` positions
  /// and a `None` event match anything.
  pub fn subscribe(
    &self,
    pattern: &TriplePattern,
    event: Option<OntologyEvent>,
    callback: Callback,
  ) -> Result<()> {
    let bus = self.bus.as_ref().ok_or(Error::BusNotWired)?;
    let topic = ChangeTopic::pattern(event, pattern);
    tracing::debug!(%topic, "subscribing");
    bus
      .consume(TOPIC_DOMAIN, topic.as_str(), callback)
      .map_err(Error::Bus)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn get(&self) -> Result<Graph> {
    self.store.get().await.map_err(store_error)
  }

  pub async fn query(&self, sparql: &str) -> Result<QueryResult> {
    self.store.query(sparql).await.map_err(store_error)
  }

  pub async fn query_view(&self, view: &str, sparql: &str) -> Result<QueryResult> {
    self.store.query_view(view, sparql).await.map_err(store_error)
  }

  pub async fn get_subject_graph(&self, subject: &Iri) -> Result<Graph> {
    self.store.get_subject_graph(subject).await.map_err(store_error)
  }
}
