//! [`SparqlStore`]: the SPARQL 1.1 Protocol implementation of
//! [`TripleStorePort`].

use std::time::Duration;

use ontostore_core::{
  Graph, Iri, Term,
  io::RdfFormat,
  query::QueryResult,
  store::TripleStorePort,
};
use reqwest::{
  Client, Response, StatusCode,
  header::{ACCEPT, CONTENT_TYPE},
};

use crate::{
  Error, Result,
  results::parse_results_json,
  update::{DataUpdate, data_block, is_update},
};

/// Graphs larger than this skip `INSERT DATA` / `DELETE DATA` and go straight
/// to the graph store route.
pub const DIRECT_BATCH_LIMIT: usize = 100_000;

const SPARQL_QUERY: &str = "application/sparql-query";
const SPARQL_UPDATE: &str = "application/sparql-update";
const QUERY_ACCEPT: &str = "application/sparql-results+json, application/n-triples";
const PROBE_QUERY: &str = "SELECT * WHERE { ?s ?p ?o } LIMIT 1";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A triple store reached over the SPARQL 1.1 Protocol.
///
/// Cloning is cheap; the inner [`reqwest::Client`] is reference-counted.
#[derive(Clone)]
pub struct SparqlStore {
  client:          Client,
  base_url:        String,
  query_endpoint:  String,
  update_endpoint: String,
  store_endpoint:  String,
}

impl SparqlStore {
  /// Build a store handle for `base_url` and verify the endpoint answers.
  ///
  /// The probe query runs before this returns, so an unreachable endpoint
  /// fails here with [`Error::Connection`] rather than on first use.
  pub async fn connect(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
    let base_url = base_url.into().trim_end_matches('/').to_owned();
    let client = Client::builder().timeout(timeout).build()?;
    let store = Self {
      client,
      query_endpoint: format!("{base_url}/query"),
      update_endpoint: format!("{base_url}/update"),
      store_endpoint: format!("{base_url}/store"),
      base_url,
    };
    store.probe().await?;
    tracing::info!(endpoint = %store.base_url, "connected to SPARQL endpoint");
    Ok(store)
  }

  pub fn base_url(&self) -> &str { &self.base_url }

  async fn probe(&self) -> Result<()> {
    let connection_error = |source| Error::Connection {
      url: self.base_url.clone(),
      source,
    };
    self
      .client
      .get(&self.query_endpoint)
      .query(&[("query", PROBE_QUERY)])
      .send()
      .await
      .and_then(Response::error_for_status)
      .map_err(connection_error)?;
    Ok(())
  }

  async fn post_update(&self, body: String) -> Result<Response> {
    Ok(
      self
        .client
        .post(&self.update_endpoint)
        .header(CONTENT_TYPE, SPARQL_UPDATE)
        .body(body)
        .send()
        .await?,
    )
  }

  /// Shared body of `insert` / `remove`.
  async fn apply(&self, kind: DataUpdate, triples: &Graph, graph: Option<&Iri>) -> Result<()> {
    if triples.is_empty() {
      return Ok(());
    }
    if triples.len() > DIRECT_BATCH_LIMIT {
      return self.apply_bulk(kind, triples, graph).await;
    }

    let Some(body) = data_block(kind, triples, graph) else {
      return Ok(());
    };
    let response = self.post_update(body).await?;
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
      tracing::debug!(
        operation = kind.name(),
        triples = triples.len(),
        "update rejected as too large, retrying through the graph store"
      );
      return self.apply_bulk(kind, triples, graph).await;
    }
    response.error_for_status()?;
    tracing::debug!(operation = kind.name(), triples = triples.len(), "applied data update");
    Ok(())
  }

  /// Send `triples` as an N-Triples body to the graph store route. Blank-node
  /// triples are dropped: their labels do not survive across requests.
  async fn apply_bulk(
    &self,
    kind: DataUpdate,
    triples: &Graph,
    graph: Option<&Iri>,
  ) -> Result<()> {
    if let Some(graph) = graph {
      return Err(Error::NamedGraphBulkUnsupported {
        operation: kind.name(),
        graph:     graph.as_str().to_owned(),
      });
    }

    let body = triples.without_blank_nodes().to_ntriples();
    self
      .client
      .request(kind.bulk_method(), format!("{}?default", self.store_endpoint))
      .header(CONTENT_TYPE, RdfFormat::NTriples.media_type())
      .body(body)
      .send()
      .await?
      .error_for_status()?;
    tracing::debug!(
      operation = kind.name(),
      triples = triples.len(),
      "applied bulk graph store request"
    );
    Ok(())
  }

  async fn run_query(&self, sparql: &str) -> Result<QueryResult> {
    if is_update(sparql) {
      self.post_update(sparql.to_owned()).await?.error_for_status()?;
      return Ok(QueryResult::Empty);
    }

    let response = self
      .client
      .post(&self.query_endpoint)
      .header(CONTENT_TYPE, SPARQL_QUERY)
      .header(ACCEPT, QUERY_ACCEPT)
      .body(sparql.to_owned())
      .send()
      .await?
      .error_for_status()?;

    let content_type = response
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .unwrap_or_default()
      .to_owned();
    let body = response.text().await?;

    if content_type.contains("sparql-results") {
      parse_results_json(&body)
    } else if let Some(format) = RdfFormat::from_content_type(&content_type) {
      Ok(QueryResult::Graph(Graph::parse(&body, format)?))
    } else {
      Err(Error::UnexpectedContentType(content_type))
    }
  }

  // ── Named graphs ──────────────────────────────────────────────────────────

  pub async fn create_graph(&self, graph: &Iri) -> Result<()> {
    self.run_query(&format!("CREATE GRAPH {graph}")).await?;
    Ok(())
  }

  /// Clear `graph`, or the default graph when `None`.
  pub async fn clear_graph(&self, graph: Option<&Iri>) -> Result<()> {
    let update = match graph {
      None => "CLEAR DEFAULT".to_owned(),
      Some(g) => format!("CLEAR GRAPH {g}"),
    };
    self.run_query(&update).await?;
    Ok(())
  }

  pub async fn drop_graph(&self, graph: &Iri) -> Result<()> {
    self.run_query(&format!("DROP GRAPH {graph}")).await?;
    Ok(())
  }

  /// Every named graph holding at least one triple.
  pub async fn list_graphs(&self) -> Result<Vec<Iri>> {
    let result = self
      .run_query("SELECT DISTINCT ?g WHERE { GRAPH ?g { ?s ?p ?o } }")
      .await?;
    let Some(solutions) = result.into_solutions() else {
      return Ok(Vec::new());
    };
    Ok(
      solutions
        .rows()
        .filter_map(|row| row.get("g").and_then(Term::as_iri).cloned())
        .collect(),
    )
  }
}

// ─── TripleStorePort impl ────────────────────────────────────────────────────

impl TripleStorePort for SparqlStore {
  type Error = Error;

  async fn insert(&self, triples: &Graph, graph: Option<&Iri>) -> Result<()> {
    self.apply(DataUpdate::Insert, triples, graph).await
  }

  async fn remove(&self, triples: &Graph, graph: Option<&Iri>) -> Result<()> {
    self.apply(DataUpdate::Delete, triples, graph).await
  }

  async fn get(&self) -> Result<Graph> {
    let body = self
      .client
      .get(&self.store_endpoint)
      .header(ACCEPT, RdfFormat::Turtle.media_type())
      .send()
      .await?
      .error_for_status()?
      .text()
      .await?;
    Ok(Graph::parse(&body, RdfFormat::Turtle)?)
  }

  async fn query(&self, sparql: &str) -> Result<QueryResult> { self.run_query(sparql).await }

  /// `view` is accepted for interface compatibility but currently ignored:
  /// the query runs against the whole dataset.
  async fn query_view(&self, _view: &str, sparql: &str) -> Result<QueryResult> {
    self.run_query(sparql).await
  }

  async fn get_subject_graph(&self, subject: &Iri) -> Result<Graph> {
    let query = format!("CONSTRUCT {{ {subject} ?p ?o }} WHERE {{ {subject} ?p ?o }}");
    Ok(self.run_query(&query).await?.into_graph().unwrap_or_default())
  }
}
