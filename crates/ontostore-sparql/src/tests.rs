//! Tests for `SparqlStore` against a mocked SPARQL endpoint.

use std::time::Duration;

use mockito::{Matcher, Mock, ServerGuard};
use ontostore_core::{
  Graph, Iri, Literal, Term, Triple, query::QueryResult, store::TripleStorePort, vocab,
};

use crate::{DIRECT_BATCH_LIMIT, Error, SparqlStore};

fn ex(name: &str) -> Iri { Iri::new_unchecked(format!("http://example.org/{name}")) }

fn alice() -> Graph {
  [
    Triple::new(ex("alice"), Iri::new_unchecked(vocab::RDF_TYPE), ex("Person")),
    Triple::new(ex("alice"), ex("name"), Literal::simple("Alice")),
    Triple::new(ex("alice"), ex("age"), Literal::integer(30)),
  ]
  .into_iter()
  .collect()
}

fn numbered(count: usize) -> Graph {
  (0..count)
    .map(|i| Triple::new(ex(&format!("s{i}")), ex("p"), Literal::integer(i as i64)))
    .collect()
}

/// A mock server whose query route answers the construction probe.
async fn server() -> (ServerGuard, Mock) {
  let mut server = mockito::Server::new_async().await;
  let probe = server
    .mock("GET", "/query")
    .match_query(Matcher::Any)
    .with_status(200)
    .with_header("content-type", "application/sparql-results+json")
    .with_body(r#"{"head":{"vars":[]},"results":{"bindings":[]}}"#)
    .create_async()
    .await;
  (server, probe)
}

async fn connect(server: &ServerGuard) -> SparqlStore {
  SparqlStore::connect(server.url(), Duration::from_secs(5))
    .await
    .expect("store")
}

async fn mock_update(server: &mut ServerGuard, status: usize, hits: usize) -> Mock {
  server
    .mock("POST", "/update")
    .match_header("content-type", "application/sparql-update")
    .with_status(status)
    .expect(hits)
    .create_async()
    .await
}

async fn mock_bulk(server: &mut ServerGuard, method: &str, hits: usize) -> Mock {
  server
    .mock(method, "/store")
    .match_query(Matcher::Exact("default".into()))
    .match_header("content-type", "application/n-triples")
    .with_status(204)
    .expect(hits)
    .create_async()
    .await
}

async fn mock_query(server: &mut ServerGuard, content_type: &str, body: &str) -> Mock {
  server
    .mock("POST", "/query")
    .match_header("content-type", "application/sparql-query")
    .match_header(
      "accept",
      "application/sparql-results+json, application/n-triples",
    )
    .with_status(200)
    .with_header("content-type", content_type)
    .with_body(body)
    .create_async()
    .await
}

// ─── Construction ────────────────────────────────────────────────────────────

#[tokio::test]
async fn connect_probes_the_query_route() {
  let (server, probe) = server().await;
  let store = connect(&server).await;
  probe.assert_async().await;
  assert_eq!(store.base_url(), server.url());
}

#[tokio::test]
async fn connect_trims_trailing_slash() {
  let (server, _probe) = server().await;
  let store = SparqlStore::connect(format!("{}/", server.url()), Duration::from_secs(5))
    .await
    .unwrap();
  assert_eq!(store.base_url(), server.url());
}

#[tokio::test]
async fn connect_fails_fast_on_error_status() {
  let mut server = mockito::Server::new_async().await;
  server
    .mock("GET", "/query")
    .match_query(Matcher::Any)
    .with_status(503)
    .create_async()
    .await;

  let result = SparqlStore::connect(server.url(), Duration::from_secs(5)).await;
  assert!(matches!(result, Err(Error::Connection { .. })));
}

#[tokio::test]
async fn connect_fails_fast_when_unreachable() {
  let result = SparqlStore::connect("http://127.0.0.1:9", Duration::from_secs(2)).await;
  assert!(matches!(result, Err(Error::Connection { .. })));
}

// ─── Insert / remove ─────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_graph_sends_nothing() {
  let (mut server, _probe) = server().await;
  let update = mock_update(&mut server, 204, 0).await;
  let store = connect(&server).await;

  store.insert(&Graph::new(), None).await.unwrap();
  store.remove(&Graph::new(), None).await.unwrap();
  update.assert_async().await;
}

#[tokio::test]
async fn insert_posts_insert_data() {
  let (mut server, _probe) = server().await;
  let update = server
    .mock("POST", "/update")
    .match_header("content-type", "application/sparql-update")
    .match_body(Matcher::Regex(
      r#"^INSERT DATA \{\n(  <http://example.org/alice> .+ \.\n){3}\}$"#.into(),
    ))
    .with_status(204)
    .expect(1)
    .create_async()
    .await;
  let store = connect(&server).await;

  store.insert(&alice(), None).await.unwrap();
  update.assert_async().await;
}

#[tokio::test]
async fn named_graph_insert_wraps_the_block() {
  let (mut server, _probe) = server().await;
  let update = server
    .mock("POST", "/update")
    .match_body(Matcher::Regex(r"GRAPH <http://example.org/g> \{".into()))
    .with_status(204)
    .expect(1)
    .create_async()
    .await;
  let store = connect(&server).await;

  store.insert(&alice(), Some(&ex("g"))).await.unwrap();
  update.assert_async().await;
}

#[tokio::test]
async fn remove_posts_delete_data() {
  let (mut server, _probe) = server().await;
  let update = server
    .mock("POST", "/update")
    .match_body(Matcher::Regex(r"^DELETE DATA \{".into()))
    .with_status(204)
    .expect(1)
    .create_async()
    .await;
  let store = connect(&server).await;

  store.remove(&alice(), None).await.unwrap();
  update.assert_async().await;
}

#[tokio::test]
async fn payload_too_large_falls_back_to_bulk_insert() {
  let (mut server, _probe) = server().await;
  let update = mock_update(&mut server, 413, 1).await;
  let bulk = server
    .mock("POST", "/store")
    .match_query(Matcher::Exact("default".into()))
    .match_header("content-type", "application/n-triples")
    .match_body(Matcher::Regex(
      r#"<http://example.org/s499> <http://example.org/p> "499"\^\^"#.into(),
    ))
    .with_status(204)
    .expect(1)
    .create_async()
    .await;
  let store = connect(&server).await;

  store.insert(&numbered(500), None).await.unwrap();
  update.assert_async().await;
  bulk.assert_async().await;
}

#[tokio::test]
async fn payload_too_large_falls_back_to_bulk_delete() {
  let (mut server, _probe) = server().await;
  let update = mock_update(&mut server, 413, 1).await;
  let post = mock_bulk(&mut server, "POST", 0).await;
  let delete = mock_bulk(&mut server, "DELETE", 1).await;
  let store = connect(&server).await;

  store.remove(&numbered(10), None).await.unwrap();
  update.assert_async().await;
  post.assert_async().await;
  delete.assert_async().await;
}

#[tokio::test]
async fn oversized_graph_goes_straight_to_bulk() {
  let (mut server, _probe) = server().await;
  let update = mock_update(&mut server, 204, 0).await;
  let bulk = mock_bulk(&mut server, "POST", 1).await;
  let store = connect(&server).await;

  let graph = numbered(150_000);
  assert!(graph.len() > DIRECT_BATCH_LIMIT);
  store.insert(&graph, None).await.unwrap();
  update.assert_async().await;
  bulk.assert_async().await;
}

#[tokio::test]
async fn bulk_into_named_graph_is_unsupported() {
  let (mut server, _probe) = server().await;
  let _update = mock_update(&mut server, 413, 1).await;
  let bulk = mock_bulk(&mut server, "POST", 0).await;
  let store = connect(&server).await;

  let err = store.insert(&alice(), Some(&ex("g"))).await.unwrap_err();
  assert!(matches!(
    err,
    Error::NamedGraphBulkUnsupported { operation: "insert", .. }
  ));
  bulk.assert_async().await;
}

#[tokio::test]
async fn other_http_errors_propagate_without_fallback() {
  let (mut server, _probe) = server().await;
  let update = mock_update(&mut server, 500, 1).await;
  let bulk = mock_bulk(&mut server, "POST", 0).await;
  let store = connect(&server).await;

  let err = store.insert(&alice(), None).await.unwrap_err();
  match err {
    Error::Http(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(500)),
    other => panic!("unexpected error: {other}"),
  }
  update.assert_async().await;
  bulk.assert_async().await;
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn updates_are_routed_to_the_update_endpoint() {
  let (mut server, _probe) = server().await;
  let update = mock_update(&mut server, 204, 1).await;
  let store = connect(&server).await;

  let result = store.query("  clear default").await.unwrap();
  assert_eq!(result, QueryResult::Empty);
  update.assert_async().await;
}

#[tokio::test]
async fn count_query_returns_an_integer() {
  let (mut server, _probe) = server().await;
  let query = mock_query(
    &mut server,
    "application/sparql-results+json",
    r#"{"head":{"vars":["c"]},"results":{"bindings":[
      {"c":{"type":"literal","value":"3",
            "datatype":"http://www.w3.org/2001/XMLSchema#integer"}}]}}"#,
  )
  .await;
  let store = connect(&server).await;

  let result = store
    .query("SELECT (COUNT(*) AS ?c) WHERE { ?s ?p ?o }")
    .await
    .unwrap();
  let solutions = result.into_solutions().expect("solutions");
  let count = solutions
    .rows()
    .next()
    .and_then(|row| row.get("c"))
    .and_then(Term::as_literal)
    .and_then(Literal::as_integer);
  assert_eq!(count, Some(3));
  query.assert_async().await;
}

#[tokio::test]
async fn subject_graph_round_trips_through_construct() {
  let (mut server, _probe) = server().await;
  let inserted = alice();
  mock_query(&mut server, "application/n-triples", &inserted.to_ntriples()).await;
  let store = connect(&server).await;

  let fetched = store.get_subject_graph(&ex("alice")).await.unwrap();
  assert_eq!(fetched, inserted);
}

#[tokio::test]
async fn subject_graph_is_empty_for_non_graph_results() {
  let (mut server, _probe) = server().await;
  mock_query(
    &mut server,
    "application/sparql-results+json",
    r#"{"head":{"vars":[]},"results":{"bindings":[]}}"#,
  )
  .await;
  let store = connect(&server).await;

  let fetched = store.get_subject_graph(&ex("alice")).await.unwrap();
  assert!(fetched.is_empty());
}

#[tokio::test]
async fn turtle_responses_parse_as_graphs() {
  let (mut server, _probe) = server().await;
  mock_query(
    &mut server,
    "text/turtle",
    "@prefix ex: <http://example.org/> .\nex:alice a ex:Person .\n",
  )
  .await;
  let store = connect(&server).await;

  let result = store
    .query("DESCRIBE <http://example.org/alice>")
    .await
    .unwrap();
  assert_eq!(result.into_graph().map(|g| g.len()), Some(1));
}

#[tokio::test]
async fn unknown_content_type_is_rejected() {
  let (mut server, _probe) = server().await;
  mock_query(&mut server, "text/html", "<html></html>").await;
  let store = connect(&server).await;

  let err = store.query("SELECT * WHERE { ?s ?p ?o }").await.unwrap_err();
  assert!(matches!(err, Error::UnexpectedContentType(ct) if ct == "text/html"));
}

#[tokio::test]
async fn query_view_ignores_the_view() {
  let (mut server, _probe) = server().await;
  let query = mock_query(&mut server, "application/n-triples", "").await;
  let store = connect(&server).await;

  let result = store
    .query_view("people", "CONSTRUCT WHERE { ?s ?p ?o }")
    .await
    .unwrap();
  assert_eq!(result, QueryResult::Graph(Graph::new()));
  query.assert_async().await;
}

#[tokio::test]
async fn get_dumps_the_store_as_turtle() {
  let (mut server, _probe) = server().await;
  server
    .mock("GET", "/store")
    .match_header("accept", "text/turtle")
    .with_status(200)
    .with_header("content-type", "text/turtle")
    .with_body("<http://example.org/a> <http://example.org/b> \"c\" .\n")
    .create_async()
    .await;
  let store = connect(&server).await;

  let graph = store.get().await.unwrap();
  assert_eq!(graph.len(), 1);
}

// ─── Named graphs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_graphs_keeps_only_iris() {
  let (mut server, _probe) = server().await;
  mock_query(
    &mut server,
    "application/sparql-results+json",
    r#"{"head":{"vars":["g"]},"results":{"bindings":[
      {"g":{"type":"uri","value":"http://example.org/g1"}},
      {"g":{"type":"literal","value":"not a graph"}},
      {"g":{"type":"uri","value":"http://example.org/g2"}}]}}"#,
  )
  .await;
  let store = connect(&server).await;

  let graphs = store.list_graphs().await.unwrap();
  assert_eq!(graphs, vec![ex("g1"), ex("g2")]);
}

#[tokio::test]
async fn graph_management_issues_updates() {
  let (mut server, _probe) = server().await;
  let create = server
    .mock("POST", "/update")
    .match_body("CREATE GRAPH <http://example.org/g>")
    .with_status(204)
    .expect(1)
    .create_async()
    .await;
  let clear = server
    .mock("POST", "/update")
    .match_body("CLEAR DEFAULT")
    .with_status(204)
    .expect(1)
    .create_async()
    .await;
  let drop = server
    .mock("POST", "/update")
    .match_body("DROP GRAPH <http://example.org/g>")
    .with_status(204)
    .expect(1)
    .create_async()
    .await;
  let store = connect(&server).await;

  store.create_graph(&ex("g")).await.unwrap();
  store.clear_graph(None).await.unwrap();
  store.drop_graph(&ex("g")).await.unwrap();
  create.assert_async().await;
  clear.assert_async().await;
  drop.assert_async().await;
}
