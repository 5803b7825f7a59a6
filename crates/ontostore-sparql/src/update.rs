//! Text builders for SPARQL Update requests.

use ontostore_core::{Graph, Iri};
use reqwest::Method;

/// Leading keywords that mark a request as a SPARQL Update.
const UPDATE_KEYWORDS: [&str; 9] = [
  "INSERT", "DELETE", "CREATE", "DROP", "CLEAR", "LOAD", "COPY", "MOVE", "ADD",
];

/// Whether `sparql` must go to the update route rather than the query route.
pub fn is_update(sparql: &str) -> bool {
  let head = sparql.trim_start().to_ascii_uppercase();
  UPDATE_KEYWORDS.iter().any(|kw| head.starts_with(kw))
}

/// The two data-mutation forms the store issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataUpdate {
  Insert,
  Delete,
}

impl DataUpdate {
  fn keyword(self) -> &'static str {
    match self {
      Self::Insert => "INSERT DATA",
      Self::Delete => "DELETE DATA",
    }
  }

  /// HTTP method used against the graph store route on the bulk path.
  pub fn bulk_method(self) -> Method {
    match self {
      Self::Insert => Method::POST,
      Self::Delete => Method::DELETE,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Self::Insert => "insert",
      Self::Delete => "delete",
    }
  }
}

/// Build an `INSERT DATA` / `DELETE DATA` request, one N3 statement per line.
///
/// `DELETE DATA` may not mention blank nodes, so those triples are skipped;
/// `None` is returned when nothing is left to send.
pub fn data_block(kind: DataUpdate, triples: &Graph, graph: Option<&Iri>) -> Option<String> {
  let mut body = String::new();
  let mut lines = 0usize;
  for triple in triples {
    if kind == DataUpdate::Delete && triple.has_blank_node() {
      continue;
    }
    body.push_str("  ");
    body.push_str(&triple.to_string());
    body.push('\n');
    lines += 1;
  }
  if lines == 0 {
    return None;
  }

  let keyword = kind.keyword();
  Some(match graph {
    None => format!("{keyword} {{\n{body}}}"),
    Some(g) => format!("{keyword} {{\n  GRAPH {g} {{\n{body}  }}\n}}"),
  })
}
