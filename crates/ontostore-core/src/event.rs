//! Change events and the pub/sub topics derived from them.
//!
//! A topic has ten dot-separated segments:
//!
//! ```text
//! ts.<event>.g.<graph>.s.<h(s)>.p.<h(p)>.o.<h(o)>
//! ```
//!
//! where `h(x)` is the SHA-256 hex digest of the term's canonical string.
//! Any variable segment may be `*`, which matches exactly one segment.

use std::fmt;

use sha2::{Digest, Sha256};
use strum::{Display, EnumString};

use crate::{graph::TriplePattern, term::Triple};

/// The bus domain every triple-store topic is published under.
pub const TOPIC_DOMAIN: &str = "triple_store";

/// Graph segment used for mutations of the default graph.
pub const DEFAULT_GRAPH_SEGMENT: &str = "default";

const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OntologyEvent {
  Insert,
  Delete,
}

/// SHA-256 hex digest of a term's canonical string.
pub fn term_digest(canonical: &str) -> String {
  hex::encode(Sha256::digest(canonical.as_bytes()))
}

/// A concrete topic or a wildcard topic pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeTopic(String);

impl ChangeTopic {
  /// The concrete topic a mutation of `triple` is published on.
  pub fn for_triple(event: OntologyEvent, graph: &str, triple: &Triple) -> Self {
    Self::build(
      &event.to_string(),
      graph,
      &term_digest(triple.subject.canonical_str()),
      &term_digest(triple.predicate.as_str()),
      &term_digest(triple.object.canonical_str()),
    )
  }

  /// A subscription pattern. Every `None` becomes `*`; the graph segment is
  /// always `*`.
  pub fn pattern(event: Option<OntologyEvent>, pattern: &TriplePattern) -> Self {
    let event = event.map_or_else(|| WILDCARD.to_owned(), |e| e.to_string());
    let s = pattern
      .subject
      .as_ref()
      .map_or_else(|| WILDCARD.to_owned(), |s| term_digest(s.canonical_str()));
    let p = pattern
      .predicate
      .as_ref()
      .map_or_else(|| WILDCARD.to_owned(), |p| term_digest(p.as_str()));
    let o = pattern
      .object
      .as_ref()
      .map_or_else(|| WILDCARD.to_owned(), |o| term_digest(o.canonical_str()));
    Self::build(&event, WILDCARD, &s, &p, &o)
  }

  fn build(event: &str, graph: &str, s: &str, p: &str, o: &str) -> Self {
    Self(format!("ts.{event}.g.{graph}.s.{s}.p.{p}.o.{o}"))
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// Whether `topic` is matched by `self` treated as a pattern.
  pub fn matches(&self, topic: &str) -> bool { topic_matches(&self.0, topic) }
}

impl fmt::Display for ChangeTopic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Segment-wise match of `topic` against `pattern`, where a `*` pattern
/// segment matches any single segment.
pub fn topic_matches(pattern: &str, topic: &str) -> bool {
  let mut pattern = pattern.split('.');
  let mut topic = topic.split('.');
  loop {
    match (pattern.next(), topic.next()) {
      (None, None) => return true,
      (Some(p), Some(t)) if p == WILDCARD || p == t => {}
      _ => return false,
    }
  }
}
