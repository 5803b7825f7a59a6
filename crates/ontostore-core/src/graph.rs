//! [`Graph`]: a set of triples plus the namespace prefixes bound to it.
//!
//! Insertion and removal are set operations, so applying the same change
//! twice is a no-op. Iteration order is deterministic (structural ordering of
//! the triples), which keeps serialised output stable across runs.

use std::collections::{BTreeMap, BTreeSet};

use crate::term::{Iri, Subject, Term, Triple};

// ─── Pattern ─────────────────────────────────────────────────────────────────

/// A triple pattern where every `None` position matches any term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriplePattern {
  pub subject:   Option<Subject>,
  pub predicate: Option<Iri>,
  pub object:    Option<Term>,
}

impl TriplePattern {
  pub fn new(
    subject: Option<Subject>,
    predicate: Option<Iri>,
    object: Option<Term>,
  ) -> Self {
    Self { subject, predicate, object }
  }

  pub fn matches(&self, triple: &Triple) -> bool {
    self.subject.as_ref().is_none_or(|s| *s == triple.subject)
      && self.predicate.as_ref().is_none_or(|p| *p == triple.predicate)
      && self.object.as_ref().is_none_or(|o| *o == triple.object)
  }
}

// ─── Graph ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
  triples:  BTreeSet<Triple>,
  prefixes: BTreeMap<String, Iri>,
}

impl Graph {
  pub fn new() -> Self { Self::default() }

  /// Add a triple. Returns `false` if it was already present.
  pub fn insert(&mut self, triple: Triple) -> bool { self.triples.insert(triple) }

  /// Remove a triple. Returns `false` if it was not present.
  pub fn remove(&mut self, triple: &Triple) -> bool { self.triples.remove(triple) }

  pub fn contains(&self, triple: &Triple) -> bool { self.triples.contains(triple) }

  pub fn len(&self) -> usize { self.triples.len() }

  pub fn is_empty(&self) -> bool { self.triples.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &Triple> + '_ { self.triples.iter() }

  /// Bind `prefix` to `namespace`, replacing any previous binding.
  pub fn bind(&mut self, prefix: impl Into<String>, namespace: Iri) {
    self.prefixes.insert(prefix.into(), namespace);
  }

  pub fn prefixes(&self) -> &BTreeMap<String, Iri> { &self.prefixes }

  /// Triples in `self` that are not in `other`. Prefixes of `self` are kept.
  pub fn difference(&self, other: &Graph) -> Graph {
    Graph {
      triples:  self.triples.difference(&other.triples).cloned().collect(),
      prefixes: self.prefixes.clone(),
    }
  }

  /// Union `other` into `self`, merging its prefix bindings.
  pub fn extend(&mut self, other: Graph) {
    self.triples.extend(other.triples);
    self.prefixes.extend(other.prefixes);
  }

  /// A copy without any triple that mentions a blank node.
  pub fn without_blank_nodes(&self) -> Graph {
    Graph {
      triples:  self
        .triples
        .iter()
        .filter(|t| !t.has_blank_node())
        .cloned()
        .collect(),
      prefixes: self.prefixes.clone(),
    }
  }

  pub fn matching<'a>(
    &'a self,
    pattern: &'a TriplePattern,
  ) -> impl Iterator<Item = &'a Triple> + 'a {
    self.triples.iter().filter(move |t| pattern.matches(t))
  }

  /// The distinct subjects of this graph, in order.
  pub fn subjects(&self) -> BTreeSet<&Subject> {
    self.triples.iter().map(|t| &t.subject).collect()
  }

  /// The first object of `(subject, predicate, ?)`, if any.
  pub fn object(&self, subject: &Subject, predicate: &Iri) -> Option<&Term> {
    self
      .triples
      .iter()
      .find(|t| t.subject == *subject && t.predicate == *predicate)
      .map(|t| &t.object)
  }

  /// Serialise as N-Triples, one statement per line.
  pub fn to_ntriples(&self) -> String {
    let mut out = String::new();
    for triple in &self.triples {
      out.push_str(&triple.to_string());
      out.push('\n');
    }
    out
  }
}

impl FromIterator<Triple> for Graph {
  fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
    Graph {
      triples:  iter.into_iter().collect(),
      prefixes: BTreeMap::new(),
    }
  }
}

impl IntoIterator for Graph {
  type IntoIter = std::collections::btree_set::IntoIter<Triple>;
  type Item = Triple;

  fn into_iter(self) -> Self::IntoIter { self.triples.into_iter() }
}

impl<'a> IntoIterator for &'a Graph {
  type IntoIter = std::collections::btree_set::Iter<'a, Triple>;
  type Item = &'a Triple;

  fn into_iter(self) -> Self::IntoIter { self.triples.iter() }
}
