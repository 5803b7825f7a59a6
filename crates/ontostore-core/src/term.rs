//! RDF terms, the values a [`Triple`] is built from.
//!
//! Every term renders to its N-Triples form through [`fmt::Display`]; the same
//! text is valid N3 and valid inside SPARQL `INSERT DATA` blocks.

use std::fmt;

use crate::{Error, Result, vocab};

// ─── Iri ─────────────────────────────────────────────────────────────────────

/// An absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
  /// Validate that `iri` carries a scheme and wrap it.
  pub fn new(iri: impl Into<String>) -> Result<Self> {
    let iri = iri.into();
    if has_scheme(&iri) {
      Ok(Self(iri))
    } else {
      Err(Error::RelativeIri(iri))
    }
  }

  /// Wrap an IRI produced by a parser or a store without re-validating it.
  pub fn new_unchecked(iri: impl Into<String>) -> Self { Self(iri.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_string(self) -> String { self.0 }
}

fn has_scheme(iri: &str) -> bool {
  let Some((scheme, _)) = iri.split_once(':') else {
    return false;
  };
  let mut chars = scheme.chars();
  matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for Iri {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<{}>", self.0)
  }
}

// ─── BlankNode ───────────────────────────────────────────────────────────────

/// A blank node. The label only has meaning inside one document or request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode(String);

impl BlankNode {
  pub fn new(label: impl Into<String>) -> Self { Self(label.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for BlankNode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "_:{}", self.0)
  }
}

// ─── Literal ─────────────────────────────────────────────────────────────────

/// Whether a literal is plain, typed, or language-tagged. A literal can never
/// carry both a datatype and a language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LiteralKind {
  Simple,
  Typed(Iri),
  LanguageTagged(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
  value: String,
  kind:  LiteralKind,
}

impl Literal {
  pub fn simple(value: impl Into<String>) -> Self {
    Self { value: value.into(), kind: LiteralKind::Simple }
  }

  pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
    Self { value: value.into(), kind: LiteralKind::Typed(datatype) }
  }

  pub fn language_tagged(
    value: impl Into<String>,
    language: impl Into<String>,
  ) -> Self {
    Self {
      value: value.into(),
      kind:  LiteralKind::LanguageTagged(language.into()),
    }
  }

  /// An `xsd:integer` literal in canonical lexical form.
  pub fn integer(value: i64) -> Self {
    Self::typed(value.to_string(), Iri::new_unchecked(vocab::XSD_INTEGER))
  }

  /// The lexical value, without quotes, datatype or language tag.
  pub fn value(&self) -> &str { &self.value }

  pub fn kind(&self) -> &LiteralKind { &self.kind }

  pub fn datatype(&self) -> Option<&Iri> {
    match &self.kind {
      LiteralKind::Typed(dt) => Some(dt),
      _ => None,
    }
  }

  pub fn language(&self) -> Option<&str> {
    match &self.kind {
      LiteralKind::LanguageTagged(lang) => Some(lang),
      _ => None,
    }
  }

  /// The integer value of an `xsd:integer` / `xsd:long` literal.
  pub fn as_integer(&self) -> Option<i64> {
    let dt = self.datatype()?;
    if vocab::is_integer_datatype(dt.as_str()) {
      self.value.trim().parse().ok()
    } else {
      None
    }
  }
}

impl fmt::Display for Literal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("\"")?;
    write_escaped(f, &self.value)?;
    f.write_str("\"")?;
    match &self.kind {
      LiteralKind::Simple => Ok(()),
      LiteralKind::Typed(dt) => write!(f, "^^{dt}"),
      LiteralKind::LanguageTagged(lang) => write!(f, "@{lang}"),
    }
  }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
  for c in value.chars() {
    match c {
      '\\' => f.write_str("\\\\")?,
      '"' => f.write_str("\\\"")?,
      '\n' => f.write_str("\\n")?,
      '\r' => f.write_str("\\r")?,
      '\t' => f.write_str("\\t")?,
      c => fmt::Write::write_char(f, c)?,
    }
  }
  Ok(())
}

// ─── Term ────────────────────────────────────────────────────────────────────

/// One RDF value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
  Iri(Iri),
  Blank(BlankNode),
  Literal(Literal),
}

impl Term {
  /// The canonical string used for topic hashing: the IRI, the blank node
  /// label, or the literal's lexical value.
  pub fn canonical_str(&self) -> &str {
    match self {
      Self::Iri(iri) => iri.as_str(),
      Self::Blank(b) => b.as_str(),
      Self::Literal(l) => l.value(),
    }
  }

  pub fn is_blank(&self) -> bool { matches!(self, Self::Blank(_)) }

  pub fn as_iri(&self) -> Option<&Iri> {
    match self {
      Self::Iri(iri) => Some(iri),
      _ => None,
    }
  }

  pub fn as_literal(&self) -> Option<&Literal> {
    match self {
      Self::Literal(l) => Some(l),
      _ => None,
    }
  }
}

impl fmt::Display for Term {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Iri(iri) => write!(f, "{iri}"),
      Self::Blank(b) => write!(f, "{b}"),
      Self::Literal(l) => write!(f, "{l}"),
    }
  }
}

impl From<Iri> for Term {
  fn from(iri: Iri) -> Self { Self::Iri(iri) }
}

impl From<BlankNode> for Term {
  fn from(b: BlankNode) -> Self { Self::Blank(b) }
}

impl From<Literal> for Term {
  fn from(l: Literal) -> Self { Self::Literal(l) }
}

impl From<Subject> for Term {
  fn from(s: Subject) -> Self {
    match s {
      Subject::Iri(iri) => Self::Iri(iri),
      Subject::Blank(b) => Self::Blank(b),
    }
  }
}

// ─── Subject ─────────────────────────────────────────────────────────────────

/// The subject position of a triple: an IRI or a blank node, never a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
  Iri(Iri),
  Blank(BlankNode),
}

impl Subject {
  pub fn canonical_str(&self) -> &str {
    match self {
      Self::Iri(iri) => iri.as_str(),
      Self::Blank(b) => b.as_str(),
    }
  }

  pub fn is_blank(&self) -> bool { matches!(self, Self::Blank(_)) }

  pub fn as_iri(&self) -> Option<&Iri> {
    match self {
      Self::Iri(iri) => Some(iri),
      Self::Blank(_) => None,
    }
  }
}

impl fmt::Display for Subject {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Iri(iri) => write!(f, "{iri}"),
      Self::Blank(b) => write!(f, "{b}"),
    }
  }
}

impl From<Iri> for Subject {
  fn from(iri: Iri) -> Self { Self::Iri(iri) }
}

impl From<BlankNode> for Subject {
  fn from(b: BlankNode) -> Self { Self::Blank(b) }
}

// ─── Triple ──────────────────────────────────────────────────────────────────

/// One RDF fact. Equality and ordering are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
  pub subject:   Subject,
  pub predicate: Iri,
  pub object:    Term,
}

impl Triple {
  pub fn new(
    subject: impl Into<Subject>,
    predicate: Iri,
    object: impl Into<Term>,
  ) -> Self {
    Self {
      subject: subject.into(),
      predicate,
      object: object.into(),
    }
  }

  pub fn has_blank_node(&self) -> bool {
    self.subject.is_blank() || self.object.is_blank()
  }
}

/// Renders the triple as one N-Triples statement, without the trailing newline.
impl fmt::Display for Triple {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
  }
}
