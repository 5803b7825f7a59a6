//! Turtle and N-Triples parsing into [`Graph`].

use std::path::Path;

use rio_api::{model, parser::TriplesParser};
use rio_turtle::{NTriplesParser, TurtleParser};

use crate::{
  Error, Result,
  graph::Graph,
  term::{BlankNode, Iri, Literal, Subject, Term, Triple},
};

/// A textual RDF serialisation understood by [`Graph::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
  Turtle,
  NTriples,
}

impl RdfFormat {
  /// Guess the format from a file extension; anything but `.nt` is Turtle.
  pub fn from_path(path: &Path) -> Self {
    match path.extension().and_then(|e| e.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("nt") => Self::NTriples,
      _ => Self::Turtle,
    }
  }

  /// Map a response media type onto a format, if it is one we parse.
  pub fn from_content_type(content_type: &str) -> Option<Self> {
    if content_type.contains("n-triples") {
      Some(Self::NTriples)
    } else if content_type.contains("turtle") {
      Some(Self::Turtle)
    } else {
      None
    }
  }

  pub fn media_type(self) -> &'static str {
    match self {
      Self::Turtle => "text/turtle",
      Self::NTriples => "application/n-triples",
    }
  }
}

impl Graph {
  /// Parse `input` in the given format. Turtle `@prefix` declarations are kept
  /// as the graph's prefix bindings.
  pub fn parse(input: &str, format: RdfFormat) -> Result<Graph> {
    let mut graph = Graph::new();
    match format {
      RdfFormat::Turtle => {
        let mut parser = TurtleParser::new(input.as_bytes(), None);
        parser.parse_all(&mut |t| -> Result<()> {
          graph.insert(convert_triple(t)?);
          Ok(())
        })?;
        for (prefix, namespace) in parser.prefixes() {
          graph.bind(prefix.clone(), Iri::new_unchecked(namespace.clone()));
        }
      }
      RdfFormat::NTriples => {
        let mut parser = NTriplesParser::new(input.as_bytes());
        parser.parse_all(&mut |t| -> Result<()> {
          graph.insert(convert_triple(t)?);
          Ok(())
        })?;
      }
    }
    Ok(graph)
  }
}

// ─── rio → ontostore ─────────────────────────────────────────────────────────

fn convert_triple(t: model::Triple<'_>) -> Result<Triple> {
  Ok(Triple {
    subject:   convert_subject(t.subject)?,
    predicate: Iri::new_unchecked(t.predicate.iri),
    object:    convert_object(t.object)?,
  })
}

fn convert_subject(s: model::Subject<'_>) -> Result<Subject> {
  match s {
    model::Subject::NamedNode(n) => Ok(Subject::Iri(Iri::new_unchecked(n.iri))),
    model::Subject::BlankNode(b) => Ok(Subject::Blank(BlankNode::new(b.id))),
    #[allow(unreachable_patterns)]
    _ => Err(Error::Unsupported("quoted triple in subject position")),
  }
}

fn convert_object(o: model::Term<'_>) -> Result<Term> {
  match o {
    model::Term::NamedNode(n) => Ok(Term::Iri(Iri::new_unchecked(n.iri))),
    model::Term::BlankNode(b) => Ok(Term::Blank(BlankNode::new(b.id))),
    model::Term::Literal(l) => Ok(Term::Literal(convert_literal(l))),
    #[allow(unreachable_patterns)]
    _ => Err(Error::Unsupported("quoted triple in object position")),
  }
}

fn convert_literal(l: model::Literal<'_>) -> Literal {
  match l {
    model::Literal::Simple { value } => Literal::simple(value),
    model::Literal::LanguageTaggedString { value, language } => {
      Literal::language_tagged(value, language)
    }
    model::Literal::Typed { value, datatype } => {
      Literal::typed(value, Iri::new_unchecked(datatype.iri))
    }
  }
}
