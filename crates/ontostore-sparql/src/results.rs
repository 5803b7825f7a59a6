//! Decoding of SPARQL 1.1 Query Results JSON into [`QueryResult`].
//!
//! Binding objects carry `type`, `value`, and optionally `datatype` or
//! `xml:lang`. A language tag wins over a datatype. `xsd:integer` and
//! `xsd:long` values are normalised to canonical integers when they parse.

use std::collections::HashMap;

use ontostore_core::{
  BlankNode, Iri, Literal, Term,
  query::{QueryResult, Solutions},
  vocab,
};
use serde::Deserialize;

use crate::Result;

#[derive(Deserialize)]
struct ResultsDocument {
  #[serde(default)]
  head:    Head,
  results: Option<Bindings>,
  boolean: Option<bool>,
}

#[derive(Deserialize, Default)]
struct Head {
  #[serde(default)]
  vars: Vec<String>,
}

#[derive(Deserialize)]
struct Bindings {
  #[serde(default)]
  bindings: Vec<HashMap<String, Binding>>,
}

#[derive(Deserialize)]
struct Binding {
  #[serde(rename = "type", default)]
  kind:     Option<String>,
  value:    String,
  datatype: Option<String>,
  #[serde(rename = "xml:lang")]
  lang:     Option<String>,
}

pub fn parse_results_json(body: &str) -> Result<QueryResult> {
  let doc: ResultsDocument = serde_json::from_str(body)?;

  if let Some(answer) = doc.boolean {
    return Ok(QueryResult::Boolean(answer));
  }

  let mut solutions = Solutions::new(doc.head.vars);
  for mut binding in doc.results.map(|r| r.bindings).unwrap_or_default() {
    let row = solutions
      .variables()
      .iter()
      .map(|var| binding.remove(var).map(binding_to_term))
      .collect();
    solutions.push(row);
  }
  Ok(QueryResult::Solutions(solutions))
}

fn binding_to_term(b: Binding) -> Term {
  match b.kind.as_deref() {
    Some("uri") => Term::Iri(Iri::new_unchecked(b.value)),
    Some("bnode") => Term::Blank(BlankNode::new(b.value)),
    _ => Term::Literal(decode_literal(b.value, b.datatype, b.lang)),
  }
}

fn decode_literal(value: String, datatype: Option<String>, lang: Option<String>) -> Literal {
  if let Some(lang) = lang {
    return Literal::language_tagged(value, lang);
  }
  let Some(datatype) = datatype else {
    return Literal::simple(value);
  };
  if vocab::is_integer_datatype(&datatype)
    && let Ok(n) = value.trim().parse::<i64>()
  {
    return Literal::typed(n.to_string(), Iri::new_unchecked(datatype));
  }
  Literal::typed(value, Iri::new_unchecked(datatype))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn maps_every_binding_type() {
    let body = r#"{
      "head": { "vars": ["s", "label", "n", "b", "missing"] },
      "results": { "bindings": [ {
        "s":     { "type": "uri", "value": "http://example.org/alice" },
        "label": { "type": "literal", "value": "Alice", "xml:lang": "en" },
        "n":     { "type": "literal", "value": "+042",
                   "datatype": "http://www.w3.org/2001/XMLSchema#integer" },
        "b":     { "type": "bnode", "value": "b0" }
      } ] }
    }"#;

    let QueryResult::Solutions(sol) = parse_results_json(body).unwrap() else {
      panic!("expected solutions");
    };
    assert_eq!(sol.len(), 1);
    let row = sol.rows().next().unwrap();

    assert_eq!(
      row.get("s"),
      Some(&Term::Iri(Iri::new_unchecked("http://example.org/alice")))
    );
    assert_eq!(
      row.get("label"),
      Some(&Term::Literal(Literal::language_tagged("Alice", "en")))
    );
    let n = row.get("n").and_then(Term::as_literal).unwrap();
    assert_eq!(n.value(), "42");
    assert_eq!(n.as_integer(), Some(42));
    assert_eq!(row.get("b"), Some(&Term::Blank(BlankNode::new("b0"))));
    assert_eq!(row.values().len(), 5);
    assert_eq!(row.get("missing"), None);
  }

  #[test]
  fn unparsable_integer_keeps_its_datatype() {
    let lit = decode_literal(
      "lots".into(),
      Some(vocab::XSD_LONG.into()),
      None,
    );
    assert_eq!(lit.value(), "lots");
    assert_eq!(lit.datatype().map(Iri::as_str), Some(vocab::XSD_LONG));
    assert_eq!(lit.as_integer(), None);
  }

  #[test]
  fn language_tag_wins_over_datatype() {
    let lit = decode_literal(
      "chat".into(),
      Some("http://www.w3.org/1999/02/22-rdf-syntax-ns#langString".into()),
      Some("fr".into()),
    );
    assert_eq!(lit.language(), Some("fr"));
    assert!(lit.datatype().is_none());
  }

  #[test]
  fn ask_results_are_boolean() {
    let result = parse_results_json(r#"{ "head": {}, "boolean": true }"#).unwrap();
    assert_eq!(result, QueryResult::Boolean(true));
  }

  #[test]
  fn malformed_json_is_an_error() {
    assert!(parse_results_json("{ not json").is_err());
  }
}
