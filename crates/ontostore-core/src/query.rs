//! [`QueryResult`]: what a SPARQL query or update returns.

use crate::{graph::Graph, term::Term};

/// The shape of a query result depends on the query form.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
  /// Returned for updates; carries nothing.
  Empty,
  /// `SELECT` rows.
  Solutions(Solutions),
  /// `ASK` answer.
  Boolean(bool),
  /// `CONSTRUCT` / `DESCRIBE` output.
  Graph(Graph),
}

impl QueryResult {
  pub fn into_solutions(self) -> Option<Solutions> {
    match self {
      Self::Solutions(s) => Some(s),
      _ => None,
    }
  }

  pub fn into_graph(self) -> Option<Graph> {
    match self {
      Self::Graph(g) => Some(g),
      _ => None,
    }
  }
}

/// A table of bindings. Every row has one slot per declared variable; an
/// unbound variable is an explicit `None` rather than a missing column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solutions {
  variables: Vec<String>,
  rows:      Vec<Vec<Option<Term>>>,
}

impl Solutions {
  pub fn new(variables: Vec<String>) -> Self {
    Self { variables, rows: Vec::new() }
  }

  /// Append a row. Missing trailing slots are padded with `None`; extra slots
  /// are dropped.
  pub fn push(&mut self, mut row: Vec<Option<Term>>) {
    row.resize(self.variables.len(), None);
    self.rows.push(row);
  }

  pub fn variables(&self) -> &[String] { &self.variables }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub fn rows(&self) -> impl Iterator<Item = SolutionRow<'_>> + '_ {
    self.rows.iter().map(|values| SolutionRow {
      variables: &self.variables,
      values,
    })
  }
}

/// A borrowed view of one row, addressable by variable name.
#[derive(Debug, Clone, Copy)]
pub struct SolutionRow<'a> {
  variables: &'a [String],
  values:    &'a [Option<Term>],
}

impl<'a> SolutionRow<'a> {
  /// The binding for `variable`, or `None` when undeclared or unbound.
  pub fn get(&self, variable: &str) -> Option<&'a Term> {
    let idx = self.variables.iter().position(|v| v == variable)?;
    self.values.get(idx)?.as_ref()
  }

  pub fn values(&self) -> &'a [Option<Term>] { self.values }
}
