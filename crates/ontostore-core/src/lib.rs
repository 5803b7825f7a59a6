//! Core types and trait definitions for the ontostore triple-store layer.
//!
//! This crate is deliberately free of HTTP dependencies. It holds the RDF term
//! model, the [`store::TripleStorePort`] abstraction that backends implement,
//! and the change-notification contract shared by every higher layer.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod bus;
pub mod error;
pub mod event;
pub mod graph;
pub mod io;
pub mod query;
pub mod store;
pub mod term;
pub mod vocab;

pub use error::{Error, Result};
pub use graph::Graph;
pub use term::{BlankNode, Iri, Literal, Subject, Term, Triple};
