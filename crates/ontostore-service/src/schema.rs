//! Keeping ontology files on disk in sync with the store.
//!
//! Each loaded file is tracked by a [`SchemaRecord`]: a resource of type
//! `internal:Schema` carrying the file path, a SHA-256 digest of the content,
//! the file's modification time, and the content itself in base64. Reloading
//! a file compares digests; on a change, the previously stored content is
//! parsed again and only the set difference is written.
//!
//! Replacing a record is two separate writes (remove old, insert new). A
//! failure in between leaves the file untracked, and the next load treats it
//! as new.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use ontostore_core::{
  Graph, Iri, Literal, Term, Triple,
  io::RdfFormat,
  query::{SolutionRow, Solutions},
  store::TripleStorePort,
  vocab,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{Error, Result, service::TripleStoreService};

const CONTENT_QUERY: &str = "PREFIX internal: <http://triple-store.internal#>
SELECT ?s ?o WHERE { ?s internal:content ?o . }";

// ─── Records ─────────────────────────────────────────────────────────────────

/// Bookkeeping for one loaded ontology file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRecord {
  pub subject:               Iri,
  pub file_path:             String,
  pub hash:                  String,
  pub file_last_update_time: DateTime<Utc>,
  /// Base64 of the file content at the time it was loaded.
  pub content:               String,
  /// The record's triples exactly as they are held by the store.
  stored:                    Graph,
}

impl SchemaRecord {
  fn new(subject: Iri, file_path: String, snapshot: &FileSnapshot) -> Self {
    let content = STANDARD.encode(snapshot.text.as_bytes());
    let terms = RecordTerms {
      file_path: Literal::simple(file_path.as_str()).into(),
      hash:      Literal::simple(snapshot.hash.as_str()).into(),
      modified:  Literal::typed(
        snapshot.modified.to_rfc3339(),
        Iri::new_unchecked(vocab::XSD_DATE_TIME),
      )
      .into(),
      content:   Literal::typed(
        content.as_str(),
        Iri::new_unchecked(vocab::XSD_BASE64_BINARY),
      )
      .into(),
    };
    Self {
      stored: terms.to_graph(&subject),
      subject,
      file_path,
      hash: snapshot.hash.clone(),
      file_last_update_time: snapshot.modified,
      content,
    }
  }

  /// Decode a row of [`records_query`]. Only lexical values are read, so
  /// records written with plain literals are accepted as well.
  fn from_row(row: &SolutionRow<'_>) -> Result<Self> {
    let subject = row
      .get("schema")
      .and_then(Term::as_iri)
      .cloned()
      .ok_or_else(|| malformed("<unknown>", "record subject is not an IRI"))?;
    let value = |var: &str| {
      row
        .get(var)
        .cloned()
        .ok_or_else(|| malformed(subject.as_str(), &format!("missing ?{var}")))
    };
    let terms = RecordTerms {
      file_path: value("filePath")?,
      hash:      value("hash")?,
      modified:  value("fileLastUpdateTime")?,
      content:   value("content")?,
    };

    let modified = terms.modified.canonical_str();
    let file_last_update_time = parse_timestamp(modified).ok_or_else(|| {
      malformed(subject.as_str(), &format!("unreadable timestamp {modified:?}"))
    })?;

    Ok(Self {
      stored: terms.to_graph(&subject),
      file_path: terms.file_path.canonical_str().to_owned(),
      hash: terms.hash.canonical_str().to_owned(),
      content: terms.content.canonical_str().to_owned(),
      file_last_update_time,
      subject,
    })
  }

  /// The record's triples as held by the store.
  pub fn triples(&self) -> &Graph { &self.stored }

  /// The file content this record was written with.
  pub fn decode_content(&self) -> Result<String> {
    let bytes = STANDARD.decode(self.content.trim())?;
    Ok(String::from_utf8(bytes)?)
  }
}

struct RecordTerms {
  file_path: Term,
  hash:      Term,
  modified:  Term,
  content:   Term,
}

impl RecordTerms {
  fn to_graph(&self, subject: &Iri) -> Graph {
    let property = |iri: &str| Iri::new_unchecked(iri);
    [
      Triple::new(
        subject.clone(),
        property(vocab::RDF_TYPE),
        property(vocab::INTERNAL_SCHEMA),
      ),
      Triple::new(subject.clone(), property(vocab::INTERNAL_FILE_PATH), self.file_path.clone()),
      Triple::new(subject.clone(), property(vocab::INTERNAL_HASH), self.hash.clone()),
      Triple::new(
        subject.clone(),
        property(vocab::INTERNAL_FILE_LAST_UPDATE_TIME),
        self.modified.clone(),
      ),
      Triple::new(subject.clone(), property(vocab::INTERNAL_CONTENT), self.content.clone()),
    ]
    .into_iter()
    .collect()
  }
}

fn malformed(subject: &str, reason: &str) -> Error {
  Error::MalformedSchemaRecord {
    subject: subject.to_owned(),
    reason:  reason.to_owned(),
  }
}

/// RFC 3339, or fractional seconds since the Unix epoch for records written
/// before timestamps were typed.
fn parse_timestamp(lexical: &str) -> Option<DateTime<Utc>> {
  if let Ok(t) = DateTime::parse_from_rfc3339(lexical.trim()) {
    return Some(t.with_timezone(&Utc));
  }
  let secs: f64 = lexical.trim().parse().ok()?;
  DateTime::from_timestamp(secs.trunc() as i64, (secs.fract() * 1e9) as u32)
}

/// SELECT every schema record, or only the one(s) for `file_path`.
///
/// Records match on `filePath` alone; a record missing any other property
/// still comes back, and fails to decode instead of going unseen.
fn records_query(file_path: Option<&str>) -> String {
  let filter = file_path
    .map(|p| format!("\n  FILTER (STR(?filePath) = {})", Literal::simple(p)))
    .unwrap_or_default();
  format!(
    "PREFIX internal: <{ns}>
SELECT ?schema ?filePath ?hash ?fileLastUpdateTime ?content WHERE {{
  ?schema internal:filePath ?filePath .
  OPTIONAL {{ ?schema internal:hash ?hash }}
  OPTIONAL {{ ?schema internal:fileLastUpdateTime ?fileLastUpdateTime }}
  OPTIONAL {{ ?schema internal:content ?content }}{filter}
}}",
    ns = vocab::INTERNAL_NS,
  )
}

/// At most one record may exist per path. Several rows for the same subject
/// mean a property holds more than one value.
fn single(file_path: &str, records: &[SchemaRecord]) -> Result<Option<SchemaRecord>> {
  match records {
    [] => Ok(None),
    [record] => Ok(Some(record.clone())),
    [first, rest @ ..] if rest.iter().all(|r| r.subject == first.subject) => Err(malformed(
      first.subject.as_str(),
      "a property holds more than one value",
    )),
    _ => Err(Error::DuplicateSchemaRecord(file_path.to_owned())),
  }
}

// ─── Cache ───────────────────────────────────────────────────────────────────

/// Schema records fetched once for a batch of loads, keyed by file path.
#[derive(Debug, Default, Clone)]
pub struct SchemaCache {
  records:   BTreeMap<String, Vec<SchemaRecord>>,
  /// Paths whose record did not decode, as `(subject, reason)`.
  malformed: BTreeMap<String, (String, String)>,
}

impl SchemaCache {
  pub fn new() -> Self { Self::default() }

  /// Decode each row of [`records_query`] on its own. An unreadable row only
  /// affects lookups of its own path.
  fn from_rows(solutions: &Solutions) -> Self {
    let mut cache = Self::new();
    for row in solutions.rows() {
      let Some(path) = row.get("filePath").map(|t| t.canonical_str().to_owned()) else {
        continue;
      };
      match SchemaRecord::from_row(&row) {
        Ok(record) => cache.records.entry(path).or_default().push(record),
        Err(e) => {
          tracing::warn!(path = %path, error = %e, "unreadable schema record");
          let entry = match e {
            Error::MalformedSchemaRecord { subject, reason } => (subject, reason),
            other => ("<unknown>".to_owned(), other.to_string()),
          };
          cache.malformed.insert(path, entry);
        }
      }
    }
    cache
  }

  pub fn lookup(&self, file_path: &str) -> Result<Option<SchemaRecord>> {
    if let Some((subject, reason)) = self.malformed.get(file_path) {
      return Err(malformed(subject, reason));
    }
    single(file_path, self.records.get(file_path).map_or(&[][..], Vec::as_slice))
  }

  /// Make `record` the only one known for its path.
  pub fn store(&mut self, record: SchemaRecord) {
    self.malformed.remove(&record.file_path);
    self.records.insert(record.file_path.clone(), vec![record]);
  }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
  /// First sighting: content and record inserted.
  Inserted,
  /// Digest matches the record; nothing written.
  Unchanged,
  /// Content changed; the difference was applied and the record replaced.
  Updated { added: usize, removed: usize },
}

/// Result of [`SchemaSynchronizer::load_schemas`].
#[derive(Debug, Default)]
pub struct SchemaLoadReport {
  pub succeeded: Vec<(PathBuf, SchemaOutcome)>,
  pub failed:    Vec<(PathBuf, Error)>,
}

impl SchemaLoadReport {
  pub fn is_success(&self) -> bool { self.failed.is_empty() }
}

// ─── Synchronizer ────────────────────────────────────────────────────────────

struct FileSnapshot {
  text:     String,
  hash:     String,
  modified: DateTime<Utc>,
}

impl FileSnapshot {
  async fn read(path: &Path) -> Result<Self> {
    let io_error = |source| Error::Io {
      path: path.to_path_buf(),
      source,
    };
    let bytes = tokio::fs::read(path).await.map_err(io_error)?;
    let modified = tokio::fs::metadata(path)
      .await
      .and_then(|m| m.modified())
      .map_err(io_error)?;
    let text = String::from_utf8(bytes)?;
    Ok(Self {
      hash: hex::encode(Sha256::digest(text.as_bytes())),
      modified: DateTime::<Utc>::from(modified),
      text,
    })
  }
}

/// Loads ontology files through a [`TripleStoreService`].
pub struct SchemaSynchronizer<'a, S> {
  service: &'a TripleStoreService<S>,
}

impl<'a, S: TripleStorePort> SchemaSynchronizer<'a, S> {
  pub fn new(service: &'a TripleStoreService<S>) -> Self { Self { service } }

  async fn fetch_records(&self, file_path: Option<&str>) -> Result<SchemaCache> {
    let result = self.service.query(&records_query(file_path)).await?;
    Ok(
      result
        .into_solutions()
        .map(|solutions| SchemaCache::from_rows(&solutions))
        .unwrap_or_default(),
    )
  }

  /// Bring the store in line with the file at `path`.
  ///
  /// With a `cache`, the existing record is looked up there instead of in
  /// the store, and the cache is updated with whatever record results.
  ///
  /// A changed file always costs one insert of the additions and one remove
  /// of the deletions, even when either is empty.
  pub async fn load_schema(
    &self,
    path: &Path,
    cache: Option<&mut SchemaCache>,
  ) -> Result<SchemaOutcome> {
    let key = path.to_string_lossy().into_owned();
    let existing = match cache.as_deref() {
      Some(cache) => cache.lookup(&key)?,
      None => self.fetch_records(Some(&key)).await?.lookup(&key)?,
    };
    let snapshot = FileSnapshot::read(path).await?;
    let format = RdfFormat::from_path(path);

    let (outcome, record) = match existing {
      None => {
        let graph = Graph::parse(&snapshot.text, format)?;
        self.service.insert(&graph).await?;

        let subject =
          Iri::new_unchecked(format!("{}{}", vocab::INTERNAL_RECORD_NS, Uuid::new_v4()));
        let record = SchemaRecord::new(subject, key, &snapshot);
        self.service.insert(record.triples()).await?;
        (SchemaOutcome::Inserted, record)
      }
      Some(record) if record.hash == snapshot.hash => {
        tracing::debug!(path = %path.display(), "schema unchanged");
        return Ok(SchemaOutcome::Unchanged);
      }
      Some(previous) => {
        let old = Graph::parse(&previous.decode_content()?, format)?;
        let new = Graph::parse(&snapshot.text, format)?;
        let added = new.difference(&old);
        let removed = old.difference(&new);
        self.service.insert(&added).await?;
        self.service.remove(&removed).await?;

        let record = SchemaRecord::new(previous.subject.clone(), key, &snapshot);
        self.service.remove(previous.triples()).await?;
        self.service.insert(record.triples()).await?;
        let outcome = SchemaOutcome::Updated {
          added:   added.len(),
          removed: removed.len(),
        };
        (outcome, record)
      }
    };

    tracing::info!(path = %path.display(), ?outcome, "schema loaded");
    if let Some(cache) = cache {
      cache.store(record);
    }
    Ok(outcome)
  }

  /// Load every file in `paths`, reading existing records with one query up
  /// front. A failing file is logged and reported; the rest still load.
  pub async fn load_schemas<P: AsRef<Path>>(&self, paths: &[P]) -> Result<SchemaLoadReport> {
    let mut cache = self.fetch_records(None).await?;
    let mut report = SchemaLoadReport::default();
    for path in paths {
      let path = path.as_ref();
      match self.load_schema(path, Some(&mut cache)).await {
        Ok(outcome) => report.succeeded.push((path.to_path_buf(), outcome)),
        Err(e) => {
          tracing::error!(path = %path.display(), error = %e, "failed to load schema");
          report.failed.push((path.to_path_buf(), e));
        }
      }
    }
    Ok(report)
  }

  /// Every tracked ontology file's stored content, parsed and merged.
  pub async fn get_schema_graph(&self) -> Result<Graph> {
    let mut graph = Graph::new();
    let Some(solutions) = self.service.query(CONTENT_QUERY).await?.into_solutions() else {
      return Ok(graph);
    };
    for row in solutions.rows() {
      let Some(content) = row.get("o").and_then(Term::as_literal) else {
        continue;
      };
      let text = String::from_utf8(STANDARD.decode(content.value().trim())?)?;
      graph.extend(Graph::parse(&text, RdfFormat::Turtle)?);
    }
    Ok(graph)
  }
}
