//! IRIs this crate and its dependents refer to by name.

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
pub const XSD_BASE64_BINARY: &str =
  "http://www.w3.org/2001/XMLSchema#base64Binary";

/// Namespace of the store's own bookkeeping vocabulary.
pub const INTERNAL_NS: &str = "http://triple-store.internal#";
/// Prefix for minted schema-record subjects.
pub const INTERNAL_RECORD_NS: &str = "http://triple-store.internal/";

pub const INTERNAL_SCHEMA: &str = "http://triple-store.internal#Schema";
pub const INTERNAL_HASH: &str = "http://triple-store.internal#hash";
pub const INTERNAL_FILE_PATH: &str = "http://triple-store.internal#filePath";
pub const INTERNAL_FILE_LAST_UPDATE_TIME: &str =
  "http://triple-store.internal#fileLastUpdateTime";
pub const INTERNAL_CONTENT: &str = "http://triple-store.internal#content";

/// Datatypes whose values are coerced to integers when read back.
pub fn is_integer_datatype(iri: &str) -> bool {
  iri == XSD_INTEGER || iri == XSD_LONG
}
