// ── Document store boundary ──
//
// The recipe store and the shopping-list aggregator only ever talk to a
// `DocumentStore`. Backends are interchangeable: an in-memory map for
// tests and scratch sessions, or a single JSON file on disk.
//
// Every call stands alone. There are no transactions across calls, so
// callers re-read instead of assuming earlier results still hold.

mod error;
mod json_file;
mod memory;
mod tables;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// A stored record: a flat JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Shared handle to the session's store, opened once and reused by every
/// collection consumer.
pub type StoreHandle = Arc<dyn DocumentStore>;

// ── DocId ───────────────────────────────────────────────────────────

/// Store-assigned key of a document within its collection.
///
/// Keys start at 1 and only grow; a removed key is not handed out again
/// until its whole collection is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(u64);

impl DocId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A document together with the key it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocId,
    pub doc: Document,
}

// ── Filter ──────────────────────────────────────────────────────────

/// Predicate over documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field is present and equal to the value.
    Eq { field: String, value: Value },
    /// Every inner filter matches. An empty list matches everything.
    AllOf(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn all_of(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::AllOf(filters.into_iter().collect())
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Eq { field, value } => doc.get(field) == Some(value),
            Self::AllOf(filters) => filters.iter().all(|f| f.matches(doc)),
        }
    }
}

// ── DocumentStore ───────────────────────────────────────────────────

/// Generic collection-of-records backend.
///
/// Methods take `&self`; implementations serialize access internally.
/// Collections spring into existence on first insert. Querying a missing
/// collection behaves like querying an empty one.
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Append a record and return its newly assigned key.
    fn insert(&self, collection: &str, record: Document) -> Result<DocId, StoreError>;

    fn get_by_id(&self, collection: &str, id: DocId) -> Result<Option<Document>, StoreError>;

    /// First record (in store order) matching `filter`.
    fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>, StoreError>;

    /// All records matching `filter`, or every record when it is `None`.
    fn find_all(
        &self,
        collection: &str,
        filter: Option<&Filter>,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    /// Shallow-merge `patch` into every matching record.
    fn update_where(
        &self,
        collection: &str,
        filter: &Filter,
        patch: Document,
    ) -> Result<usize, StoreError>;

    /// Shallow-merge `patch` into one record. `false` if the key is absent.
    fn update_by_id(&self, collection: &str, id: DocId, patch: Document)
    -> Result<bool, StoreError>;

    fn remove_where(&self, collection: &str, filter: &Filter) -> Result<usize, StoreError>;

    fn remove_by_id(&self, collection: &str, id: DocId) -> Result<bool, StoreError>;

    /// Delete a collection and all its records.
    fn drop_collection(&self, collection: &str) -> Result<(), StoreError>;
}
