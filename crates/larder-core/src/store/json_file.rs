// ── File-backed store ──
//
// One JSON object per database file:
//
//   { "_meta": { "last_ids": { "<collection>": <key>, ... } },
//     "<collection>": { "<key>": { ...document... }, ... }, ... }
//
// `_meta` keeps each collection's highest issued key so that keys of
// removed documents are not handed out again in a later session.
//
// The whole file is rewritten after every mutating call. Reads never
// touch the disk after the initial load. A mutation is applied to a copy
// of the tables and only becomes visible once the file write succeeded.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tables::{Collection, Tables};
use super::{DocId, Document, DocumentStore, Filter, StoreError, StoredDocument};

/// Top-level key reserved for store bookkeeping.
const META_KEY: &str = "_meta";

#[derive(Debug, Default, Serialize, Deserialize)]
struct OnDisk {
    #[serde(rename = "_meta", default)]
    meta: Meta,
    #[serde(flatten)]
    collections: IndexMap<String, IndexMap<String, Document>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Meta {
    #[serde(default)]
    last_ids: IndexMap<String, u64>,
}

/// Store persisted as a single JSON document on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    tables: Mutex<Tables>,
}

impl JsonFileStore {
    /// Open the database at `path`. A missing file is an empty database;
    /// it is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tables = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            load_tables(&path, &raw)?
        } else {
            Tables::default()
        };
        debug!(
            path = %path.display(),
            collections = tables.collections.len(),
            "opened database"
        );
        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Run a mutation under the lock against a staged copy of the tables.
    ///
    /// If it changed anything the copy is written out first and only then
    /// replaces the live tables; a failed write leaves both untouched.
    fn mutate<R>(
        &self,
        op: impl FnOnce(&mut Tables) -> R,
        changed: impl FnOnce(&R) -> bool,
    ) -> Result<R, StoreError> {
        let mut tables = self.lock()?;
        let mut staged = tables.clone();
        let result = op(&mut staged);
        if changed(&result) {
            self.persist(&staged)?;
            *tables = staged;
        }
        Ok(result)
    }

    fn persist(&self, tables: &Tables) -> Result<(), StoreError> {
        let on_disk = OnDisk {
            meta: Meta {
                last_ids: tables
                    .collections
                    .iter()
                    .map(|(name, col)| (name.clone(), col.last_id))
                    .collect(),
            },
            collections: tables
                .collections
                .iter()
                .map(|(name, col)| {
                    let docs = col
                        .docs
                        .iter()
                        .map(|(id, doc)| (id.to_string(), doc.clone()))
                        .collect();
                    (name.clone(), docs)
                })
                .collect(),
        };
        let body = serde_json::to_string_pretty(&on_disk)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, body)?;
        debug!(path = %self.path.display(), "database written");
        Ok(())
    }
}

fn load_tables(path: &Path, raw: &str) -> Result<Tables, StoreError> {
    if raw.trim().is_empty() {
        return Ok(Tables::default());
    }
    let on_disk: OnDisk = serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut tables = Tables::default();
    for (name, docs) in on_disk.collections {
        let mut col = Collection {
            last_id: on_disk.meta.last_ids.get(&name).copied().unwrap_or(0),
            ..Collection::default()
        };
        for (key, doc) in docs {
            let id: DocId = key.parse().map_err(|_| StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: format!("collection '{name}' has non-numeric key '{key}'"),
            })?;
            col.last_id = col.last_id.max(id.get());
            col.docs.insert(id, doc);
        }
        tables.collections.insert(name, col);
    }
    Ok(tables)
}

/// Collections cannot use the name reserved for bookkeeping.
fn check_name(collection: &str) -> Result<(), StoreError> {
    if collection == META_KEY {
        return Err(StoreError::ReservedCollection {
            name: collection.to_owned(),
        });
    }
    Ok(())
}

impl DocumentStore for JsonFileStore {
    fn insert(&self, collection: &str, record: Document) -> Result<DocId, StoreError> {
        check_name(collection)?;
        self.mutate(|t| t.insert(collection, record), |_| true)
    }

    fn get_by_id(&self, collection: &str, id: DocId) -> Result<Option<Document>, StoreError> {
        Ok(self.lock()?.get_by_id(collection, id))
    }

    fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>, StoreError> {
        Ok(self.lock()?.find_one(collection, filter))
    }

    fn find_all(
        &self,
        collection: &str,
        filter: Option<&Filter>,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        Ok(self.lock()?.find_all(collection, filter))
    }

    fn update_where(
        &self,
        collection: &str,
        filter: &Filter,
        patch: Document,
    ) -> Result<usize, StoreError> {
        self.mutate(
            |t| t.update_where(collection, filter, &patch),
            |n| *n > 0,
        )
    }

    fn update_by_id(
        &self,
        collection: &str,
        id: DocId,
        patch: Document,
    ) -> Result<bool, StoreError> {
        self.mutate(|t| t.update_by_id(collection, id, &patch), |hit| *hit)
    }

    fn remove_where(&self, collection: &str, filter: &Filter) -> Result<usize, StoreError> {
        self.mutate(|t| t.remove_where(collection, filter), |n| *n > 0)
    }

    fn remove_by_id(&self, collection: &str, id: DocId) -> Result<bool, StoreError> {
        self.mutate(|t| t.remove_by_id(collection, id), |hit| *hit)
    }

    fn drop_collection(&self, collection: &str) -> Result<(), StoreError> {
        self.mutate(|t| t.drop_collection(collection), |existed| *existed)?;
        Ok(())
    }
}
