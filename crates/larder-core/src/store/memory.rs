use std::sync::{Mutex, MutexGuard};

use super::tables::Tables;
use super::{DocId, Document, DocumentStore, Filter, StoreError, StoredDocument};

/// Volatile store. Everything is lost when the last handle is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&self, collection: &str, record: Document) -> Result<DocId, StoreError> {
        Ok(self.lock()?.insert(collection, record))
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
        Ok(self.lock()?.update_where(collection, filter, &patch))
    }

    fn update_by_id(
        &self,
        collection: &str,
        id: DocId,
        patch: Document,
    ) -> Result<bool, StoreError> {
        Ok(self.lock()?.update_by_id(collection, id, &patch))
    }

    fn remove_where(&self, collection: &str, filter: &Filter) -> Result<usize, StoreError> {
        Ok(self.lock()?.remove_where(collection, filter))
    }

    fn remove_by_id(&self, collection: &str, id: DocId) -> Result<bool, StoreError> {
        Ok(self.lock()?.remove_by_id(collection, id))
    }

    fn drop_collection(&self, collection: &str) -> Result<(), StoreError> {
        self.lock()?.drop_collection(collection);
        Ok(())
    }
}
