// ── Shared in-process table storage ──
//
// Backing structure for both `MemoryStore` and `JsonFileStore`.
// Collections and their documents keep insertion order, which is the
// iteration order every query reports.

use indexmap::IndexMap;

use super::{DocId, Document, Filter, StoredDocument};

#[derive(Debug, Clone, Default)]
pub(crate) struct Collection {
    pub(crate) docs: IndexMap<DocId, Document>,
    /// Highest key ever handed out for this collection. Removing documents
    /// never lowers it.
    pub(crate) last_id: u64,
}

impl Collection {
    fn next_id(&mut self) -> DocId {
        self.last_id += 1;
        DocId::new(self.last_id)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub(crate) collections: IndexMap<String, Collection>,
}

impl Tables {
    pub(crate) fn insert(&mut self, collection: &str, record: Document) -> DocId {
        let col = self.collections.entry(collection.to_owned()).or_default();
        let id = col.next_id();
        col.docs.insert(id, record);
        id
    }

    pub(crate) fn get_by_id(&self, collection: &str, id: DocId) -> Option<Document> {
        self.collections
            .get(collection)
            .and_then(|col| col.docs.get(&id))
            .cloned()
    }

    pub(crate) fn find_one(&self, collection: &str, filter: &Filter) -> Option<StoredDocument> {
        let col = self.collections.get(collection)?;
        col.docs
            .iter()
            .find(|(_, doc)| filter.matches(doc))
            .map(|(id, doc)| StoredDocument {
                id: *id,
                doc: doc.clone(),
            })
    }

    pub(crate) fn find_all(&self, collection: &str, filter: Option<&Filter>) -> Vec<StoredDocument> {
        let Some(col) = self.collections.get(collection) else {
            return Vec::new();
        };
        col.docs
            .iter()
            .filter(|(_, doc)| filter.is_none_or(|f| f.matches(doc)))
            .map(|(id, doc)| StoredDocument {
                id: *id,
                doc: doc.clone(),
            })
            .collect()
    }

    pub(crate) fn update_where(&mut self, collection: &str, filter: &Filter, patch: &Document) -> usize {
        let Some(col) = self.collections.get_mut(collection) else {
            return 0;
        };
        let mut updated = 0;
        for doc in col.docs.values_mut().filter(|doc| filter.matches(doc)) {
            apply_patch(doc, patch);
            updated += 1;
        }
        updated
    }

    pub(crate) fn update_by_id(&mut self, collection: &str, id: DocId, patch: &Document) -> bool {
        match self
            .collections
            .get_mut(collection)
            .and_then(|col| col.docs.get_mut(&id))
        {
            Some(doc) => {
                apply_patch(doc, patch);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_where(&mut self, collection: &str, filter: &Filter) -> usize {
        let Some(col) = self.collections.get_mut(collection) else {
            return 0;
        };
        let before = col.docs.len();
        col.docs.retain(|_, doc| !filter.matches(doc));
        before - col.docs.len()
    }

    pub(crate) fn remove_by_id(&mut self, collection: &str, id: DocId) -> bool {
        self.collections
            .get_mut(collection)
            .is_some_and(|col| col.docs.shift_remove(&id).is_some())
    }

    /// Returns `true` if the collection existed.
    pub(crate) fn drop_collection(&mut self, collection: &str) -> bool {
        self.collections.shift_remove(collection).is_some()
    }
}

fn apply_patch(doc: &mut Document, patch: &Document) {
    for (field, value) in patch {
        doc.insert(field.clone(), value.clone());
    }
}
