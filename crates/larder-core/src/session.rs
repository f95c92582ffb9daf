// ── Session facade ──
//
// One store handle per session, shared by the recipe store and the
// shopping list. Dropping the `Larder` closes the session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::error::CoreError;
use crate::recipes::RecipeStore;
use crate::shopping::ShoppingList;
use crate::store::{JsonFileStore, MemoryStore, StoreHandle};

/// Entry point for presentation layers.
#[derive(Debug, Clone)]
pub struct Larder {
    store: StoreHandle,
    shopping: ShoppingList,
    location: Option<PathBuf>,
}

impl Larder {
    /// Open (or lazily create) the JSON database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let store = JsonFileStore::open(path)?;
        info!(path = %path.display(), "larder session opened");
        let mut larder = Self::with_store(Arc::new(store));
        larder.location = Some(path.to_path_buf());
        Ok(larder)
    }

    /// Scratch session backed by memory only.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Session over an arbitrary backend.
    pub fn with_store(store: StoreHandle) -> Self {
        let recipes = RecipeStore::new(Arc::clone(&store));
        let shopping = ShoppingList::new(Arc::clone(&store), recipes);
        Self {
            store,
            shopping,
            location: None,
        }
    }

    pub fn recipes(&self) -> &RecipeStore {
        self.shopping.recipes()
    }

    pub fn shopping_list(&self) -> &ShoppingList {
        &self.shopping
    }

    /// The raw store handle, for tools that inspect collections directly.
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Database file path, `None` for non-file backends.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Ingredient;

    #[test]
    fn recipes_and_shopping_list_share_one_store() {
        let larder = Larder::in_memory();
        larder
            .recipes()
            .add_recipe("soup", &[Ingredient::new("carrot", 2, "pcs")])
            .unwrap();
        assert!(larder.shopping_list().add_recipe_by_title("soup", 1).unwrap());
        assert_eq!(larder.store().find_all("recipes", None).unwrap().len(), 1);
        assert_eq!(larder.store().find_all("recipes_list", None).unwrap().len(), 1);
        assert!(larder.location().is_none());
    }
}
