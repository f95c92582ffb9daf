// ── Shopping-list aggregator ──
//
// Entries (`recipes_list`) reference recipes by id. `generate` replays
// every entry against the recipe store, scales each ingredient by the
// entry quantity, and merges by `(name, unit)` into the consolidated list,
// which is materialized into `shopping_list`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use indexmap::map::Entry as Slot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{
    Entry, EntryId, Ingredient, IngredientKey, RecipeId, RecipeRef, ShoppingItem,
};
use crate::recipes::RecipeStore;
use crate::record::{from_document, to_document};
use crate::store::{Document, Filter, StoreHandle, StoredDocument};

pub(crate) const ENTRIES: &str = "recipes_list";
pub(crate) const MATERIALIZED: &str = "shopping_list";

#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    recipe_id: RecipeId,
    quantity: u32,
}

/// Recipes queued for shopping, and the list derived from them.
#[derive(Debug, Clone)]
pub struct ShoppingList {
    store: StoreHandle,
    recipes: RecipeStore,
}

impl ShoppingList {
    /// Both arguments should share the same underlying store handle.
    pub fn new(store: StoreHandle, recipes: RecipeStore) -> Self {
        Self { store, recipes }
    }

    pub fn recipes(&self) -> &RecipeStore {
        &self.recipes
    }

    // ── Entries: create ──────────────────────────────────────────────

    /// Queue the recipe titled `title`. `Ok(false)` if there is no such recipe.
    pub fn add_recipe_by_title(&self, title: &str, quantity: u32) -> Result<bool, CoreError> {
        ensure_positive(quantity)?;
        match self.recipes.get_recipe_by_title(title)? {
            Some(recipe) => {
                self.insert_entry(&recipe.id, quantity)?;
                Ok(true)
            }
            None => {
                debug!(title, "cannot queue unknown recipe");
                Ok(false)
            }
        }
    }

    /// Queue the recipe with id `id`. `Ok(false)` if there is no such recipe.
    pub fn add_recipe_by_id(&self, id: &RecipeId, quantity: u32) -> Result<bool, CoreError> {
        ensure_positive(quantity)?;
        if self.recipes.get_recipe_by_id(id)?.is_none() {
            debug!(id = %id, "cannot queue unknown recipe");
            return Ok(false);
        }
        self.insert_entry(id, quantity)?;
        Ok(true)
    }

    // ── Entries: read ────────────────────────────────────────────────

    pub fn entries(&self) -> Result<Vec<Entry>, CoreError> {
        self.store
            .find_all(ENTRIES, None)?
            .into_iter()
            .map(decode_entry)
            .collect()
    }

    /// Entries referencing the recipe with id `recipe_id`.
    pub fn entries_by_id(&self, recipe_id: &RecipeId) -> Result<Vec<Entry>, CoreError> {
        self.store
            .find_all(ENTRIES, Some(&by_recipe(recipe_id)))?
            .into_iter()
            .map(decode_entry)
            .collect()
    }

    /// Entries referencing the recipe currently titled `title`.
    pub fn entries_by_title(&self, title: &str) -> Result<Vec<Entry>, CoreError> {
        match self.recipes.get_recipe_by_title(title)? {
            Some(recipe) => self.entries_by_id(&recipe.id),
            None => Ok(Vec::new()),
        }
    }

    // ── Entries: update / delete ─────────────────────────────────────

    /// Set the quantity of every entry for the given recipe.
    ///
    /// Returns `false` when nothing was updated (unknown title, or no
    /// entries for that recipe).
    pub fn update_entry_quantity(
        &self,
        recipe: &RecipeRef,
        quantity: u32,
    ) -> Result<bool, CoreError> {
        ensure_positive(quantity)?;
        let Some(recipe_id) = self.resolve(recipe)? else {
            return Ok(false);
        };
        let mut patch = Document::new();
        patch.insert("quantity".into(), Value::from(quantity));
        let updated = self
            .store
            .update_where(ENTRIES, &by_recipe(&recipe_id), patch)?;
        debug!(recipe = %recipe, quantity, updated, "entry quantity updated");
        Ok(updated > 0)
    }

    /// Remove every entry for the recipe currently titled `title`.
    pub fn delete_entry_by_title(&self, title: &str) -> Result<bool, CoreError> {
        let Some(recipe) = self.recipes.get_recipe_by_title(title)? else {
            return Ok(false);
        };
        let removed = self.store.remove_where(ENTRIES, &by_recipe(&recipe.id))?;
        debug!(title, removed, "entries removed");
        Ok(removed > 0)
    }

    pub fn delete_entry_by_id(&self, id: EntryId) -> Result<bool, CoreError> {
        let removed = self.store.remove_by_id(ENTRIES, id)?;
        debug!(entry = %id, removed, "entry removed");
        Ok(removed)
    }

    /// Remove every entry, typically once a list was exported.
    ///
    /// Entry keys keep growing afterwards, so an id seen before the clear
    /// never names a later entry.
    pub fn clear(&self) -> Result<(), CoreError> {
        let removed = self.store.remove_where(ENTRIES, &Filter::all_of([]))?;
        debug!(removed, "shopping-list entries cleared");
        Ok(())
    }

    // ── Generation ───────────────────────────────────────────────────

    /// Build the consolidated shopping list from the current entries.
    ///
    /// Items come out in first-seen order. The previous materialized list
    /// is replaced, and, when `output` is given, written there as
    /// `"<name> => <quantity> <unit>"` lines (overwriting the file).
    ///
    /// An entry whose recipe has been deleted aborts the whole run with
    /// [`CoreError::DanglingReference`]; the previous list is then kept.
    pub fn generate(&self, output: Option<&Path>) -> Result<Vec<ShoppingItem>, CoreError> {
        let entries = self.entries()?;
        let mut totals: IndexMap<IngredientKey, Ingredient> = IndexMap::new();

        for entry in &entries {
            let Some(recipe) = self.recipes.get_recipe_by_id(&entry.recipe_id)? else {
                warn!(
                    entry = %entry.id,
                    recipe = %entry.recipe_id,
                    "shopping-list entry refers to a deleted recipe"
                );
                return Err(CoreError::DanglingReference {
                    entry_id: entry.id,
                    recipe_id: entry.recipe_id.clone(),
                });
            };
            for ingredient in &recipe.ingredients {
                let scaled = ingredient.scaled(entry.quantity);
                match totals.entry(scaled.key()) {
                    Slot::Occupied(mut slot) => {
                        let merged = slot.get().merge(&scaled)?;
                        slot.insert(merged);
                    }
                    Slot::Vacant(slot) => {
                        slot.insert(scaled);
                    }
                }
            }
        }

        self.store.drop_collection(MATERIALIZED)?;
        for ingredient in totals.into_values() {
            let item = ShoppingItem {
                name: ingredient.name,
                quantity: ingredient.quantity,
                unit: ingredient.unit,
            };
            self.store.insert(MATERIALIZED, to_document(MATERIALIZED, &item)?)?;
        }

        let items = self.materialized()?;
        if let Some(path) = output {
            fs::write(path, export_lines(&items)).map_err(|source| CoreError::Export {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "shopping list exported");
        }
        info!(
            entries = entries.len(),
            items = items.len(),
            "shopping list generated"
        );
        Ok(items)
    }

    /// The list produced by the last [`generate`](Self::generate) call.
    pub fn materialized(&self) -> Result<Vec<ShoppingItem>, CoreError> {
        self.store
            .find_all(MATERIALIZED, None)?
            .into_iter()
            .map(|stored| from_document(MATERIALIZED, stored))
            .collect()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn insert_entry(&self, recipe_id: &RecipeId, quantity: u32) -> Result<EntryId, CoreError> {
        let record = EntryRecord {
            recipe_id: recipe_id.clone(),
            quantity,
        };
        let id = self.store.insert(ENTRIES, to_document(ENTRIES, &record)?)?;
        debug!(entry = %id, recipe = %recipe_id, quantity, "entry added");
        Ok(id)
    }

    fn resolve(&self, recipe: &RecipeRef) -> Result<Option<RecipeId>, CoreError> {
        match recipe {
            RecipeRef::Id(id) => Ok(Some(id.clone())),
            RecipeRef::Title(title) => Ok(self
                .recipes
                .get_recipe_by_title(title)?
                .map(|recipe| recipe.id)),
        }
    }
}

/// Export file body: one `"<name> => <amount>\n"` line per item.
pub fn export_lines(items: &[ShoppingItem]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{item}");
    }
    out
}

fn ensure_positive(quantity: u32) -> Result<(), CoreError> {
    if quantity == 0 {
        return Err(CoreError::InvalidQuantity { quantity });
    }
    Ok(())
}

fn by_recipe(recipe_id: &RecipeId) -> Filter {
    Filter::eq("recipe_id", recipe_id.as_str())
}

fn decode_entry(stored: StoredDocument) -> Result<Entry, CoreError> {
    let id = stored.id;
    let record: EntryRecord = from_document(ENTRIES, stored)?;
    Ok(Entry {
        id,
        recipe_id: record.recipe_id,
        quantity: record.quantity,
    })
}
