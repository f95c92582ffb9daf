// ── Recipe store ──
//
// CRUD over the `recipes` collection. Owns identifier assignment and
// title-collision resolution; nothing else writes recipe documents.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{Ingredient, Recipe, RecipeId, RecipeSummary};
use crate::record::{from_document, to_document};
use crate::store::{Document, Filter, StoreError, StoreHandle, StoredDocument};

pub(crate) const RECIPES: &str = "recipes";

/// On-disk shape of a recipe. `id` is absent only if the process died
/// between the insert and the id back-fill.
#[derive(Debug, Serialize, Deserialize)]
struct RecipeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RecipeId>,
    title: String,
    ingredients: Vec<Ingredient>,
}

/// Recipes persisted in the session's document store.
#[derive(Debug, Clone)]
pub struct RecipeStore {
    store: StoreHandle,
}

impl RecipeStore {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    // ── Create ───────────────────────────────────────────────────────

    /// Store a new recipe and return its assigned id and final title.
    ///
    /// A taken title is not an error: it is rewritten with
    /// [`next_candidate_title`] until a free one is found.
    pub fn add_recipe(
        &self,
        title: &str,
        ingredients: &[Ingredient],
    ) -> Result<RecipeSummary, CoreError> {
        let mut candidate = title.to_owned();
        while self.find_by_title(&candidate)?.is_some() {
            let next = next_candidate_title(&candidate)?;
            debug!(taken = %candidate, next = %next, "recipe title collision");
            candidate = next;
        }
        if candidate != title {
            info!(requested = title, assigned = %candidate, "recipe title already used, renamed");
        }

        let record = to_document(
            RECIPES,
            &RecipeRecord {
                id: None,
                title: candidate.clone(),
                ingredients: ingredients.to_vec(),
            },
        )?;
        let key = self.store.insert(RECIPES, record)?;

        // The id is only known after insert, so it is written back separately.
        let id = RecipeId::from(key);
        let mut patch = Document::new();
        patch.insert("id".into(), Value::String(id.to_string()));
        self.store.update_by_id(RECIPES, key, patch)?;

        debug!(id = %id, title = %candidate, ingredients = ingredients.len(), "recipe added");
        Ok(RecipeSummary {
            id,
            title: candidate,
        })
    }

    // ── Read ─────────────────────────────────────────────────────────

    pub fn get_recipe_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, CoreError> {
        self.store
            .find_one(RECIPES, &Filter::eq("id", id.as_str()))?
            .map(decode_recipe)
            .transpose()
    }

    pub fn get_recipe_by_title(&self, title: &str) -> Result<Option<Recipe>, CoreError> {
        self.find_by_title(title)?.map(decode_recipe).transpose()
    }

    /// Lazily decoded `(id, title)` pairs in store order.
    ///
    /// Each call takes a fresh snapshot, so the sequence can be restarted.
    pub fn summaries(&self) -> Result<Summaries, CoreError> {
        let docs = self.store.find_all(RECIPES, None)?;
        Ok(Summaries {
            inner: docs.into_iter(),
        })
    }

    /// One `"<id> => <title>"` line per recipe.
    pub fn listing(&self) -> Result<String, CoreError> {
        let mut out = String::new();
        for summary in self.summaries()? {
            let _ = writeln!(out, "{}", summary?);
        }
        Ok(out)
    }

    // ── Update ───────────────────────────────────────────────────────

    /// Replace the ingredients of the recipe titled `title`, keeping its id.
    ///
    /// Returns `false` without touching anything when no recipe has that title.
    pub fn update_recipe_by_title(
        &self,
        title: &str,
        ingredients: &[Ingredient],
    ) -> Result<bool, CoreError> {
        let mut patch = Document::new();
        patch.insert(
            "ingredients".into(),
            serde_json::to_value(ingredients).map_err(StoreError::from)?,
        );
        let updated = self
            .store
            .update_where(RECIPES, &Filter::eq("title", title), patch)?;
        debug!(title, updated, "recipe ingredients replaced");
        Ok(updated > 0)
    }

    // ── Delete ───────────────────────────────────────────────────────

    pub fn delete_recipe_by_title(&self, title: &str) -> Result<bool, CoreError> {
        let removed = self.store.remove_where(RECIPES, &Filter::eq("title", title))?;
        debug!(title, removed, "recipe deleted by title");
        Ok(removed > 0)
    }

    /// Ids are stringified store keys; anything else matches no recipe.
    pub fn delete_recipe_by_id(&self, id: &RecipeId) -> Result<bool, CoreError> {
        let Some(key) = id.doc_id() else {
            return Ok(false);
        };
        let removed = self.store.remove_by_id(RECIPES, key)?;
        debug!(id = %id, removed, "recipe deleted by id");
        Ok(removed)
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn find_by_title(&self, title: &str) -> Result<Option<StoredDocument>, CoreError> {
        Ok(self.store.find_one(RECIPES, &Filter::eq("title", title))?)
    }
}

// ── Summaries ───────────────────────────────────────────────────────

/// Iterator returned by [`RecipeStore::summaries`].
#[derive(Debug)]
pub struct Summaries {
    inner: std::vec::IntoIter<StoredDocument>,
}

impl Iterator for Summaries {
    type Item = Result<RecipeSummary, CoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|stored| decode_recipe(stored).map(|recipe| recipe.summary()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Summaries {}

// ── Title collision resolution ──────────────────────────────────────

/// Next title to try after `title` turned out to be taken.
///
/// The title is split on `_`; a missing second segment counts as `0`.
/// The second segment is incremented and zero-padded to two digits, any
/// further segments are kept: `pasta` → `pasta_01`, `pasta_09` → `pasta_10`,
/// `a_1_b` → `a_02_b`. A non-numeric second segment is an
/// [`CoreError::InvalidTitleFormat`].
pub fn next_candidate_title(title: &str) -> Result<String, CoreError> {
    let mut segments: Vec<String> = title.split('_').map(str::to_owned).collect();
    let suffix = segments.get(1).map_or("0", String::as_str);

    let current: i64 = suffix
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidTitleFormat {
            title: title.to_owned(),
            reason: format!("suffix '{suffix}' is not an integer"),
        })?;
    let next = current
        .checked_add(1)
        .ok_or_else(|| CoreError::InvalidTitleFormat {
            title: title.to_owned(),
            reason: format!("suffix '{suffix}' is too large"),
        })?;
    let next = format!("{next:02}");

    if let Some(slot) = segments.get_mut(1) {
        *slot = next;
    } else {
        segments.push(next);
    }
    Ok(segments.join("_"))
}

// ── Codec ───────────────────────────────────────────────────────────

fn decode_recipe(stored: StoredDocument) -> Result<Recipe, CoreError> {
    let key = stored.id;
    let record: RecipeRecord = from_document(RECIPES, stored)?;
    let id = record.id.ok_or_else(|| CoreError::MalformedRecord {
        collection: RECIPES.into(),
        reason: format!("recipe {key} ('{}') has no id", record.title),
    })?;
    Ok(Recipe {
        id,
        title: record.title,
        ingredients: record.ingredients,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    fn store() -> RecipeStore {
        RecipeStore::new(Arc::new(MemoryStore::new()))
    }

    fn bolognese() -> Vec<Ingredient> {
        vec![
            Ingredient::new("pasta", 500, "g"),
            Ingredient::new("tomato", 500, "g"),
        ]
    }

    #[test]
    fn candidate_title_appends_first_suffix() {
        assert_eq!(next_candidate_title("pasta").unwrap(), "pasta_01");
    }

    #[test]
    fn candidate_title_increments_suffix() {
        assert_eq!(next_candidate_title("pasta_01").unwrap(), "pasta_02");
        assert_eq!(next_candidate_title("pasta_09").unwrap(), "pasta_10");
        assert_eq!(next_candidate_title("pasta_99").unwrap(), "pasta_100");
    }

    #[test]
    fn candidate_title_only_touches_second_segment() {
        assert_eq!(next_candidate_title("a_1_b").unwrap(), "a_02_b");
    }

    #[test]
    fn candidate_title_rejects_text_suffix() {
        let err = next_candidate_title("pasta_bolo").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTitleFormat { .. }));
        assert!(matches!(
            next_candidate_title("pasta_").unwrap_err(),
            CoreError::InvalidTitleFormat { .. }
        ));
    }

    #[test]
    fn title_collisions_get_numbered() {
        let recipes = store();
        let first = recipes.add_recipe("pasta", &bolognese()).unwrap();
        let second = recipes.add_recipe("pasta", &bolognese()).unwrap();
        let third = recipes.add_recipe("pasta", &bolognese()).unwrap();

        assert_eq!(first.title, "pasta");
        assert_eq!(second.title, "pasta_01");
        assert_eq!(third.title, "pasta_02");
        assert!(recipes.get_recipe_by_title("pasta_02").unwrap().is_some());
    }

    #[test]
    fn colliding_text_suffix_is_an_error() {
        let recipes = store();
        recipes.add_recipe("pasta_bolo", &bolognese()).unwrap();
        let err = recipes.add_recipe("pasta_bolo", &bolognese()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTitleFormat { .. }));
        assert_eq!(recipes.summaries().unwrap().len(), 1);
    }

    #[test]
    fn round_trip_keeps_ingredients_and_assigns_id() {
        let recipes = store();
        let carrots = vec![Ingredient::new("carrot", 2, "pcs")];
        recipes.add_recipe("soup", &carrots).unwrap();

        let soup = recipes.get_recipe_by_title("soup").unwrap().unwrap();
        assert_eq!(soup.ingredients, carrots);
        assert!(!soup.id.as_str().is_empty());
        assert_eq!(recipes.get_recipe_by_id(&soup.id).unwrap().unwrap(), soup);
    }

    #[test]
    fn ids_are_unique() {
        let recipes = store();
        let a = recipes.add_recipe("a", &[]).unwrap();
        let b = recipes.add_recipe("b", &[]).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn missing_recipe_reads_as_none() {
        let recipes = store();
        assert!(recipes.get_recipe_by_title("nope").unwrap().is_none());
        assert!(recipes.get_recipe_by_id(&RecipeId::from("9")).unwrap().is_none());
    }

    #[test]
    fn update_replaces_ingredients_and_keeps_id() {
        let recipes = store();
        let added = recipes.add_recipe("pasta", &bolognese()).unwrap();
        let milk = vec![Ingredient::new("milk", 1, "l")];

        assert!(recipes.update_recipe_by_title("pasta", &milk).unwrap());
        let updated = recipes.get_recipe_by_title("pasta").unwrap().unwrap();
        assert_eq!(updated.id, added.id);
        assert_eq!(updated.ingredients, milk);
    }

    #[test]
    fn update_of_unknown_title_is_a_no_op() {
        let recipes = store();
        assert!(!recipes.update_recipe_by_title("ghost", &bolognese()).unwrap());
        assert_eq!(recipes.summaries().unwrap().len(), 0);
    }

    #[test]
    fn delete_by_title_and_id() {
        let recipes = store();
        let a = recipes.add_recipe("a", &[]).unwrap();
        recipes.add_recipe("b", &[]).unwrap();

        assert!(recipes.delete_recipe_by_id(&a.id).unwrap());
        assert!(!recipes.delete_recipe_by_id(&a.id).unwrap());
        assert!(recipes.delete_recipe_by_title("b").unwrap());
        assert!(!recipes.delete_recipe_by_id(&RecipeId::from("x")).unwrap());
        assert_eq!(recipes.summaries().unwrap().len(), 0);
    }

    #[test]
    fn summaries_follow_insertion_order_and_restart() {
        let recipes = store();
        recipes.add_recipe("pasta bolo", &bolognese()).unwrap();
        recipes.add_recipe("pasta", &[]).unwrap();

        let titles = |r: &RecipeStore| -> Vec<String> {
            r.summaries()
                .unwrap()
                .map(|s| s.unwrap().title)
                .collect()
        };
        assert_eq!(titles(&recipes), vec!["pasta bolo", "pasta"]);
        recipes.add_recipe("soup", &[]).unwrap();
        assert_eq!(titles(&recipes), vec!["pasta bolo", "pasta", "soup"]);
    }

    #[test]
    fn listing_renders_one_line_per_recipe() {
        let recipes = store();
        recipes.add_recipe("pasta bolo", &bolognese()).unwrap();
        recipes.add_recipe("pasta", &[]).unwrap();
        assert_eq!(recipes.listing().unwrap(), "1 => pasta bolo\n2 => pasta\n");
    }

    #[test]
    fn recipe_without_id_is_malformed() {
        let handle: StoreHandle = Arc::new(MemoryStore::new());
        let mut doc = Document::new();
        doc.insert("title".into(), Value::from("orphan"));
        doc.insert("ingredients".into(), Value::Array(Vec::new()));
        handle.insert(RECIPES, doc).unwrap();

        let recipes = RecipeStore::new(handle);
        let err = recipes.get_recipe_by_title("orphan").unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }
}
