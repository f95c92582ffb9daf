// ── Core error types ──
//
// Deterministic consequences of input or state; none of them is retried.
// "Recipe not found" is not an error here: read paths return `None` or an
// empty list and entry inserts return `false`.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{EntryId, IngredientKey, RecipeId};
use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Domain errors ────────────────────────────────────────────────
    #[error("cannot merge ingredient {left} with {right}: name and unit must match")]
    IncompatibleIngredient {
        left: IngredientKey,
        right: IngredientKey,
    },

    #[error("cannot derive a free title from '{title}': {reason}")]
    InvalidTitleFormat { title: String, reason: String },

    #[error("shopping-list entry {entry_id} refers to recipe {recipe_id}, which no longer exists")]
    DanglingReference {
        entry_id: EntryId,
        recipe_id: RecipeId,
    },

    #[error("entry quantity must be a positive integer, got {quantity}")]
    InvalidQuantity { quantity: u32 },

    // ── Storage errors ───────────────────────────────────────────────
    #[error("malformed record in '{collection}': {reason}")]
    MalformedRecord { collection: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to write shopping list to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
