//! Recipe store and shopping-list aggregation engine.
//!
//! This crate is the whole data layer of larder; the CLI only calls into
//! the contracts below:
//!
//! - **[`Larder`]**: Session facade. Opens one store handle and shares it
//!   between the recipe store and the shopping list.
//!
//! - **[`RecipeStore`]**: CRUD over recipe documents. Assigns identifiers
//!   and resolves title collisions (`pasta` → `pasta_01` → `pasta_02`).
//!
//! - **[`ShoppingList`]**: Queues `(recipe, quantity)` entries and
//!   [`generate`](ShoppingList::generate)s the consolidated list by scaling
//!   and merging ingredients on their exact `(name, unit)` identity.
//!
//! - **[`store`]**: The [`DocumentStore`] boundary with an in-memory and a
//!   JSON-file backend.

pub mod error;
pub mod model;
pub mod recipes;
mod record;
pub mod session;
pub mod shopping;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use recipes::{RecipeStore, Summaries, next_candidate_title};
pub use session::Larder;
pub use shopping::{ShoppingList, export_lines};
pub use store::{
    DocId, Document, DocumentStore, Filter, JsonFileStore, MemoryStore, StoreError, StoreHandle,
    StoredDocument,
};

pub use model::{
    Entry, EntryId, Ingredient, IngredientKey, Quantity, Recipe, RecipeId, RecipeRef,
    RecipeSummary, ShoppingItem,
};
