// ── Domain model ──
//
// Plain value types shared by the recipe store, the shopping-list
// aggregator, and presentation layers. None of them hold store handles.

pub mod entry;
pub mod ids;
pub mod ingredient;
pub mod recipe;

pub use entry::{Entry, ShoppingItem};
pub use ids::{EntryId, RecipeId};
pub use ingredient::{Ingredient, IngredientKey, Quantity};
pub use recipe::{Recipe, RecipeRef, RecipeSummary};
