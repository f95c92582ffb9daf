use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Ingredient, RecipeId};

/// A titled, identified collection of ingredients.
///
/// Snapshots handed out by the recipe store are detached copies; editing
/// one has no effect on the stored recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id.clone(),
            title: self.title.clone(),
        }
    }
}

/// `(id, title)` pair used for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
}

impl fmt::Display for RecipeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.id, self.title)
    }
}

/// Selects a recipe either by identifier or by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeRef {
    Id(RecipeId),
    Title(String),
}

impl fmt::Display for RecipeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Title(title) => write!(f, "'{title}'"),
        }
    }
}
