use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EntryId, IngredientKey, Quantity, RecipeId};

/// A recipe reference plus how many times to include it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub recipe_id: RecipeId,
    pub quantity: u32,
}

/// One line of the consolidated shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
}

impl ShoppingItem {
    /// Display amount, `"<quantity> <unit>"`.
    pub fn amount(&self) -> String {
        format!("{} {}", self.quantity, self.unit)
    }

    pub fn key(&self) -> IngredientKey {
        IngredientKey {
            name: self.name.clone(),
            unit: self.unit.clone(),
        }
    }

    /// `(name, amount)` as presented to users.
    pub fn to_pair(&self) -> (String, String) {
        (self.name.clone(), self.amount())
    }
}

impl fmt::Display for ShoppingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.name, self.amount())
    }
}
