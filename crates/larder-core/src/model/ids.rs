// ── Identity types ──
//
// Recipes are addressed by the stringified store key assigned on insert.
// Shopping-list entries carry the raw key of their own collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::DocId;

/// Store-assigned recipe identifier, kept in its stringified form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The store key this id was derived from, if it is one.
    pub fn doc_id(&self) -> Option<DocId> {
        self.0.parse().ok()
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecipeId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<DocId> for RecipeId {
    fn from(id: DocId) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecipeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Key of a shopping-list entry within the entries collection.
pub type EntryId = DocId;
