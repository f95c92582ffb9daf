//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use larder_core::{Ingredient, Quantity, RecipeId, RecipeRef};

use crate::cli::{IngredientArgs, RecipeTarget};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal on stdin there is nobody to ask, so the action is
/// refused instead of hanging.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Turn a `--id` / title pair into a recipe reference.
pub fn recipe_ref(target: &RecipeTarget) -> Result<RecipeRef, CliError> {
    match (&target.id, &target.title) {
        (Some(id), _) => Ok(RecipeRef::Id(RecipeId::from(id.as_str()))),
        (None, Some(title)) => Ok(RecipeRef::Title(title.clone())),
        (None, None) => Err(CliError::Validation {
            field: "recipe".into(),
            reason: "give a title or --id".into(),
        }),
    }
}

/// Parse `NAME:QUANTITY:UNIT`. Splits from the right so names may contain ':'.
pub fn parse_ingredient(raw: &str) -> Result<Ingredient, CliError> {
    let invalid = |reason: &str| CliError::Validation {
        field: "ingredient".into(),
        reason: format!("'{raw}': {reason}"),
    };

    let mut parts = raw.rsplitn(3, ':');
    let (Some(unit), Some(quantity), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid("expected NAME:QUANTITY:UNIT"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    let quantity: Quantity = quantity
        .trim()
        .parse()
        .map_err(|_| invalid("quantity is not a number"))?;

    Ok(Ingredient::new(name, quantity, unit.trim()))
}

/// Collect ingredients from `-i` flags followed by `--from-file` contents.
pub fn collect_ingredients(args: &IngredientArgs) -> Result<Vec<Ingredient>, CliError> {
    let mut ingredients = args
        .ingredients
        .iter()
        .map(|raw| parse_ingredient(raw))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(path) = &args.from_file {
        ingredients.extend(read_ingredients_file(path)?);
    }
    Ok(ingredients)
}

/// Read a JSON array of `{name, quantity, unit}` objects.
pub fn read_ingredients_file(path: &Path) -> Result<Vec<Ingredient>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_quantity_unit() {
        let ing = parse_ingredient("pasta:500:g").unwrap();
        assert_eq!(ing, Ingredient::new("pasta", 500, "g"));
    }

    #[test]
    fn name_may_contain_colons() {
        let ing = parse_ingredient("sauce: tomato:0.5:l").unwrap();
        assert_eq!(ing.name, "sauce: tomato");
        assert_eq!(ing.quantity, "0.5".parse::<Quantity>().unwrap());
        assert_eq!(ing.unit, "l");
    }

    #[test]
    fn empty_unit_is_allowed() {
        let ing = parse_ingredient("egg:3:").unwrap();
        assert_eq!(ing.unit, "");
    }

    #[test]
    fn rejects_missing_parts_and_bad_numbers() {
        assert!(parse_ingredient("pasta:500").is_err());
        assert!(parse_ingredient("pasta:lots:g").is_err());
        assert!(parse_ingredient(":1:g").is_err());
    }

    #[test]
    fn rejects_non_finite_quantities() {
        for raw in ["soup:nan:l", "soup:inf:l", "soup:-inf:l"] {
            assert!(parse_ingredient(raw).is_err(), "{raw} accepted");
        }
    }

    #[test]
    fn reads_ingredients_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ingredients.json");
        std::fs::write(
            &path,
            r#"[{"name":"rice","quantity":200,"unit":"g"},{"name":"oil","quantity":1.5,"unit":"tbsp"}]"#,
        )
        .unwrap();
        let ingredients = read_ingredients_file(&path).unwrap();
        assert_eq!(
            ingredients,
            vec![
                Ingredient::new("rice", 200, "g"),
                Ingredient::new("oil", "1.5".parse::<Quantity>().unwrap(), "tbsp"),
            ]
        );
    }
}
