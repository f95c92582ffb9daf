//! Recipe command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use larder_core::{Ingredient, Larder, Recipe, RecipeRef, RecipeSummary};

use crate::cli::{RecipesArgs, RecipesCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
}

impl From<&RecipeSummary> for SummaryRow {
    fn from(s: &RecipeSummary) -> Self {
        Self {
            id: s.id.to_string(),
            title: s.title.clone(),
        }
    }
}

#[derive(Tabled)]
struct IngredientRow {
    #[tabled(rename = "Ingredient")]
    name: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

impl From<&Ingredient> for IngredientRow {
    fn from(i: &Ingredient) -> Self {
        Self {
            name: i.name.clone(),
            quantity: i.quantity.to_string(),
            unit: i.unit.clone(),
        }
    }
}

fn detail(recipe: &Recipe) -> String {
    let mut out = format!("{} (id {})\n", recipe.title, recipe.id);
    if recipe.ingredients.is_empty() {
        out.push_str("  no ingredients");
    } else {
        let rows: Vec<IngredientRow> = recipe.ingredients.iter().map(IngredientRow::from).collect();
        out.push_str(&output::render_table(&rows));
    }
    out
}

fn plain(recipe: &Recipe) -> String {
    let mut out = format!("{} => {}", recipe.id, recipe.title);
    for ingredient in &recipe.ingredients {
        let _ = write!(out, "\n  {ingredient}");
    }
    out
}

fn find(larder: &Larder, target: &RecipeRef) -> Result<Recipe, CliError> {
    let recipes = larder.recipes();
    let found = match target {
        RecipeRef::Id(id) => recipes.get_recipe_by_id(id)?,
        RecipeRef::Title(title) => recipes.get_recipe_by_title(title)?,
    };
    found.ok_or_else(|| CliError::recipe_not_found(target.to_string()))
}

// ── Handler ──────────────────────────────────────────────────────────

pub fn handle(larder: &Larder, args: RecipesArgs, settings: &Settings) -> Result<(), CliError> {
    let recipes = larder.recipes();

    match args.command {
        RecipesCommand::List => {
            let summaries = recipes.summaries()?.collect::<Result<Vec<_>, _>>()?;
            let out = output::render_list(
                settings.output,
                &summaries,
                |s| SummaryRow::from(s),
                |s| s.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        RecipesCommand::Show(target) => {
            let recipe = find(larder, &util::recipe_ref(&target)?)?;
            let out = output::render_single(settings.output, &recipe, detail, plain)?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        RecipesCommand::Add { title, ingredients } => {
            let ingredients = util::collect_ingredients(&ingredients)?;
            let summary = recipes.add_recipe(&title, &ingredients)?;
            if summary.title != title {
                output::warning(
                    &format!("'{title}' is taken, stored as '{}'", summary.title),
                    settings.color,
                );
            }
            let out = output::render_single(
                settings.output,
                &summary,
                |s| format!("Added recipe {} (id {})", s.title, s.id),
                |s| s.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        RecipesCommand::Update { title, ingredients } => {
            let ingredients = util::collect_ingredients(&ingredients)?;
            if !recipes.update_recipe_by_title(&title, &ingredients)? {
                return Err(CliError::recipe_not_found(format!("'{title}'")));
            }
            output::status(
                &format!("Updated '{title}' ({} ingredients)", ingredients.len()),
                settings.color,
                settings.quiet,
            );
            Ok(())
        }

        RecipesCommand::Delete(target) => {
            let target = util::recipe_ref(&target)?;
            if !util::confirm(&format!("Delete recipe {target}?"), "recipes delete", settings.yes)? {
                return Ok(());
            }
            let deleted = match &target {
                RecipeRef::Id(id) => recipes.delete_recipe_by_id(id)?,
                RecipeRef::Title(title) => recipes.delete_recipe_by_title(title)?,
            };
            if !deleted {
                return Err(CliError::recipe_not_found(target.to_string()));
            }
            output::status(&format!("Deleted recipe {target}"), settings.color, settings.quiet);
            Ok(())
        }
    }
}
