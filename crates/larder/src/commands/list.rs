//! Shopping-list command handlers.

use std::path::PathBuf;

use serde::Serialize;
use tabled::Tabled;

use larder_core::{Entry, EntryId, Larder, RecipeId, RecipeRef, ShoppingItem};

use crate::cli::{ListArgs, ListCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ────────────────────────────────────────────────────────────

/// An entry joined with the title of the recipe it points at.
#[derive(Debug, Serialize)]
struct EntryView {
    id: EntryId,
    recipe_id: RecipeId,
    recipe: Option<String>,
    quantity: u32,
}

impl EntryView {
    fn recipe_label(&self) -> &str {
        self.recipe.as_deref().unwrap_or("(deleted)")
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Entry")]
    id: String,
    #[tabled(rename = "Recipe")]
    recipe: String,
    #[tabled(rename = "Recipe ID")]
    recipe_id: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
}

impl From<&EntryView> for EntryRow {
    fn from(e: &EntryView) -> Self {
        Self {
            id: e.id.to_string(),
            recipe: e.recipe_label().to_owned(),
            recipe_id: e.recipe_id.to_string(),
            quantity: e.quantity,
        }
    }
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl From<&ShoppingItem> for ItemRow {
    fn from(item: &ShoppingItem) -> Self {
        let (name, amount) = item.to_pair();
        Self { name, amount }
    }
}

fn entry_views(larder: &Larder, entries: Vec<Entry>) -> Result<Vec<EntryView>, CliError> {
    entries
        .into_iter()
        .map(|entry| -> Result<EntryView, CliError> {
            let recipe = larder
                .recipes()
                .get_recipe_by_id(&entry.recipe_id)?
                .map(|r| r.title);
            Ok(EntryView {
                id: entry.id,
                recipe_id: entry.recipe_id,
                recipe,
                quantity: entry.quantity,
            })
        })
        .collect()
}

fn print_items(items: &[ShoppingItem], settings: &Settings) -> Result<(), CliError> {
    let out = output::render_list(
        settings.output,
        items,
        |i| ItemRow::from(i),
        |i| i.to_string(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}

fn entries_not_found(target: &RecipeRef) -> CliError {
    CliError::NotFound {
        resource_type: "shopping-list entries for recipe".into(),
        identifier: target.to_string(),
        list_command: "list show".into(),
    }
}

// ── Handler ──────────────────────────────────────────────────────────

pub fn handle(larder: &Larder, args: ListArgs, settings: &Settings) -> Result<(), CliError> {
    let list = larder.shopping_list();

    match args.command {
        ListCommand::Add { target, quantity } => {
            let target = util::recipe_ref(&target)?;
            let added = match &target {
                RecipeRef::Id(id) => list.add_recipe_by_id(id, quantity)?,
                RecipeRef::Title(title) => list.add_recipe_by_title(title, quantity)?,
            };
            if !added {
                return Err(CliError::recipe_not_found(target.to_string()));
            }
            output::status(
                &format!("Queued {target} x{quantity}"),
                settings.color,
                settings.quiet,
            );
            Ok(())
        }

        ListCommand::Show { title, recipe_id } => {
            let entries = match (title, recipe_id) {
                (Some(title), _) => list.entries_by_title(&title)?,
                (None, Some(id)) => list.entries_by_id(&RecipeId::from(id))?,
                (None, None) => list.entries()?,
            };
            let views = entry_views(larder, entries)?;
            let out = output::render_list(
                settings.output,
                &views,
                |e| EntryRow::from(e),
                |e| format!("{}\t{}\t{}", e.id, e.recipe_label(), e.quantity),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        ListCommand::Set { target, quantity } => {
            let target = util::recipe_ref(&target)?;
            if !list.update_entry_quantity(&target, quantity)? {
                return Err(entries_not_found(&target));
            }
            output::status(
                &format!("Set {target} to x{quantity}"),
                settings.color,
                settings.quiet,
            );
            Ok(())
        }

        ListCommand::Remove { title, entry } => {
            if let Some(raw) = entry {
                let id = EntryId::new(raw);
                if !list.delete_entry_by_id(id)? {
                    return Err(CliError::NotFound {
                        resource_type: "shopping-list entry".into(),
                        identifier: id.to_string(),
                        list_command: "list show".into(),
                    });
                }
                output::status(&format!("Removed entry {id}"), settings.color, settings.quiet);
            } else if let Some(title) = title {
                if !list.delete_entry_by_title(&title)? {
                    return Err(entries_not_found(&RecipeRef::Title(title)));
                }
                output::status(
                    &format!("Removed entries for '{title}'"),
                    settings.color,
                    settings.quiet,
                );
            }
            Ok(())
        }

        ListCommand::Clear => {
            if !util::confirm("Remove every queued entry?", "list clear", settings.yes)? {
                return Ok(());
            }
            list.clear()?;
            output::status("Shopping list cleared", settings.color, settings.quiet);
            Ok(())
        }

        ListCommand::Generate {
            file,
            export,
            clear,
        } => {
            let path: Option<PathBuf> = match (file, export) {
                (Some(file), _) => Some(file),
                (None, true) => Some(settings.export_path.clone().ok_or(CliError::NoExportPath)?),
                (None, false) => None,
            };
            let items = list.generate(path.as_deref())?;
            print_items(&items, settings)?;
            if let Some(path) = &path {
                output::status(
                    &format!("Wrote {} items to {}", items.len(), path.display()),
                    settings.color,
                    settings.quiet,
                );
            }
            if clear && util::confirm("Clear the queued entries now?", "list generate --clear", settings.yes)? {
                list.clear()?;
                output::status("Shopping list cleared", settings.color, settings.quiet);
            }
            Ok(())
        }

        ListCommand::Last => {
            let items = list.materialized()?;
            print_items(&items, settings)
        }
    }
}
