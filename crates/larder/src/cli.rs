//! Clap derive structures for the `larder` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// larder -- recipe book and shopping-list generator
#[derive(Debug, Parser)]
#[command(
    name = "larder",
    version,
    about = "Keep recipes and turn them into shopping lists",
    long_about = "Store recipes with their ingredients, queue the ones you plan to cook,\n\
        and generate a single shopping list that sums every ingredient.",
    propagate_version = true,
    args_override_self = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Database file (overrides the configured path)
    #[arg(long, env = "LARDER_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "LARDER_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one record per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage stored recipes
    #[command(alias = "r")]
    Recipes(RecipesArgs),

    /// Manage the shopping list and generate it
    #[command(alias = "l")]
    List(ListArgs),

    /// Inspect and initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared argument groups ───────────────────────────────────────────

/// Selects a recipe by title (positional) or by `--id`.
#[derive(Debug, Args)]
pub struct RecipeTarget {
    /// Recipe title
    #[arg(required_unless_present = "id")]
    pub title: Option<String>,

    /// Recipe id instead of title
    #[arg(long, conflicts_with = "title")]
    pub id: Option<String>,
}

/// Ingredient input for add/update.
#[derive(Debug, Args)]
pub struct IngredientArgs {
    /// Ingredient as NAME:QUANTITY:UNIT (repeatable), e.g. -i "olive oil:2:tbsp"
    #[arg(long = "ingredient", short = 'i', value_name = "NAME:QTY:UNIT")]
    pub ingredients: Vec<String>,

    /// Read ingredients from a JSON array of {name, quantity, unit}
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}

// ── Recipes ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecipesArgs {
    #[command(subcommand)]
    pub command: RecipesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecipesCommand {
    /// List recipes (id and title)
    #[command(alias = "ls")]
    List,

    /// Show one recipe with its ingredients
    Show(RecipeTarget),

    /// Add a recipe; a taken title is renamed (pasta -> pasta_01)
    Add {
        /// Recipe title
        title: String,

        #[command(flatten)]
        ingredients: IngredientArgs,
    },

    /// Replace the ingredients of an existing recipe
    Update {
        /// Recipe title
        title: String,

        #[command(flatten)]
        ingredients: IngredientArgs,
    },

    /// Delete a recipe
    #[command(alias = "rm")]
    Delete(RecipeTarget),
}

// ── Shopping list ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(subcommand)]
    pub command: ListCommand,
}

#[derive(Debug, Subcommand)]
pub enum ListCommand {
    /// Queue a recipe for shopping
    Add {
        #[command(flatten)]
        target: RecipeTarget,

        /// How many times to include the recipe
        #[arg(long, short = 'n', default_value_t = 1)]
        quantity: u32,
    },

    /// Show queued entries, optionally only those of one recipe
    #[command(alias = "ls")]
    Show {
        /// Only entries of the recipe with this title
        #[arg(long, conflicts_with = "recipe_id")]
        title: Option<String>,

        /// Only entries of the recipe with this id
        #[arg(long)]
        recipe_id: Option<String>,
    },

    /// Change the quantity of a recipe's entries
    Set {
        #[command(flatten)]
        target: RecipeTarget,

        /// New quantity
        #[arg(long, short = 'n')]
        quantity: u32,
    },

    /// Remove a recipe's entries, or a single entry by id
    #[command(alias = "rm")]
    Remove {
        /// Recipe title
        #[arg(required_unless_present = "entry")]
        title: Option<String>,

        /// Entry id (see `list show`)
        #[arg(long, conflicts_with = "title")]
        entry: Option<u64>,
    },

    /// Remove every queued entry
    Clear,

    /// Generate the consolidated shopping list
    #[command(alias = "gen")]
    Generate {
        /// Also write the list to this file (overwrites)
        #[arg(long, short = 'f', value_name = "PATH")]
        file: Option<PathBuf>,

        /// Write to the configured export path
        #[arg(long, conflicts_with = "file")]
        export: bool,

        /// Clear the queued entries after a successful export
        #[arg(long)]
        clear: bool,
    },

    /// Show the last generated list without regenerating
    Last,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file
    Init {
        /// Database path to store in the config
        #[arg(long)]
        database: Option<PathBuf>,

        /// Default export path for `list generate --export`
        #[arg(long)]
        export_path: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
