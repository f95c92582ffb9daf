//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use larder_config::ConfigError;
use larder_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const STORAGE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} {identifier} not found")]
    #[diagnostic(
        code(larder::not_found),
        help("Run: larder {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Shopping-list entry {entry_id} refers to deleted recipe {recipe_id}")]
    #[diagnostic(
        code(larder::dangling_reference),
        help(
            "The list cannot be generated while an entry points at a missing recipe.\n\
             Remove it with: larder list remove --entry {entry_id}"
        )
    )]
    DanglingReference { entry_id: String, recipe_id: String },

    #[error("Cannot combine {left} with {right}")]
    #[diagnostic(
        code(larder::incompatible_ingredient),
        help("Ingredients only merge when name and unit match exactly.")
    )]
    IncompatibleIngredient { left: String, right: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(larder::validation))]
    Validation { field: String, reason: String },

    #[error("Title '{title}' is taken and cannot be renumbered: {reason}")]
    #[diagnostic(
        code(larder::invalid_title),
        help(
            "A taken title is renamed by bumping the number after its first '_'.\n\
             Pick a title without '_' or with a numeric suffix such as 'pasta_01'."
        )
    )]
    InvalidTitle { title: String, reason: String },

    // ── Storage ──────────────────────────────────────────────────────

    #[error("Database error: {message}")]
    #[diagnostic(
        code(larder::storage),
        help("Check the database path (--db, LARDER_DB, or `database` in the config file).")
    )]
    Storage { message: String },

    #[error("Could not write shopping list to {path}")]
    #[diagnostic(code(larder::export))]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error("No export path configured")]
    #[diagnostic(
        code(larder::no_export_path),
        help("Pass --file PATH, or set one with: larder config init --export-path PATH")
    )]
    NoExportPath,

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(code(larder::config_exists), help("Use --force to overwrite it."))]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(larder::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(larder::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render YAML output: {0}")]
    #[diagnostic(code(larder::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(larder::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::DanglingReference { .. } | Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidTitle { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NoExportPath => exit_code::USAGE,
            Self::Storage { .. } | Self::Export { .. } => exit_code::STORAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// `identifier` is shown as given, e.g. `'pasta'` or `#3`.
    pub fn recipe_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: "recipe".into(),
            identifier: identifier.into(),
            list_command: "recipes list".into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::IncompatibleIngredient { left, right } => CliError::IncompatibleIngredient {
                left: left.to_string(),
                right: right.to_string(),
            },

            CoreError::InvalidTitleFormat { title, reason } => {
                CliError::InvalidTitle { title, reason }
            }

            CoreError::DanglingReference {
                entry_id,
                recipe_id,
            } => CliError::DanglingReference {
                entry_id: entry_id.to_string(),
                recipe_id: recipe_id.to_string(),
            },

            CoreError::InvalidQuantity { quantity } => CliError::Validation {
                field: "quantity".into(),
                reason: format!("must be at least 1, got {quantity}"),
            },

            CoreError::Export { path, source } => CliError::Export {
                path: path.display().to_string(),
                source,
            },

            err @ (CoreError::MalformedRecord { .. } | CoreError::Store(_)) => {
                CliError::Storage {
                    message: err.to_string(),
                }
            }
        }
    }
}
