//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod config_cmd;
pub mod list;
pub mod recipes;
pub mod util;

use larder_core::Larder;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a database-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, larder: &Larder, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::Recipes(args) => recipes::handle(larder, args, settings),
        Command::List(args) => list::handle(larder, args, settings),
        // Config and Completions never open the database
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
