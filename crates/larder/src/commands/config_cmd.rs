//! Config subcommand handlers. None of them open the database.

use larder_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color.unwrap_or(crate::cli::ColorMode::Auto));

    match args.command {
        ConfigCommand::Show => {
            let mut cfg = larder_config::load_config()?;
            if let Some(db) = &global.db {
                cfg.database = Some(db.clone());
            }
            let format = global.output.unwrap_or(OutputFormat::Table);
            let toml = larder_config::to_toml(&cfg)?;
            let database = cfg.database_path();
            let out = output::render_single(
                format,
                &cfg,
                |_| format!("{}# effective database: {}", toml, database.display()),
                |c: &Config| c.database_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&larder_config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            database,
            export_path,
            force,
        } => {
            let path = larder_config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            let cfg = Config {
                database,
                export_path,
                ..Config::default()
            };
            let written = larder_config::save_config(&cfg)?;
            output::status(
                &format!("Config written to {}", written.display()),
                color,
                global.quiet,
            );
            Ok(())
        }
    }
}
