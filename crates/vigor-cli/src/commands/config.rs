use clap::Subcommand;
use vigor_core::EngineConfig;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Show => {
            let config = EngineConfig::load_or_default()?;
            print_json(&config)?;
        }
        ConfigAction::Path => {
            println!("{}", EngineConfig::default_path()?.display());
        }
        ConfigAction::Init { force } => {
            let path = EngineConfig::default_path()?;
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )
                .into());
            }
            EngineConfig::default().save_to(&path)?;
            tracing::info!(path = %path.display(), "default configuration written");
            println!("{}", path.display());
        }
    }
    Ok(())
}
