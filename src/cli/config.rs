use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show or modify resolution settings")]
pub struct Config {
    /// The settings file (TOML); defaults apply when it does not exist
    #[arg(long, value_name = "FILE", default_value = "reqtree.toml")]
    file: PathBuf,

    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show the current settings
    Show,

    /// Write the default settings to the file
    Init,

    /// Look up an audit department code under a different catalog department
    Alias {
        /// Department code as the audit spells it, e.g. "I&C SCI"
        discipline: String,

        /// Department code in the catalog, e.g. "ICS"
        department: String,
    },
}

impl Config {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            ConfigCommand::Show => {
                let config = load_or_default(&self.file)?;
                println!("{}", self.file.display().to_string().dim());
                print!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigCommand::Init => {
                if self.file.exists() {
                    anyhow::bail!("{} already exists", self.file.display());
                }
                reqtree::Config::default()
                    .save(&self.file)
                    .map_err(anyhow::Error::msg)?;
                println!("Wrote default settings to {}", self.file.display());
            }
            ConfigCommand::Alias {
                discipline,
                department,
            } => {
                let mut config = load_or_default(&self.file)?;
                if let Some(previous) = config.add_department_alias(&discipline, &department) {
                    tracing::info!("Replacing alias {discipline} -> {previous}");
                }
                config.save(&self.file).map_err(anyhow::Error::msg)?;
                println!("{} -> {}", discipline, department.course());
            }
        }
        Ok(())
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<reqtree::Config> {
    if path.exists() {
        reqtree::Config::load(path).map_err(anyhow::Error::msg)
    } else {
        Ok(reqtree::Config::default())
    }
}
