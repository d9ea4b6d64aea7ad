use clap::ArgAction;

mod audit;
mod config;
mod deps;
mod prereq;
mod render;
mod terminal;

use audit::Audit;
use config::Config;
use deps::Deps;
use prereq::Prereq;
use serde::Serialize;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run()
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout carries the trees
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Parse catalogue prerequisite text into a prerequisite tree
    Prereq(Prereq),

    /// Resolve degree-audit rule arrays into requirement trees
    ///
    /// Each JSON file holds the rule array of one requirement block; the
    /// block identifier is taken from the file name.
    Audit(Audit),

    /// Build the dependency graph of a set of courses
    ///
    /// Lists each course's dependents and reports prerequisite cycles.
    Deps(Deps),

    /// Show or modify resolution settings
    Config(Config),
}

impl Command {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Prereq(command) => command.run(),
            Self::Audit(command) => command.run(),
            Self::Deps(command) => command.run(),
            Self::Config(command) => command.run(),
        }
    }
}

/// How trees are written to stdout.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
    /// An indented, human-readable tree
    Tree,
}

impl OutputFormat {
    /// Writes `value` as JSON or YAML.
    ///
    /// Returns `false` for [`OutputFormat::Tree`], which each command renders
    /// itself.
    fn emit<T: Serialize + ?Sized>(self, value: &T) -> anyhow::Result<bool> {
        match self {
            Self::Json => println!("{}", serde_json::to_string_pretty(value)?),
            Self::Yaml => print!("{}", serde_yaml::to_string(value)?),
            Self::Tree => return Ok(false),
        }
        Ok(true)
    }
}
