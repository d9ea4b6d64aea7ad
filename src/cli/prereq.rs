use clap::Parser;
use reqtree::parse_prerequisites;
use tracing::instrument;

use super::{OutputFormat, render};

#[derive(Debug, Parser)]
#[command(about = "Parse catalogue prerequisite text into a prerequisite tree")]
pub struct Prereq {
    /// The prerequisite text, e.g. "(MATH 2A OR MATH 5A) AND NO MATH 2B"
    prerequisites: String,

    /// A separate antirequisite list; every course in it is prohibited
    #[arg(long, short, default_value = "")]
    antirequisites: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "json")]
    format: OutputFormat,

    /// Print the fingerprint of the tree instead of the tree itself
    #[arg(long)]
    fingerprint: bool,
}

impl Prereq {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let tree = parse_prerequisites(&self.prerequisites, &self.antirequisites);

        if self.fingerprint {
            println!("{}", reqtree::fingerprint(&tree));
            return Ok(());
        }

        if !self.format.emit(&tree)? {
            print!("{}", render::prerequisite_tree(&tree));
        }
        Ok(())
    }
}
