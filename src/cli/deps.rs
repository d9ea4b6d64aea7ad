use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use reqtree::{PrerequisiteGraph, PrerequisiteTree, parse_prerequisite_list};
use serde::Serialize;
use tracing::instrument;

use super::{OutputFormat, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Build the dependency graph of a set of courses")]
pub struct Deps {
    /// A JSON object mapping course identifiers to their prerequisite text
    file: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "tree")]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseDependencies<'a> {
    /// Absent for courses that only appear as someone's prerequisite.
    #[serde(skip_serializing_if = "Option::is_none")]
    prerequisite_tree: Option<&'a PrerequisiteTree>,
    prerequisites: Vec<&'a str>,
    dependents: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    courses: BTreeMap<&'a str, CourseDependencies<'a>>,
    cycles: Vec<Vec<&'a str>>,
}

impl Deps {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;
        let texts: BTreeMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.file.display()))?;

        let trees: BTreeMap<&str, PrerequisiteTree> = texts
            .iter()
            .map(|(course, text)| (course.as_str(), parse_prerequisite_list(text)))
            .collect();
        let graph: PrerequisiteGraph = trees.iter().map(|(course, tree)| (*course, tree)).collect();

        let report = build_report(&trees, &graph);

        if self.format.emit(&report)? {
            return Ok(());
        }

        for (course, dependencies) in &report.courses {
            if dependencies.prerequisite_tree.is_some() {
                println!("{}", course.course());
            } else {
                println!("{} {}", course.course(), "(not listed)".dim());
            }
            if !dependencies.prerequisites.is_empty() {
                println!("  {} {}", "requires".dim(), dependencies.prerequisites.join(", "));
            }
            if !dependencies.dependents.is_empty() {
                println!("  {} {}", "required by".dim(), dependencies.dependents.join(", "));
            }
        }

        for cycle in &report.cycles {
            let cycle = cycle.join(" -> ");
            println!("{} {}", "cycle:".prohibited(), cycle);
        }
        if !report.cycles.is_empty() {
            tracing::warn!("{} prerequisite cycles found", report.cycles.len());
        }

        Ok(())
    }
}

/// Every course in the graph, including those only named as prerequisites.
fn build_report<'a>(
    trees: &'a BTreeMap<&'a str, PrerequisiteTree>,
    graph: &'a PrerequisiteGraph,
) -> Report<'a> {
    Report {
        courses: graph
            .courses()
            .map(|course| {
                (
                    course,
                    CourseDependencies {
                        prerequisite_tree: trees.get(course),
                        prerequisites: graph.prerequisites_of(course),
                        dependents: graph.dependents_of(course),
                    },
                )
            })
            .collect(),
        cycles: graph.cycles(),
    }
}
