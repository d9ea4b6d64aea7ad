//! Course dependency graph.
//!
//! A parsed [`PrerequisiteTree`] is flattened into `(dependent, prerequisite)`
//! edges. Antirequisites are not dependencies and never produce an edge.
//! [`PrerequisiteGraph`] collects the edges of a whole catalogue and answers
//! lookups in both directions.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::{Direction, algo::tarjan_scc, graphmap::DiGraphMap};
use serde::{Deserialize, Serialize};

use crate::domain::PrerequisiteTree;

/// A directed dependency between two courses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    /// The course that has the prerequisite.
    pub dependent: String,
    /// The course it depends on.
    pub prerequisite: String,
}

/// The dependency edges of `course` on every course referenced by `tree`.
///
/// Edges follow the depth-first order of [`PrerequisiteTree::course_ids`] with
/// repeated references removed.
#[must_use]
pub fn dependency_edges(course: &str, tree: &PrerequisiteTree) -> Vec<DependencyEdge> {
    let mut seen = BTreeSet::new();
    tree.course_ids()
        .into_iter()
        .filter(|id| seen.insert(*id))
        .map(|id| DependencyEdge {
            dependent: course.to_owned(),
            prerequisite: id.to_owned(),
        })
        .collect()
}

/// The prerequisite relationships of a set of courses.
///
/// Courses are interned; edges point from the dependent course to its
/// prerequisite.
#[derive(Debug, Default)]
pub struct PrerequisiteGraph {
    courses: Vec<String>,
    index: BTreeMap<String, usize>,
    graph: DiGraphMap<usize, ()>,
}

impl PrerequisiteGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every dependency of `course` expressed by `tree`.
    ///
    /// The course is added even when it has no prerequisites.
    pub fn insert_tree(&mut self, course: &str, tree: &PrerequisiteTree) {
        self.intern(course);
        for edge in dependency_edges(course, tree) {
            self.insert_edge(&edge);
        }
    }

    /// Records a single dependency.
    pub fn insert_edge(&mut self, edge: &DependencyEdge) {
        let dependent = self.intern(&edge.dependent);
        let prerequisite = self.intern(&edge.prerequisite);
        self.graph.add_edge(dependent, prerequisite, ());
    }

    /// The number of courses in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the graph holds no courses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// The direct prerequisites of `course`, sorted.
    #[must_use]
    pub fn prerequisites_of(&self, course: &str) -> Vec<&str> {
        self.neighbours(course, Direction::Outgoing)
    }

    /// The courses that directly depend on `course`, sorted.
    #[must_use]
    pub fn dependents_of(&self, course: &str) -> Vec<&str> {
        self.neighbours(course, Direction::Incoming)
    }

    /// Every group of courses that (transitively) require one another.
    ///
    /// Each cycle is sorted, and the cycles are sorted among themselves. A
    /// course that lists itself as a prerequisite is a cycle of one.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<&str>> {
        let mut cycles = Vec::new();

        for component in tarjan_scc(&self.graph) {
            if component.len() > 1 {
                let mut courses: Vec<_> = component.iter().map(|&node| self.name(node)).collect();
                courses.sort_unstable();
                cycles.push(courses);
                continue;
            }

            let Some(&node) = component.first() else {
                continue;
            };

            if self.graph.contains_edge(node, node) {
                cycles.push(vec![self.name(node)]);
            }
        }

        cycles.sort();
        cycles
    }

    /// Every course in the graph, sorted.
    pub fn courses(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    fn intern(&mut self, course: &str) -> usize {
        if let Some(&node) = self.index.get(course) {
            return node;
        }
        let node = self.courses.len();
        self.courses.push(course.to_owned());
        self.index.insert(course.to_owned(), node);
        self.graph.add_node(node);
        node
    }

    fn name(&self, node: usize) -> &str {
        &self.courses[node]
    }

    fn neighbours(&self, course: &str, direction: Direction) -> Vec<&str> {
        let Some(&node) = self.index.get(course) else {
            return Vec::new();
        };
        let mut courses: Vec<_> = self
            .graph
            .neighbors_directed(node, direction)
            .map(|other| self.name(other))
            .collect();
        courses.sort_unstable();
        courses.dedup();
        courses
    }
}

impl<'a> FromIterator<(&'a str, &'a PrerequisiteTree)> for PrerequisiteGraph {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a PrerequisiteTree)>>(iter: T) -> Self {
        let mut graph = Self::new();
        for (course, tree) in iter {
            graph.insert_tree(course, tree);
        }
        graph
    }
}
