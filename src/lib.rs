//! Requirement tree resolution.
//!
//! Two sources of course requirements are turned into canonical, recursive
//! trees:
//!
//! - catalogue prerequisite text, parsed by [`parse_prerequisites`] into a
//!   sparse `AND`/`OR`/`NOT` [`PrerequisiteTree`];
//! - degree-audit rule arrays, resolved against a course catalog by
//!   [`Resolver`] into [`Requirement`] trees.
//!
//! Both outputs are deterministic, so their [`fingerprint`]s can be compared
//! across runs to detect change.

pub mod domain;
pub use domain::{
    CatalogCourse, Config, Prerequisite, PrerequisiteNode, PrerequisiteTree, ProgramId,
    ProgramIdError, Requirement, RuleBlock, RuleNode, fingerprint,
};

/// Prerequisite text parsing.
pub mod parser;
pub use parser::{parse_prerequisite_list, parse_prerequisites};

/// Degree-audit rule resolution.
pub mod audit;
pub use audit::{ResolvedBlock, Resolver};

/// Course catalog lookup.
pub mod catalog;
pub use catalog::{CatalogError, CatalogLookup, CoursePattern, InMemoryCatalog};

/// Course dependency graph.
pub mod graph;
pub use graph::{DependencyEdge, PrerequisiteGraph, dependency_edges};

/// Resume cache for audit resolution.
pub mod cache;
pub use cache::{CacheEntry, CacheError, ResumeCache};
