//! Domain models for prerequisite and degree requirement trees.
//!
//! This module contains the value types shared by the prerequisite parser
//! and the audit resolver, the audit service's rule input shape, catalog
//! course records, program identifiers, and configuration.

/// Prerequisite leaves and the sparse AND/OR/NOT tree.
pub mod prerequisite;
pub use prerequisite::{Prerequisite, PrerequisiteNode, PrerequisiteTree};

/// Resolved degree requirements.
pub mod requirement;
pub use requirement::Requirement;

/// Degree-audit rule arrays as delivered by the audit service.
pub mod rule;
pub use rule::{CourseReference, Operator, RuleBlock, RuleNode, WithClause};

mod course;
pub use course::{CatalogCourse, numeric_part};

mod config;
pub use config::Config;

/// Program identifiers (`school-programType-code[-degreeType]`).
pub mod program;
pub use program::{Error as ProgramIdError, ProgramId};

mod fingerprint;
pub use fingerprint::fingerprint;
