//! Degree-audit rule resolution.
//!
//! Turns the nested rule arrays of a degree audit into [`Requirement`] trees.
//! Course references are expanded against a catalog through the
//! [`CatalogLookup`](crate::catalog::CatalogLookup) capability, so the walker
//! can be exercised against any catalog source.

mod label;
/// Expansion of course references into catalog courses.
pub mod reference;
mod walker;

pub use label::normalize_label;
pub use reference::resolve_reference;
use serde::{Deserialize, Serialize};
pub use walker::Resolver;

use crate::domain::{ProgramId, Requirement};

/// The resolved requirements of one requirement block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBlock {
    /// Identifier of the block.
    pub id: ProgramId,

    /// Title of the block, if the audit provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The resolved requirement tree.
    pub requirements: Vec<Requirement>,
}
