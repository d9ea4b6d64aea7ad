//! Prerequisite expression parsing.
//!
//! Catalogue prerequisite text is a loose grammar of course and exam phrases
//! joined by `AND`/`OR`, with parenthesized alternatives and `NO` prefixes for
//! antirequisites:
//!
//! ```text
//! (MATH 2A ( min grade = C ) OR AP CALCULUS AB ( min score = 4 )) AND NO MATH 2B
//! ```
//!
//! [`parse_prerequisites`] turns such text into a normalized
//! [`PrerequisiteTree`]. Phrases that match no known shape are dropped.

/// Classification of atomic phrases.
pub mod leaf;

use tracing::instrument;

use self::leaf::{Leaf, classify};
use crate::domain::{PrerequisiteNode, PrerequisiteTree};

const AND: &str = " AND ";
const OR: &str = " OR ";

/// Parses a prerequisite list and an antirequisite list into one tree.
///
/// Both inputs are expected without their field labels. Every phrase of the
/// antirequisite list is prohibited, whether or not it carries a `NO` prefix.
///
/// The result is normalized: a tree that is only a set of alternatives is a
/// bare `OR`, and prohibitions appear as a `{NOT: [...]}` member of `AND`.
#[instrument(level = "debug")]
#[must_use]
pub fn parse_prerequisites(prerequisites: &str, antirequisites: &str) -> PrerequisiteTree {
    let mut accumulator = Accumulator::default();
    accumulator.conjunction(&collapse_whitespace(prerequisites));

    let antirequisites = collapse_whitespace(antirequisites);
    for phrase in antirequisites
        .split(',')
        .flat_map(|part| split_top_level(part, OR))
        .flat_map(|part| split_top_level(part, AND))
    {
        match classify(phrase) {
            Some(leaf) => accumulator.not.push(leaf.into_prerequisite().into()),
            None => tracing::debug!("Dropping unrecognized antirequisite '{phrase}'"),
        }
    }

    accumulator.normalize()
}

/// Parses a prerequisite list with no separate antirequisites.
#[must_use]
pub fn parse_prerequisite_list(prerequisites: &str) -> PrerequisiteTree {
    parse_prerequisites(prerequisites, "")
}

/// The `AND` and `NOT` members collected for one expression.
#[derive(Debug, Default)]
struct Accumulator {
    and: Vec<PrerequisiteNode>,
    not: Vec<PrerequisiteNode>,
}

impl Accumulator {
    /// Adds the members of an `AND`-joined expression.
    fn conjunction(&mut self, text: &str) {
        for segment in split_top_level(text, AND) {
            if let Some(alternatives) = alternatives_of(segment) {
                let or = disjunction(alternatives);
                if !or.is_empty() {
                    self.and.push(PrerequisiteTree::any(or).into());
                }
                continue;
            }

            match classify(segment) {
                Some(Leaf::Required(prerequisite)) => self.and.push(prerequisite.into()),
                Some(Leaf::Prohibited(prerequisite)) => self.not.push(prerequisite.into()),
                None => tracing::debug!("Dropping unrecognized prerequisite '{segment}'"),
            }
        }
    }

    fn normalize(mut self) -> PrerequisiteTree {
        // A lone set of alternatives needs no AND wrapper.
        if self.not.is_empty()
            && self.and.len() == 1
            && matches!(self.and.first(), Some(PrerequisiteNode::Tree(tree)) if tree.is_pure_or())
        {
            if let Some(PrerequisiteNode::Tree(tree)) = self.and.pop() {
                return tree;
            }
        }

        if !self.not.is_empty() {
            self.and.push(PrerequisiteTree::none(self.not).into());
        }

        PrerequisiteTree::all(self.and)
    }
}

/// The interior of a segment that offers alternatives: either a fully
/// parenthesized group, or an unparenthesized `OR` list.
fn alternatives_of(segment: &str) -> Option<&str> {
    strip_group(segment).or_else(|| (split_top_level(segment, OR).len() > 1).then_some(segment))
}

/// The members of an `OR`-joined list.
fn disjunction(text: &str) -> Vec<PrerequisiteNode> {
    let mut members = Vec::new();
    for token in split_top_level(text, OR) {
        let nested = strip_group(token)
            .or_else(|| (split_top_level(token, AND).len() > 1).then_some(token));
        if let Some(nested) = nested {
            let mut accumulator = Accumulator::default();
            accumulator.conjunction(nested);
            let tree = accumulator.normalize();
            if !tree.is_empty() {
                members.push(tree.into());
            }
            continue;
        }

        match classify(token) {
            Some(Leaf::Required(prerequisite)) => members.push(prerequisite.into()),
            Some(Leaf::Prohibited(prerequisite)) => {
                members.push(PrerequisiteTree::none([prerequisite]).into());
            }
            None => tracing::debug!("Dropping unrecognized alternative '{token}'"),
        }
    }
    members
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits on `separator` where it is not nested in parentheses.
///
/// Parts are trimmed and empty parts are skipped.
fn split_top_level<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            _ if depth == 0 && bytes[i..].starts_with(separator.as_bytes()) => {
                parts.push(text[start..i].trim());
                i += separator.len();
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(text[start..].trim());

    parts.retain(|part| !part.is_empty());
    parts
}

/// The interior of a segment wrapped entirely in one pair of parentheses.
///
/// `(A OR B)` has interior `A OR B`; `(A) OR (B)` and `A ( min grade = C )`
/// are not wrapped.
fn strip_group(segment: &str) -> Option<&str> {
    let inner = segment.strip_prefix('(')?.strip_suffix(')')?;

    let mut depth = 0usize;
    for byte in inner.bytes() {
        match byte {
            b'(' => depth += 1,
            b')' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }

    (depth == 0).then_some(inner.trim())
}
