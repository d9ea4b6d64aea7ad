//! Expansion of course references into catalog course sets.

use tracing::instrument;

use crate::{
    catalog::{CatalogError, CatalogLookup, CoursePattern},
    domain::{CatalogCourse, Config, CourseReference, Operator, WithClause, numeric_part},
};

/// How a [`CourseReference`] should be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// An elective pseudo-course, which stands for no particular course.
    Elective,
    /// A lookup of catalog courses in one department.
    Lookup {
        /// Catalog department code.
        department: String,
        /// Which courses of the department.
        pattern: CoursePattern,
    },
    /// A range whose bounds are not numbers.
    Unresolvable,
}

/// Classifies a reference by the shape of its course number.
///
/// The rules are tried in order: elective marker, bare wildcard, wildcard
/// run, numeric range, exact number.
#[must_use]
pub fn classify(reference: &CourseReference, config: &Config) -> ReferenceKind {
    let wildcard = config.wildcard();
    let number = reference.number.trim();

    if number == config.elective_marker() || reference.discipline.trim() == wildcard.to_string()
    {
        return ReferenceKind::Elective;
    }

    let department = config
        .catalog_department(reference.discipline.trim())
        .to_string();

    let pattern = if number == wildcard.to_string() {
        CoursePattern::Department
    } else if number.contains(wildcard) {
        wildcard_pattern(number, wildcard)
    } else if let Some((start, end)) = range_bounds(number, reference.number_end.as_deref()) {
        match (numeric_part(start), numeric_part(end)) {
            (Some(start), Some(end)) => CoursePattern::Range { start, end },
            _ => return ReferenceKind::Unresolvable,
        }
    } else {
        CoursePattern::Exact(number.to_string())
    };

    ReferenceKind::Lookup {
        department,
        pattern,
    }
}

fn wildcard_pattern(number: &str, wildcard: char) -> CoursePattern {
    let positions: Vec<Option<char>> = number
        .chars()
        .filter(|c| *c == wildcard || c.is_ascii_digit())
        .map(|c| (c != wildcard).then_some(c))
        .collect();

    let longest_run = number
        .split(|c| c != wildcard)
        .map(str::len)
        .max()
        .unwrap_or_default();
    if longest_run > 2 {
        tracing::warn!(
            "Course number '{number}' has a run of {longest_run} wildcards; matching one digit \
             per wildcard"
        );
    }

    CoursePattern::Wildcard(positions)
}

fn range_bounds<'a>(number: &'a str, number_end: Option<&'a str>) -> Option<(&'a str, &'a str)> {
    match number_end.map(str::trim).filter(|end| !end.is_empty()) {
        Some(end) => Some((number.trim_end_matches('-'), end)),
        None => number
            .split_once('-')
            .map(|(start, end)| (start.trim(), end.trim())),
    }
}

/// Resolves a reference into the catalog courses it names, filtered by its
/// with-clauses.
///
/// A reference naming nothing in the catalog resolves to an empty list.
///
/// # Errors
///
/// Returns an error only if the catalog itself fails.
#[instrument(level = "trace", skip(catalog, config))]
pub fn resolve_reference<C: CatalogLookup + ?Sized>(
    reference: &CourseReference,
    catalog: &C,
    config: &Config,
) -> Result<Vec<CatalogCourse>, CatalogError> {
    let (department, pattern) = match classify(reference, config) {
        ReferenceKind::Elective => return Ok(Vec::new()),
        ReferenceKind::Unresolvable => {
            tracing::debug!(
                "Skipping course range {} {}-{:?}: bounds are not numeric",
                reference.discipline,
                reference.number,
                reference.number_end
            );
            return Ok(Vec::new());
        }
        ReferenceKind::Lookup {
            department,
            pattern,
        } => (department, pattern),
    };

    let mut courses = catalog.lookup(&department, &pattern)?;
    if courses.is_empty() {
        tracing::debug!(
            "Course reference {} {} matched no catalog courses",
            reference.discipline,
            reference.number
        );
    }

    for clause in &reference.with_array {
        if !config.is_credit_code(&clause.code) || clause.operator == Operator::Other {
            continue;
        }
        let Some(bound) = credit_bound(clause) else {
            tracing::debug!("Ignoring with-clause {clause:?}: no numeric value");
            continue;
        };
        courses.retain(|course| satisfies_credits(course, clause.operator, bound));
    }

    Ok(courses)
}

fn credit_bound(clause: &WithClause) -> Option<f64> {
    clause
        .value_list
        .first()
        .and_then(|value| value.trim().parse().ok())
}

/// Checks whether a course's unit range qualifies under a credit bound.
///
/// Lower bounds (`>`, `>=`) and equality are optimistic: the course qualifies
/// if it can be taken for enough units. Upper bounds (`<`, `<=`) are strict:
/// the course qualifies only if it can never exceed the bound.
#[must_use]
pub fn satisfies_credits(course: &CatalogCourse, operator: Operator, bound: f64) -> bool {
    match operator {
        Operator::Greater => course.max_units > bound,
        Operator::GreaterOrEqual => course.max_units >= bound,
        Operator::Equal => course.min_units <= bound && bound <= course.max_units,
        Operator::Less => course.max_units < bound,
        Operator::LessOrEqual => course.max_units <= bound,
        Operator::Other => true,
    }
}
