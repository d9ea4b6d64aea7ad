use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A canonical course record from the catalog.
///
/// Catalog courses are owned by the catalog; the resolver only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCourse {
    /// Unique identifier, e.g. `COMPSCI161`.
    pub id: String,
    /// Short department code, e.g. `COMPSCI`.
    pub department: String,
    /// Course number including letters, e.g. `H2A`.
    pub course_number: String,
    /// The digits of the course number, e.g. `2` for `H2A`.
    pub course_numeric: u32,
    /// Minimum units the course can be taken for.
    pub min_units: f64,
    /// Maximum units the course can be taken for.
    pub max_units: f64,
}

impl CatalogCourse {
    /// Construct a course, deriving `id` and `course_numeric` from the
    /// department and number.
    #[must_use]
    pub fn new(department: &str, course_number: &str, min_units: f64, max_units: f64) -> Self {
        Self {
            id: format!("{}{}", department.replace(' ', ""), course_number),
            department: department.to_string(),
            course_number: course_number.to_string(),
            course_numeric: numeric_part(course_number).unwrap_or_default(),
            min_units,
            max_units,
        }
    }

    /// Catalog order: department, then numeric part, then full number.
    #[must_use]
    pub fn catalog_order(&self, other: &Self) -> Ordering {
        self.department
            .cmp(&other.department)
            .then(self.course_numeric.cmp(&other.course_numeric))
            .then_with(|| self.course_number.cmp(&other.course_number))
    }
}

/// The number formed by the digits of a course number, ignoring letters.
///
/// Returns `None` if the course number has no digits.
#[must_use]
pub fn numeric_part(course_number: &str) -> Option<u32> {
    let digits: String = course_number.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
