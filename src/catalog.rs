//! The catalog lookup capability.
//!
//! The resolver never owns catalog data. It asks a [`CatalogLookup`] for the
//! courses of a department matching a [`CoursePattern`]; [`InMemoryCatalog`]
//! serves a snapshot held in memory and is what tests and the CLI use.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::CatalogCourse;

/// Which courses of a department a lookup should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoursePattern {
    /// The course with exactly this number.
    Exact(String),

    /// Every course of the department.
    Department,

    /// Courses whose numeric part has one digit per position, where `None`
    /// positions match any digit.
    ///
    /// `1@@` becomes `[Some('1'), None, None]` and matches `100` through
    /// `199` (letters in the catalog number are ignored).
    Wildcard(Vec<Option<char>>),

    /// Courses whose numeric part lies within the inclusive range.
    Range {
        /// Lowest matching number.
        start: u32,
        /// Highest matching number.
        end: u32,
    },
}

impl CoursePattern {
    /// Checks whether a course of the looked-up department matches.
    #[must_use]
    pub fn matches(&self, course: &CatalogCourse) -> bool {
        match self {
            Self::Exact(number) => course.course_number == *number,
            Self::Department => true,
            Self::Wildcard(positions) => {
                let numeric = course.course_numeric.to_string();
                numeric.len() == positions.len()
                    && numeric
                        .chars()
                        .zip(positions)
                        .all(|(digit, position)| position.is_none_or(|p| p == digit))
            }
            Self::Range { start, end } => (*start..=*end).contains(&course.course_numeric),
        }
    }
}

/// A catalog lookup failed.
///
/// Unlike an unresolved reference, which simply yields no courses, a lookup
/// failure means the catalog itself is unavailable, and the resolution run
/// cannot produce a trustworthy tree.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog snapshot could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        /// Location of the snapshot.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The catalog snapshot is not valid JSON.
    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        /// Location of the snapshot.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },

    /// The catalog backend could not answer.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// A source of catalog courses.
pub trait CatalogLookup {
    /// Returns the courses of `department` matching `pattern`.
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be queried.
    fn lookup(
        &self,
        department: &str,
        pattern: &CoursePattern,
    ) -> Result<Vec<CatalogCourse>, CatalogError>;
}

/// A catalog snapshot held in memory, indexed by department.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    departments: BTreeMap<String, Vec<CatalogCourse>>,
}

impl InMemoryCatalog {
    /// Loads a snapshot from a JSON array of courses.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid list of
    /// courses.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let courses: Vec<CatalogCourse> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!("Loaded {} catalog courses from {}", courses.len(), path.display());

        Ok(courses.into_iter().collect())
    }

    /// Adds a course to the snapshot.
    pub fn insert(&mut self, course: CatalogCourse) {
        self.departments
            .entry(course.department.clone())
            .or_default()
            .push(course);
    }

    /// The number of courses in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.departments.values().map(Vec::len).sum()
    }

    /// Whether the snapshot holds no courses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.departments.values().all(Vec::is_empty)
    }
}

impl FromIterator<CatalogCourse> for InMemoryCatalog {
    fn from_iter<T: IntoIterator<Item = CatalogCourse>>(iter: T) -> Self {
        let mut catalog = Self::default();
        for course in iter {
            catalog.insert(course);
        }
        catalog
    }
}

impl CatalogLookup for InMemoryCatalog {
    fn lookup(
        &self,
        department: &str,
        pattern: &CoursePattern,
    ) -> Result<Vec<CatalogCourse>, CatalogError> {
        Ok(self
            .departments
            .get(department)
            .map(|courses| {
                courses
                    .iter()
                    .filter(|course| pattern.matches(course))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
