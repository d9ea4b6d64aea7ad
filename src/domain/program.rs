use std::{convert::Infallible, fmt, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a degree program or requirement block.
///
/// Format:
/// `{SCHOOL}-{PROGRAM_TYPE}-{CODE}[-{DEGREE_TYPE}]`, where:
/// - `SCHOOL` is the institution code (e.g. `U`)
/// - `PROGRAM_TYPE` is the kind of block (e.g. `MAJOR`, `MINOR`, `SPEC`)
/// - `CODE` is the program code (e.g. `201`)
/// - `DEGREE_TYPE` is the optional degree (e.g. `BS`)
///
/// Examples: `U-MAJOR-201-BS`, `U-MINOR-45A`
///
/// Parsing never fails: segments missing from the input are left unset, and
/// hyphens past the fourth segment stay part of the degree type. Use
/// [`ProgramId::validate`] before persisting.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProgramId {
    school: Option<NonEmptyString>,
    program_type: Option<NonEmptyString>,
    code: Option<NonEmptyString>,
    degree_type: Option<NonEmptyString>,
}

impl ProgramId {
    /// Create a program identifier from its segments.
    ///
    /// Empty segments are treated as missing.
    #[must_use]
    pub fn new(school: &str, program_type: &str, code: &str, degree_type: Option<&str>) -> Self {
        Self {
            school: segment(school),
            program_type: segment(program_type),
            code: segment(code),
            degree_type: degree_type.and_then(segment),
        }
    }

    /// Returns the school segment.
    #[must_use]
    pub fn school(&self) -> Option<&str> {
        self.school.as_ref().map(NonEmptyString::as_str)
    }

    /// Returns the program type segment.
    #[must_use]
    pub fn program_type(&self) -> Option<&str> {
        self.program_type.as_ref().map(NonEmptyString::as_str)
    }

    /// Returns the program code segment.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_ref().map(NonEmptyString::as_str)
    }

    /// Returns the degree type segment.
    #[must_use]
    pub fn degree_type(&self) -> Option<&str> {
        self.degree_type.as_ref().map(NonEmptyString::as_str)
    }

    /// Checks that every required segment is present.
    ///
    /// # Errors
    ///
    /// Returns the first missing segment, in order school, program type,
    /// code.
    pub fn validate(&self) -> Result<(), Error> {
        if self.school.is_none() {
            return Err(Error::MissingSchool(self.to_string()));
        }
        if self.program_type.is_none() {
            return Err(Error::MissingProgramType(self.to_string()));
        }
        if self.code.is_none() {
            return Err(Error::MissingCode(self.to_string()));
        }
        Ok(())
    }
}

fn segment(s: &str) -> Option<NonEmptyString> {
    NonEmptyString::new(s.trim().to_string()).ok()
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut segments = vec![
            self.school().unwrap_or_default(),
            self.program_type().unwrap_or_default(),
            self.code().unwrap_or_default(),
        ];
        if let Some(degree_type) = self.degree_type() {
            segments.push(degree_type);
        } else {
            while segments.last().is_some_and(|s| s.is_empty()) {
                segments.pop();
            }
        }
        write!(f, "{}", segments.join("-"))
    }
}

impl FromStr for ProgramId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(4, '-');

        Ok(Self {
            school: parts.next().and_then(segment),
            program_type: parts.next().and_then(segment),
            code: parts.next().and_then(segment),
            degree_type: parts.next().and_then(segment),
        })
    }
}

impl From<&str> for ProgramId {
    fn from(value: &str) -> Self {
        match Self::from_str(value) {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }
}

impl Serialize for ProgramId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProgramId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// A program identifier is missing a required segment.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// No school segment.
    #[error("Program identifier '{0}' has no school")]
    MissingSchool(String),

    /// No program type segment.
    #[error("Program identifier '{0}' has no program type")]
    MissingProgramType(String),

    /// No program code segment.
    #[error("Program identifier '{0}' has no program code")]
    MissingCode(String),
}
