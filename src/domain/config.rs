use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

/// Configuration for requirement resolution.
///
/// This struct holds the conventions of the degree-audit source that the
/// resolver needs to know about: how electives and wildcards are spelled,
/// which with-clauses filter on credits, and how audit department codes map
/// onto catalog departments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The course number marking an elective pseudo-course.
    ///
    /// References with this number resolve to no courses.
    elective_marker: String,

    /// The wildcard character in course numbers.
    ///
    /// A bare wildcard matches every course of a department; a run of
    /// wildcards matches one digit each (`1@@` matches `100`-`199`).
    wildcard: char,

    /// With-clause codes that filter on course credits.
    credit_codes: Vec<String>,

    /// Label of the synthetic group wrapping the alternatives of a
    /// conditional rule.
    select_one_label: String,

    /// Audit department codes that differ from catalog department codes.
    ///
    /// For example, `{"I&C SCI" = "ICS"}` looks up `ICS` courses when the
    /// audit references `I&C SCI`.
    department_aliases: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            elective_marker: default_elective_marker(),
            wildcard: default_wildcard(),
            credit_codes: default_credit_codes(),
            select_one_label: default_select_one_label(),
            department_aliases: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the elective pseudo-course marker.
    #[must_use]
    pub fn elective_marker(&self) -> &str {
        &self.elective_marker
    }

    /// Returns the wildcard character.
    #[must_use]
    pub const fn wildcard(&self) -> char {
        self.wildcard
    }

    /// Checks if a with-clause code filters on credits.
    #[must_use]
    pub fn is_credit_code(&self, code: &str) -> bool {
        self.credit_codes.iter().any(|c| c == code)
    }

    /// Returns the label used for synthetic "select one" groups.
    #[must_use]
    pub fn select_one_label(&self) -> &str {
        &self.select_one_label
    }

    /// Maps an audit department code onto the catalog department code.
    ///
    /// Departments without an alias map onto themselves.
    #[must_use]
    pub fn catalog_department<'a>(&'a self, discipline: &'a str) -> &'a str {
        self.department_aliases
            .get(discipline)
            .map_or(discipline, String::as_str)
    }

    /// Adds a department alias.
    ///
    /// Returns the previous alias for the audit code, if any.
    pub fn add_department_alias(
        &mut self,
        discipline: impl Into<String>,
        department: impl Into<String>,
    ) -> Option<String> {
        self.department_aliases
            .insert(discipline.into(), department.into())
    }
}

fn default_elective_marker() -> String {
    "ELECTIVE".to_string()
}

const fn default_wildcard() -> char {
    '@'
}

fn default_credit_codes() -> Vec<String> {
    vec!["DWCREDIT".to_string(), "DWCREDITS".to_string()]
}

fn default_select_one_label() -> String {
    "Select 1 of the following".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_elective_marker")]
        elective_marker: String,

        #[serde(default = "default_wildcard")]
        wildcard: char,

        #[serde(default = "default_credit_codes")]
        credit_codes: Vec<String>,

        #[serde(default = "default_select_one_label")]
        select_one_label: String,

        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        department_aliases: BTreeMap<String, String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                elective_marker,
                wildcard,
                credit_codes,
                select_one_label,
                department_aliases,
            } => Self {
                elective_marker,
                wildcard,
                credit_codes,
                select_one_label,
                department_aliases,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            elective_marker: config.elective_marker,
            wildcard: config.wildcard,
            credit_codes: config.credit_codes,
            select_one_label: config.select_one_label,
            department_aliases: config.department_aliases,
        }
    }
}
