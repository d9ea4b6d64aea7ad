use serde::{Deserialize, Serialize};

/// A resolved degree requirement.
///
/// Requirements form a tree through [`Requirement::Group`]. Course lists hold
/// catalog course identifiers, deduplicated and in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "requirementType")]
pub enum Requirement {
    /// Complete a number of courses from a list.
    #[serde(rename_all = "camelCase")]
    Course {
        /// Human-readable label.
        label: String,
        /// How many of `courses` must be completed.
        course_count: u32,
        /// Eligible course identifiers.
        courses: Vec<String>,
    },

    /// Complete a number of units from a list of courses.
    #[serde(rename_all = "camelCase")]
    Unit {
        /// Human-readable label.
        label: String,
        /// How many units must be completed.
        unit_count: f64,
        /// Eligible course identifiers.
        courses: Vec<String>,
    },

    /// Satisfy a number of nested requirements.
    #[serde(rename_all = "camelCase")]
    Group {
        /// Human-readable label.
        label: String,
        /// How many of `requirements` must be satisfied.
        requirement_count: u32,
        /// The nested requirements.
        requirements: Vec<Requirement>,
    },

    /// A requirement with no course content, e.g. a residency or GPA rule.
    Marker {
        /// Human-readable label.
        label: String,
    },
}

impl Requirement {
    /// The label of this requirement.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Course { label, .. }
            | Self::Unit { label, .. }
            | Self::Group { label, .. }
            | Self::Marker { label } => label,
        }
    }

    /// The nested requirements of a group, or an empty slice.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Group { requirements, .. } => requirements,
            _ => &[],
        }
    }
}
