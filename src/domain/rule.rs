use serde::{Deserialize, Serialize};

/// One requirement block of a degree audit, as delivered by the audit
/// service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBlock {
    /// Title of the block, if the audit provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The top-level rules of the block.
    #[serde(default, deserialize_with = "lenient::rules")]
    pub rule_array: Vec<RuleNode>,
}

/// A node of an audit rule array.
///
/// The audit service tags each node with `ruleType` and keeps type-specific
/// data in a nested `requirement` object. Rule types this crate does not
/// know deserialize as [`RuleNode::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ruleType")]
pub enum RuleNode {
    /// Satisfy `number_of_groups` of the nested rules.
    #[serde(rename_all = "camelCase")]
    Group {
        /// Human-readable label.
        #[serde(default)]
        label: String,
        /// Group parameters.
        requirement: GroupRequirement,
        /// The nested rules.
        #[serde(default, deserialize_with = "lenient::rules")]
        rule_array: Vec<RuleNode>,
    },

    /// Complete classes or credits from a list of course references.
    Course {
        /// Human-readable label.
        #[serde(default)]
        label: String,
        /// Course parameters.
        requirement: CourseRequirement,
    },

    /// A conditional rule; both branches are kept since the condition
    /// depends on the individual student.
    IfStmt {
        /// Human-readable label.
        #[serde(default)]
        label: String,
        /// The branches.
        requirement: IfRequirement,
    },

    /// A reference to another requirement block, stitched in by the caller.
    Block {
        /// Human-readable label.
        #[serde(default)]
        label: String,
        /// Opaque block reference.
        #[serde(default)]
        requirement: serde_json::Value,
    },

    /// A non-course requirement, resolved by the caller.
    Noncourse {
        /// Human-readable label.
        #[serde(default)]
        label: String,
        /// Opaque non-course parameters.
        #[serde(default)]
        requirement: serde_json::Value,
    },

    /// A marker the audit shows as complete for this student.
    Complete {
        /// Human-readable label.
        #[serde(default)]
        label: String,
    },

    /// A marker the audit shows as incomplete for this student.
    Incomplete {
        /// Human-readable label.
        #[serde(default)]
        label: String,
    },

    /// Satisfy every one of the nested rules.
    #[serde(rename_all = "camelCase")]
    Subset {
        /// Human-readable label.
        #[serde(default)]
        label: String,
        /// The nested rules.
        #[serde(default, deserialize_with = "lenient::rules")]
        rule_array: Vec<RuleNode>,
    },

    /// A rule type this crate does not recognize.
    #[serde(other)]
    Unknown,
}

impl RuleNode {
    /// The name of the rule type, as used by the audit service.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Group { .. } => "Group",
            Self::Course { .. } => "Course",
            Self::IfStmt { .. } => "IfStmt",
            Self::Block { .. } => "Block",
            Self::Noncourse { .. } => "Noncourse",
            Self::Complete { .. } => "Complete",
            Self::Incomplete { .. } => "Incomplete",
            Self::Subset { .. } => "Subset",
            Self::Unknown => "Unknown",
        }
    }

    /// The label of the rule, or an empty string for unknown rules.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Group { label, .. }
            | Self::Course { label, .. }
            | Self::IfStmt { label, .. }
            | Self::Block { label, .. }
            | Self::Noncourse { label, .. }
            | Self::Complete { label }
            | Self::Incomplete { label }
            | Self::Subset { label, .. } => label,
            Self::Unknown => "",
        }
    }
}

/// Parameters of a [`RuleNode::Group`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequirement {
    /// How many of the nested rules must be satisfied.
    #[serde(deserialize_with = "lenient::count")]
    pub number_of_groups: u32,
}

/// Parameters of a [`RuleNode::Course`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequirement {
    /// Minimum number of credits, for unit-based rules.
    #[serde(
        default,
        deserialize_with = "lenient::optional_units",
        skip_serializing_if = "Option::is_none"
    )]
    pub credits_begin: Option<f64>,

    /// Minimum number of classes, for class-based rules.
    #[serde(
        default,
        deserialize_with = "lenient::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub classes_begin: Option<u32>,

    /// Courses that count towards the rule.
    #[serde(default)]
    pub course_array: Vec<CourseReference>,

    /// Courses that never count towards the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub except: Option<CourseList>,
}

/// A bare list of course references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseList {
    /// The references.
    #[serde(default)]
    pub course_array: Vec<CourseReference>,
}

/// Parameters of a [`RuleNode::IfStmt`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfRequirement {
    /// Rules applying when the condition holds.
    #[serde(default)]
    pub if_part: RuleBranch,

    /// Rules applying otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_part: Option<RuleBranch>,
}

/// One branch of a [`RuleNode::IfStmt`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBranch {
    /// The rules of the branch.
    #[serde(default, deserialize_with = "lenient::rules")]
    pub rule_array: Vec<RuleNode>,
}

/// A reference to one or more catalog courses.
///
/// `number` is an exact course number (`161`, `H2A`), a bare wildcard
/// (`@`, every course of the department), a wildcard pattern (`1@@`), or
/// the start of a numeric range (`100-199`, or `100` with `number_end`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseReference {
    /// Department code as used by the audit service.
    pub discipline: String,

    /// Course number or pattern.
    pub number: String,

    /// End of a numeric range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_end: Option<String>,

    /// Filters applied to the resolved courses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub with_array: Vec<WithClause>,
}

impl CourseReference {
    /// A reference with no range end and no filters.
    #[must_use]
    pub fn new(discipline: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            discipline: discipline.into(),
            number: number.into(),
            ..Self::default()
        }
    }
}

/// A filter narrowing a resolved course set, e.g. on unit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithClause {
    /// The attribute being compared, e.g. `DWCREDIT`.
    pub code: String,

    /// The comparison.
    pub operator: Operator,

    /// The right-hand side of the comparison.
    #[serde(default)]
    pub value_list: Vec<String>,
}

/// Comparison operator of a [`WithClause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// `<`
    #[serde(rename = "<")]
    Less,
    /// `<=`
    #[serde(rename = "<=")]
    LessOrEqual,
    /// `=`
    #[serde(rename = "=")]
    Equal,
    /// `>`
    #[serde(rename = ">")]
    Greater,
    /// `>=`
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// Any operator not listed above. Clauses using it filter nothing.
    #[serde(other)]
    Other,
}

/// The audit service encodes numbers inconsistently, sometimes as JSON
/// numbers and sometimes as numeric strings. Individual rules may also be
/// malformed without invalidating their siblings.
mod lenient {
    use serde::{Deserialize, Deserializer, de::Error};

    use super::RuleNode;

    /// A rule array in which a rule that fails to deserialize becomes
    /// [`RuleNode::Unknown`] and is skipped during resolution.
    pub fn rules<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RuleNode>, D::Error> {
        let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|value| {
                serde_json::from_value(value).unwrap_or_else(|e| {
                    tracing::debug!("Skipping malformed rule: {e}");
                    RuleNode::Unknown
                })
            })
            .collect())
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Integer(u32),
        Float(f64),
        Text(String),
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        match Number::deserialize(deserializer)? {
            Number::Integer(value) => Ok(value),
            Number::Float(value) => Err(D::Error::custom(format!(
                "expected a whole number, got {value}"
            ))),
            Number::Text(text) => text
                .trim()
                .parse()
                .map_err(|e| D::Error::custom(format!("invalid count '{text}': {e}"))),
        }
    }

    pub fn optional_count<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u32>, D::Error> {
        match Option::<Number>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Number::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(Number::Integer(value)) => Ok(Some(value)),
            Some(Number::Float(value)) => Err(D::Error::custom(format!(
                "expected a whole number, got {value}"
            ))),
            Some(Number::Text(text)) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid count '{text}': {e}"))),
        }
    }

    pub fn optional_units<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        match Option::<Number>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Number::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(Number::Integer(value)) => Ok(Some(f64::from(value))),
            Some(Number::Float(value)) => Ok(Some(value)),
            Some(Number::Text(text)) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid unit count '{text}': {e}"))),
        }
    }
}
