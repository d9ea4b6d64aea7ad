use serde::{Deserialize, Serialize};

/// An atomic prerequisite: a course or exam, optionally with a minimum grade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "prereqType", rename_all = "camelCase")]
pub enum Prerequisite {
    /// A course that must be completed beforehand.
    #[serde(rename_all = "camelCase")]
    Course {
        /// Catalog identifier of the course, e.g. `MATH 2A`.
        course_id: String,
        /// Minimum grade required, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_grade: Option<String>,
    },

    /// A course that may be taken concurrently.
    #[serde(rename = "coreq", rename_all = "camelCase")]
    Corequisite {
        /// Catalog identifier of the course.
        course_id: String,
    },

    /// A placement or standardized exam (e.g. an AP exam).
    #[serde(rename_all = "camelCase")]
    Exam {
        /// Name of the exam as it appears in the catalogue.
        exam_name: String,
        /// Minimum grade or score required, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_grade: Option<String>,
    },
}

impl Prerequisite {
    /// Construct a course prerequisite.
    #[must_use]
    pub fn course(course_id: impl Into<String>, min_grade: Option<&str>) -> Self {
        Self::Course {
            course_id: course_id.into(),
            min_grade: min_grade.map(str::to_string),
        }
    }

    /// Construct a corequisite.
    #[must_use]
    pub fn corequisite(course_id: impl Into<String>) -> Self {
        Self::Corequisite {
            course_id: course_id.into(),
        }
    }

    /// Construct an exam prerequisite.
    #[must_use]
    pub fn exam(exam_name: impl Into<String>, min_grade: Option<&str>) -> Self {
        Self::Exam {
            exam_name: exam_name.into(),
            min_grade: min_grade.map(str::to_string),
        }
    }

    /// The referenced course, if this leaf names one.
    ///
    /// Exams reference no catalog course.
    #[must_use]
    pub fn course_id(&self) -> Option<&str> {
        match self {
            Self::Course { course_id, .. } | Self::Corequisite { course_id } => {
                Some(course_id.as_str())
            }
            Self::Exam { .. } => None,
        }
    }
}

/// A member of one of the lists of a [`PrerequisiteTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrerequisiteNode {
    /// An atomic requirement.
    Leaf(Prerequisite),
    /// A nested subtree.
    Tree(PrerequisiteTree),
}

impl From<Prerequisite> for PrerequisiteNode {
    fn from(value: Prerequisite) -> Self {
        Self::Leaf(value)
    }
}

impl From<PrerequisiteTree> for PrerequisiteNode {
    fn from(value: PrerequisiteTree) -> Self {
        Self::Tree(value)
    }
}

/// A recursive logical tree of prerequisites.
///
/// The lists mirror the sparse persisted form: an empty list is omitted when
/// serialized and an absent list deserializes as empty, so both mean "no
/// constraint".
///
/// After normalization a tree never holds a bare top-level `NOT`; negations
/// are folded into the `AND` list as a `{NOT: [...]}` member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteTree {
    /// All members must be satisfied.
    #[serde(rename = "AND", default, skip_serializing_if = "Vec::is_empty")]
    pub and: Vec<PrerequisiteNode>,

    /// At least one member must be satisfied.
    #[serde(rename = "OR", default, skip_serializing_if = "Vec::is_empty")]
    pub or: Vec<PrerequisiteNode>,

    /// No member may have been satisfied.
    #[serde(rename = "NOT", default, skip_serializing_if = "Vec::is_empty")]
    pub not: Vec<PrerequisiteNode>,
}

impl PrerequisiteTree {
    /// A tree requiring every one of `nodes`.
    pub fn all<I, N>(nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<PrerequisiteNode>,
    {
        Self {
            and: nodes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A tree requiring any one of `nodes`.
    pub fn any<I, N>(nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<PrerequisiteNode>,
    {
        Self {
            or: nodes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A tree prohibiting every one of `nodes`.
    pub fn none<I, N>(nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<PrerequisiteNode>,
    {
        Self {
            not: nodes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Whether the tree imposes no constraint at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty() && self.not.is_empty()
    }

    /// Whether the tree consists of an `OR` list only.
    #[must_use]
    pub fn is_pure_or(&self) -> bool {
        !self.or.is_empty() && self.and.is_empty() && self.not.is_empty()
    }

    /// The course identifiers this tree depends on, in depth-first order.
    ///
    /// `AND` members are visited before `OR` members. `NOT` branches are
    /// skipped: an antirequisite is not a dependency. Exams are skipped since
    /// they reference no course. Duplicates are kept in visit order.
    #[must_use]
    pub fn course_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_course_ids(&mut ids);
        ids
    }

    fn collect_course_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        for node in self.and.iter().chain(&self.or) {
            match node {
                PrerequisiteNode::Leaf(leaf) => ids.extend(leaf.course_id()),
                PrerequisiteNode::Tree(tree) => tree.collect_course_ids(ids),
            }
        }
    }
}
