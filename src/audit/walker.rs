//! Recursive resolution of audit rule arrays into requirement trees.

use std::collections::HashSet;

use tracing::instrument;

use super::{label::normalize_label, reference::resolve_reference};
use crate::{
    catalog::{CatalogError, CatalogLookup},
    domain::{
        CatalogCourse, Config, Requirement, RuleNode,
        rule::{CourseRequirement, IfRequirement},
    },
};

/// Resolves audit rule arrays against a catalog.
///
/// The resolver holds no state between calls; resolving the same rules
/// against the same catalog always yields the same tree.
#[derive(Debug)]
pub struct Resolver<'a, C: ?Sized> {
    catalog: &'a C,
    config: &'a Config,
}

impl<'a, C: CatalogLookup + ?Sized> Resolver<'a, C> {
    /// Creates a resolver looking courses up in `catalog`.
    #[must_use]
    pub const fn new(catalog: &'a C, config: &'a Config) -> Self {
        Self { catalog, config }
    }

    /// Resolves a rule array into requirements.
    ///
    /// Rules that cannot be resolved here (block references, non-course
    /// rules, unknown rule types, course rules without a count) contribute
    /// nothing; the rest of the array still resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be queried. No partial tree is
    /// returned in that case.
    #[instrument(level = "debug", skip_all, fields(rules = rules.len()))]
    pub fn resolve(&self, rules: &[RuleNode]) -> Result<Vec<Requirement>, CatalogError> {
        self.resolve_each(rules)
    }

    fn resolve_each<'r>(
        &self,
        rules: impl IntoIterator<Item = &'r RuleNode>,
    ) -> Result<Vec<Requirement>, CatalogError> {
        let mut requirements = Vec::new();
        for rule in rules {
            self.resolve_rule(rule, &mut requirements)?;
        }
        Ok(requirements)
    }

    fn resolve_rule(
        &self,
        rule: &RuleNode,
        out: &mut Vec<Requirement>,
    ) -> Result<(), CatalogError> {
        match rule {
            RuleNode::Block { .. } | RuleNode::Noncourse { .. } => {
                tracing::trace!("Skipping {} rule '{}'", rule.kind(), rule.label());
            }
            RuleNode::Unknown => {
                tracing::debug!("Skipping rule of unknown type");
            }
            RuleNode::Course { label, requirement } => {
                out.extend(self.resolve_course(label, requirement)?);
            }
            RuleNode::Group {
                label,
                requirement,
                rule_array,
            } => out.push(Requirement::Group {
                label: label.clone(),
                requirement_count: requirement.number_of_groups,
                requirements: self.resolve(rule_array)?,
            }),
            RuleNode::IfStmt { requirement, .. } => {
                self.resolve_conditional(requirement, out)?;
            }
            RuleNode::Complete { label } | RuleNode::Incomplete { label } => {
                out.push(Requirement::Marker {
                    label: normalize_label(label).into_owned(),
                });
            }
            RuleNode::Subset { label, rule_array } => {
                let requirements = self.resolve(rule_array)?;
                out.push(Requirement::Group {
                    label: label.clone(),
                    requirement_count: u32::try_from(requirements.len()).unwrap_or(u32::MAX),
                    requirements,
                });
            }
        }
        Ok(())
    }

    fn resolve_course(
        &self,
        label: &str,
        requirement: &CourseRequirement,
    ) -> Result<Option<Requirement>, CatalogError> {
        let resolved = match (requirement.classes_begin, requirement.credits_begin) {
            (Some(course_count), _) => Requirement::Course {
                label: label.to_string(),
                course_count,
                courses: self.course_ids(requirement)?,
            },
            (None, Some(unit_count)) => Requirement::Unit {
                label: label.to_string(),
                unit_count,
                courses: self.course_ids(requirement)?,
            },
            (None, None) => {
                tracing::debug!("Dropping course rule '{label}': no class or credit count");
                return Ok(None);
            }
        };
        Ok(Some(resolved))
    }

    /// Included courses minus excluded courses, deduplicated, in catalog
    /// order.
    fn course_ids(&self, requirement: &CourseRequirement) -> Result<Vec<String>, CatalogError> {
        let mut included = Vec::new();
        for reference in &requirement.course_array {
            included.extend(resolve_reference(reference, self.catalog, self.config)?);
        }

        let mut excluded = HashSet::new();
        for reference in requirement
            .except
            .iter()
            .flat_map(|except| &except.course_array)
        {
            excluded.extend(
                resolve_reference(reference, self.catalog, self.config)?
                    .into_iter()
                    .map(|course| course.id),
            );
        }

        included.retain(|course: &CatalogCourse| !excluded.contains(&course.id));
        included.sort_by(CatalogCourse::catalog_order);
        included.dedup_by(|a, b| a.id == b.id);

        Ok(included.into_iter().map(|course| course.id).collect())
    }

    /// Both branches of a conditional are kept, since which one applies
    /// depends on the student. Alternatives are offered as "select one"
    /// unless only one requirement results.
    fn resolve_conditional(
        &self,
        requirement: &IfRequirement,
        out: &mut Vec<Requirement>,
    ) -> Result<(), CatalogError> {
        let mut rules = Vec::new();
        flatten_conditional(requirement, &mut rules);

        if rules.iter().any(|rule| matches!(rule, RuleNode::Block { .. })) {
            tracing::debug!("Discarding conditional rule referencing a block");
            return Ok(());
        }

        let mut alternatives = self.resolve_each(rules)?;

        match alternatives.len() {
            0 => {}
            1 => out.append(&mut alternatives),
            _ => out.push(Requirement::Group {
                label: self.config.select_one_label().to_string(),
                requirement_count: 1,
                requirements: alternatives,
            }),
        }
        Ok(())
    }
}

/// Collects the rules of both branches, flattening nested conditionals.
fn flatten_conditional<'r>(requirement: &'r IfRequirement, rules: &mut Vec<&'r RuleNode>) {
    let branches = std::iter::once(&requirement.if_part).chain(requirement.else_part.as_ref());
    for rule in branches.flat_map(|branch| &branch.rule_array) {
        match rule {
            RuleNode::IfStmt { requirement, .. } => flatten_conditional(requirement, rules),
            _ => rules.push(rule),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        catalog::{CoursePattern, InMemoryCatalog},
        domain::RuleBlock,
    };

    fn catalog() -> InMemoryCatalog {
        [
            CatalogCourse::new("CS", "101", 4.0, 4.0),
            CatalogCourse::new("CS", "102H", 4.0, 4.0),
            CatalogCourse::new("CS", "103", 4.0, 4.0),
            CatalogCourse::new("CS", "20", 4.0, 4.0),
            CatalogCourse::new("MATH", "2A", 4.0, 4.0),
            CatalogCourse::new("MATH", "2B", 4.0, 4.0),
        ]
        .into_iter()
        .collect()
    }

    fn rules(value: Value) -> Vec<RuleNode> {
        serde_json::from_value::<RuleBlock>(json!({ "ruleArray": value }))
            .unwrap()
            .rule_array
    }

    fn resolve(value: Value) -> Vec<Requirement> {
        let catalog = catalog();
        let config = Config::default();
        Resolver::new(&catalog, &config).resolve(&rules(value)).unwrap()
    }

    fn course_rule(label: &str, number: &str) -> Value {
        json!({
            "ruleType": "Course",
            "label": label,
            "requirement": {"classesBegin": "1", "courseArray": [{"discipline": "CS", "number": number}]}
        })
    }

    #[test]
    fn class_count_takes_precedence() {
        let requirements = resolve(json!([{
            "ruleType": "Course",
            "label": "Intro",
            "requirement": {
                "classesBegin": "2",
                "creditsBegin": "8",
                "courseArray": [{"discipline": "CS", "number": "1@@"}]
            }
        }]));

        assert_eq!(
            requirements,
            vec![Requirement::Course {
                label: "Intro".to_string(),
                course_count: 2,
                courses: vec!["CS101".into(), "CS102H".into(), "CS103".into()],
            }]
        );
    }

    #[test]
    fn credit_rule_becomes_unit_requirement() {
        let requirements = resolve(json!([{
            "ruleType": "Course",
            "label": "Units",
            "requirement": {"creditsBegin": "8", "courseArray": [{"discipline": "MATH", "number": "@"}]}
        }]));

        assert_eq!(
            requirements,
            vec![Requirement::Unit {
                label: "Units".to_string(),
                unit_count: 8.0,
                courses: vec!["MATH2A".into(), "MATH2B".into()],
            }]
        );
    }

    #[test]
    fn course_rule_without_count_is_dropped() {
        let requirements = resolve(json!([{
            "ruleType": "Course",
            "requirement": {"courseArray": [{"discipline": "CS", "number": "101"}]}
        }]));
        assert!(requirements.is_empty());
    }

    #[test]
    fn exclusions_take_precedence_and_output_is_sorted() {
        let requirements = resolve(json!([{
            "ruleType": "Course",
            "label": "Pick",
            "requirement": {
                "classesBegin": 1,
                "courseArray": [
                    {"discipline": "CS", "number": "103"},
                    {"discipline": "CS", "number": "102H"},
                    {"discipline": "CS", "number": "101"},
                    {"discipline": "CS", "number": "1@@"},
                    {"discipline": "CS", "number": "20"}
                ],
                "except": {"courseArray": [{"discipline": "CS", "number": "102H"}]}
            }
        }]));

        let [Requirement::Course { courses, .. }] = requirements.as_slice() else {
            panic!("expected one course requirement, got {requirements:?}");
        };
        assert_eq!(courses, &["CS20", "CS101", "CS103"]);
    }

    #[test]
    fn group_keeps_declared_count() {
        let requirements = resolve(json!([{
            "ruleType": "Group",
            "label": "Pick two",
            "requirement": {"numberOfGroups": "2"},
            "ruleArray": [
                course_rule("A", "101"),
                {"ruleType": "Block", "requirement": {"type": "OTHER", "value": "X"}},
                {"ruleType": "Noncourse", "label": "GPA"},
                course_rule("B", "103")
            ]
        }]));

        let [
            Requirement::Group {
                label,
                requirement_count,
                requirements,
            },
        ] = requirements.as_slice()
        else {
            panic!("expected one group, got {requirements:?}");
        };
        assert_eq!(label, "Pick two");
        assert_eq!(*requirement_count, 2);
        assert_eq!(requirements.len(), 2);
    }

    #[test]
    fn conditional_with_one_result_is_spliced() {
        let requirements = resolve(json!([
            course_rule("Before", "20"),
            {
                "ruleType": "IfStmt",
                "requirement": {
                    "ifPart": {"ruleArray": [course_rule("Only", "101")]},
                    "elsePart": {"ruleArray": [{"ruleType": "Noncourse", "label": "n/a"}]}
                }
            }
        ]));

        let labels: Vec<&str> = requirements.iter().map(Requirement::label).collect();
        assert_eq!(labels, vec!["Before", "Only"]);
    }

    #[test]
    fn conditional_with_alternatives_is_wrapped() {
        let requirements = resolve(json!([{
            "ruleType": "IfStmt",
            "requirement": {
                "ifPart": {"ruleArray": [course_rule("A", "101")]},
                "elsePart": {"ruleArray": [{
                    "ruleType": "IfStmt",
                    "requirement": {
                        "ifPart": {"ruleArray": [course_rule("B", "103")]},
                        "elsePart": {"ruleArray": [course_rule("C", "20")]}
                    }
                }]}
            }
        }]));

        let [
            Requirement::Group {
                label,
                requirement_count,
                requirements,
            },
        ] = requirements.as_slice()
        else {
            panic!("expected a select-one group, got {requirements:?}");
        };
        assert_eq!(label, "Select 1 of the following");
        assert_eq!(*requirement_count, 1);
        let labels: Vec<&str> = requirements.iter().map(Requirement::label).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn conditional_referencing_block_is_discarded() {
        let requirements = resolve(json!([{
            "ruleType": "IfStmt",
            "requirement": {
                "ifPart": {"ruleArray": [course_rule("A", "101")]},
                "elsePart": {"ruleArray": [{
                    "ruleType": "IfStmt",
                    "requirement": {
                        "ifPart": {"ruleArray": [{"ruleType": "Block", "requirement": {}}]}
                    }
                }]}
            }
        }]));
        assert!(requirements.is_empty());
    }

    #[test]
    fn empty_conditional_contributes_nothing() {
        let requirements = resolve(json!([{
            "ruleType": "IfStmt",
            "requirement": {"ifPart": {"ruleArray": [{"ruleType": "Noncourse"}]}}
        }]));
        assert!(requirements.is_empty());
    }

    #[test]
    fn markers_are_normalized() {
        let requirements = resolve(json!([
            {"ruleType": "Complete", "label": "Entry Level Writing Satisfied"},
            {"ruleType": "Incomplete", "label": "Residency"}
        ]));

        assert_eq!(
            requirements,
            vec![
                Requirement::Marker {
                    label: "Entry Level Writing Required".to_string()
                },
                Requirement::Marker {
                    label: "Residency".to_string()
                },
            ]
        );
    }

    #[test]
    fn subset_requires_all_resolved_children() {
        let requirements = resolve(json!([{
            "ruleType": "Subset",
            "label": "Core",
            "ruleArray": [
                course_rule("A", "101"),
                {"ruleType": "Block"},
                course_rule("B", "103"),
                {"ruleType": "Complete", "label": "Done"}
            ]
        }]));

        let [Requirement::Group {
            requirement_count,
            requirements,
            ..
        }] = requirements.as_slice()
        else {
            panic!("expected a group, got {requirements:?}");
        };
        assert_eq!(*requirement_count, 3);
        assert_eq!(requirements.len(), 3);
    }

    #[test]
    fn unknown_rules_are_skipped() {
        let requirements = resolve(json!([
            {"ruleType": "Mystery"},
            course_rule("A", "101")
        ]));
        assert_eq!(requirements.len(), 1);
    }

    #[test]
    fn malformed_rules_leave_siblings_resolved() {
        let requirements = resolve(json!([
            {"ruleType": "Group", "label": "No requirement", "ruleArray": []},
            course_rule("A", "101"),
            {
                "ruleType": "Group",
                "label": "Outer",
                "requirement": {"numberOfGroups": 1},
                "ruleArray": [
                    {"ruleType": "Group", "requirement": {"numberOfGroups": "lots"}},
                    {
                        "ruleType": "Course",
                        "label": "Filtered",
                        "requirement": {
                            "classesBegin": 1,
                            "courseArray": [{
                                "discipline": "CS",
                                "number": "101",
                                "withArray": [{"code": "DWTERM", "operator": "<>", "valueList": ["X"]}]
                            }]
                        }
                    }
                ]
            },
            {"ruleType": "Complete", "label": "Done"}
        ]));

        assert_eq!(
            requirements,
            vec![
                Requirement::Course {
                    label: "A".to_string(),
                    course_count: 1,
                    courses: vec!["CS101".to_string()],
                },
                Requirement::Group {
                    label: "Outer".to_string(),
                    requirement_count: 1,
                    requirements: vec![Requirement::Course {
                        label: "Filtered".to_string(),
                        course_count: 1,
                        courses: vec!["CS101".to_string()],
                    }],
                },
                Requirement::Marker {
                    label: "Done".to_string(),
                },
            ]
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let input = json!([
            course_rule("A", "1@@"),
            {"ruleType": "Group", "requirement": {"numberOfGroups": 1}, "ruleArray": [course_rule("B", "@")]}
        ]);
        assert_eq!(resolve(input.clone()), resolve(input));
    }

    struct FailingCatalog;

    impl CatalogLookup for FailingCatalog {
        fn lookup(
            &self,
            _department: &str,
            _pattern: &CoursePattern,
        ) -> Result<Vec<CatalogCourse>, CatalogError> {
            Err(CatalogError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn catalog_failure_aborts_resolution() {
        let config = Config::default();
        let result = Resolver::new(&FailingCatalog, &config).resolve(&rules(json!([
            {"ruleType": "Complete", "label": "Done"},
            {"ruleType": "Group", "requirement": {"numberOfGroups": 1}, "ruleArray": [course_rule("A", "101")]}
        ])));
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    }
}
