//! End-to-end resolution of an audit block against a catalog snapshot.

use std::path::Path;

use reqtree::{
    CatalogCourse, CatalogLookup, Config, InMemoryCatalog, PrerequisiteGraph, ProgramId,
    Requirement, ResumeCache, RuleBlock, fingerprint, parse_prerequisites,
};
use serde_json::json;
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn catalog_snapshot() -> serde_json::Value {
    let course = |department: &str, number: &str, numeric: u32, units: f64| {
        json!({
            "id": format!("{}{number}", department.replace(' ', "")),
            "department": department,
            "courseNumber": number,
            "courseNumeric": numeric,
            "minUnits": units,
            "maxUnits": units,
        })
    };
    json!([
        course("COMPSCI", "161", 161, 4.0),
        course("COMPSCI", "162", 162, 4.0),
        course("COMPSCI", "171", 171, 4.0),
        course("COMPSCI", "199", 199, 2.0),
        course("I&C SCI", "31", 31, 4.0),
        course("I&C SCI", "32", 32, 4.0),
        course("I&C SCI", "33", 33, 4.0),
        course("MATH", "2A", 2, 4.0),
        course("MATH", "2B", 2, 4.0),
    ])
}

fn audit_block() -> serde_json::Value {
    json!({
        "title": "Major Requirements",
        "ruleArray": [
            {
                "ruleType": "Course",
                "label": "Introductory Programming",
                "requirement": {
                    "classesBegin": "3",
                    "courseArray": [
                        {"discipline": "I&C SCI", "number": "31", "numberEnd": "33"}
                    ]
                }
            },
            {
                "ruleType": "Group",
                "label": "Upper Division",
                "requirement": {"numberOfGroups": 1},
                "ruleArray": [
                    {
                        "ruleType": "Course",
                        "label": "Electives",
                        "requirement": {
                            "creditsBegin": "8",
                            "courseArray": [
                                {
                                    "discipline": "COMPSCI",
                                    "number": "1@@",
                                    "withArray": [
                                        {"code": "DWCREDITS", "operator": ">=", "valueList": ["4"]}
                                    ]
                                },
                                {"discipline": "COMPSCI", "number": "ELECTIVE"}
                            ],
                            "except": {
                                "courseArray": [{"discipline": "COMPSCI", "number": "171"}]
                            }
                        }
                    },
                    {"ruleType": "Block", "label": "Specialization"},
                    {"ruleType": "Blocktype", "label": "Unsupported"}
                ]
            },
            {
                "ruleType": "IfStmt",
                "requirement": {
                    "ifPart": {"ruleArray": [
                        {
                            "ruleType": "Course",
                            "label": "Calculus I",
                            "requirement": {
                                "classesBegin": 1,
                                "courseArray": [{"discipline": "MATH", "number": "2A"}]
                            }
                        }
                    ]},
                    "elsePart": {"ruleArray": [
                        {
                            "ruleType": "Course",
                            "label": "Calculus II",
                            "requirement": {
                                "classesBegin": 1,
                                "courseArray": [{"discipline": "MATH", "number": "2B"}]
                            }
                        }
                    ]}
                }
            },
            {"ruleType": "Complete", "label": "Upper Division Writing Satisfied"}
        ]
    })
}

fn expected() -> Vec<Requirement> {
    let course = |label: &str, courses: &[&str]| Requirement::Course {
        label: label.to_owned(),
        course_count: 1,
        courses: courses.iter().map(ToString::to_string).collect(),
    };
    vec![
        Requirement::Course {
            label: "Introductory Programming".to_owned(),
            course_count: 3,
            courses: vec!["I&CSCI31".into(), "I&CSCI32".into(), "I&CSCI33".into()],
        },
        Requirement::Group {
            label: "Upper Division".to_owned(),
            requirement_count: 1,
            requirements: vec![Requirement::Unit {
                label: "Electives".to_owned(),
                unit_count: 8.0,
                courses: vec!["COMPSCI161".into(), "COMPSCI162".into()],
            }],
        },
        Requirement::Group {
            label: "Select 1 of the following".to_owned(),
            requirement_count: 1,
            requirements: vec![
                course("Calculus I", &["MATH2A"]),
                course("Calculus II", &["MATH2B"]),
            ],
        },
        Requirement::Marker {
            label: "Upper Division Writing Required".to_owned(),
        },
    ]
}

#[test]
fn audit_block_resolves_against_snapshot() {
    let dir = TempDir::new().unwrap();
    let catalog_path = write_json(dir.path(), "catalog.json", &catalog_snapshot());
    let catalog = InMemoryCatalog::load(&catalog_path).unwrap();
    assert_eq!(catalog.len(), 9);

    let block: RuleBlock = serde_json::from_value(audit_block()).unwrap();
    assert_eq!(block.title.as_deref(), Some("Major Requirements"));

    let config = Config::default();
    let resolver = reqtree::Resolver::new(&catalog, &config);
    let requirements = resolver.resolve(&block.rule_array).unwrap();

    assert_eq!(requirements, expected());

    // resolution is deterministic
    let again = resolver.resolve(&block.rule_array).unwrap();
    assert_eq!(fingerprint(&requirements), fingerprint(&again));
}

#[test]
fn resolver_accepts_trait_objects() {
    let courses: Vec<CatalogCourse> = serde_json::from_value(catalog_snapshot()).unwrap();
    let catalog: InMemoryCatalog = courses.into_iter().collect();
    let catalog: &dyn CatalogLookup = &catalog;
    let config = Config::default();

    let block: RuleBlock = serde_json::from_value(audit_block()).unwrap();
    let requirements = reqtree::Resolver::new(catalog, &config)
        .resolve(&block.rule_array)
        .unwrap();
    assert_eq!(requirements, expected());
}

#[test]
fn cache_resumes_unchanged_blocks() {
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("cache.json");
    let id = ProgramId::from("U-MAJOR-0201-BS").to_string();
    let input = fingerprint(&audit_block());

    let mut cache = ResumeCache::load(&cache_path).unwrap();
    assert!(cache.get(&id, &input).is_none());
    cache.insert(id.clone(), input.clone(), expected());
    cache.save(&cache_path).unwrap();

    let cache = ResumeCache::load(&cache_path).unwrap();
    assert_eq!(
        cache.get(&id, &input).map(|entry| &entry.requirements),
        Some(&expected())
    );

    let mut changed = audit_block();
    changed["title"] = json!("Major Requirements (2025)");
    assert!(cache.get(&id, &fingerprint(&changed)).is_none());
}

#[test]
fn prerequisite_texts_form_a_graph() {
    let texts = [
        ("I&C SCI 32", "I&C SCI 31 ( min grade = C )", ""),
        ("I&C SCI 33", "I&C SCI 32 ( min grade = C )", "I&C SCI 31"),
        (
            "COMPSCI 161",
            "(I&C SCI 33 OR AP COMPUTER SCIENCE A ( min score = 4 )) AND MATH 2B",
            "",
        ),
    ];
    let trees: Vec<_> = texts
        .iter()
        .map(|(course, prerequisites, antirequisites)| {
            (*course, parse_prerequisites(prerequisites, antirequisites))
        })
        .collect();
    let graph: PrerequisiteGraph = trees.iter().map(|(course, tree)| (*course, tree)).collect();

    // an antirequisite is not a dependency
    assert_eq!(graph.dependents_of("I&C SCI 31"), vec!["I&C SCI 32"]);
    assert_eq!(
        graph.prerequisites_of("COMPSCI 161"),
        vec!["I&C SCI 33", "MATH 2B"]
    );
    assert!(graph.cycles().is_empty());
}
