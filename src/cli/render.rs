//! Indented tree rendering

use std::fmt::Write;

use reqtree::{Prerequisite, PrerequisiteNode, PrerequisiteTree, Requirement};

use super::terminal::Colorize;

/// One rendered node: its own line, and the nodes beneath it.
struct Node {
    line: String,
    children: Vec<Node>,
}

impl Node {
    const fn leaf(line: String) -> Self {
        Self {
            line,
            children: Vec::new(),
        }
    }

    fn write(&self, out: &mut String, prefix: &str, last: bool, root: bool) {
        let (branch, indent) = match (root, last) {
            (true, _) => ("", ""),
            (false, true) => ("└─ ", "   "),
            (false, false) => ("├─ ", "│  "),
        };
        let _ = writeln!(out, "{prefix}{branch}{}", self.line);

        let prefix = format!("{prefix}{indent}");
        for (i, child) in self.children.iter().enumerate() {
            child.write(out, &prefix, i + 1 == self.children.len(), false);
        }
    }
}

fn render(roots: &[Node]) -> String {
    let mut out = String::new();
    for root in roots {
        root.write(&mut out, "", true, true);
    }
    out
}

/// Renders a prerequisite tree, one node per line.
pub fn prerequisite_tree(tree: &PrerequisiteTree) -> String {
    if tree.is_empty() {
        return format!("{}\n", "(no prerequisites)".dim());
    }
    render(&tree_nodes(tree, false))
}

fn tree_nodes(tree: &PrerequisiteTree, prohibited: bool) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (name, members, prohibited) in [
        ("AND", &tree.and, prohibited),
        ("OR", &tree.or, prohibited),
        ("NOT", &tree.not, true),
    ] {
        if members.is_empty() {
            continue;
        }
        nodes.push(Node {
            line: name.connective(),
            children: members
                .iter()
                .flat_map(|member| member_nodes(member, prohibited))
                .collect(),
        });
    }
    nodes
}

fn member_nodes(member: &PrerequisiteNode, prohibited: bool) -> Vec<Node> {
    match member {
        PrerequisiteNode::Leaf(leaf) => vec![Node::leaf(leaf_line(leaf, prohibited))],
        PrerequisiteNode::Tree(tree) => tree_nodes(tree, prohibited),
    }
}

fn leaf_line(leaf: &Prerequisite, prohibited: bool) -> String {
    let (name, detail) = match leaf {
        Prerequisite::Course {
            course_id,
            min_grade,
        } => (course_id, min_grade.as_ref().map(|g| format!("min grade {g}"))),
        Prerequisite::Corequisite { course_id } => (course_id, Some("corequisite".to_owned())),
        Prerequisite::Exam {
            exam_name,
            min_grade,
        } => (exam_name, min_grade.as_ref().map(|g| format!("min score {g}"))),
    };

    let name = if prohibited {
        name.prohibited()
    } else {
        name.course()
    };
    let Some(detail) = detail else {
        return name;
    };
    let detail = format!("({detail})");
    format!("{name} {}", detail.dim())
}

/// Renders resolved requirements, one node per line.
pub fn requirements(requirements: &[Requirement]) -> String {
    render(&requirements.iter().map(requirement_node).collect::<Vec<_>>())
}

fn requirement_node(requirement: &Requirement) -> Node {
    match requirement {
        Requirement::Course {
            label,
            course_count,
            courses,
        } => Node {
            line: format!("{label} {}", format!("[{course_count} of]").dim()),
            children: course_nodes(courses),
        },
        Requirement::Unit {
            label,
            unit_count,
            courses,
        } => Node {
            line: format!("{label} {}", format!("[{unit_count} units from]").dim()),
            children: course_nodes(courses),
        },
        Requirement::Group {
            label,
            requirement_count,
            requirements,
        } => Node {
            line: format!(
                "{} {}",
                label.connective(),
                format!("[{requirement_count} of {}]", requirements.len()).dim()
            ),
            children: requirements.iter().map(requirement_node).collect(),
        },
        Requirement::Marker { label } => Node::leaf(label.clone()),
    }
}

fn course_nodes(courses: &[String]) -> Vec<Node> {
    courses.iter().map(|c| Node::leaf(c.course())).collect()
}
