//! Classification of atomic prerequisite phrases.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::Prerequisite;

/// `<id> ( min <kind> = <grade> )`
static MINIMUM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<id>.+?)\s*\(\s*min\s+(?P<kind>[A-Za-z]+)\s*=\s*(?P<grade>[^()]+?)\s*\)$")
        .expect("valid regex")
});

/// `<id> ( coreq )`
static COREQUISITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<id>.+?)\s*\(\s*(?i:coreq)\s*\)$").expect("valid regex"));

/// A department of one or more words followed by a course number, e.g.
/// `MATH 2A`, `I&C SCI 31`, `CRM/LAW C 7`, `MATH H2A`, `IN4MATX 43`.
static COURSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Z&][A-Z0-9&/]* )+[A-Z]{0,2}\d+[A-Z]*$").expect("valid regex")
});

const ANTIREQUISITE_PREFIX: &str = "NO ";

/// A classified phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    /// The prerequisite must be satisfied.
    Required(Prerequisite),
    /// The prerequisite must not have been satisfied.
    Prohibited(Prerequisite),
}

impl Leaf {
    /// The classified prerequisite, whichever way it applies.
    #[must_use]
    pub fn into_prerequisite(self) -> Prerequisite {
        match self {
            Self::Required(prerequisite) | Self::Prohibited(prerequisite) => prerequisite,
        }
    }
}

/// Classifies one atomic phrase.
///
/// Returns `None` for phrases that match no known shape; callers drop them.
#[must_use]
pub fn classify(phrase: &str) -> Option<Leaf> {
    let phrase = phrase.trim();
    match phrase.strip_prefix(ANTIREQUISITE_PREFIX) {
        Some(rest) => classify_shape(rest.trim()).map(Leaf::Prohibited),
        None => classify_shape(phrase).map(Leaf::Required),
    }
}

fn classify_shape(phrase: &str) -> Option<Prerequisite> {
    if let Some(captures) = MINIMUM.captures(phrase) {
        let id = captures["id"].trim();
        let grade = Some(captures["grade"].trim());
        // A bracketed "grade" marks a course, anything else (score, ...) an exam.
        return Some(if &captures["kind"] == "grade" {
            Prerequisite::course(id, grade)
        } else {
            Prerequisite::exam(id, grade)
        });
    }

    if let Some(captures) = COREQUISITE.captures(phrase) {
        return Some(Prerequisite::corequisite(captures["id"].trim()));
    }

    if COURSE.is_match(phrase) {
        return Some(Prerequisite::course(phrase, None));
    }

    if phrase.starts_with("AP") {
        return Some(Prerequisite::exam(phrase, None));
    }

    None
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("MATH 2A", Prerequisite::course("MATH 2A", None); "course")]
    #[test_case("I&C SCI 31", Prerequisite::course("I&C SCI 31", None); "multi-word department")]
    #[test_case("CRM/LAW C 7", Prerequisite::course("CRM/LAW C 7", None); "slash department")]
    #[test_case("MATH H2A", Prerequisite::course("MATH H2A", None); "honors number")]
    #[test_case("IN4MATX 43", Prerequisite::course("IN4MATX 43", None); "digit in department")]
    #[test_case(
        "MATH 2A ( min grade = C )",
        Prerequisite::course("MATH 2A", Some("C"));
        "minimum grade"
    )]
    #[test_case(
        "MATH 2A (min grade = C-)",
        Prerequisite::course("MATH 2A", Some("C-"));
        "minimum grade compact"
    )]
    #[test_case(
        "AP CALCULUS AB ( min score = 4 )",
        Prerequisite::exam("AP CALCULUS AB", Some("4"));
        "minimum score"
    )]
    #[test_case(
        "PLACEMENT TEST ( min score = 30 )",
        Prerequisite::exam("PLACEMENT TEST", Some("30"));
        "non-AP exam with score"
    )]
    #[test_case("PHYSICS 7LC ( coreq )", Prerequisite::corequisite("PHYSICS 7LC"); "corequisite")]
    #[test_case("AP CHEMISTRY", Prerequisite::exam("AP CHEMISTRY", None); "AP exam")]
    fn required_shapes(phrase: &str, expected: Prerequisite) {
        assert_eq!(classify(phrase), Some(Leaf::Required(expected)));
    }

    #[test]
    fn antirequisite_prefix() {
        assert_eq!(
            classify("NO MATH 2B"),
            Some(Leaf::Prohibited(Prerequisite::course("MATH 2B", None)))
        );
        assert_eq!(
            classify("NO AP CALCULUS BC ( min score = 3 )"),
            Some(Leaf::Prohibited(Prerequisite::exam(
                "AP CALCULUS BC",
                Some("3")
            )))
        );
    }

    #[test_case(""; "empty")]
    #[test_case("Satisfactory completion of the Entry Level Writing requirement"; "prose")]
    #[test_case("math 2a"; "lowercase")]
    #[test_case("NO prose"; "negated prose")]
    fn unrecognized_phrases_are_dropped(phrase: &str) {
        assert_eq!(classify(phrase), None);
    }
}
