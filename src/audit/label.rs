//! Label normalization.
//!
//! Audits phrase some labels according to the progress of the student the
//! audit was run for ("Writing Requirement Satisfied"). Archived requirement
//! trees must not depend on whose audit they came from, so such wording is
//! rewritten to the state-independent form.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static SATISFIED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([Ss])atisfied\b").expect("valid regex"));

/// Rewrites completion-state-dependent wording in a label.
///
/// `Satisfied` becomes `Required` and `satisfied` becomes `required`;
/// everything else is left untouched.
#[must_use]
pub fn normalize_label(label: &str) -> Cow<'_, str> {
    SATISFIED.replace_all(label, |captures: &regex::Captures| {
        if &captures[1] == "S" {
            "Required"
        } else {
            "required"
        }
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("Writing Requirement Satisfied", "Writing Requirement Required"; "capitalized")]
    #[test_case("American History satisfied", "American History required"; "lowercase")]
    #[test_case("Entry Level Writing", "Entry Level Writing"; "untouched")]
    #[test_case("Unsatisfied", "Unsatisfied"; "word boundary")]
    fn rewrites_state_wording(label: &str, expected: &str) {
        assert_eq!(normalize_label(label), expected);
    }

    #[test]
    fn unchanged_label_is_borrowed() {
        assert!(matches!(normalize_label("GPA"), Cow::Borrowed(_)));
    }
}
