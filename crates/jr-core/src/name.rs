//! Assessment of a string as a possible actor name.
//!
//! Actor names become identifiers in the executed program, so they follow the
//! host language's identifier rule and may not collide with its keywords.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum NameValidity {
    Valid,
    Invalid { reason: String },
}

impl NameValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, NameValidity::Valid)
    }
}

fn invalid_because(reason: impl Into<String>) -> NameValidity {
    NameValidity::Invalid {
        reason: reason.into(),
    }
}

/// Keywords and reserved symbols of the Rhai language, which executes the
/// flattened program.
pub const RESERVED_WORDS: &[&str] = &[
    "true", "false", "let", "const", "if", "else", "switch", "do", "while", "until", "loop",
    "for", "in", "continue", "break", "return", "throw", "try", "catch", "import", "export",
    "as", "global", "private", "fn", "this", "Fn", "call", "curry", "is_shared", "is_def_fn",
    "is_def_var", "type_of", "print", "debug", "eval", "var", "static", "is", "goto", "exit",
    "match", "case", "public", "protected", "new", "use", "with", "module", "package", "super",
    "thread", "spawn", "go", "await", "async", "sync", "yield", "default", "void", "null", "nil",
    "shared",
];

pub fn is_reserved_word(candidate: &str) -> bool {
    RESERVED_WORDS.contains(&candidate)
}

/// Judge `candidate` as a name for a new actor. Checks run in order and the
/// first failure is reported.
pub fn assess_name(candidate: &str, existing_names: &BTreeSet<String>) -> NameValidity {
    if candidate.trim().is_empty() {
        return invalid_because("The name cannot be empty.");
    }

    if !identifier_regex().is_match(candidate) {
        return invalid_because(identifier_failure_reason(candidate));
    }

    if is_reserved_word(candidate) {
        return invalid_because(format!(
            "\"{}\" is a reserved word of the language and cannot be used as a name.",
            candidate
        ));
    }

    if existing_names.contains(candidate) {
        return invalid_because(format!("There is already an actor called \"{}\".", candidate));
    }

    NameValidity::Valid
}

fn identifier_failure_reason(candidate: &str) -> String {
    let starts_with_digit = candidate
        .chars()
        .next()
        .is_some_and(|ch| ch.is_ascii_digit());
    if starts_with_digit {
        return "The name cannot start with a digit.".to_string();
    }
    if candidate.chars().any(char::is_whitespace) {
        return "The name cannot contain spaces.".to_string();
    }
    "The name can only contain letters, digits and underscores, and must start with a letter or underscore."
        .to_string()
}

fn identifier_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"))
}

#[cfg(test)]
mod name_tests {
    use super::*;

    fn names(entries: &[&str]) -> BTreeSet<String> {
        entries.iter().map(|name| (*name).to_string()).collect()
    }

    fn reason_of(validity: NameValidity) -> String {
        match validity {
            NameValidity::Invalid { reason } => reason,
            NameValidity::Valid => panic!("expected invalid name"),
        }
    }

    #[test]
    fn accepts_plain_identifiers() {
        let empty = BTreeSet::new();
        assert!(assess_name("Cat", &empty).is_valid());
        assert!(assess_name("_hidden", &empty).is_valid());
        assert!(assess_name("Sprite2", &empty).is_valid());
    }

    #[test]
    fn rejects_empty_and_blank_names() {
        let empty = BTreeSet::new();
        let blank = reason_of(assess_name("   ", &empty));
        assert_eq!(blank, reason_of(assess_name("", &empty)));
        assert!(blank.contains("empty"));
    }

    #[test]
    fn rejects_leading_digit_spaces_and_punctuation() {
        let empty = BTreeSet::new();
        let digit = reason_of(assess_name("2cool", &empty));
        let space = reason_of(assess_name("big cat", &empty));
        let punct = reason_of(assess_name("cat!", &empty));
        assert!(digit.contains("digit"));
        assert!(space.contains("spaces"));
        assert!(punct.contains("letters"));
        assert_ne!(digit, space);
        assert_ne!(space, punct);
    }

    #[test]
    fn rejects_reserved_words() {
        let reason = reason_of(assess_name("for", &BTreeSet::new()));
        assert!(reason.contains("reserved"));
        assert!(!assess_name("fn", &BTreeSet::new()).is_valid());
    }

    #[test]
    fn rejects_case_sensitive_duplicates() {
        let existing = names(&["Cat"]);
        let reason = reason_of(assess_name("Cat", &existing));
        assert!(reason.contains("already"));
        assert!(assess_name("cat", &existing).is_valid());
    }

    #[test]
    fn earlier_rule_wins_over_later_rule() {
        let existing = names(&["for", "2cool"]);
        let reason = reason_of(assess_name("2cool", &existing));
        assert!(reason.contains("digit"));
        let reason = reason_of(assess_name("for", &existing));
        assert!(reason.contains("reserved"));
    }

    #[test]
    fn validity_serializes_with_status_tag() {
        let json = serde_json::to_string(&NameValidity::Valid).expect("serialize");
        assert_eq!(json, r#"{"status":"valid"}"#);
        let json = serde_json::to_string(&invalid_because("nope")).expect("serialize");
        assert_eq!(json, r#"{"status":"invalid","reason":"nope"}"#);
    }
}
