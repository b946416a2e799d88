//! Seating conflict rules.
//!
//! The conflict predicate decides whether two candidates may sit in
//! adjacent seats. The default forbids adjacency only when both section
//! and gender match.

use serde::{Deserialize, Serialize};

use super::Candidate;

/// Predicate deciding when two adjacent candidates conflict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictRule {
    /// Conflict when section AND gender are both equal.
    #[default]
    SectionAndGender,
    /// Conflict whenever section is equal.
    SectionOnly,
    /// Conflict when section OR gender is equal.
    SectionOrGender,
}

impl ConflictRule {
    /// Whether `a` and `b` may not be seated next to each other.
    #[inline]
    pub fn conflicts(self, a: &Candidate, b: &Candidate) -> bool {
        let same_section = a.section == b.section;
        let same_gender = a.gender == b.gender;
        match self {
            ConflictRule::SectionAndGender => same_section && same_gender,
            ConflictRule::SectionOnly => same_section,
            ConflictRule::SectionOrGender => same_section || same_gender,
        }
    }

    /// Parses a configuration value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "section-and-gender" | "and" => Some(Self::SectionAndGender),
            "section" | "section-only" => Some(Self::SectionOnly),
            "section-or-gender" | "or" => Some(Self::SectionOrGender),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(section: &str, gender: &str) -> Candidate {
        Candidate::new("id", section, gender, "S")
    }

    #[test]
    fn test_section_and_gender() {
        let rule = ConflictRule::SectionAndGender;
        assert!(rule.conflicts(&c("X", "M"), &c("X", "M")));
        assert!(!rule.conflicts(&c("X", "M"), &c("X", "F")));
        assert!(!rule.conflicts(&c("X", "M"), &c("Y", "M")));
    }

    #[test]
    fn test_section_only() {
        let rule = ConflictRule::SectionOnly;
        assert!(rule.conflicts(&c("X", "M"), &c("X", "F")));
        assert!(!rule.conflicts(&c("X", "M"), &c("Y", "M")));
    }

    #[test]
    fn test_section_or_gender() {
        let rule = ConflictRule::SectionOrGender;
        assert!(rule.conflicts(&c("X", "M"), &c("X", "F")));
        assert!(rule.conflicts(&c("X", "M"), &c("Y", "M")));
        assert!(!rule.conflicts(&c("X", "M"), &c("Y", "F")));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ConflictRule::parse("section_and_gender"),
            Some(ConflictRule::SectionAndGender)
        );
        assert_eq!(ConflictRule::parse("Section"), Some(ConflictRule::SectionOnly));
        assert_eq!(
            ConflictRule::parse("section-or-gender"),
            Some(ConflictRule::SectionOrGender)
        );
        assert_eq!(ConflictRule::parse("never"), None);
    }
}
