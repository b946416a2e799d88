//! Candidate and roster entry models.
//!
//! A `RosterEntry` is a raw enrollment row as delivered by the roster
//! collaborator; attributes may be missing. A `Candidate` is a validated
//! entry for one exam session with every attribute present.

use serde::{Deserialize, Serialize};

/// A raw enrollment row. Optional fields may be absent or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Student identifier.
    pub student_id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact address for seat notifications.
    #[serde(default)]
    pub email: Option<String>,
    /// Section label (e.g., "CSE-A").
    #[serde(default)]
    pub section: Option<String>,
    /// Gender attribute.
    #[serde(default)]
    pub gender: Option<String>,
    /// Exam session identifier.
    pub session: String,
}

/// A student scheduled to sit an exam in a given session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Student identifier.
    pub id: String,
    /// Display name (may be empty).
    pub name: String,
    /// Contact address (may be empty).
    pub email: String,
    /// Section label.
    pub section: String,
    /// Gender attribute.
    pub gender: String,
    /// Exam session identifier.
    pub session: String,
}

/// The (section, gender) pair used for dispersion grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub section: String,
    pub gender: String,
}

impl RosterEntry {
    /// Creates an entry with the required identifiers.
    pub fn new(student_id: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            session: session.into(),
            ..Default::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the contact address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the section label.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Sets the gender attribute.
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }
}

impl Candidate {
    /// Creates a candidate with the attributes the allocator needs.
    pub fn new(
        id: impl Into<String>,
        section: impl Into<String>,
        gender: impl Into<String>,
        session: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: String::new(),
            section: section.into(),
            gender: gender.into(),
            session: session.into(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the contact address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Dispersion group of this candidate.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            section: self.section.clone(),
            gender: self.gender.clone(),
        }
    }
}
