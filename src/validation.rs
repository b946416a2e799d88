//! Input validation for seating problems.
//!
//! Checks structural integrity of rosters, candidates and rooms before
//! any allocation work begins. Detects:
//! - Missing required attributes (student ID, section, gender)
//! - Duplicate candidate or room IDs
//! - Candidates registered for another session
//! - Rooms without seats
//!
//! All issues are collected; callers get the complete list in one pass.

use serde::Serialize;
use std::collections::HashSet;

use crate::models::{Candidate, Room, RosterEntry};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending candidate or room ID (roster position if the ID is blank).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    /// A roster entry has a blank student ID.
    MissingStudentId,
    /// A candidate has no section label.
    MissingSection,
    /// A candidate has no gender attribute.
    MissingGender,
    /// Two candidates or two rooms share the same ID.
    DuplicateId,
    /// A candidate belongs to a different exam session.
    SessionMismatch,
    /// A room has zero rows or zero columns.
    EmptyRoom,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Validates the roster entries selected for a session.
///
/// Checks:
/// 1. Every entry has a student ID
/// 2. Every entry has a section and a gender
/// 3. No student ID appears twice
pub fn validate_roster(entries: &[&RosterEntry]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (position, entry) in entries.iter().enumerate() {
        let id = entry.student_id.trim();
        let label = if id.is_empty() {
            format!("#{}", position + 1)
        } else {
            id.to_string()
        };

        if id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingStudentId,
                &label,
                format!("Roster entry {label} has no student ID"),
            ));
        } else if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &label,
                format!("Duplicate student ID: {id}"),
            ));
        }

        if is_blank(entry.section.as_deref()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingSection,
                &label,
                format!("Student '{label}' has no section"),
            ));
        }

        if is_blank(entry.gender.as_deref()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingGender,
                &label,
                format!("Student '{label}' has no gender"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a candidate pool and room set for one session.
///
/// Checks:
/// 1. No duplicate candidate IDs
/// 2. Every candidate has a section and a gender
/// 3. Every candidate belongs to `session_id`
/// 4. No duplicate room IDs
/// 5. Every room has at least one seat
pub fn validate_input(session_id: &str, candidates: &[Candidate], rooms: &[Room]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut candidate_ids = HashSet::new();
    for c in candidates {
        if !candidate_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &c.id,
                format!("Duplicate candidate ID: {}", c.id),
            ));
        }
        if c.section.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingSection,
                &c.id,
                format!("Candidate '{}' has no section", c.id),
            ));
        }
        if c.gender.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingGender,
                &c.id,
                format!("Candidate '{}' has no gender", c.id),
            ));
        }
        if c.session != session_id {
            errors.push(ValidationError::new(
                ValidationErrorKind::SessionMismatch,
                &c.id,
                format!(
                    "Candidate '{}' is registered for session '{}', not '{}'",
                    c.id, c.session, session_id
                ),
            ));
        }
    }

    let mut room_ids = HashSet::new();
    for r in rooms {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &r.id,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
        if r.capacity() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyRoom,
                &r.id,
                format!("Room '{}' has {}x{} seats", r.id, r.rows, r.columns),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
