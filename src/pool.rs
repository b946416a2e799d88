//! Candidate pool builder.
//!
//! Selects the roster entries registered for one exam session and turns
//! them into validated [`Candidate`]s, preserving roster order. Roster
//! order is the tie-break order everywhere downstream.

use tracing::debug;

use crate::error::{AllocationError, Result};
use crate::models::{Candidate, RosterEntry};
use crate::validation::validate_roster;

/// Builds the ordered candidate pool for one exam session.
///
/// # Example
/// ```
/// use exam_seating::models::RosterEntry;
/// use exam_seating::pool::CandidatePoolBuilder;
///
/// let roster = vec![
///     RosterEntry::new("S1", "MID").with_section("A").with_gender("F"),
///     RosterEntry::new("S2", "END").with_section("A").with_gender("M"),
/// ];
/// let pool = CandidatePoolBuilder::new("MID").build(&roster).unwrap();
/// assert_eq!(pool.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CandidatePoolBuilder {
    session_id: String,
}

impl CandidatePoolBuilder {
    /// Creates a builder for the given session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    /// Session this builder selects.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Builds the pool from roster entries.
    ///
    /// Entries of other sessions are skipped. Fails with a validation
    /// error naming every selected entry that lacks a student ID, section
    /// or gender, or repeats a student ID.
    pub fn build(&self, roster: &[RosterEntry]) -> Result<Vec<Candidate>> {
        let selected: Vec<&RosterEntry> = roster
            .iter()
            .filter(|e| e.session.trim() == self.session_id)
            .collect();

        validate_roster(&selected).map_err(AllocationError::Validation)?;

        let candidates: Vec<Candidate> = selected.into_iter().map(to_candidate).collect();

        debug!(
            session = %self.session_id,
            roster = roster.len(),
            candidates = candidates.len(),
            "candidate pool built"
        );

        Ok(candidates)
    }
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

fn to_candidate(entry: &RosterEntry) -> Candidate {
    Candidate {
        id: entry.student_id.trim().to_string(),
        name: trimmed(entry.name.as_deref()),
        email: trimmed(entry.email.as_deref()),
        section: trimmed(entry.section.as_deref()),
        gender: trimmed(entry.gender.as_deref()),
        session: entry.session.trim().to_string(),
    }
}
