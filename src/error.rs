//! Allocation error taxonomy.
//!
//! Every failure is recoverable at the calling layer: the administrator
//! fixes the roster, picks other rooms, or relaxes the rule and retries.
//! No partial plan is ever returned alongside an error.

use serde::Serialize;
use std::fmt;

use crate::access::{Capability, Role};
use crate::models::SeatConflict;
use crate::validation::ValidationError;

/// Stable error classification for the calling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ValidationError,
    CapacityExceeded,
    InfeasibleAllocation,
    PermissionDenied,
}

/// Why the backtracking search gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Every arrangement was explored; none satisfies the rule.
    Exhausted,
    /// The node or time budget ran out first.
    BudgetExceeded,
}

/// Errors returned by the seating allocator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AllocationError {
    #[error("invalid input: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    #[error("{candidates} candidates exceed the {capacity} seats available")]
    CapacityExceeded { candidates: usize, capacity: usize },

    #[error("no valid seating found ({outcome}); {} unresolved conflict(s)", .conflicts.len())]
    InfeasibleAllocation {
        outcome: SearchOutcome,
        conflicts: Vec<SeatConflict>,
    },

    #[error("role {role} lacks the {capability:?} capability")]
    PermissionDenied { role: Role, capability: Capability },
}

pub type Result<T> = std::result::Result<T, AllocationError>;

impl AllocationError {
    /// Classification for rendering to an administrator.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AllocationError::Validation(_) => ErrorKind::ValidationError,
            AllocationError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            AllocationError::InfeasibleAllocation { .. } => ErrorKind::InfeasibleAllocation,
            AllocationError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
        }
    }

    /// Identifiers of the offending entities (candidates, rooms or seats).
    pub fn offending_ids(&self) -> Vec<String> {
        match self {
            AllocationError::Validation(errors) => {
                errors.iter().map(|e| e.entity_id.clone()).collect()
            }
            AllocationError::CapacityExceeded { .. } => Vec::new(),
            AllocationError::InfeasibleAllocation { conflicts, .. } => conflicts
                .iter()
                .flat_map(|c| [c.first.to_string(), c.second.to_string()])
                .collect(),
            AllocationError::PermissionDenied { role, .. } => vec![role.to_string()],
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Exhausted => write!(f, "search exhausted"),
            SearchOutcome::BudgetExceeded => write!(f, "search budget exceeded"),
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
