//! Seating plan (solution) model.
//!
//! A seating plan is the complete assignment of one session's candidates
//! to seats. Plans are built once by the solver and never mutated; a re-run
//! produces a new plan, and publication stamps a new version.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{AdjacencyPolicy, Candidate, ConflictRule, Room, Seat};

/// One candidate placed on one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The seated candidate.
    pub candidate: Candidate,
    /// The occupied seat.
    pub seat: Seat,
}

/// Two adjacent seats holding conflicting candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConflict {
    /// Earlier seat of the pair (room order, then row-major).
    pub first: Seat,
    /// Later seat of the pair.
    pub second: Seat,
    /// Candidate on `first`.
    pub first_candidate: String,
    /// Candidate on `second`.
    pub second_candidate: String,
}

/// A complete seating plan for one exam session.
///
/// Bijective by construction: each candidate holds exactly one seat and
/// each occupied seat holds exactly one candidate. Plans are written out
/// but never read back; only the solver builds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatingPlan {
    session_id: String,
    version: u32,
    adjacency: AdjacencyPolicy,
    conflict_rule: ConflictRule,
    rooms: Vec<Room>,
    assignments: Vec<Assignment>,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(candidate: Candidate, seat: Seat) -> Self {
        Self { candidate, seat }
    }
}

impl SeatingPlan {
    /// Assembles a plan. Callers guarantee the bijection.
    pub(crate) fn from_parts(
        session_id: impl Into<String>,
        adjacency: AdjacencyPolicy,
        conflict_rule: ConflictRule,
        rooms: Vec<Room>,
        assignments: Vec<Assignment>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            version: 0,
            adjacency,
            conflict_rule,
            rooms,
            assignments,
        }
    }

    /// Returns a copy stamped with a publication version.
    pub(crate) fn with_version(&self, version: u32) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }

    /// Exam session identifier.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Publication version (0 = not yet published).
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Adjacency policy the plan was solved under.
    pub fn adjacency(&self) -> AdjacencyPolicy {
        self.adjacency
    }

    /// Conflict rule the plan was solved under.
    pub fn conflict_rule(&self) -> ConflictRule {
        self.conflict_rule
    }

    /// Rooms selected for the session, in fill order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// All assignments, in fill order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Number of seated candidates.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Total seats across the plan's rooms.
    pub fn total_capacity(&self) -> usize {
        self.rooms.iter().map(Room::capacity).sum()
    }

    /// Looks up a room by ID.
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    /// Finds the assignment for a candidate.
    pub fn assignment_for_candidate(&self, candidate_id: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.candidate.id == candidate_id)
    }

    /// Returns all assignments in a room.
    pub fn assignments_for_room(&self, room_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.seat.room_id == room_id)
            .collect()
    }

    /// Seat → assignment lookup.
    pub fn occupancy(&self) -> HashMap<&Seat, &Assignment> {
        self.assignments.iter().map(|a| (&a.seat, a)).collect()
    }

    /// Adjacent conflicting pairs under the plan's own policy and rule.
    ///
    /// Empty for every plan the solver returns.
    pub fn conflicts(&self) -> Vec<SeatConflict> {
        let occupancy = self.occupancy();
        let mut conflicts = Vec::new();

        for room in &self.rooms {
            for seat in room.seats() {
                let Some(here) = occupancy.get(&seat) else {
                    continue;
                };
                for neighbour in room.neighbours(seat.row, seat.column, self.adjacency) {
                    // Report each unordered pair once.
                    if (neighbour.row, neighbour.column) <= (seat.row, seat.column) {
                        continue;
                    }
                    if let Some(there) = occupancy.get(&neighbour) {
                        if self.conflict_rule.conflicts(&here.candidate, &there.candidate) {
                            conflicts.push(SeatConflict {
                                first: seat.clone(),
                                second: neighbour.clone(),
                                first_candidate: here.candidate.id.clone(),
                                second_candidate: there.candidate.id.clone(),
                            });
                        }
                    }
                }
            }
        }

        conflicts
    }

    /// Whether the plan satisfies the adjacency invariant.
    pub fn is_valid(&self) -> bool {
        self.conflicts().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan(second_gender: &str) -> SeatingPlan {
        let room = Room::new("R1", 1, 3);
        SeatingPlan::from_parts(
            "MID",
            AdjacencyPolicy::Orthogonal,
            ConflictRule::SectionAndGender,
            vec![room],
            vec![
                Assignment::new(Candidate::new("A", "X", "M", "MID"), Seat::new("R1", 0, 0)),
                Assignment::new(
                    Candidate::new("B", "X", second_gender, "MID"),
                    Seat::new("R1", 0, 1),
                ),
                Assignment::new(Candidate::new("C", "Y", "M", "MID"), Seat::new("R1", 0, 2)),
            ],
        )
    }

    #[test]
    fn test_plan_accessors() {
        let plan = sample_plan("F");
        assert_eq!(plan.session_id(), "MID");
        assert_eq!(plan.version(), 0);
        assert_eq!(plan.assignment_count(), 3);
        assert_eq!(plan.total_capacity(), 3);
        assert_eq!(
            plan.assignment_for_candidate("B").map(|a| a.seat.column),
            Some(1)
        );
        assert!(plan.assignment_for_candidate("Z").is_none());
        assert_eq!(plan.assignments_for_room("R1").len(), 3);
        assert!(plan.room("R2").is_none());
    }

    #[test]
    fn test_valid_plan_has_no_conflicts() {
        assert!(sample_plan("F").is_valid());
    }

    #[test]
    fn test_conflict_detected_once() {
        let plan = sample_plan("M");
        let conflicts = plan.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].first_candidate, "A");
        assert_eq!(conflicts[0].second_candidate, "B");
    }

    #[test]
    fn test_with_version_does_not_touch_original() {
        let plan = sample_plan("F");
        let published = plan.with_version(3);
        assert_eq!(published.version(), 3);
        assert_eq!(plan.version(), 0);
        assert_eq!(published.assignments(), plan.assignments());
    }

    #[test]
    fn test_plan_serializes_for_publication() {
        let json = serde_json::to_value(sample_plan("F")).unwrap();
        assert_eq!(json["session_id"], "MID");
        assert_eq!(json["version"], 0);
        assert_eq!(json["assignments"].as_array().map(Vec::len), Some(3));
    }
}
