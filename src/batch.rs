//! Multi-session batch allocation.
//!
//! Sessions that use disjoint candidate pools and do not share a room in
//! overlapping time slots are independent. After checking the room
//! bookings, every session is solved on its own scoped thread against the
//! shared, read-only room table.

use std::collections::HashSet;
use std::thread;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::access::{Capability, RequestContext};
use crate::error::{self, AllocationError};
use crate::models::{Candidate, Room, SeatingPlan};
use crate::solver::SeatingSolver;

/// One exam sitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSession {
    pub id: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    /// Rooms reserved for this session, in seating order.
    pub room_ids: Vec<String>,
}

impl ExamSession {
    pub fn new(
        id: impl Into<String>,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
        room_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            starts_at,
            ends_at,
            room_ids: room_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Half-open slot overlap: back-to-back sessions don't clash.
    pub fn overlaps(&self, other: &ExamSession) -> bool {
        self.starts_at < other.ends_at && other.starts_at < self.ends_at
    }
}

/// Batch-level failures.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("room {room_id} is booked by overlapping sessions {first} and {second}")]
    RoomDoubleBooked {
        room_id: String,
        first: String,
        second: String,
    },

    #[error("session {session_id} references unknown room {room_id}")]
    UnknownRoom { session_id: String, room_id: String },

    #[error("session {session_id} ends before it starts")]
    InvalidSlot { session_id: String },

    #[error("session {session_id} is listed twice")]
    DuplicateSession { session_id: String },
}

/// Per-session allocation outcomes, in session order.
pub type BatchOutcome = Vec<(String, Result<SeatingPlan, AllocationError>)>;

/// A set of sessions sharing one room table.
#[derive(Debug, Clone)]
pub struct SessionBatch {
    sessions: Vec<ExamSession>,
    rooms: Vec<Room>,
}

impl SessionBatch {
    /// Defines the batch's room table. Requires `ManageRooms`.
    pub fn new(
        ctx: &RequestContext,
        sessions: Vec<ExamSession>,
        rooms: Vec<Room>,
    ) -> error::Result<Self> {
        ctx.require(Capability::ManageRooms)?;
        Ok(Self { sessions, rooms })
    }

    pub fn sessions(&self) -> &[ExamSession] {
        &self.sessions
    }

    /// Checks slots, room references and overlapping room bookings.
    pub fn check(&self) -> Result<(), BatchError> {
        let mut seen = HashSet::new();
        for session in &self.sessions {
            if !seen.insert(session.id.as_str()) {
                return Err(BatchError::DuplicateSession {
                    session_id: session.id.clone(),
                });
            }
            if session.ends_at <= session.starts_at {
                return Err(BatchError::InvalidSlot {
                    session_id: session.id.clone(),
                });
            }
            if let Some(missing) = session
                .room_ids
                .iter()
                .find(|id| !self.rooms.iter().any(|r| &r.id == *id))
            {
                return Err(BatchError::UnknownRoom {
                    session_id: session.id.clone(),
                    room_id: missing.clone(),
                });
            }
        }

        for (i, a) in self.sessions.iter().enumerate() {
            for b in &self.sessions[i + 1..] {
                if !a.overlaps(b) {
                    continue;
                }
                if let Some(room_id) = a.room_ids.iter().find(|id| b.room_ids.contains(id)) {
                    warn!(room = %room_id, first = %a.id, second = %b.id, "room double-booked");
                    return Err(BatchError::RoomDoubleBooked {
                        room_id: room_id.clone(),
                        first: a.id.clone(),
                        second: b.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Allocates every session in parallel.
    ///
    /// `candidates` is the whole roster; each session takes the candidates
    /// whose `session` matches its ID. Session failures are reported per
    /// session and don't abort the others.
    pub fn allocate(
        &self,
        solver: &SeatingSolver,
        candidates: &[Candidate],
    ) -> Result<BatchOutcome, BatchError> {
        self.check()?;
        info!(sessions = self.sessions.len(), "batch allocation started");

        let outcome = thread::scope(|scope| {
            let handles: Vec<_> = self
                .sessions
                .iter()
                .map(|session| {
                    let pool: Vec<Candidate> = candidates
                        .iter()
                        .filter(|c| c.session == session.id)
                        .cloned()
                        .collect();
                    let rooms: Vec<Room> = session
                        .room_ids
                        .iter()
                        .filter_map(|id| self.rooms.iter().find(|r| &r.id == id).cloned())
                        .collect();
                    let handle = scope.spawn(move || solver.solve(&session.id, &pool, &rooms));
                    (session.id.clone(), handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(id, handle)| {
                    let result = match handle.join() {
                        Ok(result) => result,
                        Err(panic) => std::panic::resume_unwind(panic),
                    };
                    (id, result)
                })
                .collect::<BatchOutcome>()
        });

        let solved = outcome.iter().filter(|(_, r)| r.is_ok()).count();
        info!(solved, failed = outcome.len() - solved, "batch allocation finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 11, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn batch(sessions: Vec<ExamSession>, rooms: Vec<Room>) -> SessionBatch {
        let faculty = RequestContext::new("f-1", Role::Faculty);
        SessionBatch::new(&faculty, sessions, rooms).unwrap()
    }

    fn rooms() -> Vec<Room> {
        vec![Room::new("H1", 2, 3), Room::new("H2", 2, 2)]
    }

    fn roster() -> Vec<Candidate> {
        vec![
            Candidate::new("S1", "X", "M", "DS"),
            Candidate::new("S2", "Y", "F", "DS"),
            Candidate::new("S3", "X", "F", "DS"),
            Candidate::new("S4", "X", "M", "OS"),
            Candidate::new("S5", "Z", "M", "OS"),
        ]
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = ExamSession::new("A", at(9), at(11), ["H1"]);
        let b = ExamSession::new("B", at(11), at(13), ["H1"]);
        let c = ExamSession::new("C", at(10), at(12), ["H1"]);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_double_booking_rejected() {
        let batch = batch(
            vec![
                ExamSession::new("DS", at(9), at(11), ["H1"]),
                ExamSession::new("OS", at(10), at(12), ["H2", "H1"]),
            ],
            rooms(),
        );
        let err = batch.check().unwrap_err();
        assert!(matches!(
            err,
            BatchError::RoomDoubleBooked { ref room_id, .. } if room_id == "H1"
        ));
    }

    #[test]
    fn test_unknown_room_and_bad_slot() {
        let unknown = batch(vec![ExamSession::new("DS", at(9), at(11), ["LAB"])], rooms());
        assert!(matches!(unknown.check(), Err(BatchError::UnknownRoom { .. })));

        let backwards = batch(vec![ExamSession::new("DS", at(11), at(9), ["H1"])], rooms());
        assert!(matches!(backwards.check(), Err(BatchError::InvalidSlot { .. })));
    }

    #[test]
    fn test_parallel_allocation() {
        let batch = batch(
            vec![
                ExamSession::new("DS", at(9), at(11), ["H1"]),
                ExamSession::new("OS", at(9), at(11), ["H2"]),
            ],
            rooms(),
        );
        let outcome = batch.allocate(&SeatingSolver::new(), &roster()).unwrap();
        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome[0].0, "DS");
        assert_eq!(outcome[1].0, "OS");

        let ds = outcome[0].1.as_ref().unwrap();
        assert_eq!(ds.assignment_count(), 3);
        assert!(ds.assignments().iter().all(|a| a.seat.room_id == "H1"));
        let os = outcome[1].1.as_ref().unwrap();
        assert_eq!(os.assignment_count(), 2);
        assert!(os.is_valid());
    }

    #[test]
    fn test_session_failure_is_isolated() {
        let mut roster = roster();
        roster.extend((0..4).map(|i| Candidate::new(format!("T{i}"), "Q", "M", "OS")));
        let batch = batch(
            vec![
                ExamSession::new("DS", at(9), at(11), ["H1"]),
                ExamSession::new("OS", at(13), at(15), ["H2"]),
            ],
            rooms(),
        );
        let outcome = batch.allocate(&SeatingSolver::new(), &roster).unwrap();
        assert!(outcome[0].1.is_ok());
        let err = outcome[1].1.as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    }

    #[test]
    fn test_room_table_requires_manage_rooms() {
        let student = RequestContext::new("S1", Role::Student);
        let err = SessionBatch::new(&student, Vec::new(), rooms()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }
}
