//! Exam seating domain models.
//!
//! Provides the core data types for describing a seating problem and its
//! solution: rooms and seats (geometry), candidates (who sits), conflict
//! rules (who may not sit together) and seating plans (the answer).
//!
//! # Domain Mappings
//!
//! | exam-seating | Enrollment system | Exam office |
//! |--------------|-------------------|-------------|
//! | RosterEntry | Enrollment row | Registered student |
//! | Candidate | Eligible enrollment | Examinee |
//! | Room | Room master data | Exam hall |
//! | SeatingPlan | Published roster | Seating chart |

mod candidate;
mod conflict;
mod plan;
mod room;

pub use candidate::{Candidate, GroupKey, RosterEntry};
pub use conflict::ConflictRule;
pub use plan::{Assignment, SeatConflict, SeatingPlan};
pub use room::{AdjacencyPolicy, Room, Seat};
