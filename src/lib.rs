//! Exam seating allocator.
//!
//! Seats the candidates of an exam session into rooms so that no two
//! adjacent candidates share a section and gender, then publishes the
//! result as immutable, versioned seating plans.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Room`, `Seat`, `Candidate`, `SeatingPlan`,
//!   `AdjacencyPolicy`, `ConflictRule`
//! - **`pool`**: Candidate pool builder (roster → validated candidates)
//! - **`solver`**: Adjacency-constrained seat allocation
//! - **`materialize`**: Seat records, room grids, CSV/JSON output
//! - **`validation`**: Input integrity checks (missing attributes, duplicate IDs)
//! - **`access`**: Roles, capabilities and the request context
//! - **`ledger`**: Versioned store of published plans
//! - **`notify`**: Per-candidate seating notifications
//! - **`kpi`**: Plan quality metrics
//! - **`batch`**: Parallel allocation across exam sessions
//! - **`import`**: Roster and room CSV import
//! - **`config`** / **`telemetry`**: Environment configuration and tracing setup
//!
//! # Example
//!
//! ```
//! use exam_seating::models::{Room, RosterEntry};
//! use exam_seating::pool::CandidatePoolBuilder;
//! use exam_seating::solver::SeatingSolver;
//!
//! let roster = vec![
//!     RosterEntry::new("S1", "MID").with_section("CSE-A").with_gender("F"),
//!     RosterEntry::new("S2", "MID").with_section("CSE-A").with_gender("F"),
//!     RosterEntry::new("S3", "MID").with_section("CSE-B").with_gender("M"),
//! ];
//! let candidates = CandidatePoolBuilder::new("MID").build(&roster).unwrap();
//! let plan = SeatingSolver::new()
//!     .solve("MID", &candidates, &[Room::new("H1", 1, 3)])
//!     .unwrap();
//! assert!(plan.is_valid());
//! ```
//!
//! # References
//!
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Minton et al. (1992), "Minimizing conflicts: a heuristic repair method"

pub mod access;
pub mod batch;
pub mod config;
pub mod error;
pub mod import;
pub mod kpi;
pub mod ledger;
pub mod materialize;
pub mod models;
pub mod notify;
pub mod pool;
pub mod solver;
pub mod telemetry;
pub mod validation;
