//! Published plan ledger.
//!
//! Keeps every published version of every session's plan. Published
//! plans are shared as `Arc<SeatingPlan>` and never mutated; re-running
//! the allocator and publishing again creates the next version.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::access::{Capability, RequestContext};
use crate::error::Result;
use crate::models::{Assignment, SeatingPlan};

/// In-memory store of published seating plans, keyed by session.
#[derive(Debug, Default)]
pub struct PlanLedger {
    sessions: HashMap<String, Vec<Arc<SeatingPlan>>>,
}

impl PlanLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `plan` as the next version of its session.
    ///
    /// Requires `PublishPlan`. Versions start at 1.
    pub fn publish(&mut self, ctx: &RequestContext, plan: SeatingPlan) -> Result<Arc<SeatingPlan>> {
        ctx.require(Capability::PublishPlan)?;

        let versions = self
            .sessions
            .entry(plan.session_id().to_string())
            .or_default();
        let next = versions.len() as u32 + 1;
        let published = Arc::new(plan.with_version(next));
        versions.push(Arc::clone(&published));

        info!(
            actor = %ctx.actor_id,
            session = published.session_id(),
            version = next,
            assignments = published.assignment_count(),
            "plan published"
        );
        Ok(published)
    }

    /// Most recent published version of a session.
    pub fn latest(&self, session_id: &str) -> Option<Arc<SeatingPlan>> {
        self.sessions.get(session_id)?.last().cloned()
    }

    /// A specific published version (1-based).
    pub fn version(&self, session_id: &str, version: u32) -> Option<Arc<SeatingPlan>> {
        let index = version.checked_sub(1)? as usize;
        self.sessions.get(session_id)?.get(index).cloned()
    }

    /// Number of published versions for a session.
    pub fn version_count(&self, session_id: &str) -> usize {
        self.sessions.get(session_id).map_or(0, Vec::len)
    }

    /// Looks up a candidate's seat in the latest plan.
    ///
    /// Callers without `ViewRoster` may only look up their own seat.
    pub fn seat_for(
        &self,
        ctx: &RequestContext,
        session_id: &str,
        candidate_id: &str,
    ) -> Result<Option<Assignment>> {
        ctx.require(Capability::ViewOwnSeat)?;
        if ctx.actor_id != candidate_id {
            ctx.require(Capability::ViewRoster)?;
        }
        Ok(self
            .latest(session_id)
            .and_then(|plan| plan.assignment_for_candidate(candidate_id).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::error::ErrorKind;
    use crate::models::{Candidate, Room};
    use crate::solver::SeatingSolver;

    fn plan() -> SeatingPlan {
        let candidates = vec![
            Candidate::new("S1", "X", "M", "MID"),
            Candidate::new("S2", "Y", "F", "MID"),
        ];
        SeatingSolver::new()
            .solve("MID", &candidates, &[Room::new("H1", 1, 2)])
            .unwrap()
    }

    #[test]
    fn test_publish_stamps_versions() {
        let admin = RequestContext::new("admin", Role::Admin);
        let mut ledger = PlanLedger::new();

        let v1 = ledger.publish(&admin, plan()).unwrap();
        let v2 = ledger.publish(&admin, plan()).unwrap();
        assert_eq!(v1.version(), 1);
        assert_eq!(v2.version(), 2);
        assert_eq!(ledger.version_count("MID"), 2);
        assert_eq!(ledger.latest("MID").unwrap().version(), 2);
        assert_eq!(ledger.version("MID", 1).unwrap().version(), 1);
        assert!(ledger.version("MID", 0).is_none());
        assert!(ledger.version("MID", 3).is_none());
        assert!(ledger.latest("FINAL").is_none());
    }

    #[test]
    fn test_publish_requires_capability() {
        let faculty = RequestContext::new("f-1", Role::Faculty);
        let mut ledger = PlanLedger::new();
        let err = ledger.publish(&faculty, plan()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(ledger.version_count("MID"), 0);
    }

    #[test]
    fn test_students_see_only_their_own_seat() {
        let admin = RequestContext::new("admin", Role::Admin);
        let mut ledger = PlanLedger::new();
        ledger.publish(&admin, plan()).unwrap();

        let student = RequestContext::new("S1", Role::Student);
        let own = ledger.seat_for(&student, "MID", "S1").unwrap().unwrap();
        assert_eq!(own.candidate.id, "S1");

        let err = ledger.seat_for(&student, "MID", "S2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        let faculty = RequestContext::new("f-1", Role::Faculty);
        assert!(ledger.seat_for(&faculty, "MID", "S2").unwrap().is_some());
    }
}
