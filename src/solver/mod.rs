//! Adjacency-constrained seating solver.
//!
//! # Algorithm
//!
//! 1. Validate candidates and rooms; check `N ≤ capacity`.
//! 2. Order candidates for dispersion (round-robin over section/gender
//!    groups) and fill seats row-major, room by room.
//! 3. Repair remaining clashes with bounded local swaps.
//! 4. Escalate to backtracking: first over the clashing subset with every
//!    other seat fixed, then over the whole pool.
//! 5. Fail with `InfeasibleAllocation` if no arrangement satisfies the rule.
//!
//! Output is deterministic: identical input and configuration always
//! produce an identical plan. Only the wall-clock budget can change the
//! outcome between machines, and only from "found" to "budget exceeded".
//!
//! # References
//!
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Minton et al. (1992), "Minimizing conflicts: a heuristic repair method"

mod dispersion;
mod problem;
mod repair;
mod search;

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::access::{Capability, RequestContext};
use crate::error::{AllocationError, Result, SearchOutcome};
use crate::models::{
    AdjacencyPolicy, Assignment, Candidate, ConflictRule, Room, SeatConflict, SeatingPlan,
};
use crate::validation::validate_input;

use problem::{Occupancy, Problem};
use search::{Budget, Search};

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Which seats count as adjacent.
    pub adjacency: AdjacencyPolicy,
    /// When two adjacent candidates conflict.
    pub conflict_rule: ConflictRule,
    /// Partner seats tried per clashing seat during swap repair.
    pub max_swap_attempts: usize,
    /// Node budget per backtracking search.
    pub search_node_limit: u64,
    /// Wall-clock budget shared by all backtracking searches.
    pub search_time_limit: Duration,
    /// Seeded roster permutation applied before ordering.
    pub shuffle_seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            adjacency: AdjacencyPolicy::Orthogonal,
            conflict_rule: ConflictRule::SectionAndGender,
            max_swap_attempts: 64,
            search_node_limit: 200_000,
            search_time_limit: Duration::from_millis(2_000),
            shuffle_seed: None,
        }
    }
}

impl SolverConfig {
    /// Sets the adjacency policy.
    pub fn with_adjacency(mut self, adjacency: AdjacencyPolicy) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Sets the conflict rule.
    pub fn with_conflict_rule(mut self, rule: ConflictRule) -> Self {
        self.conflict_rule = rule;
        self
    }

    /// Sets the swap attempts per clashing seat.
    pub fn with_max_swap_attempts(mut self, attempts: usize) -> Self {
        self.max_swap_attempts = attempts;
        self
    }

    /// Sets the backtracking node budget.
    pub fn with_search_node_limit(mut self, limit: u64) -> Self {
        self.search_node_limit = limit;
        self
    }

    /// Sets the backtracking time budget.
    pub fn with_search_time_limit(mut self, limit: Duration) -> Self {
        self.search_time_limit = limit;
        self
    }

    /// Enables a seeded roster shuffle.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }
}

/// Places exam candidates into room seats so that no two adjacent
/// candidates conflict.
///
/// # Example
///
/// ```
/// use exam_seating::models::{Candidate, Room};
/// use exam_seating::solver::SeatingSolver;
///
/// let candidates = vec![
///     Candidate::new("A", "X", "M", "MID"),
///     Candidate::new("B", "X", "F", "MID"),
///     Candidate::new("C", "Y", "M", "MID"),
///     Candidate::new("D", "Y", "F", "MID"),
/// ];
/// let rooms = vec![Room::new("R1", 2, 2)];
///
/// let plan = SeatingSolver::new().solve("MID", &candidates, &rooms).unwrap();
/// assert_eq!(plan.assignment_count(), 4);
/// assert!(plan.is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeatingSolver {
    config: SolverConfig,
}

impl SeatingSolver {
    /// Creates a solver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with the given configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves on behalf of a caller holding `AllocateSeating`.
    pub fn allocate(
        &self,
        ctx: &RequestContext,
        session_id: &str,
        candidates: &[Candidate],
        rooms: &[Room],
    ) -> Result<SeatingPlan> {
        ctx.require(Capability::AllocateSeating)?;
        info!(actor = %ctx.actor_id, session = session_id, "allocation requested");
        self.solve(session_id, candidates, rooms)
    }

    /// Builds a seating plan for one session.
    ///
    /// Fails with a validation error on malformed input,
    /// `CapacityExceeded` when the rooms are too small, and
    /// `InfeasibleAllocation` when no valid arrangement was found.
    pub fn solve(
        &self,
        session_id: &str,
        candidates: &[Candidate],
        rooms: &[Room],
    ) -> Result<SeatingPlan> {
        let span = info_span!("solve", session = session_id);
        let _guard = span.enter();

        validate_input(session_id, candidates, rooms).map_err(AllocationError::Validation)?;

        let capacity: usize = rooms.iter().map(Room::capacity).sum();
        if candidates.len() > capacity {
            warn!(candidates = candidates.len(), capacity, "capacity exceeded");
            return Err(AllocationError::CapacityExceeded {
                candidates: candidates.len(),
                capacity,
            });
        }

        let problem = Problem::new(
            rooms,
            self.working_order(candidates),
            self.config.adjacency,
            self.config.conflict_rule,
        );
        info!(
            candidates = problem.candidate_count(),
            seats = problem.seat_count(),
            groups = problem.groups.len(),
            "solving"
        );

        let order = dispersion::interleave(&problem);
        let mut occupancy = dispersion::provisional_fill(&problem, &order);
        let provisional = problem.violations(&occupancy).len();

        let swaps = repair::repair(&problem, &mut occupancy, self.config.max_swap_attempts);
        let remaining = problem.violations(&occupancy);
        debug!(provisional, swaps, remaining = remaining.len(), "repair finished");

        if remaining.is_empty() {
            return Ok(self.build_plan(session_id, &problem, &occupancy));
        }

        match self.escalate(&problem, &occupancy, &remaining) {
            Ok(solved) => Ok(self.build_plan(session_id, &problem, &solved)),
            Err(outcome) => {
                let conflicts = describe(&problem, &occupancy, &remaining);
                warn!(%outcome, conflicts = conflicts.len(), "allocation infeasible");
                Err(AllocationError::InfeasibleAllocation { outcome, conflicts })
            }
        }
    }

    /// Candidates in roster order, or seeded-shuffled roster order.
    fn working_order<'a>(&self, candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
        let mut order: Vec<&Candidate> = candidates.iter().collect();
        if let Some(seed) = self.config.shuffle_seed {
            let mut rng = StdRng::seed_from_u64(seed);
            order.shuffle(&mut rng);
        }
        order
    }

    /// Backtracking over the clashing subset, then over everything.
    fn escalate(
        &self,
        problem: &Problem<'_>,
        occupancy: &Occupancy,
        violations: &[(usize, usize)],
    ) -> std::result::Result<Occupancy, SearchOutcome> {
        let deadline = Instant::now() + self.config.search_time_limit;
        let budget = Budget {
            node_limit: self.config.search_node_limit,
            deadline,
        };

        let mut clashing: Vec<usize> = violations.iter().flat_map(|&(a, b)| [a, b]).collect();
        clashing.sort_unstable();
        clashing.dedup();

        let mut fixed = occupancy.clone();
        let pool: Vec<usize> = clashing.iter().filter_map(|&s| fixed[s].take()).collect();
        let free: Vec<usize> = (0..problem.seat_count())
            .filter(|&s| fixed[s].is_none())
            .collect();

        let (local, nodes) = search::search(problem, fixed, free, &pool, budget);
        debug!(subset = pool.len(), nodes, "local search finished");
        if let Search::Found(solved) = local {
            return Ok(solved);
        }

        let everyone: Vec<usize> = (0..problem.candidate_count()).collect();
        let (full, nodes) = search::search(
            problem,
            vec![None; problem.seat_count()],
            (0..problem.seat_count()).collect(),
            &everyone,
            budget,
        );
        debug!(nodes, "full search finished");

        match full {
            Search::Found(solved) => Ok(solved),
            Search::Exhausted => Err(SearchOutcome::Exhausted),
            Search::BudgetExceeded => Err(SearchOutcome::BudgetExceeded),
        }
    }

    fn build_plan(&self, session_id: &str, problem: &Problem<'_>, occupancy: &Occupancy) -> SeatingPlan {
        let assignments: Vec<Assignment> = occupancy
            .iter()
            .enumerate()
            .filter_map(|(seat, occupant)| {
                occupant.map(|c| Assignment::new(problem.candidates[c].clone(), problem.seat(seat)))
            })
            .collect();

        info!(assigned = assignments.len(), "seating plan built");

        SeatingPlan::from_parts(
            session_id,
            self.config.adjacency,
            self.config.conflict_rule,
            problem.rooms.to_vec(),
            assignments,
        )
    }
}

fn describe(
    problem: &Problem<'_>,
    occupancy: &Occupancy,
    violations: &[(usize, usize)],
) -> Vec<SeatConflict> {
    violations
        .iter()
        .filter_map(|&(a, b)| {
            let (x, y) = (occupancy[a]?, occupancy[b]?);
            Some(SeatConflict {
                first: problem.seat(a),
                second: problem.seat(b),
                first_candidate: problem.candidates[x].id.clone(),
                second_candidate: problem.candidates[y].id.clone(),
            })
        })
        .collect()
}
