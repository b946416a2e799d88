//! Bounded backtracking search.
//!
//! Walks the free seats in order and, per seat, either seats the next
//! member of some (section, gender) group or leaves the seat empty when
//! spare seats remain. Members of one group are interchangeable, so the
//! search branches on groups and always takes the group's earliest
//! remaining candidate. Groups with the most remaining members are tried
//! first.
//!
//! The search stops at a node budget or a wall-clock deadline, whichever
//! comes first.
//!
//! # Reference
//! Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach",
//! Ch. 6.3 (Backtracking Search for CSPs)

use std::collections::VecDeque;
use std::time::Instant;

use super::problem::{Occupancy, Problem};

/// Node and time limits for one search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    pub node_limit: u64,
    pub deadline: Instant,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Search {
    Found(Occupancy),
    Exhausted,
    BudgetExceeded,
}

struct Backtracker<'p, 'a> {
    problem: &'p Problem<'a>,
    free: Vec<usize>,
    queues: Vec<VecDeque<usize>>,
    remaining: usize,
    budget: Budget,
    nodes: u64,
    aborted: bool,
}

/// One decision point: the seat at `free[depth]`.
struct Frame {
    depth: usize,
    /// Groups to try, in value order.
    groups: Vec<usize>,
    cursor: usize,
    /// (group, candidate) currently seated here.
    placed: Option<(usize, usize)>,
    /// The empty-seat branch has been taken.
    skipped: bool,
}

enum Step {
    Enter(usize),
    Advance,
}

/// Seats `pool` into `free` seats around the fixed occupants of `occupancy`.
///
/// `free` seats must be empty in `occupancy`.
pub(crate) fn search(
    problem: &Problem<'_>,
    mut occupancy: Occupancy,
    mut free: Vec<usize>,
    pool: &[usize],
    budget: Budget,
) -> (Search, u64) {
    free.sort_unstable();
    if pool.len() > free.len() {
        return (Search::Exhausted, 0);
    }

    let mut queues: Vec<VecDeque<usize>> = vec![VecDeque::new(); problem.groups.len()];
    let mut sorted_pool = pool.to_vec();
    sorted_pool.sort_unstable();
    for candidate in sorted_pool {
        queues[problem.group_of[candidate]].push_back(candidate);
    }

    let mut bt = Backtracker {
        problem,
        free,
        queues,
        remaining: pool.len(),
        budget,
        nodes: 0,
        aborted: false,
    };

    let outcome = if bt.run(&mut occupancy) {
        Search::Found(occupancy)
    } else if bt.aborted {
        Search::BudgetExceeded
    } else {
        Search::Exhausted
    };
    (outcome, bt.nodes)
}

impl Backtracker<'_, '_> {
    /// Depth-first search over an explicit frame stack, so the depth is
    /// bounded by the heap rather than the thread stack.
    fn run(&mut self, occupancy: &mut Occupancy) -> bool {
        let mut stack: Vec<Frame> = Vec::new();
        let mut step = Step::Enter(0);

        loop {
            match step {
                Step::Enter(depth) => {
                    if self.remaining == 0 {
                        return true;
                    }
                    step = Step::Advance;
                    if self.free.len() - depth < self.remaining {
                        continue;
                    }

                    self.nodes += 1;
                    if self.nodes > self.budget.node_limit
                        || (self.nodes % 256 == 0 && Instant::now() >= self.budget.deadline)
                    {
                        self.aborted = true;
                        return false;
                    }

                    stack.push(Frame {
                        depth,
                        groups: self.group_order(),
                        cursor: 0,
                        placed: None,
                        skipped: false,
                    });
                }
                Step::Advance => {
                    let Some(frame) = stack.last_mut() else {
                        return false;
                    };
                    let seat = self.free[frame.depth];

                    if let Some((group, candidate)) = frame.placed.take() {
                        occupancy[seat] = None;
                        self.remaining += 1;
                        self.queues[group].push_front(candidate);
                    }

                    let mut next = None;
                    while frame.cursor < frame.groups.len() {
                        let group = frame.groups[frame.cursor];
                        frame.cursor += 1;
                        let Some(&candidate) = self.queues[group].front() else {
                            continue;
                        };
                        if self.problem.fits(occupancy, seat, candidate) {
                            next = Some((group, candidate));
                            break;
                        }
                    }

                    if let Some((group, candidate)) = next {
                        self.queues[group].pop_front();
                        self.remaining -= 1;
                        occupancy[seat] = Some(candidate);
                        frame.placed = Some((group, candidate));
                        step = Step::Enter(frame.depth + 1);
                    } else if !frame.skipped && self.free.len() - frame.depth > self.remaining {
                        // Leave the seat empty.
                        frame.skipped = true;
                        step = Step::Enter(frame.depth + 1);
                    } else {
                        stack.pop();
                    }
                }
            }
        }
    }

    /// Non-empty groups, most remaining members first, then group order.
    fn group_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.queues.len())
            .filter(|&g| !self.queues[g].is_empty())
            .collect();
        order.sort_by_key(|&g| (std::cmp::Reverse(self.queues[g].len()), g));
        order
    }
}
