//! Dispersion ordering and provisional fill.
//!
//! # Algorithm
//!
//! 1. Group candidates by (section, gender), groups in order of first
//!    roster appearance, members in roster order.
//! 2. Interleave the groups round-robin, so consecutive candidates rarely
//!    share both attributes.
//! 3. Walk the seats row-major. Each seat takes the earliest remaining
//!    candidate (interleaved order) that fits its already-seated
//!    neighbours. When none fits, the seat stays empty if spare capacity
//!    allows; otherwise the earliest candidate is seated anyway and the
//!    clash is left to the repair phase.
//!
//! # Complexity
//! O(s * n * d) where s=seats, n=candidates, d=neighbours per seat.

use std::collections::VecDeque;

use super::problem::{Occupancy, Problem};

/// Round-robin interleaving of (section, gender) groups.
pub(crate) fn interleave(problem: &Problem<'_>) -> Vec<usize> {
    let mut queues: Vec<VecDeque<usize>> = vec![VecDeque::new(); problem.groups.len()];
    for (candidate, &group) in problem.group_of.iter().enumerate() {
        queues[group].push_back(candidate);
    }

    let mut order = Vec::with_capacity(problem.group_of.len());
    while order.len() < problem.group_of.len() {
        for queue in queues.iter_mut() {
            if let Some(candidate) = queue.pop_front() {
                order.push(candidate);
            }
        }
    }
    order
}

/// Greedy row-major placement in the given order.
pub(crate) fn provisional_fill(problem: &Problem<'_>, order: &[usize]) -> Occupancy {
    let mut occupancy: Occupancy = vec![None; problem.seat_count()];
    let mut remaining: Vec<usize> = order.to_vec();

    for seat in 0..problem.seat_count() {
        if remaining.is_empty() {
            break;
        }
        let seats_left = problem.seat_count() - seat;

        let choice = remaining
            .iter()
            .position(|&c| problem.fits(&occupancy, seat, c));

        let pick = match choice {
            Some(position) => Some(position),
            None if seats_left > remaining.len() => None,
            None => Some(0),
        };

        if let Some(position) = pick {
            occupancy[seat] = Some(remaining.remove(position));
        }
    }

    occupancy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdjacencyPolicy, Candidate, ConflictRule, Room};

    fn problem<'a>(rooms: &'a [Room], candidates: &'a [Candidate]) -> Problem<'a> {
        Problem::new(
            rooms,
            candidates.iter().collect(),
            AdjacencyPolicy::Orthogonal,
            ConflictRule::SectionAndGender,
        )
    }

    #[test]
    fn test_interleave_round_robin() {
        let rooms = vec![Room::new("R", 1, 6)];
        let candidates = vec![
            Candidate::new("A1", "A", "M", "S"),
            Candidate::new("A2", "A", "M", "S"),
            Candidate::new("A3", "A", "M", "S"),
            Candidate::new("B1", "B", "F", "S"),
            Candidate::new("C1", "C", "M", "S"),
            Candidate::new("B2", "B", "F", "S"),
        ];
        let p = problem(&rooms, &candidates);
        let ids: Vec<&str> = interleave(&p)
            .into_iter()
            .map(|i| candidates[i].id.as_str())
            .collect();
        assert_eq!(ids, vec!["A1", "B1", "C1", "A2", "B2", "A3"]);
    }

    #[test]
    fn test_fill_avoids_clash_when_possible() {
        let rooms = vec![Room::new("R", 2, 2)];
        let candidates = vec![
            Candidate::new("A1", "A", "M", "S"),
            Candidate::new("A2", "A", "M", "S"),
            Candidate::new("B1", "B", "M", "S"),
            Candidate::new("B2", "B", "M", "S"),
        ];
        let p = problem(&rooms, &candidates);
        let order = interleave(&p);
        let occupancy = provisional_fill(&p, &order);
        assert!(occupancy.iter().all(Option::is_some));
        assert!(p.violations(&occupancy).is_empty());
    }

    #[test]
    fn test_fill_leaves_gap_with_spare_capacity() {
        let rooms = vec![Room::new("R", 1, 3)];
        let candidates = vec![
            Candidate::new("A1", "A", "M", "S"),
            Candidate::new("A2", "A", "M", "S"),
        ];
        let p = problem(&rooms, &candidates);
        let order = interleave(&p);
        let occupancy = provisional_fill(&p, &order);
        assert_eq!(occupancy, vec![Some(0), None, Some(1)]);
    }

    #[test]
    fn test_fill_forces_placement_without_spare() {
        let rooms = vec![Room::new("R", 1, 2)];
        let candidates = vec![
            Candidate::new("A1", "A", "M", "S"),
            Candidate::new("A2", "A", "M", "S"),
        ];
        let p = problem(&rooms, &candidates);
        let order = interleave(&p);
        let occupancy = provisional_fill(&p, &order);
        assert_eq!(occupancy, vec![Some(0), Some(1)]);
        assert_eq!(p.violations(&occupancy), vec![(0, 1)]);
    }
}
