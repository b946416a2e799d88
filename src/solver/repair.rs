//! Local swap repair.
//!
//! For each clashing adjacent pair, try to move one of the two candidates
//! by swapping with another seat. A swap is kept only when both touched
//! seats end up clash-free, so every accepted swap strictly reduces the
//! number of clashing pairs and the pass loop terminates.
//!
//! Partner seats (empty, or holding a candidate of another group) are
//! ranked by distance from the clashing seat, then by the partner
//! occupant's roster position (empty seats last), then by seat order. At
//! most `max_attempts` partners are tried per seat.

use tracing::trace;

use super::problem::{Occupancy, Problem};

/// Repairs clashes in place. Returns the number of accepted swaps.
pub(crate) fn repair(problem: &Problem<'_>, occupancy: &mut Occupancy, max_attempts: usize) -> usize {
    let mut swaps = 0;

    loop {
        let violations = problem.violations(occupancy);
        if violations.is_empty() {
            break;
        }

        let mut progressed = false;
        for (a, b) in violations {
            let still_clashing = matches!(
                (occupancy[a], occupancy[b]),
                (Some(x), Some(y)) if problem.clashes(x, y)
            );
            if !still_clashing {
                continue;
            }
            if relocate(problem, occupancy, b, max_attempts)
                || relocate(problem, occupancy, a, max_attempts)
            {
                swaps += 1;
                progressed = true;
            }
        }

        if !progressed {
            break;
        }
    }

    swaps
}

/// Tries to swap the occupant of `seat` with a ranked partner seat.
fn relocate(problem: &Problem<'_>, occupancy: &mut Occupancy, seat: usize, max_attempts: usize) -> bool {
    let Some(candidate) = occupancy[seat] else {
        return false;
    };
    let group = problem.group_of[candidate];

    let mut partners: Vec<usize> = (0..problem.seat_count())
        .filter(|&s| s != seat)
        .filter(|&s| occupancy[s].map_or(true, |other| problem.group_of[other] != group))
        .collect();
    partners.sort_by_key(|&s| {
        (
            problem.distance(seat, s),
            occupancy[s].unwrap_or(usize::MAX),
            s,
        )
    });

    for partner in partners.into_iter().take(max_attempts) {
        occupancy.swap(seat, partner);
        if problem.seat_is_clear(occupancy, seat) && problem.seat_is_clear(occupancy, partner) {
            trace!(
                from = %problem.seat(seat),
                to = %problem.seat(partner),
                "swap accepted"
            );
            return true;
        }
        occupancy.swap(seat, partner);
    }

    false
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
    fn test_repair_resolves_simple_clash() {
        let rooms = vec![Room::new("R", 1, 4)];
        let candidates = vec![
            Candidate::new("A1", "A", "M", "S"),
            Candidate::new("A2", "A", "M", "S"),
            Candidate::new("B1", "B", "F", "S"),
            Candidate::new("B2", "B", "F", "S"),
        ];
        let p = problem(&rooms, &candidates);
        let mut occupancy = vec![Some(0), Some(1), Some(2), Some(3)];
        assert_eq!(p.violations(&occupancy).len(), 2);

        let swaps = repair(&p, &mut occupancy, 16);
        assert!(swaps >= 1);
        assert!(p.violations(&occupancy).is_empty());
        let mut seated: Vec<usize> = occupancy.iter().flatten().copied().collect();
        seated.sort_unstable();
        assert_eq!(seated, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_repair_gives_up_on_uniform_pool() {
        let rooms = vec![Room::new("R", 1, 3)];
        let candidates = vec![
            Candidate::new("A1", "A", "M", "S"),
            Candidate::new("A2", "A", "M", "S"),
            Candidate::new("A3", "A", "M", "S"),
        ];
        let p = problem(&rooms, &candidates);
        let mut occupancy = vec![Some(0), Some(1), Some(2)];
        assert_eq!(repair(&p, &mut occupancy, 16), 0);
        assert_eq!(occupancy, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_repair_uses_empty_seat() {
        let rooms = vec![Room::new("R", 1, 3)];
        let candidates = vec![
            Candidate::new("A1", "A", "M", "S"),
            Candidate::new("A2", "A", "M", "S"),
        ];
        let p = problem(&rooms, &candidates);
        let mut occupancy = vec![Some(0), Some(1), None];
        assert_eq!(repair(&p, &mut occupancy, 16), 1);
        assert_eq!(occupancy, vec![Some(0), None, Some(1)]);
    }
}
