//! Seating plan quality metrics (KPIs).
//!
//! Computes indicators an exam office reviews before publishing a plan.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Fill Rate | Seated candidates / total seats |
//! | Room Fill | Per-room seated / room capacity |
//! | Adjacent Pairs | Adjacent seat pairs where both seats are occupied |
//! | Section Mix | Fraction of adjacent pairs with different sections |
//! | Conflicts | Adjacent pairs violating the plan's rule (0 for solver output) |

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::SeatingPlan;

/// Seating plan indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanKpi {
    /// Number of seated candidates.
    pub seated: usize,
    /// Seats across all selected rooms.
    pub capacity: usize,
    /// `seated / capacity` (0.0 for an empty room set).
    pub fill_rate: f64,
    /// Per-room fill rate.
    pub fill_by_room: BTreeMap<String, f64>,
    /// Occupied adjacent pairs.
    pub adjacent_pairs: usize,
    /// Fraction of occupied adjacent pairs sitting in different sections.
    pub section_mix: f64,
    /// Adjacent pairs violating the conflict rule.
    pub conflicts: usize,
}

impl PlanKpi {
    /// Computes KPIs for a plan.
    pub fn calculate(plan: &SeatingPlan) -> Self {
        let occupancy = plan.occupancy();
        let mut adjacent_pairs = 0;
        let mut mixed_pairs = 0;
        let mut fill_by_room = BTreeMap::new();

        for room in plan.rooms() {
            let mut seated_here = 0usize;
            for seat in room.seats() {
                let Some(here) = occupancy.get(&seat) else {
                    continue;
                };
                seated_here += 1;
                for neighbour in room.neighbours(seat.row, seat.column, plan.adjacency()) {
                    if (neighbour.row, neighbour.column) <= (seat.row, seat.column) {
                        continue;
                    }
                    if let Some(there) = occupancy.get(&neighbour) {
                        adjacent_pairs += 1;
                        if here.candidate.section != there.candidate.section {
                            mixed_pairs += 1;
                        }
                    }
                }
            }
            let capacity = room.capacity();
            let fill = if capacity == 0 {
                0.0
            } else {
                seated_here as f64 / capacity as f64
            };
            fill_by_room.insert(room.id.clone(), fill);
        }

        let seated = plan.assignment_count();
        let capacity = plan.total_capacity();

        Self {
            seated,
            capacity,
            fill_rate: if capacity == 0 {
                0.0
            } else {
                seated as f64 / capacity as f64
            },
            fill_by_room,
            adjacent_pairs,
            section_mix: if adjacent_pairs == 0 {
                1.0
            } else {
                mixed_pairs as f64 / adjacent_pairs as f64
            },
            conflicts: plan.conflicts().len(),
        }
    }

    /// Whether the plan is conflict-free and mixes sections at least `min_mix`.
    pub fn meets_thresholds(&self, min_mix: f64) -> bool {
        self.conflicts == 0 && self.section_mix >= min_mix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, Room};
    use crate::solver::SeatingSolver;

    #[test]
    fn test_kpi_for_full_room() {
        let candidates = vec![
            Candidate::new("A", "X", "M", "MID"),
            Candidate::new("B", "X", "F", "MID"),
            Candidate::new("C", "Y", "M", "MID"),
            Candidate::new("D", "Y", "F", "MID"),
        ];
        let rooms = vec![Room::new("R1", 2, 2), Room::new("R2", 1, 4)];
        let plan = SeatingSolver::new().solve("MID", &candidates, &rooms).unwrap();
        let kpi = PlanKpi::calculate(&plan);

        assert_eq!(kpi.seated, 4);
        assert_eq!(kpi.capacity, 8);
        assert!((kpi.fill_rate - 0.5).abs() < 1e-10);
        assert!((kpi.fill_by_room["R1"] - 1.0).abs() < 1e-10);
        assert!((kpi.fill_by_room["R2"] - 0.0).abs() < 1e-10);
        assert_eq!(kpi.adjacent_pairs, 4);
        assert_eq!(kpi.conflicts, 0);
        assert!(kpi.meets_thresholds(0.0));
    }

    #[test]
    fn test_kpi_empty_plan() {
        let plan = SeatingSolver::new()
            .solve("MID", &[], &[Room::new("R1", 2, 2)])
            .unwrap();
        let kpi = PlanKpi::calculate(&plan);
        assert_eq!(kpi.seated, 0);
        assert_eq!(kpi.adjacent_pairs, 0);
        assert!((kpi.section_mix - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_section_mix_threshold() {
        let candidates = vec![
            Candidate::new("A", "X", "M", "MID"),
            Candidate::new("B", "X", "F", "MID"),
        ];
        let plan = SeatingSolver::new()
            .solve("MID", &candidates, &[Room::new("R1", 1, 2)])
            .unwrap();
        let kpi = PlanKpi::calculate(&plan);
        assert_eq!(kpi.adjacent_pairs, 1);
        assert!((kpi.section_mix - 0.0).abs() < 1e-10);
        assert!(kpi.meets_thresholds(0.0));
        assert!(!kpi.meets_thresholds(0.5));
    }
}
