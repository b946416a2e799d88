//! Flattened seating problem shared by every solver phase.
//!
//! Seats across all rooms get one global index (rooms in the given order,
//! row-major inside each room). Candidates are referenced by their index
//! in working order. Conflicts depend only on the (section, gender) group,
//! so they are precomputed as a group × group matrix.

use std::collections::HashMap;

use crate::models::{AdjacencyPolicy, Candidate, ConflictRule, GroupKey, Room, Seat};

/// Seat index → candidate index, `None` for an empty seat.
pub(crate) type Occupancy = Vec<Option<usize>>;

#[derive(Debug, Clone, Copy)]
pub(crate) struct SeatSlot {
    pub room: usize,
    pub row: u32,
    pub column: u32,
}

#[derive(Debug)]
pub(crate) struct Problem<'a> {
    pub rooms: &'a [Room],
    pub candidates: Vec<&'a Candidate>,
    pub seats: Vec<SeatSlot>,
    pub neighbours: Vec<Vec<usize>>,
    /// Group index per candidate.
    pub group_of: Vec<usize>,
    /// Groups in order of first appearance.
    pub groups: Vec<GroupKey>,
    clash: Vec<Vec<bool>>,
}

impl<'a> Problem<'a> {
    pub fn new(
        rooms: &'a [Room],
        candidates: Vec<&'a Candidate>,
        adjacency: AdjacencyPolicy,
        rule: ConflictRule,
    ) -> Self {
        let mut seats = Vec::new();
        let mut index_of: HashMap<(usize, u32, u32), usize> = HashMap::new();
        for (room_idx, room) in rooms.iter().enumerate() {
            for seat in room.seats() {
                index_of.insert((room_idx, seat.row, seat.column), seats.len());
                seats.push(SeatSlot {
                    room: room_idx,
                    row: seat.row,
                    column: seat.column,
                });
            }
        }

        let neighbours = seats
            .iter()
            .map(|slot| {
                rooms[slot.room]
                    .neighbours(slot.row, slot.column, adjacency)
                    .into_iter()
                    .filter_map(|n| index_of.get(&(slot.room, n.row, n.column)).copied())
                    .collect()
            })
            .collect();

        let mut groups: Vec<GroupKey> = Vec::new();
        let mut group_index: HashMap<GroupKey, usize> = HashMap::new();
        let mut group_of = Vec::with_capacity(candidates.len());
        let mut representatives: Vec<&Candidate> = Vec::new();
        for &c in &candidates {
            let key = c.group_key();
            let idx = *group_index.entry(key.clone()).or_insert_with(|| {
                groups.push(key);
                representatives.push(c);
                groups.len() - 1
            });
            group_of.push(idx);
        }

        let clash = representatives
            .iter()
            .map(|a| representatives.iter().map(|b| rule.conflicts(a, b)).collect())
            .collect();

        Self {
            rooms,
            candidates,
            seats,
            neighbours,
            group_of,
            groups,
            clash,
        }
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Whether candidates `a` and `b` may not sit side by side.
    #[inline]
    pub fn clashes(&self, a: usize, b: usize) -> bool {
        self.clash[self.group_of[a]][self.group_of[b]]
    }

    /// Whether `candidate` on `seat` clashes with no occupied neighbour.
    pub fn fits(&self, occupancy: &Occupancy, seat: usize, candidate: usize) -> bool {
        self.neighbours[seat].iter().all(|&n| match occupancy[n] {
            Some(other) => other == candidate || !self.clashes(candidate, other),
            None => true,
        })
    }

    /// Whether the seat's current occupant (if any) has no clashing neighbour.
    pub fn seat_is_clear(&self, occupancy: &Occupancy, seat: usize) -> bool {
        match occupancy[seat] {
            Some(c) => self.fits(occupancy, seat, c),
            None => true,
        }
    }

    /// All clashing adjacent pairs `(a, b)` with `a < b`, in seat order.
    pub fn violations(&self, occupancy: &Occupancy) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (seat, occupant) in occupancy.iter().enumerate() {
            let Some(here) = *occupant else { continue };
            for &n in &self.neighbours[seat] {
                if n <= seat {
                    continue;
                }
                if let Some(there) = occupancy[n] {
                    if self.clashes(here, there) {
                        pairs.push((seat, n));
                    }
                }
            }
        }
        pairs
    }

    /// Seat distance used to rank swap partners.
    ///
    /// Same room: Manhattan distance. Other rooms rank after every seat
    /// of the same room, by global seat order distance.
    pub fn distance(&self, a: usize, b: usize) -> (u8, usize) {
        let (sa, sb) = (self.seats[a], self.seats[b]);
        if sa.room == sb.room {
            let dr = sa.row.abs_diff(sb.row) as usize;
            let dc = sa.column.abs_diff(sb.column) as usize;
            (0, dr + dc)
        } else {
            (1, a.abs_diff(b))
        }
    }

    pub fn seat(&self, index: usize) -> Seat {
        let slot = self.seats[index];
        Seat::new(&self.rooms[slot.room].id, slot.row, slot.column)
    }
}
