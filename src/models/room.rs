//! Room and seat model.
//!
//! A room is a rectangular grid of seats. Geometry is fixed for the
//! duration of an exam session; the allocator reads it but never mutates it.
//!
//! # Adjacency
//! Two seats are adjacent when they are in the same room and touch along
//! a row or a column (orthogonal policy). The diagonal policy additionally
//! treats the four corner neighbours as adjacent. Adjacency never crosses
//! rooms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An exam room with fixed row/column geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name (e.g., "Block A, Hall 2").
    pub name: String,
    /// Number of seat rows.
    pub rows: u32,
    /// Number of seats per row.
    pub columns: u32,
}

/// A seat coordinate inside a room (0-based).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat {
    /// Owning room ID.
    pub room_id: String,
    /// Row index (0 = front).
    pub row: u32,
    /// Column index (0 = leftmost).
    pub column: u32,
}

/// Which neighbouring seats count as adjacent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyPolicy {
    /// Left, right, front and back neighbours.
    #[default]
    Orthogonal,
    /// Orthogonal neighbours plus the four diagonals.
    WithDiagonals,
}

impl AdjacencyPolicy {
    /// Row/column offsets considered adjacent under this policy.
    pub fn offsets(self) -> &'static [(i64, i64)] {
        const ORTHOGONAL: [(i64, i64); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
        const WITH_DIAGONALS: [(i64, i64); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];
        match self {
            AdjacencyPolicy::Orthogonal => &ORTHOGONAL,
            AdjacencyPolicy::WithDiagonals => &WITH_DIAGONALS,
        }
    }

    /// Parses a configuration value (`orthogonal` / `diagonal`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "orthogonal" | "4" | "four" => Some(Self::Orthogonal),
            "diagonal" | "diagonals" | "with_diagonals" | "8" | "eight" => {
                Some(Self::WithDiagonals)
            }
            _ => None,
        }
    }
}

impl Room {
    /// Creates a room with the given geometry.
    pub fn new(id: impl Into<String>, rows: u32, columns: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            rows,
            columns,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Total seat count (rows × columns).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Whether the coordinate lies inside the room.
    #[inline]
    pub fn contains(&self, row: u32, column: u32) -> bool {
        row < self.rows && column < self.columns
    }

    /// Returns the seat at a coordinate, if it exists.
    pub fn seat(&self, row: u32, column: u32) -> Option<Seat> {
        self.contains(row, column).then(|| Seat::new(&self.id, row, column))
    }

    /// All seats in row-major order.
    pub fn seats(&self) -> impl Iterator<Item = Seat> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| Seat::new(&self.id, row, column))
        })
    }

    /// Seats adjacent to `(row, column)` under the given policy.
    pub fn neighbours(&self, row: u32, column: u32, policy: AdjacencyPolicy) -> Vec<Seat> {
        policy
            .offsets()
            .iter()
            .filter_map(|&(dr, dc)| {
                let r = i64::from(row) + dr;
                let c = i64::from(column) + dc;
                if r < 0 || c < 0 {
                    return None;
                }
                self.seat(u32::try_from(r).ok()?, u32::try_from(c).ok()?)
            })
            .collect()
    }
}

impl Seat {
    /// Creates a seat coordinate.
    pub fn new(room_id: impl Into<String>, row: u32, column: u32) -> Self {
        Self {
            room_id: room_id.into(),
            row,
            column,
        }
    }

    /// 1-based seat number in row-major order, as printed on rosters.
    pub fn seat_number(&self, room: &Room) -> u32 {
        self.row * room.columns + self.column + 1
    }

    /// Whether two seats are adjacent under the given policy.
    pub fn is_adjacent(&self, other: &Seat, policy: AdjacencyPolicy) -> bool {
        if self.room_id != other.room_id {
            return false;
        }
        let dr = i64::from(self.row) - i64::from(other.row);
        let dc = i64::from(self.column) - i64::from(other.column);
        policy.offsets().contains(&(dr, dc))
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[r{}c{}]", self.room_id, self.row + 1, self.column + 1)
    }
}
