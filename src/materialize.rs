//! Result materializer.
//!
//! Turns a solved seating plan into publishable output: a flat list of
//! seat records sorted by room, row and column, a per-room text grid for
//! printing, and CSV/JSON encodings for the notification collaborator.
//!
//! Materialization is a pure function of the plan; running it twice on
//! the same plan produces byte-identical output.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Seat, SeatingPlan};

/// One published seat assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingRecord {
    pub candidate_id: String,
    pub room_id: String,
    /// 0-based row.
    pub row: u32,
    /// 0-based column.
    pub column: u32,
    /// 1-based row-major seat number.
    pub seat_number: u32,
}

/// A printable seat grid for one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomGrid {
    pub room_id: String,
    pub room_name: String,
    /// `cells[row][column]`, `None` for an empty seat.
    pub cells: Vec<Vec<Option<String>>>,
}

/// Flat seat records, sorted by room ID, then row, then column.
pub fn records(plan: &SeatingPlan) -> Vec<SeatingRecord> {
    let mut records: Vec<SeatingRecord> = plan
        .assignments()
        .iter()
        .map(|a| {
            let seat_number = plan
                .room(&a.seat.room_id)
                .map(|room| a.seat.seat_number(room))
                .unwrap_or_default();
            SeatingRecord {
                candidate_id: a.candidate.id.clone(),
                room_id: a.seat.room_id.clone(),
                row: a.seat.row,
                column: a.seat.column,
                seat_number,
            }
        })
        .collect();

    records.sort_by(|a, b| {
        (a.room_id.as_str(), a.row, a.column).cmp(&(b.room_id.as_str(), b.row, b.column))
    });
    records
}

/// One grid per room, in the plan's room order.
pub fn room_grids(plan: &SeatingPlan) -> Vec<RoomGrid> {
    let occupancy = plan.occupancy();
    plan.rooms()
        .iter()
        .map(|room| {
            let cells = (0..room.rows)
                .map(|row| {
                    (0..room.columns)
                        .map(|column| {
                            let seat = Seat::new(&room.id, row, column);
                            occupancy.get(&seat).map(|a| a.candidate.id.clone())
                        })
                        .collect()
                })
                .collect();
            RoomGrid {
                room_id: room.id.clone(),
                room_name: room.name.clone(),
                cells,
            }
        })
        .collect()
}

/// Records as CSV with a header row.
pub fn to_csv(records: &[SeatingRecord]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Records as pretty-printed JSON.
pub fn to_json(records: &[SeatingRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

impl fmt::Display for RoomGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .cells
            .iter()
            .flatten()
            .flatten()
            .map(|id| id.chars().count())
            .max()
            .unwrap_or(0)
            .max(2);

        if self.room_name.is_empty() {
            writeln!(f, "Room {}", self.room_id)?;
        } else {
            writeln!(f, "Room {} ({})", self.room_id, self.room_name)?;
        }
        for row in &self.cells {
            let line: Vec<String> = row
                .iter()
                .map(|cell| format!("{:<width$}", cell.as_deref().unwrap_or("--")))
                .collect();
            writeln!(f, "{}", line.join(" ").trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, Room};
    use crate::solver::SeatingSolver;

    fn solved_plan() -> SeatingPlan {
        let candidates = vec![
            Candidate::new("S1", "X", "M", "MID"),
            Candidate::new("S2", "X", "M", "MID"),
            Candidate::new("S3", "Y", "F", "MID"),
        ];
        let rooms = vec![Room::new("H2", 1, 2), Room::new("H1", 1, 3).with_name("Main Hall")];
        SeatingSolver::new().solve("MID", &candidates, &rooms).unwrap()
    }

    #[test]
    fn test_records_sorted_by_room_row_column() {
        let plan = solved_plan();
        let records = records(&plan);
        assert_eq!(records.len(), 3);
        let keys: Vec<(String, u32, u32)> = records
            .iter()
            .map(|r| (r.room_id.clone(), r.row, r.column))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(records.iter().all(|r| r.seat_number >= 1));
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let plan = solved_plan();
        let first = to_csv(&records(&plan)).unwrap();
        let second = to_csv(&records(&plan)).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            to_json(&records(&plan)).unwrap(),
            to_json(&records(&plan)).unwrap()
        );
    }

    #[test]
    fn test_csv_header() {
        let csv = to_csv(&records(&solved_plan())).unwrap();
        assert!(csv.starts_with("candidate_id,room_id,row,column,seat_number\n"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_room_grid_render() {
        let plan = solved_plan();
        let grids = room_grids(&plan);
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0].room_id, "H2");
        assert_eq!(grids[0].cells, vec![vec![Some("S1".into()), Some("S3".into())]]);

        let text = grids[1].to_string();
        assert!(text.starts_with("Room H1 (Main Hall)\n"));
        assert_eq!(text.lines().nth(1), Some("S2 -- --"));
    }

    #[test]
    fn test_room_grid_pads_by_character() {
        let candidates = vec![
            Candidate::new("É1", "X", "M", "MID"),
            Candidate::new("S2", "Y", "F", "MID"),
        ];
        let rooms = vec![Room::new("H3", 1, 3)];
        let plan = SeatingSolver::new().solve("MID", &candidates, &rooms).unwrap();
        let text = room_grids(&plan)[0].to_string();
        assert_eq!(text.lines().nth(1), Some("É1 S2 --"));
    }
}
