//! CSV import for rosters and room tables.
//!
//! Roster columns: `student_id,name,email,section,gender,session`.
//! Room columns: `room_id,name,rows,columns`.
//! Cells are trimmed; blank optional cells read as missing.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{Room, RosterEntry};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read import file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(default)]
    student_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    section: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    gender: Option<String>,
    #[serde(default)]
    session: String,
}

impl From<RosterRow> for RosterEntry {
    fn from(row: RosterRow) -> Self {
        RosterEntry {
            student_id: row.student_id,
            name: row.name,
            email: row.email,
            section: row.section,
            gender: row.gender,
            session: row.session,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RoomRow {
    room_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    rows: u32,
    columns: u32,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        let room = Room::new(row.room_id, row.rows, row.columns);
        match row.name {
            Some(name) => room.with_name(name),
            None => room,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Reads enrollment rows. Validation happens in the pool builder.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RosterEntry>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RosterEntry>, ImportError> {
        let mut entries = Vec::new();
        for record in csv_reader(reader).deserialize::<RosterRow>() {
            entries.push(RosterEntry::from(record?));
        }
        debug!(entries = entries.len(), "roster imported");
        Ok(entries)
    }
}

/// Reads the room table.
pub struct RoomImporter;

impl RoomImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Room>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Room>, ImportError> {
        let mut rooms = Vec::new();
        for record in csv_reader(reader).deserialize::<RoomRow>() {
            rooms.push(Room::from(record?));
        }
        debug!(rooms = rooms.len(), "rooms imported");
        Ok(rooms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_blank_cells_are_missing() {
        let data = "\
student_id,name,email,section,gender,session
S1,Asha,asha@example.edu,CSE-A,F,MID
S2 , ,, CSE-B ,M,MID
S3,Ravi,,,  ,MID
";
        let entries = RosterImporter::from_reader(data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name.as_deref(), Some("Asha"));
        assert_eq!(entries[1].student_id, "S2");
        assert_eq!(entries[1].name, None);
        assert_eq!(entries[1].email, None);
        assert_eq!(entries[1].section.as_deref(), Some("CSE-B"));
        assert_eq!(entries[2].section, None);
        assert_eq!(entries[2].gender, None);
    }

    #[test]
    fn test_rooms() {
        let data = "\
room_id,name,rows,columns
H1,Main Hall,5,6
LAB-2,,3,4
";
        let rooms = RoomImporter::from_reader(data.as_bytes()).unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].name, "Main Hall");
        assert_eq!(rooms[0].capacity(), 30);
        assert_eq!(rooms[1].name, "");
        assert_eq!(rooms[1].columns, 4);
    }

    #[test]
    fn test_room_bad_number() {
        let data = "room_id,name,rows,columns\nH1,Hall,five,6\n";
        let err = RoomImporter::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::Csv(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RosterImporter::from_path("/nonexistent/roster.csv").unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
