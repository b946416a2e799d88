//! Exam seating notifications.
//!
//! Builds one notification payload per seated candidate. Delivery is the
//! notification collaborator's job; this module only renders the message.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::SeatingPlan;

/// Exam metadata shown in every notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDetails {
    pub exam_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

/// A rendered seating notification for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamNotification {
    pub candidate_id: String,
    pub student_name: String,
    pub email: String,
    pub exam_name: String,
    /// `YYYY-MM-DD`
    pub exam_date: String,
    /// `HH:MM`
    pub exam_time: String,
    /// Room display name, or its ID when unnamed.
    pub room: String,
    pub seat_number: u32,
    pub subject: String,
    pub body: String,
}

const SUBJECT: &str = "Exam Seating Arrangement";

impl ExamDetails {
    pub fn new(exam_name: impl Into<String>, date: NaiveDate, start_time: NaiveTime) -> Self {
        Self {
            exam_name: exam_name.into(),
            date,
            start_time,
        }
    }
}

/// One notification per assignment, ordered by candidate ID.
pub fn notifications(plan: &SeatingPlan, exam: &ExamDetails) -> Vec<ExamNotification> {
    let exam_date = exam.date.format("%Y-%m-%d").to_string();
    let exam_time = exam.start_time.format("%H:%M").to_string();

    let mut out: Vec<ExamNotification> = plan
        .assignments()
        .iter()
        .filter_map(|a| {
            let room = plan.room(&a.seat.room_id)?;
            let room_label = if room.name.is_empty() {
                room.id.clone()
            } else {
                room.name.clone()
            };
            let student_name = if a.candidate.name.is_empty() {
                "Student".to_string()
            } else {
                a.candidate.name.clone()
            };
            let seat_number = a.seat.seat_number(room);

            let body = format!(
                "Dear {student_name},\n\n\
                 Your exam seating arrangement has been confirmed:\n\n\
                 Exam: {exam_name}\n\
                 Date: {exam_date}\n\
                 Time: {exam_time}\n\
                 Room: {room_label}\n\
                 Seat Number: {seat_number}\n\n\
                 Please arrive 30 minutes before the exam starts and bring your ID card.\n\n\
                 Best regards,\n\
                 Examination Department\n",
                exam_name = exam.exam_name,
            );

            Some(ExamNotification {
                candidate_id: a.candidate.id.clone(),
                student_name,
                email: a.candidate.email.clone(),
                exam_name: exam.exam_name.clone(),
                exam_date: exam_date.clone(),
                exam_time: exam_time.clone(),
                room: room_label,
                seat_number,
                subject: SUBJECT.to_string(),
                body,
            })
        })
        .collect();

    out.sort_by(|a, b| a.candidate_id.cmp(&b.candidate_id));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, Room};
    use crate::solver::SeatingSolver;

    fn exam() -> ExamDetails {
        ExamDetails::new(
            "Data Structures Midterm",
            NaiveDate::from_ymd_opt(2026, 11, 3).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_one_notification_per_assignment() {
        let candidates = vec![
            Candidate::new("S2", "X", "M", "MID")
                .with_name("Ravi")
                .with_email("ravi@example.edu"),
            Candidate::new("S1", "Y", "F", "MID"),
        ];
        let rooms = vec![Room::new("H1", 1, 3).with_name("Main Hall")];
        let plan = SeatingSolver::new().solve("MID", &candidates, &rooms).unwrap();

        let notes = notifications(&plan, &exam());
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].candidate_id, "S1");
        assert_eq!(notes[0].student_name, "Student");

        let ravi = &notes[1];
        assert_eq!(ravi.email, "ravi@example.edu");
        assert_eq!(ravi.subject, "Exam Seating Arrangement");
        assert_eq!(ravi.room, "Main Hall");
        assert_eq!(ravi.seat_number, 1);
        assert_eq!(ravi.exam_date, "2026-11-03");
        assert_eq!(ravi.exam_time, "09:30");
        assert!(ravi.body.starts_with("Dear Ravi,"));
        assert!(ravi.body.contains("Seat Number: 1\n"));
        assert!(ravi.body.contains("bring your ID card"));
    }

    #[test]
    fn test_unnamed_room_uses_id() {
        let candidates = vec![Candidate::new("S1", "X", "M", "MID")];
        let rooms = vec![Room::new("LAB-2", 1, 1)];
        let plan = SeatingSolver::new().solve("MID", &candidates, &rooms).unwrap();
        let notes = notifications(&plan, &exam());
        assert_eq!(notes[0].room, "LAB-2");
    }
}
