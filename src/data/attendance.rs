use crate::{
    data::{AttendanceStore, student::Student},
    error::RollcallResult,
};
use jiff::Timestamp;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEvent {
    pub id: Uuid,
    pub student_id: Uuid,
    pub timestamp: Timestamp,
}

/// An event hydrated with the student it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceLog {
    pub event: AttendanceEvent,
    pub student: Option<Student>,
}

impl AttendanceLog {
    pub fn roll_number(&self) -> &str {
        self.student
            .as_ref()
            .map_or("", |student| student.roll_number.as_str())
    }
}

impl AttendanceEvent {
    /// Records one event. `timestamp` defaults to now, and is kept to the millisecond so it always
    /// lands inside exactly one day window.
    pub async fn append(
        student_id: Uuid,
        timestamp: Option<Timestamp>,
        store: &dyn AttendanceStore,
    ) -> RollcallResult<Self> {
        let timestamp = truncate_to_millisecond(timestamp.unwrap_or_else(Timestamp::now));
        store.insert_attendance(student_id, timestamp).await
    }

    /// Both ends are inclusive.
    pub async fn query_range(
        start: Timestamp,
        end: Timestamp,
        store: &dyn AttendanceStore,
    ) -> RollcallResult<Vec<AttendanceLog>> {
        store.get_attendance_between(start, end).await
    }
}

fn truncate_to_millisecond(timestamp: Timestamp) -> Timestamp {
    Timestamp::from_millisecond(timestamp.as_millisecond()).unwrap_or(timestamp)
}

/// Plain string order on the student's roll number, with unresolved students first. Stable, so
/// events for the same roll number stay in time order.
pub fn sort_by_roll_number(logs: &mut [AttendanceLog]) {
    logs.sort_by(|a, b| a.roll_number().cmp(b.roll_number()));
}
