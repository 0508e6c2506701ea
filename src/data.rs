use crate::{
    data::{
        attendance::{AttendanceEvent, AttendanceLog},
        student::{NewStudent, Student},
    },
    error::RollcallResult,
};
use async_trait::async_trait;
use jiff::Timestamp;
use std::fmt::Debug;
use uuid::Uuid;

pub mod attendance;
#[cfg(test)]
pub mod memory_store;
pub mod postgres_store;
pub mod student;

/// The two collections behind the service: students and their attendance events.
///
/// Every method is a single round-trip to the backing store, attempted exactly once.
#[async_trait]
pub trait AttendanceStore: Debug + Send + Sync {
    async fn insert_student(&self, to_be_added: NewStudent) -> RollcallResult<Student>;

    /// First student whose fingerprint matches exactly, if any.
    async fn find_student_by_fingerprint(
        &self,
        fingerprint_id: &str,
    ) -> RollcallResult<Option<Student>>;

    async fn get_all_students(&self) -> RollcallResult<Vec<Student>>;

    async fn insert_attendance(
        &self,
        student_id: Uuid,
        timestamp: Timestamp,
    ) -> RollcallResult<AttendanceEvent>;

    /// Events with `start <= timestamp <= end` in ascending timestamp order, each joined with
    /// its student (`None` when the reference dangles).
    async fn get_attendance_between(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> RollcallResult<Vec<AttendanceLog>>;

    async fn close(&self);
}
