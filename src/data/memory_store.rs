use crate::{
    data::{
        AttendanceStore,
        attendance::{AttendanceEvent, AttendanceLog},
        student::{NewStudent, Student},
    },
    error::{RollcallError, RollcallResult},
};
use async_trait::async_trait;
use jiff::Timestamp;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};
use uuid::Uuid;

/// In-process store for tests. `set_offline(true)` makes every call fail like an unreachable
/// database would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
    offline: AtomicBool,
}

#[derive(Debug, Default)]
struct Collections {
    students: Vec<Student>,
    attendance: Vec<AttendanceEvent>,
}

impl MemoryStore {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn attendance(&self) -> Vec<AttendanceEvent> {
        self.collections.lock().unwrap().attendance.clone()
    }

    fn check_online(&self) -> RollcallResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RollcallError::GetDatabaseConnection {
                source: sqlx::Error::PoolTimedOut,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn insert_student(&self, to_be_added: NewStudent) -> RollcallResult<Student> {
        self.check_online()?;
        let NewStudent {
            name,
            roll_number,
            fingerprint_id,
        } = to_be_added;
        let student = Student {
            id: Uuid::new_v4(),
            name,
            roll_number,
            fingerprint_id,
        };
        self.collections
            .lock()
            .unwrap()
            .students
            .push(student.clone());
        Ok(student)
    }

    async fn find_student_by_fingerprint(
        &self,
        fingerprint_id: &str,
    ) -> RollcallResult<Option<Student>> {
        self.check_online()?;
        Ok(self
            .collections
            .lock()
            .unwrap()
            .students
            .iter()
            .find(|student| student.fingerprint_id == fingerprint_id)
            .cloned())
    }

    async fn get_all_students(&self) -> RollcallResult<Vec<Student>> {
        self.check_online()?;
        Ok(self.collections.lock().unwrap().students.clone())
    }

    async fn insert_attendance(
        &self,
        student_id: Uuid,
        timestamp: Timestamp,
    ) -> RollcallResult<AttendanceEvent> {
        self.check_online()?;
        let event = AttendanceEvent {
            id: Uuid::new_v4(),
            student_id,
            timestamp,
        };
        self.collections
            .lock()
            .unwrap()
            .attendance
            .push(event.clone());
        Ok(event)
    }

    async fn get_attendance_between(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> RollcallResult<Vec<AttendanceLog>> {
        self.check_online()?;
        let collections = self.collections.lock().unwrap();
        let mut logs: Vec<_> = collections
            .attendance
            .iter()
            .filter(|event| start <= event.timestamp && event.timestamp <= end)
            .map(|event| AttendanceLog {
                event: event.clone(),
                student: collections
                    .students
                    .iter()
                    .find(|student| student.id == event.student_id)
                    .cloned(),
            })
            .collect();
        logs.sort_by_key(|log| log.event.timestamp);
        Ok(logs)
    }

    async fn close(&self) {}
}
