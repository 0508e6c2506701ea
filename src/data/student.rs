use crate::{data::AttendanceStore, error::RollcallResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
    pub fingerprint_id: String,
}

/// Registration body. Missing fields come through as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStudent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub fingerprint_id: String,
}

impl Student {
    /// No uniqueness checks: duplicate roll numbers or fingerprints are stored as given.
    pub async fn register(
        to_be_added: NewStudent,
        store: &dyn AttendanceStore,
    ) -> RollcallResult<Self> {
        let student = store.insert_student(to_be_added).await?;
        info!(id = ?student.id, roll_number = ?student.roll_number, "Registered student");
        Ok(student)
    }

    pub async fn find_by_fingerprint(
        fingerprint_id: &str,
        store: &dyn AttendanceStore,
    ) -> RollcallResult<Option<Self>> {
        store.find_student_by_fingerprint(fingerprint_id).await
    }

    /// Every student, ordered by the number at the end of their roll number.
    pub async fn list_all(store: &dyn AttendanceStore) -> RollcallResult<Vec<Self>> {
        let mut students = store.get_all_students().await?;
        sort_by_roll_number_suffix(&mut students);
        Ok(students)
    }

    /// The run of ASCII digits ending the roll number, e.g. `"10"` for `"A10"`.
    pub fn roll_number_suffix(&self) -> Option<&str> {
        let digit_count = self
            .roll_number
            .bytes()
            .rev()
            .take_while(u8::is_ascii_digit)
            .count();
        let suffix = &self.roll_number[self.roll_number.len() - digit_count..];
        (!suffix.is_empty()).then_some(suffix)
    }
}

/// Compares two digit strings by numeric value without parsing them, so long runs can't overflow.
fn cmp_digit_strings(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Numeric order of the trailing digits. Roll numbers without any go last, and ties fall back
/// to plain string order.
pub fn sort_by_roll_number_suffix(students: &mut [Student]) {
    students.sort_by(|a, b| {
        let by_suffix = match (a.roll_number_suffix(), b.roll_number_suffix()) {
            (Some(a), Some(b)) => cmp_digit_strings(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_suffix.then_with(|| a.roll_number.cmp(&b.roll_number))
    });
}
