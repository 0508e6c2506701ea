use crate::{
    data::{attendance::AttendanceEvent, student::Student},
    error::{ApiError, FingerprintNotRecognisedSnafu, LogAttendanceSnafu},
    extract::JsonOrForm,
    state::RollcallState,
};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};

#[derive(Deserialize)]
pub struct ScanForm {
    #[serde(default)]
    fingerprint_id: String,
}

#[derive(Serialize)]
pub struct ScanResponse {
    message: &'static str,
    student: Student,
}

/// Unknown fingerprints are answered with a 404 and leave the ledger untouched.
pub async fn post_log_scan(
    State(state): State<RollcallState>,
    JsonOrForm(ScanForm { fingerprint_id }): JsonOrForm<ScanForm>,
) -> Result<Json<ScanResponse>, ApiError> {
    let student = Student::find_by_fingerprint(&fingerprint_id, &*state)
        .await
        .context(LogAttendanceSnafu)?
        .context(FingerprintNotRecognisedSnafu { fingerprint_id })?;

    let event = AttendanceEvent::append(student.id, None, &*state)
        .await
        .context(LogAttendanceSnafu)?;
    info!(
        student_id = ?student.id,
        roll_number = ?student.roll_number,
        at = %event.timestamp.to_zoned(state.timezone().clone()),
        "Attendance logged"
    );

    Ok(Json(ScanResponse {
        message: "Attendance logged",
        student,
    }))
}
