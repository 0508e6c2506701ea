use crate::{
    data::student::{NewStudent, Student},
    error::{ApiError, MessageBody, RegisterStudentSnafu},
    extract::JsonOrForm,
    state::RollcallState,
};
use axum::{Json, extract::State, http::StatusCode};
use snafu::ResultExt;

pub async fn post_register(
    State(state): State<RollcallState>,
    JsonOrForm(new_student): JsonOrForm<NewStudent>,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    Student::register(new_student, &*state)
        .await
        .context(RegisterStudentSnafu)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageBody {
            message: "Student registered successfully".to_string(),
        }),
    ))
}
