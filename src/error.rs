use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use serde::Serialize;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RollcallResult<T> = Result<T, RollcallError>;

pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Use dd/mm/yyyy";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RollcallError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error getting db connection"))]
    GetDatabaseConnection { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Error converting {} to `time::OffsetDateTime`", timestamp))]
    InvalidTimestamp {
        source: time::error::ComponentRange,
        timestamp: jiff::Timestamp,
    },
    #[snafu(display("Error converting stored time {:?} to `jiff::Timestamp`", odt))]
    InvalidStoredTimestamp {
        source: jiff::Error,
        odt: time::OffsetDateTime,
    },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse `{}` as a number", name))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Unknown timezone {:?}", tz))]
    InvalidTimezone { source: jiff::Error, tz: String },
    #[snafu(display("Invalid date format. Use dd/mm/yyyy"))]
    InvalidDate { original: String },
}

impl RollcallError {
    pub const fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::OpenDatabase { .. } | Self::GetDatabaseConnection { .. } => ISE,
            Self::MakeQuery { .. } => ISE,
            Self::MigrateError { .. } => ISE,
            Self::InvalidTimestamp { .. } | Self::InvalidStoredTimestamp { .. } => ISE,
            Self::BadEnvVar { .. } | Self::ParseNumber { .. } | Self::InvalidTimezone { .. } => {
                ISE
            }
            Self::InvalidDate { .. } => BI,
        }
    }

    /// Text shown to the caller. Server-side failures never leak their details.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidDate { .. } => INVALID_DATE_MESSAGE.to_string(),
            _ => "Something went wrong on our end".to_string(),
        }
    }
}

impl IntoResponse for RollcallError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            info!(?self, "Rejected request");
        }

        let alert = html! {
            div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                strong class="font-bold" {"Rollcall Error: "}
                span {(self.public_message())}
            }
        };

        (status_code, Html(alert.into_string())).into_response()
    }
}

/// Failures of the JSON endpoints, answered with JSON bodies rather than HTML.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ApiError {
    #[snafu(display("Error registering student"))]
    RegisterStudent { source: RollcallError },
    #[snafu(display("Error logging attendance"))]
    LogAttendance { source: RollcallError },
    #[snafu(display("Fingerprint not recognized"))]
    FingerprintNotRecognised { fingerprint_id: String },
}

#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::RegisterStudent { ref source } | Self::LogAttendance { ref source } => {
                error!(?source, "{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: self.to_string(),
                    }),
                )
                    .into_response()
            }
            Self::FingerprintNotRecognised { ref fingerprint_id } => {
                info!(?fingerprint_id, "Scan from unknown fingerprint");
                (
                    StatusCode::NOT_FOUND,
                    Json(MessageBody {
                        message: self.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
