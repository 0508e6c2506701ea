use crate::{
    data::attendance::{AttendanceEvent, AttendanceLog, sort_by_roll_number},
    day_window::{DayWindow, attendance_path, format_date, parse_day_month_year, today},
    error::RollcallResult,
    maud_conveniences::{escape, render_table},
    state::RollcallState,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use jiff::tz::TimeZone;
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct AttendanceDatePath {
    day: Option<String>,
    month: Option<String>,
    year: Option<String>,
}

/// Canonical attendance URLs always carry a date, so a bare request is sent to today's page.
pub async fn get_attendance_today(State(state): State<RollcallState>) -> Redirect {
    Redirect::to(&attendance_path(today(state.timezone())))
}

pub async fn get_attendance(
    State(state): State<RollcallState>,
    Path(AttendanceDatePath { day, month, year }): Path<AttendanceDatePath>,
) -> RollcallResult<Response> {
    let (Some(day), Some(month), Some(year)) = (day, month, year) else {
        return Ok(get_attendance_today(State(state)).await.into_response());
    };

    let date = parse_day_month_year(&day, &month, &year)?;
    let window = DayWindow::new(date, state.timezone())?;

    let mut logs = AttendanceEvent::query_range(window.start, window.end, &*state).await?;
    sort_by_roll_number(&mut logs);

    Ok(state
        .render(render_attendance(&window, logs, state.timezone()))
        .into_response())
}

fn render_attendance(window: &DayWindow, logs: Vec<AttendanceLog>, timezone: &TimeZone) -> Markup {
    let date = format_date(window.date);

    let rows = logs
        .into_iter()
        .map(|log| {
            let time = log
                .event
                .timestamp
                .to_zoned(timezone.clone())
                .strftime("%H:%M:%S")
                .to_string();

            match log.student {
                Some(student) => [
                    escape(student.roll_number),
                    escape(student.name),
                    escape(student.fingerprint_id),
                    escape(time),
                ],
                None => [
                    html! { p class="italic" {"-"} },
                    html! { p class="italic" {"Unknown student"} },
                    html! { p class="italic" {"-"} },
                    escape(time),
                ],
            }
        })
        .collect();

    html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full flex flex-col space-y-4" {
            div class="flex flex-row justify-between" {
                @if let Some(previous) = window.previous() {
                    a href=(attendance_path(previous)) class="hover:text-blue-300 underline" {"Previous day"}
                }
                @if let Some(next) = window.next() {
                    a href=(attendance_path(next)) class="hover:text-blue-300 underline" {"Next day"}
                }
            }
            (render_table(
                html! { "Attendance for " (date) },
                ["Roll Number", "Name", "Fingerprint ID", "Time"],
                rows,
            ))
        }
    }
}
