use crate::{
    routes::{
        attendance::{get_attendance, get_attendance_today},
        index::get_index_route,
        log_scan::post_log_scan,
        register::post_register,
        students::get_students,
    },
    state::RollcallState,
};
use axum::{
    Router,
    routing::{get, post},
};

pub mod attendance;
pub mod index;
pub mod log_scan;
pub mod register;
pub mod students;

pub fn router(state: RollcallState) -> Router {
    Router::new()
        .route("/", get(get_index_route))
        .route("/attendance", get(get_attendance_today))
        .route("/attendance/", get(get_attendance_today))
        .route("/attendance/{day}", get(get_attendance))
        .route("/attendance/{day}/{month}", get(get_attendance))
        .route("/attendance/{day}/{month}/{year}", get(get_attendance))
        .route("/students", get(get_students))
        .route("/register", post(post_register))
        .route("/log-scan", post(post_log_scan))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DEFAULT_TIMEZONE,
        data::{AttendanceStore, memory_store::MemoryStore},
        day_window::{attendance_path, today},
        error::INVALID_DATE_MESSAGE,
        tests::ensure_logging,
    };
    use axum::{
        body::Body,
        http::{HeaderMap, Request, StatusCode, header},
    };
    use jiff::{Timestamp, tz::TimeZone};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn kolkata() -> TimeZone {
        TimeZone::get(DEFAULT_TIMEZONE).unwrap()
    }

    fn test_app() -> (Router, Arc<MemoryStore>) {
        ensure_logging();
        let store = Arc::new(MemoryStore::default());
        let state = RollcallState::from_store(store.clone(), kolkata());
        (router(state), store)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn register(app: &Router, name: &str, roll_number: &str, fingerprint_id: &str) {
        let (status, _, body) = send(
            app,
            post_json(
                "/register",
                &json!({"name": name, "roll_number": roll_number, "fingerprint_id": fingerprint_id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({"message": "Student registered successfully"}));
    }

    async fn scan(app: &Router, fingerprint_id: &str) -> (StatusCode, Value) {
        let (status, _, body) = send(
            app,
            post_json("/log-scan", &json!({"fingerprint_id": fingerprint_id})),
        )
        .await;
        (status, serde_json::from_str(&body).unwrap())
    }

    fn position(body: &str, cell: &str) -> usize {
        body.find(&format!(">{cell}<"))
            .unwrap_or_else(|| panic!("{cell} missing from page"))
    }

    #[tokio::test]
    async fn index_renders() {
        let (app, _) = test_app();
        let (status, _, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Register a Student"));
    }

    #[tokio::test]
    async fn registered_fingerprint_is_logged() {
        let (app, store) = test_app();
        register(&app, "Asha", "CS17", "fp-asha").await;

        let (status, body) = scan(&app, "fp-asha").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Attendance logged");
        assert_eq!(body["student"]["name"], "Asha");
        assert_eq!(body["student"]["roll_number"], "CS17");
        assert_eq!(body["student"]["fingerprint_id"], "fp-asha");

        let events = store.attendance();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].student_id.to_string(),
            body["student"]["id"].as_str().unwrap()
        );
    }

    #[tokio::test]
    async fn form_encoded_bodies_work_too() {
        let (app, store) = test_app();
        let (status, _, _) = send(
            &app,
            post_form(
                "/register",
                "name=Ravi+Kumar&roll_number=EE4&fingerprint_id=fp%2Fravi",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _, body) = send(&app, post_form("/log-scan", "fingerprint_id=fp%2Fravi")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["student"]["name"], "Ravi Kumar");
        assert_eq!(store.attendance().len(), 1);
    }

    #[tokio::test]
    async fn unknown_fingerprint_records_nothing() {
        let (app, store) = test_app();
        register(&app, "Asha", "CS17", "fp-asha").await;

        let (status, body) = scan(&app, "fp-stranger").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Fingerprint not recognized"}));
        assert!(store.attendance().is_empty());
    }

    #[tokio::test]
    async fn scanning_twice_logs_twice() {
        let (app, store) = test_app();
        register(&app, "Asha", "CS17", "fp-asha").await;

        assert_eq!(scan(&app, "fp-asha").await.0, StatusCode::OK);
        assert_eq!(scan(&app, "fp-asha").await.0, StatusCode::OK);

        let events = store.attendance();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].student_id, events[1].student_id);
        assert_ne!(events[0].id, events[1].id);
    }

    #[tokio::test]
    async fn bare_and_partial_attendance_paths_redirect_to_today() {
        let (app, _) = test_app();
        let expected = attendance_path(today(&kolkata()));

        for uri in [
            "/attendance",
            "/attendance/",
            "/attendance/10",
            "/attendance/10/03",
        ] {
            let (status, headers, _) = send(&app, get(uri)).await;
            assert!(status.is_redirection(), "{uri} gave {status}");
            assert_eq!(headers[header::LOCATION], expected.as_str());
        }
    }

    #[tokio::test]
    async fn impossible_date_is_a_bad_request() {
        let (app, _) = test_app();
        for uri in ["/attendance/31/02/2025", "/attendance/1o/03/2025"] {
            let (status, _, body) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body.contains(INVALID_DATE_MESSAGE));
        }
    }

    #[tokio::test]
    async fn last_calendar_day_still_renders() {
        let (app, _) = test_app();

        let (status, _, body) = send(&app, get("/attendance/31/12/9999")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Attendance for 31/12/9999"));
        assert!(body.contains("href=\"/attendance/30/12/9999\""));
        assert!(!body.contains("Next day"));

        let (status, _, body) = send(&app, get("/attendance/30/12/9999")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("href=\"/attendance/31/12/9999\""));
    }

    #[tokio::test]
    async fn day_boundaries_follow_the_reference_timezone() {
        let (app, store) = test_app();
        register(&app, "Asha", "CS17", "fp-asha").await;
        let student = store.find_student_by_fingerprint("fp-asha").await.unwrap().unwrap();

        let last_moment: Timestamp = "2025-03-10T18:29:59.999Z".parse().unwrap();
        let first_moment_of_next_day: Timestamp = "2025-03-10T18:30:00Z".parse().unwrap();
        store.insert_attendance(student.id, last_moment).await.unwrap();
        store
            .insert_attendance(student.id, first_moment_of_next_day)
            .await
            .unwrap();

        let (status, _, tenth) = send(&app, get("/attendance/10/03/2025")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(tenth.contains("Attendance for 10/03/2025"));
        assert!(tenth.contains(">23:59:59<"));
        assert!(!tenth.contains(">00:00:00<"));

        let (status, _, eleventh) = send(&app, get("/attendance/11/3/2025")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(eleventh.contains("Attendance for 11/03/2025"));
        assert!(eleventh.contains(">00:00:00<"));
        assert!(!eleventh.contains(">23:59:59<"));
        assert!(eleventh.contains("href=\"/attendance/10/03/2025\""));
        assert!(eleventh.contains("href=\"/attendance/12/03/2025\""));
    }

    #[tokio::test]
    async fn listings_use_different_roll_number_orders() {
        let (app, _) = test_app();
        for roll_number in ["A9", "A10", "A2"] {
            let fingerprint_id = format!("fp-{roll_number}");
            register(&app, &format!("Student {roll_number}"), roll_number, &fingerprint_id).await;
            assert_eq!(scan(&app, &fingerprint_id).await.0, StatusCode::OK);
        }

        let (status, _, students) = send(&app, get("/students")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(position(&students, "A2") < position(&students, "A9"));
        assert!(position(&students, "A9") < position(&students, "A10"));

        let (status, _, attendance) =
            send(&app, get(&attendance_path(today(&kolkata())))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(position(&attendance, "A10") < position(&attendance, "A2"));
        assert!(position(&attendance, "A2") < position(&attendance, "A9"));
    }

    #[tokio::test]
    async fn repeated_queries_are_identical() {
        let (app, _) = test_app();
        register(&app, "Asha", "CS17", "fp-asha").await;
        scan(&app, "fp-asha").await;
        let uri = attendance_path(today(&kolkata()));

        let (_, _, first) = send(&app, get(&uri)).await;
        let (_, _, second) = send(&app, get(&uri)).await;
        assert_eq!(first, second);

        let (_, _, first) = send(&app, get("/students")).await;
        let (_, _, second) = send(&app, get("/students")).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn storage_failures_are_generic_500s() {
        let (app, store) = test_app();
        register(&app, "Asha", "CS17", "fp-asha").await;
        store.set_offline(true);

        let (status, _, body) = send(
            &app,
            post_json(
                "/register",
                &json!({"name": "B", "roll_number": "B1", "fingerprint_id": "fp-b"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"error": "Error registering student"})
        );

        let (status, body) = scan(&app, "fp-asha").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Error logging attendance"}));

        for uri in ["/students", "/attendance/10/03/2025"] {
            let (status, _, body) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(!body.contains("PoolTimedOut"));
        }

        store.set_offline(false);
        assert!(store.attendance().is_empty());
    }

    #[tokio::test]
    async fn unparsable_json_is_rejected_by_the_extractor() {
        let (app, store) = test_app();
        let request = Request::post("/log-scan")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _, _) = send(&app, request).await;
        assert!(status.is_client_error());
        assert!(store.attendance().is_empty());
    }
}
