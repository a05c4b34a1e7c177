//! HttpBackend against a throwaway axum server that speaks the FindMe contract.

use std::collections::HashMap;

use api::{
    ApiError, Backend, Credentials, HttpBackend, NewReport, Registration, ReportPatch,
    ReportStatus, SearchQuery,
};
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

const TOKEN: &str = "good-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer good-token")
}

fn report_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "full_name": name,
        "age": 20,
        "gender": "Female",
        "last_seen_location": "Mombasa",
        "last_seen_date": "2024-01-05T00:00:00",
        "status": "missing",
        "contact_name": "Kin",
        "contact_phone": "0711000000",
        "case_number": format!("CASE-{id}"),
        "created_at": "2024-01-06T10:00:00"
    })
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "amina@example.com" && body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({"message": "login successful", "user_id": 1, "token": TOKEN})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid email or password"})),
        )
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["name"].as_str().unwrap_or("").is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "name, email and password are required"})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({"message": "user registered successfully", "user_id": 2, "token": "fresh"})),
    )
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if authorized(&headers) {
        (
            StatusCode::OK,
            Json(json!({"id": 1, "name": "Amina", "email": "amina@example.com"})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid authentication token"})),
        )
    }
}

async fn list() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": [report_json(1, "Amina Ali"), report_json(2, "John Doe")]
    }))
}

async fn mine(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"msg": "Missing Authorization Header"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "data": [report_json(1, "Amina Ali")]})),
    )
}

async fn get_one(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if id == 1 {
        (
            StatusCode::OK,
            Json(json!({"success": true, "data": report_json(1, "Amina Ali")})),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": "Not found"})),
        )
    }
}

async fn create(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"msg": "Missing Authorization Header"})),
        );
    }
    let mut record = body.clone();
    record["id"] = json!(10);
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "message": "Missing person report created", "data": record})),
    )
}

async fn update(
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid authentication token"})),
        );
    }
    // Only mutable fields may be sent.
    if body.get("id").is_some() || body.get("case_number").is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "immutable field in update"})),
        );
    }
    let mut record = report_json(id, "Amina Ali");
    if let Some(status) = body.get("status") {
        record["status"] = status.clone();
    }
    (StatusCode::OK, Json(json!({"success": true, "data": record})))
}

async fn delete(Path(id): Path<i64>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid authentication token"})),
        );
    }
    if id == 2 {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "You can only delete your own reports"})),
        );
    }
    (StatusCode::OK, Json(json!({"success": true})))
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let name = params.get("name").cloned().unwrap_or_default().to_lowercase();
    let data: Vec<Value> = [report_json(1, "Amina Ali"), report_json(2, "John Doe")]
        .into_iter()
        .filter(|r| {
            r["full_name"]
                .as_str()
                .unwrap_or("")
                .to_lowercase()
                .contains(&name)
        })
        .collect();
    Json(json!({"success": true, "data": data, "results_count": data.len()}))
}

async fn quick(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let term = params.get("q").cloned().unwrap_or_default().to_lowercase();
    if term.is_empty() {
        return Json(json!({"success": true, "data": [], "message": "Please provide a search term"}));
    }
    let data: Vec<Value> = [report_json(1, "Amina Ali"), report_json(2, "John Doe")]
        .into_iter()
        .filter(|r| {
            r["full_name"]
                .as_str()
                .unwrap_or("")
                .to_lowercase()
                .contains(&term)
        })
        .collect();
    Json(json!({"success": true, "data": data, "search_term": term}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "database": "connected"}))
}

fn app() -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/missing-persons", get(list).post(create))
        .route("/api/missing-persons/mine", get(mine))
        .route(
            "/api/missing-persons/{id}",
            get(get_one).put(update).delete(delete),
        )
        .route("/api/search", get(search))
        .route("/api/search/quick", get(quick))
        .route("/api/health", get(health))
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

async fn backend() -> HttpBackend {
    HttpBackend::new(&serve(app()).await).unwrap()
}

fn new_report() -> NewReport {
    NewReport {
        full_name: "Mary N.".into(),
        age: Some(33),
        gender: "Female".into(),
        height: Some("170cm".into()),
        last_seen_location: "Thika".into(),
        last_seen_date: "2024-02-01T00:00:00.000Z".into(),
        status: ReportStatus::Missing,
        additional_info: None,
        photo_url: None,
        contact_name: "Kin".into(),
        contact_phone: "0711000000".into(),
        case_number: "CASE-10".into(),
    }
}

#[tokio::test]
async fn test_login_returns_token() {
    let backend = backend().await;
    let res = backend
        .login(&Credentials {
            email: "amina@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(res.token(), Some(TOKEN));
}

#[tokio::test]
async fn test_login_rejection_is_auth_error_with_message() {
    let backend = backend().await;
    let err = backend
        .login(&Credentials {
            email: "amina@example.com".into(),
            password: "nope".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Auth("invalid email or password".into()));
}

#[tokio::test]
async fn test_register_success_and_failure() {
    let backend = backend().await;
    let res = backend
        .register(&Registration {
            name: "Amina".into(),
            email: "amina@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(res.token(), Some("fresh"));

    let err = backend
        .register(&Registration {
            name: "".into(),
            email: "x@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::server(400, "name, email and password are required")
    );
}

#[tokio::test]
async fn test_current_user_sends_bearer() {
    let backend = backend().await;
    let me = backend.current_user(TOKEN).await.unwrap();
    assert_eq!(me.display_name(), "Amina");

    assert!(backend.current_user("stale").await.unwrap_err().is_auth());
}

#[tokio::test]
async fn test_list_unwraps_envelope() {
    let backend = backend().await;
    let reports = backend.list_reports().await.unwrap();
    let names: Vec<_> = reports.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, ["Amina Ali", "John Doe"]);
    assert_eq!(reports[0].status, ReportStatus::Missing);
}

#[tokio::test]
async fn test_list_mine_requires_token() {
    let backend = backend().await;
    assert_eq!(backend.list_my_reports(TOKEN).await.unwrap().len(), 1);

    let err = backend.list_my_reports("").await.unwrap_err();
    assert_eq!(err, ApiError::Auth("Missing Authorization Header".into()));
}

#[tokio::test]
async fn test_get_one_and_not_found() {
    let backend = backend().await;
    assert_eq!(backend.get_report(1).await.unwrap().case_number, "CASE-1");
    assert!(backend.get_report(99).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_create_reads_id_from_envelope() {
    let backend = backend().await;
    let created = backend.create_report(&new_report(), TOKEN).await.unwrap();
    assert_eq!(created.id, Some(10));
    assert_eq!(created.status, Some(ReportStatus::Missing));

    let err = backend.create_report(&new_report(), "").await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn test_update_sends_patch_only() {
    let backend = backend().await;
    let updated = backend
        .update_report(1, &ReportPatch::status(ReportStatus::Found), TOKEN)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.status, ReportStatus::Found);
}

#[tokio::test]
async fn test_update_acknowledgement_yields_no_record() {
    let router = Router::new().route(
        "/api/missing-persons/{id}",
        axum::routing::put(|Path(id): Path<i64>| async move {
            Json(json!({"id": id, "message": "Updated successfully"}))
        }),
    );
    let backend = HttpBackend::new(&serve(router).await).unwrap();
    let updated = backend
        .update_report(5, &ReportPatch::status(ReportStatus::Found), TOKEN)
        .await
        .unwrap();
    assert_eq!(updated, None);
}

#[tokio::test]
async fn test_field_errors_become_message() {
    let router = Router::new().route(
        "/api/missing-persons",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {"full_name": ["Missing data for required field."]}})),
            )
        }),
    );
    let backend = HttpBackend::new(&serve(router).await).unwrap();
    assert_eq!(
        backend.create_report(&new_report(), TOKEN).await.unwrap_err(),
        ApiError::server(400, "full_name: Missing data for required field.")
    );
}

#[tokio::test]
async fn test_delete_forbidden_is_server_error() {
    let backend = backend().await;
    backend.delete_report(1, TOKEN).await.unwrap();

    let err = backend.delete_report(2, TOKEN).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::server(403, "You can only delete your own reports")
    );
}

#[tokio::test]
async fn test_search_passes_query() {
    let backend = backend().await;
    let query = SearchQuery {
        name: Some("doe".into()),
        ..SearchQuery::default()
    };
    let found = backend.search(&query).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].full_name, "John Doe");
}

#[tokio::test]
async fn test_quick_search_sends_term() {
    let backend = backend().await;
    let found = backend.quick_search(" amina ").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].case_number, "CASE-1");

    assert!(backend.quick_search("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health() {
    let backend = backend().await;
    let health = backend.health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.database.as_deref(), Some("connected"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(&format!("http://{addr}/api")).unwrap();
    let err = backend.list_reports().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.user_message(), "Network error");
}

#[tokio::test]
async fn test_non_json_success_is_decode_error() {
    let router = Router::new().route("/api/missing-persons", get(|| async { "<html>ok</html>" }));
    let backend = HttpBackend::new(&serve(router).await).unwrap();
    assert!(matches!(
        backend.list_reports().await,
        Err(ApiError::Decode(_))
    ));
}

#[tokio::test]
async fn test_error_without_body_uses_reason_phrase() {
    let router = Router::new().route(
        "/api/health",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let backend = HttpBackend::new(&serve(router).await).unwrap();
    assert_eq!(
        backend.health().await.unwrap_err(),
        ApiError::server(503, "Service Unavailable")
    );
}
