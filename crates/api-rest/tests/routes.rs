use api_rest::{router, AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pms_core::CoreConfig;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn test_app(temp_dir: &TempDir) -> Router {
    let cfg = CoreConfig::new(temp_dir.path().join("patients.json"))
        .expect("CoreConfig::new should succeed");
    router(AppState::new(&cfg))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

fn patient(id: &str, height: f64, weight: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Patient {id}"),
        "city": "Hyderabad",
        "age": 33,
        "gender": "female",
        "height": height,
        "weight": weight
    })
}

#[tokio::test]
async fn banner_and_about_return_messages() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Patient Management System API"}));

    let (status, body) = send(&app, Method::GET, "/about", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "A fully functional API to manage your patient records"})
    );

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn create_then_view_includes_derived_fields() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);

    let (status, body) = send(&app, Method::POST, "/create", Some(patient("P001", 1.75, 70.0))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "P001");
    assert_eq!(body["bmi"], 22.86);
    assert_eq!(body["verdict"], "Normal");

    let (status, body) = send(&app, Method::GET, "/patient/P001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Patient P001");
    assert_eq!(body["bmi"], 22.86);

    let (status, body) = send(&app, Method::GET, "/view", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["P001"]["verdict"], "Normal");
}

#[tokio::test]
async fn view_keeps_store_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);

    for id in ["P003", "P001", "P002"] {
        let (status, _) = send(&app, Method::POST, "/create", Some(patient(id, 1.7, 65.0))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(Request::get("/view").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    let p3 = text.find("\"P003\"").unwrap();
    let p1 = text.find("\"P001\"").unwrap();
    let p2 = text.find("\"P002\"").unwrap();
    assert!(p3 < p1 && p1 < p2, "unexpected order: {text}");
}

#[tokio::test]
async fn create_duplicate_returns_400() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);

    send(&app, Method::POST, "/create", Some(patient("P001", 1.75, 70.0))).await;
    let (status, body) = send(&app, Method::POST, "/create", Some(patient("P001", 1.6, 90.0))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Patient already exists");

    let (_, body) = send(&app, Method::GET, "/patient/P001", None).await;
    assert_eq!(body["weight"], 70.0);
}

#[tokio::test]
async fn create_invalid_returns_422_with_every_field() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);

    let (status, body) = send(
        &app,
        Method::POST,
        "/create",
        Some(json!({"id": "P001", "name": "A", "city": "B", "age": 0,
                    "gender": "unknown", "height": 1.7})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<_> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["age", "gender", "weight"]);
}

#[tokio::test]
async fn unknown_patient_returns_404() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);

    let (status, body) = send(&app, Method::GET, "/patient/P404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Patient not found");

    let (status, _) = send(&app, Method::PUT, "/edit/P404", Some(json!({"age": 30}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/delete/P404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_merges_supplied_fields_and_ignores_body_id() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);
    send(&app, Method::POST, "/create", Some(patient("P001", 1.75, 70.0))).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/edit/P001",
        Some(json!({"id": "P999", "weight": 95.0, "city": "Pune"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "P001");
    assert_eq!(body["city"], "Pune");
    assert_eq!(body["age"], 33);
    assert_eq!(body["bmi"], 31.02);
    assert_eq!(body["verdict"], "Obese");

    let (status, _) = send(&app, Method::GET, "/patient/P999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_with_invalid_value_returns_422_and_keeps_record() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);
    send(&app, Method::POST, "/create", Some(patient("P001", 1.75, 70.0))).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/edit/P001",
        Some(json!({"name": "Renamed", "age": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "age");

    let (_, body) = send(&app, Method::GET, "/patient/P001", None).await;
    assert_eq!(body["name"], "Patient P001");
    assert_eq!(body["age"], 33);
}

#[tokio::test]
async fn delete_removes_patient() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);
    send(&app, Method::POST, "/create", Some(patient("P001", 1.75, 70.0))).await;

    let (status, body) = send(&app, Method::DELETE, "/delete/P001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "patient deleted"}));

    let (status, _) = send(&app, Method::GET, "/patient/P001", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sort_by_bmi_desc_is_stable() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);
    send(&app, Method::POST, "/create", Some(patient("A", 2.0, 80.0))).await;
    send(&app, Method::POST, "/create", Some(patient("B", 2.0, 140.0))).await;
    send(&app, Method::POST, "/create", Some(patient("C", 1.0, 20.0))).await;

    let (status, body) = send(&app, Method::GET, "/sort?sort_by=bmi&order=desc", None).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["B", "A", "C"]);
    assert_eq!(body[0]["bmi"], 35.0);
}

#[tokio::test]
async fn sort_rejects_invalid_arguments() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);

    let (status, body) = send(&app, Method::GET, "/sort?sort_by=age", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid field. Choose from ['height', 'weight', 'bmi']"
    );

    let (status, body) = send(&app, Method::GET, "/sort?sort_by=height&order=up", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Order must be asc or desc");

    let (status, body) = send(&app, Method::GET, "/sort", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sort_by"));
}

#[tokio::test]
async fn malformed_bodies_return_structured_422() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);

    let mut wrong_type = patient("P001", 1.75, 70.0);
    wrong_type["age"] = json!("old");
    let (status, body) = send(&app, Method::POST, "/create", Some(wrong_type)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("age"));

    let request = Request::post("/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("error body should be JSON");
    assert!(body["error"].is_string());

    send(&app, Method::POST, "/create", Some(patient("P001", 1.75, 70.0))).await;
    let (status, body) = send(&app, Method::PUT, "/edit/P001", Some(json!({"weight": "heavy"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("weight"));

    let (_, body) = send(&app, Method::GET, "/patient/P001", None).await;
    assert_eq!(body["weight"], 70.0);
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = test_app(&temp_dir);

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/edit/{id}"]["put"].is_object());
    assert!(body["paths"]["/sort"]["get"].is_object());
}
