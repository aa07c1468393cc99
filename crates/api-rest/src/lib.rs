//! # API REST
//!
//! REST API implementation for the patient records service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (status codes, JSON error bodies, CORS, request tracing)
//!
//! All record semantics live in `pms-core`; handlers only translate between HTTP and
//! [`PatientService`] calls.

#![warn(rust_2018_idioms)]

mod error;
mod handlers;
pub mod wire;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pms_core::{CoreConfig, JsonFileStore, PatientService};

pub use error::ApiError;

/// Application state shared across REST API handlers
///
/// Holds the single `PatientService` built at startup. The service keeps no in-memory
/// records, so sharing it does not share data between requests.
#[derive(Clone)]
pub struct AppState {
    patient_service: Arc<PatientService<JsonFileStore>>,
}

impl AppState {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            patient_service: Arc::new(PatientService::new(JsonFileStore::new(
                cfg.records_file(),
            ))),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::banner,
        handlers::about,
        handlers::health,
        handlers::view_patients,
        handlers::view_patient,
        handlers::sort_patients,
        handlers::create_patient,
        handlers::update_patient,
        handlers::delete_patient,
    ),
    components(schemas(
        wire::MessageRes,
        wire::HealthRes,
        wire::ErrorRes,
        wire::FieldErrorRes,
        wire::PatientListRes,
        pms_core::PatientDraft,
        pms_core::PatientUpdate,
        pms_core::PatientView,
        pms_core::Gender,
        pms_core::Verdict,
    ))
)]
pub struct ApiDoc;

/// Build the REST router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::banner))
        .route("/about", get(handlers::about))
        .route("/health", get(handlers::health))
        .route("/view", get(handlers::view_patients))
        .route("/patient/:id", get(handlers::view_patient))
        .route("/sort", get(handlers::sort_patients))
        .route("/create", post(handlers::create_patient))
        .route("/edit/:id", put(handlers::update_patient))
        .route("/delete/:id", delete(handlers::delete_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve the REST API until the server stops.
///
/// # Errors
/// Returns an error if the address cannot be bound or the HTTP server fails while running.
pub async fn serve(addr: &str, cfg: &CoreConfig) -> anyhow::Result<()> {
    let app = router(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- Starting PMS REST API on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
