// --- File: crates/services/consult_backend/src/lib.rs ---

pub mod app_state; // Shared state for all routers
pub mod auth_routes; // Unified /api/auth registration

use axum::{routing::get, Router};
use consult_config::CorsConfig;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use app_state::AppState;

/// Plain-text answer of `GET /`.
pub const BANNER: &str =
    "Student–Lecturer Consultation API (no admin, images removed; DB only for basic data)";

/// Assembles the full application: `/api/student`, `/api/lecturer`,
/// `/api/auth`, the banner and (with `openapi`) Swagger UI at `/api/docs`.
pub fn build_app(state: AppState) -> Router {
    let api_router = Router::new()
        .nest("/student", consult_student::routes(state.student_state()))
        .nest("/lecturer", consult_lecturer::routes(state.lecturer_state()))
        .nest("/auth", auth_routes::routes(state.clone()));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new()
        .route("/", get(|| async { BANNER }))
        .nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        app = app.merge(swagger_ui());
    }

    app.layer(cors_layer(&state.config.cors))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when none are configured, otherwise only the listed ones.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();
    info!("CORS restricted to {} origin(s)", origins.len());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(feature = "openapi")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use consult_lecturer::doc::LecturerApiDoc;
    use consult_student::doc::StudentApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Consultation API",
            version = "0.1.0",
            description = "Student and lecturer consultation bookings"
        ),
        tags((name = "Auth", description = "Registration for either role"))
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(StudentApiDoc::openapi());
    openapi_doc.merge(LecturerApiDoc::openapi());
    info!("Adding Swagger UI at /api/docs");

    SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc)
}
