//! Router assembly.

use super::{handlers, state::AppState};
use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE, header::InvalidHeaderValue},
    routing::{get, post, put},
};
use mockable::Clock;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Errors raised while assembling the router.
#[derive(Debug, Error)]
pub enum RouterSetupError {
    /// The configured CORS origin is not a valid header value.
    #[error("invalid CORS origin: {0}")]
    InvalidOrigin(#[from] InvalidHeaderValue),
}

/// Builds the CORS layer. Any origin is allowed when none is configured.
///
/// # Errors
///
/// Returns [`RouterSetupError::InvalidOrigin`] for a malformed origin.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, RouterSetupError> {
    let Some(allowed) = origin else {
        return Ok(CorsLayer::permissive());
    };
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(allowed)?)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE]))
}

/// Builds the application router.
pub fn router<C>(state: AppState<C>, cors: CorsLayer) -> Router
where
    C: Clock + Send + Sync + 'static,
{
    let kanban = Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks::<C>).post(handlers::create_task::<C>),
        )
        .route("/tasks/{task_id}", get(handlers::get_task::<C>))
        .route("/tasks/{task_id}/start", post(handlers::start_task::<C>))
        .route("/tasks/{task_id}/pause", post(handlers::pause_task::<C>))
        .route("/tasks/{task_id}/finish", post(handlers::finish_task::<C>))
        .route("/tasks/{task_id}/status", put(handlers::set_status::<C>))
        .route("/tasks/{task_id}/history", get(handlers::task_history::<C>))
        .route(
            "/tasks/{task_id}/consumos",
            post(handlers::record_consumption::<C>),
        )
        .route(
            "/tasks/{task_id}/incidencias",
            post(handlers::report_incident::<C>),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/kanban", kanban)
        .route("/api/reports/tiempos", get(handlers::time_report::<C>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
