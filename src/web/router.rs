//! Router configuration for the forum pages.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    index, login_form, login_submit, logout, new_thread_form, new_thread_submit, register_form,
    register_submit, reply_submit, view_category, view_thread, AppState,
};
use super::middleware::{security_headers, session_context};

/// Create the main page router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/category/:id", get(view_category))
        .route("/thread/:id", get(view_thread))
        .route("/new-thread", get(new_thread_form).post(new_thread_submit))
        .route("/reply", post(reply_submit))
        .route("/login", get(login_form).post(login_submit))
        .route("/register", get(register_form).post(register_submit))
        .route("/logout", get(logout))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    session_context,
                )),
        )
        .with_state(state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
