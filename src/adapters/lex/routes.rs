//! HTTP routes for the conversational endpoints.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers::{handle_lex_event, health, LexHandlers};

/// Creates the router with all endpoints.
///
/// `request_timeout` bounds a whole request, so it must exceed the build
/// polling budget.
pub fn lex_routes(handlers: LexHandlers, request_timeout: Duration) -> Router {
    Router::new()
        .route("/lex", post(handle_lex_event))
        .route("/health", get(health))
        .with_state(handlers)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
