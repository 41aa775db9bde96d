//! HTTP handlers for the conversational endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::IntentRouter;

use super::dto::{LexEvent, LexResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct LexHandlers {
    router: Arc<IntentRouter>,
}

impl LexHandlers {
    pub fn new(router: Arc<IntentRouter>) -> Self {
        Self { router }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /lex - Handle one fulfillment event
///
/// Always answers 200 with an envelope; failures are part of the message.
pub async fn handle_lex_event(
    State(handlers): State<LexHandlers>,
    Json(event): Json<LexEvent>,
) -> Json<LexResponse> {
    let request = event.to_intent_request();
    let span = tracing::info_span!(
        "lex_invocation",
        invocation_id = %Uuid::new_v4(),
        intent = %request.intent,
    );

    let message = async {
        tracing::debug!(slots = ?request.slots, "Routing intent");
        handlers.router.route(request).await
    }
    .instrument(span)
    .await;

    Json(LexResponse::plain_text(message, event.session_attributes()))
}

/// GET /health - Liveness check
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
