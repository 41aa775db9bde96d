//! HTTP adapter for the conversational interface.
//!
//! Exposes the intent router over HTTP:
//! - `POST /lex` - Handle one Lex V2 fulfillment event
//! - `GET /health` - Liveness check

mod dto;
mod handlers;
mod routes;

pub use dto::{
    LexEvent, LexIntent, LexMessage, LexResponse, LexSessionState, LexSlot, LexSlotValue,
    ResponseIntent, ResponseSessionState, DialogAction, FULFILLED_INTENT_NAME,
};
pub use handlers::{handle_lex_event, health, LexHandlers};
pub use routes::lex_routes;
