//! Lex V2 event and response DTOs.
//!
//! Only the fields the bot reads are modelled on the way in. Every field
//! is optional so partial events still deserialize.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::intent::{IntentRequest, IntentSlots};

/// Intent name reported on every response.
pub const FULFILLED_INTENT_NAME: &str = "JenkinsOperations";

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Inbound fulfillment event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexEvent {
    #[serde(default)]
    pub session_state: LexSessionState,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexSessionState {
    #[serde(default)]
    pub intent: Option<LexIntent>,
    #[serde(default)]
    pub session_attributes: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexIntent {
    #[serde(default)]
    pub name: String,
    /// Slot name to slot; Lex sends `null` for unfilled slots.
    #[serde(default)]
    pub slots: HashMap<String, Option<LexSlot>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexSlot {
    #[serde(default)]
    pub value: Option<LexSlotValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexSlotValue {
    #[serde(default)]
    pub interpreted_value: Option<String>,
}

impl LexEvent {
    /// Interpreted value of a slot, if filled.
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.session_state
            .intent
            .as_ref()?
            .slots
            .get(name)?
            .as_ref()?
            .value
            .as_ref()?
            .interpreted_value
            .as_deref()
    }

    pub fn intent_name(&self) -> &str {
        self.session_state
            .intent
            .as_ref()
            .map_or("", |intent| intent.name.as_str())
    }

    /// Session attributes to echo back; empty when absent.
    pub fn session_attributes(&self) -> Map<String, Value> {
        self.session_state
            .session_attributes
            .clone()
            .unwrap_or_default()
    }

    /// Reduces the event to what the router needs.
    pub fn to_intent_request(&self) -> IntentRequest {
        let mut slots = IntentSlots::new();
        if let Some(value) = self.slot("JobName") {
            slots = slots.with_job_name(value);
        }
        if let Some(value) = self.slot("JobType") {
            slots = slots.with_job_type(value);
        }
        if let Some(value) = self.slot("GitHubRepoUrl") {
            slots = slots.with_repository_url(value);
        }
        if let Some(value) = self.slot("Confirmation") {
            slots = slots.with_confirmation(value);
        }
        IntentRequest::new(self.intent_name(), slots)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Outbound response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexResponse {
    pub session_state: ResponseSessionState,
    pub messages: Vec<LexMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSessionState {
    pub dialog_action: DialogAction,
    pub intent: ResponseIntent,
    pub session_attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogAction {
    #[serde(rename = "type")]
    pub action_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseIntent {
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexMessage {
    pub content_type: String,
    pub content: String,
}

impl LexResponse {
    /// A fulfilled turn carrying one plain-text message.
    pub fn plain_text(message: impl Into<String>, session_attributes: Map<String, Value>) -> Self {
        Self {
            session_state: ResponseSessionState {
                dialog_action: DialogAction {
                    action_type: "ElicitIntent".to_string(),
                },
                intent: ResponseIntent {
                    name: FULFILLED_INTENT_NAME.to_string(),
                    state: "Fulfilled".to_string(),
                },
                session_attributes,
            },
            messages: vec![LexMessage {
                content_type: "PlainText".to_string(),
                content: message.into(),
            }],
        }
    }
}
