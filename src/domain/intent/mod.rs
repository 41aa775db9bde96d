//! Intent module - What the user asked for and how to help them spell it.

mod intent;
mod spelling;

pub use intent::{IntentName, IntentRequest, IntentSlots};
pub use spelling::{edit_distance, SpellingCorrector, DEFAULT_MAX_DISTANCE};
