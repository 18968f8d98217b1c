//! Wire envelope exchanged with WebSocket clients.

use crate::models::TournamentState;
use serde::{Deserialize, Serialize};

/// `{"type":"update","text":..}` or `{"type":"tournament","tournament":..}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Free-form shared text.
    Update {
        #[serde(default)]
        text: String,
    },
    /// Replace the tournament with this snapshot, verbatim.
    Tournament { tournament: TournamentState },
}

impl Envelope {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
