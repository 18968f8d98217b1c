//! Player data structure. An empty name marks a bye slot.

use serde::{Deserialize, Serialize};

/// Identifier for a player. Assigned monotonically, never reused within a tournament.
pub type PlayerId = u32;

/// A competitor (or a bye slot when `name` is empty).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a player with the given id and name.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Create a bye slot (empty name).
    pub fn bye(id: PlayerId) -> Self {
        Self::new(id, "")
    }

    /// True if this is a bye slot rather than a real competitor.
    pub fn is_bye(&self) -> bool {
        self.name.is_empty()
    }
}
