//! Player model - a member of the roster

use serde::{Deserialize, Serialize};

/// Unique identifier for a player (time-derived when created on the roster)
pub type PlayerId = u64;

/// A player on the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Shirt number, kept as text ("07" and "7" are different shirts)
    pub number: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            number: number.into(),
        }
    }

    /// Short label used in listings, e.g. `#7 Anouk`
    pub fn label(&self) -> String {
        format!("#{} {}", self.number, self.name)
    }
}
