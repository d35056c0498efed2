//! Team side of a rally

use serde::{Deserialize, Serialize};

/// Which side of the net won a rally or a set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// The team keeping score
    Us,
    /// The opponent
    Them,
}

impl Team {
    pub fn opponent(&self) -> Self {
        match self {
            Team::Us => Team::Them,
            Team::Them => Team::Us,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Us => "us",
            Team::Them => "them",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "us" | "wij" => Some(Team::Us),
            "them" | "zij" => Some(Team::Them),
            _ => None,
        }
    }
}
