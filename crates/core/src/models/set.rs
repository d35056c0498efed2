//! Set model - one game within a match

use serde::{Deserialize, Serialize};

use super::Team;

/// Highest set number in a match
pub const MAX_SETS: u8 = 5;

/// Timeouts each team may log per set
pub const MAX_TIMEOUTS_PER_SET: usize = 2;

/// Score and serve state of a single set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScore {
    /// Set number 1..=5
    pub set: u8,
    #[serde(default)]
    pub us: u32,
    #[serde(default)]
    pub them: u32,
    /// Score snapshots (`"us-them"`) at which timeouts were called
    #[serde(default)]
    pub timeouts: Vec<String>,
    /// Winner of the latest rally, i.e. the serving team
    #[serde(default)]
    pub last_scorer: Option<Team>,
}

impl SetScore {
    pub fn new(set: u8) -> Self {
        Self {
            set,
            us: 0,
            them: 0,
            timeouts: Vec::new(),
            last_scorer: None,
        }
    }

    pub fn score(&self, team: Team) -> u32 {
        match team {
            Team::Us => self.us,
            Team::Them => self.them,
        }
    }

    /// Score as shown on the board, e.g. `21-19`
    pub fn score_label(&self) -> String {
        format!("{}-{}", self.us, self.them)
    }

    /// Nothing has been recorded in this set yet
    pub fn is_untouched(&self) -> bool {
        self.us == 0 && self.them == 0 && self.timeouts.is_empty() && self.last_scorer.is_none()
    }
}
