//! Rally and set scoring
//!
//! A set is won at 25 points (15 in the deciding fifth set) with a two point margin.
//! Once either side has won, further rallies leave the set untouched.

use crate::models::{SetScore, Team, MAX_SETS, MAX_TIMEOUTS_PER_SET};

/// Points needed to win a set
pub fn win_threshold(set_number: u8) -> u32 {
    if set_number == MAX_SETS {
        15
    } else {
        25
    }
}

/// Result of recording a rally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RallyOutcome {
    /// The set was already decided; nothing changed
    Ignored,
    /// The score changed
    Scored {
        /// We won the rally while the opponent was serving
        side_out: bool,
        /// Winner of the set if this rally decided it
        set_winner: Option<Team>,
    },
}

impl RallyOutcome {
    pub fn is_side_out(&self) -> bool {
        matches!(self, RallyOutcome::Scored { side_out: true, .. })
    }

    pub fn set_winner(&self) -> Option<Team> {
        match self {
            RallyOutcome::Scored { set_winner, .. } => *set_winner,
            RallyOutcome::Ignored => None,
        }
    }
}

impl SetScore {
    pub fn win_threshold(&self) -> u32 {
        win_threshold(self.set)
    }

    /// `team` reached the threshold with a two point lead
    pub fn has_won(&self, team: Team) -> bool {
        let own = self.score(team);
        let other = self.score(team.opponent());
        own >= self.win_threshold() && own >= other.saturating_add(2)
    }

    pub fn winner(&self) -> Option<Team> {
        [Team::Us, Team::Them]
            .into_iter()
            .find(|team| self.has_won(*team))
    }

    pub fn is_concluded(&self) -> bool {
        self.winner().is_some()
    }

    /// Add `delta` points to `team`, floored at zero, and hand it the serve
    pub fn record_rally(&mut self, team: Team, delta: i32) -> RallyOutcome {
        if self.is_concluded() {
            return RallyOutcome::Ignored;
        }

        let side_out = team == Team::Us && delta > 0 && self.last_scorer == Some(Team::Them);
        let score = match team {
            Team::Us => &mut self.us,
            Team::Them => &mut self.them,
        };
        *score = (i64::from(*score) + i64::from(delta)).clamp(0, i64::from(u32::MAX)) as u32;
        self.last_scorer = Some(team);

        RallyOutcome::Scored {
            side_out,
            set_winner: self.winner(),
        }
    }

    /// Log a timeout at the current score; false once both are used
    pub fn record_timeout(&mut self) -> bool {
        if self.timeouts.len() >= MAX_TIMEOUTS_PER_SET {
            return false;
        }
        self.timeouts.push(self.score_label());
        true
    }

    /// Scoreboard hint: the target score, or `±2pt` when the set may go to deuce
    pub fn target_hint(&self) -> &'static str {
        let (near, target) = if self.set == MAX_SETS {
            (13, "→15")
        } else {
            (24, "→25")
        };
        if self.us >= near || self.them >= near {
            "±2pt"
        } else {
            target
        }
    }
}
