//! Match completion
//!
//! Four sets are always played. A fifth set decides the match only when the
//! first four end 2-2, so a 3-0 lead after three sets still plays a fourth.

use crate::models::{FinalScore, MatchState, SetScore, Team, MAX_SETS};

/// Sets won so far and whether the match is over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStatus {
    pub sets_won_us: u8,
    pub sets_won_them: u8,
    pub is_complete: bool,
}

impl MatchStatus {
    pub fn sets_decided(&self) -> u8 {
        self.sets_won_us + self.sets_won_them
    }

    pub fn final_score(&self) -> FinalScore {
        FinalScore {
            us: self.sets_won_us,
            them: self.sets_won_them,
        }
    }
}

/// Count decided sets and apply the fixed-format-then-decider rule
pub fn evaluate_match_state(sets: &[SetScore]) -> MatchStatus {
    let won_by = |team: Team| sets.iter().filter(|s| s.has_won(team)).count() as u8;
    let sets_won_us = won_by(Team::Us);
    let sets_won_them = won_by(Team::Them);
    let decided = sets_won_us + sets_won_them;

    MatchStatus {
        sets_won_us,
        sets_won_them,
        is_complete: decided == MAX_SETS || (decided == MAX_SETS - 1 && sets_won_us != 2),
    }
}

/// Why a new set could not be started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceBlocked {
    /// The match is already decided
    MatchComplete,
    /// Five sets have been played
    NoSetsLeft,
}

/// Credit a set played to everyone on court and open the next set
///
/// The set in play need not have a winner. Returns the new set number.
pub fn advance_to_next_set(state: &mut MatchState) -> Result<u8, AdvanceBlocked> {
    if evaluate_match_state(&state.sets).is_complete {
        return Err(AdvanceBlocked::MatchComplete);
    }
    let previous = state.sets.iter().map(|s| s.set).max().unwrap_or(0);
    if previous >= MAX_SETS {
        return Err(AdvanceBlocked::NoSetsLeft);
    }

    credit_sets_played(state);

    let next = previous + 1;
    state.sets.push(SetScore::new(next));
    state.current_set = next;
    Ok(next)
}

/// +1 set played for every player currently on court
pub fn credit_sets_played(state: &mut MatchState) {
    let on_court: Vec<_> = state.lineup.on_court().collect();
    for player_id in on_court {
        *state.player_stats.entry(player_id).or_insert(0) += 1;
    }
}
