//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible match states during development.
//! These checks are compiled out in release builds.

use crate::models::{Lineup, MatchState, PlayerId, SetScore, MAX_SETS, MAX_TIMEOUTS_PER_SET};

/// Validate that a lineup holds each player once and at most one libero
pub fn assert_lineup_invariants(lineup: &Lineup, libero: Option<PlayerId>) {
    let on_court: Vec<PlayerId> = lineup.on_court().collect();
    for (i, id) in on_court.iter().enumerate() {
        debug_assert!(
            !on_court[i + 1..].contains(id),
            "Player {} occupies more than one slot",
            id
        );
    }

    debug_assert!(
        lineup.libero_count() <= 1,
        "Lineup has {} libero slots",
        lineup.libero_count()
    );

    // A libero slot always remembers who it replaced and holds the designated libero
    for slot in lineup.slots().iter().filter(|s| s.is_libero()) {
        debug_assert!(
            slot.original_player_id.is_some(),
            "Libero slot without a displaced player"
        );
        debug_assert!(
            libero.is_some() && slot.player_id == libero,
            "Libero slot holds {:?} but the libero is {:?}",
            slot.player_id,
            libero
        );
    }
}

/// Validate a single set's bookkeeping
pub fn assert_set_invariants(set: &SetScore) {
    debug_assert!(
        (1..=MAX_SETS).contains(&set.set),
        "Set number {} out of range",
        set.set
    );
    debug_assert!(
        set.timeouts.len() <= MAX_TIMEOUTS_PER_SET,
        "Set {} has {} timeouts",
        set.set,
        set.timeouts.len()
    );
}

/// Validate that a match state is internally consistent
pub fn assert_match_invariants(state: &MatchState) {
    debug_assert!(
        !state.sets.is_empty() && state.sets.len() <= MAX_SETS as usize,
        "Match {} has {} sets",
        state.id,
        state.sets.len()
    );

    // Sets are numbered 1..=n in order
    for (i, set) in state.sets.iter().enumerate() {
        debug_assert!(
            set.set as usize == i + 1,
            "Match {} set at position {} is numbered {}",
            state.id,
            i,
            set.set
        );
        assert_set_invariants(set);
    }

    debug_assert!(
        state.current().is_some(),
        "Match {} points at missing set {}",
        state.id,
        state.current_set
    );

    for id in state.lineup.on_court() {
        debug_assert!(
            state.has_player(id),
            "Match {} has unknown player {} on court",
            state.id,
            id
        );
    }

    assert_lineup_invariants(&state.lineup, state.libero_player);
}
