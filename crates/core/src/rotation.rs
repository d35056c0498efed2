//! Rotation and libero substitution
//!
//! On a side-out every player moves one court position on (2 → 1, 1 → 6, 6 → 5,
//! 5 → 4, 4 → 3, 3 → 2). The libero then comes in for a middle arriving at
//! position 6 and goes back out when it reaches position 4.

use crate::models::{
    Lineup, LineupSlot, PlayerId, Role, COURT_SLOTS, LIBERO_ENTRY_SLOT, LIBERO_EXIT_SLOT,
};

/// Source slot for each destination slot after one rotation
const ROTATION_SOURCES: [usize; COURT_SLOTS] = [3, 0, 1, 4, 5, 2];

/// Libero movement caused by a rotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiberoChange {
    /// Middle the libero replaced at back middle
    pub entered_for: Option<PlayerId>,
    /// Player who came back on for the libero at front left
    pub restored: Option<PlayerId>,
}

impl LiberoChange {
    pub fn is_empty(&self) -> bool {
        self.entered_for.is_none() && self.restored.is_none()
    }
}

/// Move every occupant one position on in serve order
pub fn rotate(lineup: &mut Lineup) {
    let old = lineup.0.clone();
    for (dest, &src) in ROTATION_SOURCES.iter().enumerate() {
        lineup.0[dest] = old[src].clone();
    }
}

/// Swap the libero out at front left and in for a middle at back middle
pub fn apply_libero_rule(lineup: &mut Lineup, libero: Option<PlayerId>) -> LiberoChange {
    let mut change = LiberoChange::default();

    let exit = &lineup.0[LIBERO_EXIT_SLOT];
    if exit.is_libero() {
        if let Some(original) = exit.original_player_id {
            lineup.0[LIBERO_EXIT_SLOT] = LineupSlot {
                player_id: Some(original),
                role: Some(Role::Middle),
                original_player_id: None,
            };
            change.restored = Some(original);
        }
    }

    let Some(libero) = libero else {
        return change;
    };

    let entry = &lineup.0[LIBERO_ENTRY_SLOT];
    let displaced = match entry.player_id {
        Some(id) if entry.role == Some(Role::Middle) && id != libero => id,
        _ => return change,
    };
    if lineup.libero_count() > 0 || lineup.contains_player(libero) {
        return change;
    }

    lineup.0[LIBERO_ENTRY_SLOT] = LineupSlot {
        player_id: Some(libero),
        role: Some(Role::Libero),
        original_player_id: Some(displaced),
    };
    change.entered_for = Some(displaced);
    change
}

/// Rotate after a side-out, then apply the libero rule
pub fn side_out(lineup: &mut Lineup, libero: Option<PlayerId>) -> LiberoChange {
    rotate(lineup);
    apply_libero_rule(lineup, libero)
}
