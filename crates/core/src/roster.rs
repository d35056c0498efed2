//! Roster and lineup management
//!
//! Keeps the lineup consistent with the roster: a player sits in at most one
//! slot, the libero never takes a regular slot, and removing a player clears
//! every reference to them.

use crate::error::{Error, Result};
use crate::models::{
    LineupSlot, MatchState, Player, PlayerId, Role, COURT_SLOTS, DEFAULT_SLOT_ROLES,
};

/// Next free time-derived player id, strictly above every id on the roster
pub fn next_player_id(state: &MatchState, now_millis: i64) -> PlayerId {
    let floor = state.all_players.iter().map(|p| p.id + 1).max().unwrap_or(0);
    (now_millis.max(0) as PlayerId).max(floor)
}

fn check_slot(index: usize) -> Result<()> {
    if index >= COURT_SLOTS {
        return Err(Error::InvalidOperation(format!(
            "Slot {} does not exist (0..{})",
            index, COURT_SLOTS
        )));
    }
    Ok(())
}

fn check_on_roster(state: &MatchState, player_id: PlayerId) -> Result<()> {
    if !state.has_player(player_id) {
        return Err(Error::NotFound(format!("Player {}", player_id)));
    }
    Ok(())
}

/// The player is off court only while the libero replaces them
fn is_displaced(state: &MatchState, player_id: PlayerId) -> bool {
    state
        .lineup
        .slots()
        .iter()
        .any(|s| s.is_libero() && s.original_player_id == Some(player_id))
}

fn check_not_displaced(state: &MatchState, player_id: PlayerId) -> Result<()> {
    if is_displaced(state, player_id) {
        return Err(Error::InvalidOperation(format!(
            "Player {} is replaced by the libero and returns by rotation",
            player_id
        )));
    }
    Ok(())
}

/// Add a player with a trimmed, non-empty name and shirt number
pub fn add_player(state: &mut MatchState, name: &str, number: &str, now_millis: i64) -> Result<PlayerId> {
    let name = name.trim();
    let number = number.trim();
    if name.is_empty() || number.is_empty() {
        return Err(Error::InvalidOperation(
            "A player needs both a name and a number".into(),
        ));
    }

    let id = next_player_id(state, now_millis);
    state.all_players.push(Player::new(id, name, number));
    state.player_stats.entry(id).or_insert(0);
    Ok(id)
}

/// Remove a player and every lineup, libero and counter reference to them
pub fn remove_player(state: &mut MatchState, player_id: PlayerId) -> Result<Player> {
    let index = state
        .all_players
        .iter()
        .position(|p| p.id == player_id)
        .ok_or_else(|| Error::NotFound(format!("Player {}", player_id)))?;

    let player = state.all_players.remove(index);
    state.player_stats.remove(&player_id);
    if state.libero_player == Some(player_id) {
        withdraw_libero(state);
        state.libero_player = None;
    }
    state.lineup.clear_player(player_id);
    Ok(player)
}

/// Put a player (or nobody) in a slot
///
/// A player given without a role gets the slot's default 5-1 role.
pub fn assign_slot(
    state: &mut MatchState,
    index: usize,
    player_id: Option<PlayerId>,
    role: Option<Role>,
) -> Result<()> {
    check_slot(index)?;
    if role == Some(Role::Libero) {
        return Err(Error::InvalidOperation(
            "The libero role is handed out by rotation".into(),
        ));
    }

    let Some(player_id) = player_id else {
        state.lineup.0[index] = LineupSlot {
            player_id: None,
            role,
            original_player_id: None,
        };
        return Ok(());
    };

    check_on_roster(state, player_id)?;
    if state.libero_player == Some(player_id) {
        return Err(Error::InvalidOperation(
            "The libero cannot take a regular slot".into(),
        ));
    }
    if let Some(other) = state.lineup.index_of(player_id) {
        if other != index {
            return Err(Error::InvalidOperation(format!(
                "Player {} already plays in slot {}",
                player_id, other
            )));
        }
    }
    check_not_displaced(state, player_id)?;

    let role = role.or(Some(DEFAULT_SLOT_ROLES[index]));
    state.lineup.0[index] = LineupSlot::assigned(player_id, role);
    Ok(())
}

/// Put the middle the libero stands in for back on court
fn withdraw_libero(state: &mut MatchState) {
    for slot in state.lineup.0.iter_mut().filter(|s| s.is_libero()) {
        *slot = slot.without_libero();
    }
}

/// Designate the libero, or clear it with `None`
///
/// A libero on court when the designation changes gives the slot back to the
/// middle it replaced.
pub fn set_libero(state: &mut MatchState, player_id: Option<PlayerId>) -> Result<()> {
    if let Some(id) = player_id {
        check_on_roster(state, id)?;
        if state.lineup.contains_player(id) && state.libero_player != Some(id) {
            return Err(Error::InvalidOperation(format!(
                "Player {} is on court and cannot be the libero",
                id
            )));
        }
    }
    if state.libero_player != player_id {
        withdraw_libero(state);
    }
    state.libero_player = player_id;
    Ok(())
}

/// Bring a bench player on in a slot, keeping the slot's role
pub fn substitute(state: &mut MatchState, index: usize, bench_player: PlayerId) -> Result<PlayerId> {
    check_slot(index)?;
    check_on_roster(state, bench_player)?;

    if state.libero_player == Some(bench_player) {
        return Err(Error::InvalidOperation(
            "The libero comes on by rotation, not by substitution".into(),
        ));
    }
    if state.lineup.contains_player(bench_player) {
        return Err(Error::InvalidOperation(format!(
            "Player {} is already on court",
            bench_player
        )));
    }

    check_not_displaced(state, bench_player)?;

    let slot = &state.lineup.0[index];
    if slot.is_libero() {
        return Err(Error::InvalidOperation(
            "The libero leaves the court by rotation".into(),
        ));
    }
    let outgoing = slot
        .player_id
        .ok_or_else(|| Error::InvalidOperation(format!("Slot {} is empty", index)))?;
    let role = slot.role;

    state.lineup.0[index] = LineupSlot::assigned(bench_player, role);
    Ok(outgoing)
}

/// Players free to come on: not on court, not the libero, not replaced by the libero
pub fn bench(state: &MatchState) -> Vec<&Player> {
    state
        .all_players
        .iter()
        .filter(|p| {
            !state.lineup.contains_player(p.id)
                && state.libero_player != Some(p.id)
                && !is_displaced(state, p.id)
        })
        .collect()
}

/// Roster ordered by sets played, most first
pub fn playing_time(state: &MatchState) -> Vec<(&Player, u32)> {
    let mut rows: Vec<(&Player, u32)> = state
        .all_players
        .iter()
        .map(|p| (p, state.player_stats.get(&p.id).copied().unwrap_or(0)))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn roster(count: usize) -> (MatchState, Vec<PlayerId>) {
        let mut state = MatchState::new(NOW);
        let ids = (0..count)
            .map(|i| add_player(&mut state, &format!("Player {}", i), &i.to_string(), NOW).unwrap())
            .collect();
        (state, ids)
    }

    #[test]
    fn test_add_player_ids_are_unique() {
        let (state, ids) = roster(3);
        assert_eq!(ids, vec![NOW as u64, NOW as u64 + 1, NOW as u64 + 2]);
        assert_eq!(state.player_stats.len(), 3);
    }

    #[test]
    fn test_add_player_requires_name_and_number() {
        let mut state = MatchState::new(NOW);
        assert!(add_player(&mut state, "  ", "4", NOW).is_err());
        assert!(add_player(&mut state, "Eva", "", NOW).is_err());

        let id = add_player(&mut state, "  Eva ", " 4 ", NOW).unwrap();
        let player = state.player(id).unwrap();
        assert_eq!(player.name, "Eva");
        assert_eq!(player.number, "4");
    }

    #[test]
    fn test_assign_defaults_role() {
        let (mut state, ids) = roster(2);
        assign_slot(&mut state, 1, Some(ids[0]), None).unwrap();
        assign_slot(&mut state, 5, Some(ids[1]), Some(Role::Opposite)).unwrap();

        assert_eq!(state.lineup.slots()[1].role, Some(Role::Middle));
        assert_eq!(state.lineup.slots()[1].original_player_id, Some(ids[0]));
        assert_eq!(state.lineup.slots()[5].role, Some(Role::Opposite));
    }

    #[test]
    fn test_assign_rejects_duplicates_and_libero() {
        let (mut state, ids) = roster(2);
        assign_slot(&mut state, 0, Some(ids[0]), None).unwrap();
        assert!(assign_slot(&mut state, 1, Some(ids[0]), None).is_err());
        // Re-assigning the same slot is fine
        assign_slot(&mut state, 0, Some(ids[0]), Some(Role::Setter)).unwrap();

        set_libero(&mut state, Some(ids[1])).unwrap();
        assert!(assign_slot(&mut state, 2, Some(ids[1]), None).is_err());
        assert!(assign_slot(&mut state, 2, Some(999), None).is_err());
        assert!(assign_slot(&mut state, 6, Some(ids[0]), None).is_err());
    }

    #[test]
    fn test_libero_role_cannot_be_assigned() {
        let (mut state, ids) = roster(1);
        assert!(assign_slot(&mut state, 2, None, Some(Role::Libero)).is_err());
        assert!(assign_slot(&mut state, 2, Some(ids[0]), Some(Role::Libero)).is_err());
        assert_eq!(state.lineup.slots()[2], LineupSlot::default());
        assert_eq!(state.lineup.libero_count(), 0);

        // An empty slot may still carry a regular role
        assign_slot(&mut state, 2, None, Some(Role::Setter)).unwrap();
        assert_eq!(state.lineup.slots()[2].role, Some(Role::Setter));
    }

    #[test]
    fn test_libero_cannot_be_on_court() {
        let (mut state, ids) = roster(1);
        assign_slot(&mut state, 0, Some(ids[0]), None).unwrap();
        assert!(set_libero(&mut state, Some(ids[0])).is_err());
        set_libero(&mut state, None).unwrap();
    }

    #[test]
    fn test_remove_player_clears_references() {
        let (mut state, ids) = roster(3);
        assign_slot(&mut state, 0, Some(ids[0]), None).unwrap();
        assign_slot(&mut state, 4, Some(ids[1]), None).unwrap();
        set_libero(&mut state, Some(ids[2])).unwrap();
        crate::rotation::apply_libero_rule(&mut state.lineup, state.libero_player);
        assert!(state.lineup.contains_player(ids[2]));

        remove_player(&mut state, ids[0]).unwrap();
        remove_player(&mut state, ids[2]).unwrap();

        assert!(state.lineup.slots()[0].is_empty());
        assert_eq!(state.lineup.slots()[4].player_id, Some(ids[1]));
        assert_eq!(state.lineup.slots()[4].role, Some(Role::Middle));
        assert_eq!(state.lineup.libero_count(), 0);
        assert_eq!(state.libero_player, None);
        assert!(!state.player_stats.contains_key(&ids[0]));
        assert!(remove_player(&mut state, ids[0]).is_err());
    }

    #[test]
    fn test_clearing_libero_restores_middle() {
        let (mut state, ids) = roster(2);
        assign_slot(&mut state, 4, Some(ids[0]), None).unwrap();
        set_libero(&mut state, Some(ids[1])).unwrap();
        crate::rotation::apply_libero_rule(&mut state.lineup, state.libero_player);
        assert_eq!(state.lineup.slots()[4].player_id, Some(ids[1]));

        set_libero(&mut state, None).unwrap();
        assert_eq!(state.lineup.slots()[4].player_id, Some(ids[0]));
        assert_eq!(state.lineup.slots()[4].role, Some(Role::Middle));
        assert_eq!(state.lineup.libero_count(), 0);
    }

    #[test]
    fn test_displaced_middle_stays_off_until_rotation() {
        let (mut state, ids) = roster(3);
        assign_slot(&mut state, 4, Some(ids[0]), None).unwrap();
        set_libero(&mut state, Some(ids[1])).unwrap();
        crate::rotation::apply_libero_rule(&mut state.lineup, state.libero_player);

        assert!(assign_slot(&mut state, 2, Some(ids[0]), None).is_err());
        assert!(substitute(&mut state, 4, ids[2]).is_err());
        let bench_ids: Vec<PlayerId> = bench(&state).iter().map(|p| p.id).collect();
        assert_eq!(bench_ids, vec![ids[2]]);
    }

    #[test]
    fn test_substitute_keeps_role() {
        let (mut state, ids) = roster(3);
        assign_slot(&mut state, 2, Some(ids[0]), None).unwrap();

        let outgoing = substitute(&mut state, 2, ids[1]).unwrap();
        assert_eq!(outgoing, ids[0]);
        assert_eq!(state.lineup.slots()[2].player_id, Some(ids[1]));
        assert_eq!(state.lineup.slots()[2].role, Some(Role::PasserRunner));
        assert_eq!(bench(&state).len(), 2);

        assert!(substitute(&mut state, 3, ids[2]).is_err());
        assert!(substitute(&mut state, 2, ids[1]).is_err());
    }

    #[test]
    fn test_playing_time_order() {
        let (mut state, ids) = roster(3);
        state.player_stats.insert(ids[1], 3);
        state.player_stats.insert(ids[2], 1);

        let order: Vec<PlayerId> = playing_time(&state).iter().map(|(p, _)| p.id).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);
    }
}
