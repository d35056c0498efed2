//! Match controller
//!
//! Owns the one match in play and the store it is saved to. Every mutation is
//! checked against the debug invariants and autosaved as the active snapshot;
//! a failed save is logged and play continues.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::completion::{self, AdvanceBlocked, MatchStatus};
use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{
    FinalScore, Hit, MatchHistoryRecord, MatchState, OpponentLineup, Player, PlayerId, Role, Team,
};
use crate::roster;
use crate::rotation;
use crate::scoring::RallyOutcome;
use crate::storage::{import_document, KeyValueStore, MatchArchive};

/// Taps on our court at or beyond this depth count as out
const OUR_POINT_MAX_Y: f64 = 96.0;

/// Taps on their court at or above this depth count as out
const SERVICE_MIN_Y: f64 = 4.0;

/// Wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Result of asking for the next set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextSet {
    /// A fresh set is in play
    Advanced(u8),
    /// The match is over and was archived under `archived_key`
    MatchComplete {
        final_score: FinalScore,
        archived_key: Option<String>,
    },
    /// Nothing changed: the set is still running or the match was already over
    Ignored,
}

/// What would be lost by throwing the current match away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardRisk {
    /// No points, hits or timeouts recorded
    Nothing,
    /// Recorded play that is not in the archive
    UnsavedProgress,
    /// The match is complete and archived
    Archived,
}

/// Drives one match against a key/value store
pub struct MatchController<S: KeyValueStore> {
    archive: MatchArchive<S>,
    state: MatchState,
    clock: fn() -> i64,
}

impl<S: KeyValueStore> MatchController<S> {
    /// Resume the saved match, or start a fresh one
    pub fn open(store: S) -> Self {
        Self::with_clock(store, now_millis)
    }

    pub fn with_clock(store: S, clock: fn() -> i64) -> Self {
        let archive = MatchArchive::new(store);
        let state = match archive.load_active() {
            Some(state) => {
                info!(id = %state.id, set = state.current_set, "Resumed match");
                state
            }
            None => {
                let state = MatchState::new(clock());
                info!(id = %state.id, "Started new match");
                state
            }
        };
        Self {
            archive,
            state,
            clock,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn archive(&self) -> &MatchArchive<S> {
        &self.archive
    }

    pub fn status(&self) -> MatchStatus {
        completion::evaluate_match_state(&self.state.sets)
    }

    pub fn is_complete(&self) -> bool {
        self.status().is_complete
    }

    fn autosave(&self) {
        invariants::assert_match_invariants(&self.state);
        if !self.archive.save_active(&self.state) {
            warn!(id = %self.state.id, "Autosave failed; continuing with unsaved state");
        }
    }

    /// One point to `team`
    pub fn record_rally(&mut self, team: Team) -> RallyOutcome {
        self.adjust_score(team, 1)
    }

    /// Add `delta` points to `team`; negative values correct mistakes
    ///
    /// A side-out rotates our lineup before this returns.
    pub fn adjust_score(&mut self, team: Team, delta: i32) -> RallyOutcome {
        if self.is_complete() {
            return RallyOutcome::Ignored;
        }
        let Some(set) = self.state.current_mut() else {
            return RallyOutcome::Ignored;
        };

        let outcome = set.record_rally(team, delta);
        let (set_number, score) = (set.set, set.score_label());
        if outcome == RallyOutcome::Ignored {
            return outcome;
        }

        if outcome.is_side_out() {
            let change = rotation::side_out(&mut self.state.lineup, self.state.libero_player);
            debug!(
                set = set_number,
                score = %score,
                libero_in_for = ?change.entered_for,
                restored = ?change.restored,
                "Side-out rotation"
            );
        }
        if let Some(winner) = outcome.set_winner() {
            info!(set = set_number, score = %score, winner = winner.as_str(), "Set concluded");
        }

        self.autosave();
        outcome
    }

    /// Score a tap on a court diagram
    ///
    /// `Us` taps land on the opponent's court and are kept as our point hits;
    /// `Them` taps land on ours and are kept as service hits. Taps in the out
    /// band, or while the set is decided, change nothing.
    pub fn record_point_at(&mut self, team: Team, x: f64, y: f64) -> Result<RallyOutcome> {
        let hit = Hit::new(x, y, self.state.current_set);
        if !hit.is_on_court() {
            return Err(Error::InvalidOperation(format!(
                "Tap ({}, {}) is outside the court diagram",
                x, y
            )));
        }

        let set_open = self.state.current().is_some_and(|s| !s.is_concluded());
        if self.is_complete() || !set_open {
            return Ok(RallyOutcome::Ignored);
        }

        match team {
            Team::Us if y < OUR_POINT_MAX_Y => self.state.our_point_hits.push(hit),
            Team::Them if y > SERVICE_MIN_Y => self.state.service_hits.push(hit),
            _ => return Ok(RallyOutcome::Ignored),
        }
        Ok(self.record_rally(team))
    }

    /// Log a timeout in the current set; false when none are left
    pub fn record_timeout(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        let logged = self
            .state
            .current_mut()
            .is_some_and(|set| set.record_timeout());
        if logged {
            debug!(set = self.state.current_set, "Timeout");
            self.autosave();
        }
        logged
    }

    /// Finish the current set: open the next one, or close out the match
    pub fn next_set(&mut self) -> NextSet {
        if self.state.is_finished() && self.is_complete() {
            return NextSet::Ignored;
        }

        match completion::advance_to_next_set(&mut self.state) {
            Ok(set) => {
                info!(set, "Next set");
                self.autosave();
                NextSet::Advanced(set)
            }
            Err(AdvanceBlocked::MatchComplete) => self.close_out(),
            Err(blocked) => {
                debug!(?blocked, "Next set refused");
                NextSet::Ignored
            }
        }
    }

    /// Credit the final set and archive the match as complete
    fn close_out(&mut self) -> NextSet {
        completion::credit_sets_played(&mut self.state);
        self.state.end_time = Some((self.clock)());

        let record = MatchHistoryRecord::from_state(&self.state, true);
        let final_score = record.result();
        let archived_key = self.archive.archive(&record);
        info!(
            id = %self.state.id,
            result = %final_score.label(),
            won = final_score.is_won(),
            "Match complete"
        );

        self.autosave();
        NextSet::MatchComplete {
            final_score,
            archived_key,
        }
    }

    fn next_start_time(&self) -> i64 {
        (self.clock)().max(self.state.start_time + 1)
    }

    /// Throw the current match away and start over with the same roster
    pub fn new_match(&mut self) {
        let start = self.next_start_time();
        let next = self.state.rematch(start);
        info!(id = %next.id, discarded = %self.state.id, "New match");
        self.state = next;
        self.autosave();
    }

    /// Archive the current match as unfinished, then start a new one
    pub fn abandon_match(&mut self) -> Option<String> {
        if self.state.end_time.is_none() {
            self.state.end_time = Some((self.clock)());
        }
        let record = MatchHistoryRecord::from_state(&self.state, self.is_complete());
        let key = self.archive.archive(&record);
        info!(id = %self.state.id, key = ?key, "Match abandoned");

        let start = self.next_start_time();
        self.state = self.state.rematch(start);
        self.autosave();
        key
    }

    /// Make an archived match the one in play
    ///
    /// An unfinished match can be resumed; a complete one is read-only.
    pub fn load_from_history(&mut self, record: MatchHistoryRecord) {
        let mut state = record.state;
        state.normalize();
        if !record.is_complete {
            state.end_time = None;
        }
        info!(id = %state.id, complete = record.is_complete, "Loaded match from history");
        self.state = state;
        self.autosave();
    }

    /// Load an archived match by id
    pub fn load_by_id(&mut self, id: &str) -> Result<()> {
        let record = self
            .archive
            .find(id)
            .ok_or_else(|| Error::NotFound(format!("Match {}", id)))?;
        self.load_from_history(record);
        Ok(())
    }

    pub fn discard_risk(&self) -> DiscardRisk {
        if self.state.is_finished() && self.is_complete() {
            DiscardRisk::Archived
        } else if self.state.has_progress() {
            DiscardRisk::UnsavedProgress
        } else {
            DiscardRisk::Nothing
        }
    }

    /// Merge a backup document into the history; the match in play is kept
    pub fn import_backup(&self, document: &str) -> Result<usize> {
        let written = import_document(self.archive.store(), document)?;
        self.archive.refresh_index();
        Ok(written)
    }

    pub fn history(&self) -> Vec<MatchHistoryRecord> {
        self.archive.find_all()
    }

    pub fn delete_from_history(&self, id: &str) -> bool {
        let deleted = self.archive.delete(id);
        if deleted {
            info!(id, "Deleted match from history");
        }
        deleted
    }

    pub fn clear_history(&self) -> usize {
        let removed = self.archive.delete_all();
        info!(removed, "Cleared match history");
        removed
    }

    // Roster and lineup

    pub fn add_player(&mut self, name: &str, number: &str) -> Result<PlayerId> {
        let id = roster::add_player(&mut self.state, name, number, (self.clock)())?;
        debug!(id, "Player added");
        self.autosave();
        Ok(id)
    }

    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<Player> {
        let player = roster::remove_player(&mut self.state, player_id)?;
        debug!(id = player_id, "Player removed");
        self.autosave();
        Ok(player)
    }

    pub fn assign_slot(
        &mut self,
        index: usize,
        player_id: Option<PlayerId>,
        role: Option<Role>,
    ) -> Result<()> {
        roster::assign_slot(&mut self.state, index, player_id, role)?;
        self.autosave();
        Ok(())
    }

    pub fn set_libero(&mut self, player_id: Option<PlayerId>) -> Result<()> {
        roster::set_libero(&mut self.state, player_id)?;
        self.autosave();
        Ok(())
    }

    /// Swap a bench player in; returns who came off
    pub fn substitute(&mut self, index: usize, bench_player: PlayerId) -> Result<PlayerId> {
        let outgoing = roster::substitute(&mut self.state, index, bench_player)?;
        info!(slot = index, on = bench_player, off = outgoing, "Substitution");
        self.autosave();
        Ok(outgoing)
    }

    pub fn set_opponent_role(&mut self, index: usize, role: Role) -> Result<()> {
        if !self.state.opponent_lineup.set_role(index, role) {
            return Err(Error::InvalidOperation(format!(
                "Opponent slot {} does not exist",
                index
            )));
        }
        self.autosave();
        Ok(())
    }

    pub fn reset_opponent_lineup(&mut self) {
        self.state.opponent_lineup = OpponentLineup::default();
        self.autosave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineupSlot, ACTIVE_MATCH_KEY, DEFAULT_SLOT_ROLES};
    use crate::storage::{Database, MemoryStore};

    const T0: i64 = 1_700_000_000_000;

    fn fixed_clock() -> i64 {
        T0
    }

    fn controller() -> MatchController<MemoryStore> {
        MatchController::with_clock(MemoryStore::new(), fixed_clock)
    }

    /// Six players in 5-1 order plus a libero
    fn with_team(ctl: &mut MatchController<MemoryStore>) -> (Vec<PlayerId>, PlayerId) {
        let ids: Vec<PlayerId> = (1..=6)
            .map(|n| ctl.add_player(&format!("Player {}", n), &n.to_string()).unwrap())
            .collect();
        for (index, id) in ids.iter().enumerate() {
            ctl.assign_slot(index, Some(*id), Some(DEFAULT_SLOT_ROLES[index]))
                .unwrap();
        }
        let libero = ctl.add_player("Libero", "99").unwrap();
        ctl.set_libero(Some(libero)).unwrap();
        (ids, libero)
    }

    fn win_set(ctl: &mut MatchController<MemoryStore>, team: Team) {
        while !ctl.state().current().unwrap().is_concluded() {
            ctl.record_rally(team);
        }
    }

    #[test]
    fn test_open_starts_fresh_then_resumes() {
        let store = MemoryStore::new();
        {
            let mut ctl = MatchController::with_clock(&store, fixed_clock);
            assert_eq!(ctl.state().start_time, T0);
            ctl.record_rally(Team::Us);
        }

        let ctl = MatchController::with_clock(&store, || T0 + 50);
        assert_eq!(ctl.state().start_time, T0);
        assert_eq!(ctl.state().current().unwrap().us, 1);
    }

    #[test]
    fn test_empty_libero_slot_is_refused() {
        let mut ctl = controller();
        assert!(ctl.assign_slot(2, None, Some(Role::Libero)).is_err());
        ctl.record_rally(Team::Us);
        assert_eq!(ctl.state().lineup.libero_count(), 0);
    }

    #[test]
    fn test_stale_libero_snapshot_is_repaired_on_open() {
        // Libero switched from 2 to 3 while 2 stood in for middle 1, and 7 left the roster
        let snapshot = r#"{
            "currentSet": 1,
            "sets": [{"set": 1, "us": 4, "them": 6, "timeouts": ["2-3"], "lastScorer": "them"}],
            "players": [
                {"id": 1, "name": "Anouk", "number": "7"},
                {"id": 2, "name": "Bram", "number": "12"},
                {"id": 3, "name": "Chris", "number": "3"},
                {"id": 4, "name": "Dana", "number": "9"}
            ],
            "lineup": [
                {"playerId": 4, "role": "Diagonaal", "originalPlayerId": 4},
                {"playerId": 7, "role": "Midden", "originalPlayerId": 7},
                {"playerId": null, "role": null, "originalPlayerId": null},
                {"playerId": null, "role": null, "originalPlayerId": null},
                {"playerId": 2, "role": "Libero", "originalPlayerId": 1},
                {"playerId": null, "role": null, "originalPlayerId": null}
            ],
            "stats": {"1": 0, "2": 0, "3": 0, "4": 0},
            "libero": 3,
            "startTime": 1700000000000,
            "matchId": "match_1700000000000"
        }"#;
        let store = MemoryStore::new();
        store.put(ACTIVE_MATCH_KEY, snapshot);

        let mut ctl = MatchController::with_clock(&store, fixed_clock);
        let lineup = ctl.state().lineup.clone();
        assert_eq!(lineup.libero_count(), 0);
        assert_eq!(lineup.slots()[4].player_id, Some(1));
        assert_eq!(lineup.slots()[4].role, Some(Role::Middle));
        assert!(lineup.slots()[1].is_empty());
        assert_eq!(ctl.state().libero_player, Some(3));

        ctl.record_rally(Team::Us);
        ctl.record_rally(Team::Them);
        ctl.record_rally(Team::Us);
        assert_eq!(ctl.state().current().unwrap().score_label(), "6-7");
    }

    #[test]
    fn test_every_mutation_autosaves() {
        let mut ctl = controller();
        ctl.record_rally(Team::Them);
        ctl.record_timeout();

        let saved = ctl.archive().load_active().unwrap();
        assert_eq!(&saved, ctl.state());
        assert_eq!(saved.current().unwrap().timeouts, vec!["0-1".to_string()]);
    }

    #[test]
    fn test_side_out_rotates_lineup() {
        let mut ctl = controller();
        let (ids, _) = with_team(&mut ctl);

        ctl.record_rally(Team::Them);
        ctl.record_rally(Team::Us);

        let occupants: Vec<Option<PlayerId>> =
            ctl.state().lineup.slots().iter().map(|s| s.player_id).collect();
        assert_eq!(
            occupants,
            vec![
                Some(ids[3]),
                Some(ids[0]),
                Some(ids[1]),
                Some(ids[4]),
                Some(ids[5]),
                Some(ids[2])
            ]
        );
    }

    #[test]
    fn test_consecutive_points_do_not_rotate() {
        let mut ctl = controller();
        with_team(&mut ctl);
        let before = ctl.state().lineup.clone();

        ctl.record_rally(Team::Us);
        ctl.record_rally(Team::Us);
        ctl.record_rally(Team::Them);
        ctl.record_rally(Team::Them);

        assert_eq!(ctl.state().lineup, before);
    }

    #[test]
    fn test_libero_follows_rotations() {
        let mut ctl = controller();
        let (ids, libero) = with_team(&mut ctl);

        for _ in 0..3 {
            ctl.record_rally(Team::Them);
            ctl.record_rally(Team::Us);
        }
        // Middle in slot 1 arrives at position 6
        let slot = &ctl.state().lineup.slots()[4];
        assert_eq!(slot.player_id, Some(libero));
        assert_eq!(slot.original_player_id, Some(ids[1]));
        assert!(roster::bench(ctl.state()).is_empty());
    }

    #[test]
    fn test_point_taps_respect_out_band() {
        let mut ctl = controller();

        assert_eq!(ctl.record_point_at(Team::Us, 50.0, 97.0).unwrap(), RallyOutcome::Ignored);
        assert_eq!(ctl.record_point_at(Team::Them, 50.0, 3.0).unwrap(), RallyOutcome::Ignored);
        assert!(ctl.record_point_at(Team::Us, 101.0, 50.0).is_err());
        assert!(ctl.record_point_at(Team::Us, f64::NAN, 50.0).is_err());

        ctl.record_point_at(Team::Us, 20.0, 30.0).unwrap();
        ctl.record_point_at(Team::Them, 70.0, 60.0).unwrap();

        let state = ctl.state();
        assert_eq!(state.our_point_hits, vec![Hit::new(20.0, 30.0, 1)]);
        assert_eq!(state.service_hits, vec![Hit::new(70.0, 60.0, 1)]);
        assert_eq!(state.current().unwrap().score_label(), "1-1");
    }

    #[test]
    fn test_taps_after_set_win_record_nothing() {
        let mut ctl = controller();
        win_set(&mut ctl, Team::Us);

        assert_eq!(ctl.record_point_at(Team::Them, 10.0, 50.0).unwrap(), RallyOutcome::Ignored);
        assert!(ctl.state().service_hits.is_empty());
    }

    #[test]
    fn test_next_set_from_unfinished_set() {
        let mut ctl = controller();
        ctl.record_rally(Team::Us);
        assert_eq!(ctl.next_set(), NextSet::Advanced(2));
        assert_eq!(ctl.state().current_set, 2);
        assert_eq!(ctl.state().sets[0].score_label(), "1-0");

        // An undecided set counts for neither side
        assert!(!ctl.status().is_complete);
        assert_eq!(ctl.status().final_score().label(), "0-0");
    }

    #[test]
    fn test_three_nil_plays_fourth_then_completes() {
        let mut ctl = controller();
        let (ids, _) = with_team(&mut ctl);

        for expected in 2..=4 {
            win_set(&mut ctl, Team::Us);
            assert_eq!(ctl.next_set(), NextSet::Advanced(expected));
        }
        win_set(&mut ctl, Team::Them);

        let result = ctl.next_set();
        assert_eq!(
            result,
            NextSet::MatchComplete {
                final_score: FinalScore { us: 3, them: 1 },
                archived_key: Some(format!("match_{}", T0)),
            }
        );
        assert_eq!(ctl.discard_risk(), DiscardRisk::Archived);

        let history = ctl.history();
        assert_eq!(history.len(), 1);
        assert!(history[0].is_complete);
        assert_eq!(history[0].state.end_time, Some(T0));
        // Whoever started on court played all four sets
        assert_eq!(history[0].state.player_stats.get(&ids[0]), Some(&4));

        assert_eq!(ctl.next_set(), NextSet::Ignored);
        assert_eq!(ctl.record_rally(Team::Us), RallyOutcome::Ignored);
        assert!(!ctl.record_timeout());
        assert_eq!(ctl.history().len(), 1);
    }

    #[test]
    fn test_two_all_goes_to_fifth_set() {
        let mut ctl = controller();
        for winner in [Team::Us, Team::Them, Team::Us, Team::Them] {
            win_set(&mut ctl, winner);
            ctl.next_set();
        }
        assert_eq!(ctl.state().current_set, 5);
        assert_eq!(ctl.state().current().unwrap().target_hint(), "→15");

        win_set(&mut ctl, Team::Them);
        assert_eq!(ctl.state().current().unwrap().them, 15);
        match ctl.next_set() {
            NextSet::MatchComplete { final_score, .. } => {
                assert_eq!(final_score, FinalScore { us: 2, them: 3 });
                assert!(!final_score.is_won());
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn test_new_match_keeps_roster_without_archiving() {
        let mut ctl = controller();
        let (ids, _) = with_team(&mut ctl);
        ctl.record_rally(Team::Us);
        assert_eq!(ctl.discard_risk(), DiscardRisk::UnsavedProgress);

        ctl.new_match();

        let state = ctl.state();
        assert_eq!(state.start_time, T0 + 1);
        assert_eq!(state.all_players.len(), 7);
        assert!(state.lineup.on_court().next().is_none());
        assert_eq!(state.player_stats.get(&ids[0]), Some(&0));
        assert!(ctl.history().is_empty());
        assert_eq!(ctl.discard_risk(), DiscardRisk::Nothing);
    }

    #[test]
    fn test_abandon_archives_unfinished_match() {
        let mut ctl = controller();
        win_set(&mut ctl, Team::Us);
        ctl.next_set();
        ctl.record_rally(Team::Them);

        let key = ctl.abandon_match().unwrap();
        assert_eq!(key, format!("match_{}", T0));

        let history = ctl.history();
        assert_eq!(history.len(), 1);
        assert!(!history[0].is_complete);
        assert_eq!(history[0].result(), FinalScore { us: 1, them: 0 });
        assert_eq!(ctl.state().current_set, 1);
        assert!(!ctl.state().has_progress());
    }

    #[test]
    fn test_resume_unfinished_match_from_history() {
        let mut ctl = controller();
        ctl.record_rally(Team::Us);
        let key = ctl.abandon_match().unwrap();

        ctl.load_by_id(&key).unwrap();
        assert_eq!(ctl.state().start_time, T0);
        assert!(!ctl.state().is_finished());
        assert_eq!(ctl.record_rally(Team::Us), RallyOutcome::Scored { side_out: false, set_winner: None });
        assert_eq!(ctl.state().current().unwrap().us, 2);

        assert!(ctl.load_by_id("match_1").is_err());
    }

    #[test]
    fn test_history_management() {
        let mut ctl = controller();
        ctl.record_rally(Team::Us);
        let first = ctl.abandon_match().unwrap();
        ctl.record_rally(Team::Them);
        ctl.abandon_match().unwrap();

        assert_eq!(ctl.history().len(), 2);
        assert!(ctl.delete_from_history(&first));
        assert!(!ctl.delete_from_history(ACTIVE_MATCH_KEY));
        assert_eq!(ctl.clear_history(), 1);
        assert!(ctl.archive().load_active().is_some());
    }

    #[test]
    fn test_import_keeps_match_in_play() {
        let mut source = controller();
        source.record_rally(Team::Us);
        let key = source.abandon_match().unwrap();
        source.record_rally(Team::Them);
        let doc = crate::storage::export_document(source.archive().store()).unwrap();

        let mut target = MatchController::with_clock(MemoryStore::new(), || T0 + 10_000);
        target.record_rally(Team::Us);
        target.record_rally(Team::Us);
        assert_eq!(target.import_backup(&doc).unwrap(), 2);

        target.record_rally(Team::Us);
        let saved = target.archive().load_active().unwrap();
        assert_eq!(saved.current().unwrap().score_label(), "3-0");
        assert_eq!(target.history().len(), 1);
        assert_eq!(target.archive().index(), vec![key]);
    }

    #[test]
    fn test_negative_adjustment_floors_at_zero() {
        let mut ctl = controller();
        ctl.adjust_score(Team::Us, -1);
        assert_eq!(ctl.state().current().unwrap().us, 0);
        ctl.adjust_score(Team::Them, 3);
        ctl.adjust_score(Team::Them, -1);
        assert_eq!(ctl.state().current().unwrap().them, 2);
    }

    #[test]
    fn test_opponent_roles() {
        let mut ctl = controller();
        ctl.set_opponent_role(0, Role::Setter).unwrap();
        assert_eq!(ctl.state().opponent_lineup.slots()[0].role, Role::Setter);
        assert!(ctl.set_opponent_role(6, Role::Setter).is_err());

        ctl.reset_opponent_lineup();
        assert_eq!(ctl.state().opponent_lineup, OpponentLineup::default());
    }

    #[test]
    fn test_substitution_and_removal() {
        let mut ctl = controller();
        let (ids, _) = with_team(&mut ctl);
        let bench = ctl.add_player("Reserve", "20").unwrap();

        assert_eq!(ctl.substitute(2, bench).unwrap(), ids[2]);
        ctl.remove_player(bench).unwrap();
        assert!(ctl.state().lineup.slots()[2].is_empty());
        assert_eq!(ctl.state().lineup.slots()[0], LineupSlot::assigned(ids[0], Some(Role::Opposite)));
    }

    #[test]
    fn test_runs_against_sqlite() {
        let db = Database::open_in_memory().unwrap();
        let mut ctl = MatchController::with_clock(&db, fixed_clock);
        ctl.record_rally(Team::Us);
        ctl.abandon_match();

        assert_eq!(ctl.history().len(), 1);
        assert_eq!(ctl.archive().index(), vec![format!("match_{}", T0)]);
    }
}
