//! Match model - the aggregate mutated during play and archived afterwards

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{
    Hit, Lineup, OpponentLineup, Player, PlayerId, SetScore, MAX_SETS, MAX_TIMEOUTS_PER_SET,
};
use crate::completion::evaluate_match_state;

/// Key of the active session snapshot
pub const ACTIVE_MATCH_KEY: &str = "match";

/// Key of the cached archive index
pub const MATCH_INDEX_KEY: &str = "match_list";

/// Prefix shared by archived match keys
pub const ARCHIVE_KEY_PREFIX: &str = "match_";

/// Archive key for a match started at `start_time` (epoch millis)
pub fn match_key(start_time: i64) -> String {
    format!("{}{}", ARCHIVE_KEY_PREFIX, start_time)
}

fn first_set_number() -> u8 {
    1
}

fn first_set() -> Vec<SetScore> {
    vec![SetScore::new(1)]
}

/// Stored counters are keyed by the id as text; archived records go through a
/// flattened buffer where numeric map keys do not parse, so parse them here.
fn player_stats_from_text_keys<'de, D>(deserializer: D) -> Result<BTreeMap<PlayerId, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(id, sets)| id.parse().ok().map(|id| (id, sets)))
        .collect())
}

/// Full state of one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    /// Archive key, `match_<start_time>`
    #[serde(default, alias = "matchId")]
    pub id: String,
    /// Epoch millis
    #[serde(default)]
    pub start_time: i64,
    /// Epoch millis, set once the match is archived
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default = "first_set_number")]
    pub current_set: u8,
    #[serde(default = "first_set")]
    pub sets: Vec<SetScore>,
    /// Where the opponent's serves and points landed on our side
    #[serde(default)]
    pub service_hits: Vec<Hit>,
    /// Where our points landed on their side
    #[serde(default)]
    pub our_point_hits: Vec<Hit>,
    #[serde(default)]
    pub lineup: Lineup,
    #[serde(default, alias = "players")]
    pub all_players: Vec<Player>,
    /// Sets played per player
    #[serde(default, alias = "stats", deserialize_with = "player_stats_from_text_keys")]
    pub player_stats: BTreeMap<PlayerId, u32>,
    #[serde(default, alias = "libero")]
    pub libero_player: Option<PlayerId>,
    #[serde(default)]
    pub opponent_lineup: OpponentLineup,
}

impl MatchState {
    /// A fresh match with an empty roster
    pub fn new(start_time: i64) -> Self {
        Self {
            id: match_key(start_time),
            start_time,
            end_time: None,
            current_set: 1,
            sets: first_set(),
            service_hits: Vec::new(),
            our_point_hits: Vec::new(),
            lineup: Lineup::default(),
            all_players: Vec::new(),
            player_stats: BTreeMap::new(),
            libero_player: None,
            opponent_lineup: OpponentLineup::default(),
        }
    }

    /// A fresh match that keeps this match's roster, with counters back at zero
    pub fn rematch(&self, start_time: i64) -> Self {
        let mut next = Self::new(start_time);
        next.all_players = self.all_players.clone();
        next.player_stats = self.all_players.iter().map(|p| (p.id, 0)).collect();
        next.opponent_lineup = self.opponent_lineup.clone();
        next
    }

    /// Repair fields that older or hand-edited snapshots may lack or contradict
    pub fn normalize(&mut self) {
        if self.id.is_empty() {
            self.id = match_key(self.start_time);
        }
        if self.sets.is_empty() {
            self.sets = first_set();
        }
        self.sets.truncate(MAX_SETS as usize);
        for (i, set) in self.sets.iter_mut().enumerate() {
            set.set = i as u8 + 1;
            set.timeouts.truncate(MAX_TIMEOUTS_PER_SET);
        }
        let last = self.sets.len() as u8;
        if self.current_set == 0 || self.current_set > last {
            self.current_set = last;
        }

        let roster: Vec<PlayerId> = self.all_players.iter().map(|p| p.id).collect();
        if self.libero_player.is_some_and(|id| !roster.contains(&id)) {
            self.libero_player = None;
        }
        self.lineup.repair(|id| roster.contains(&id), self.libero_player);
    }

    /// The set currently in play
    pub fn current(&self) -> Option<&SetScore> {
        self.sets.iter().find(|s| s.set == self.current_set)
    }

    pub fn current_mut(&mut self) -> Option<&mut SetScore> {
        let number = self.current_set;
        self.sets.iter_mut().find(|s| s.set == number)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.all_players.iter().find(|p| p.id == id)
    }

    pub fn has_player(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    /// Anything recorded that a reset would throw away
    pub fn has_progress(&self) -> bool {
        !self.service_hits.is_empty()
            || !self.our_point_hits.is_empty()
            || self.sets.iter().any(|s| !s.is_untouched())
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.start_time).single()
    }
}

/// Sets won by each side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub us: u8,
    pub them: u8,
}

impl FinalScore {
    pub fn is_won(&self) -> bool {
        self.us > self.them
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.us, self.them)
    }
}

/// An archived match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchHistoryRecord {
    #[serde(flatten)]
    pub state: MatchState,
    #[serde(default)]
    pub final_score: Option<FinalScore>,
    #[serde(default)]
    pub is_complete: bool,
}

impl MatchHistoryRecord {
    /// Snapshot `state` for the archive
    pub fn from_state(state: &MatchState, is_complete: bool) -> Self {
        let status = evaluate_match_state(&state.sets);
        Self {
            state: state.clone(),
            final_score: Some(status.final_score()),
            is_complete,
        }
    }

    pub fn id(&self) -> &str {
        &self.state.id
    }

    pub fn start_time(&self) -> i64 {
        self.state.start_time
    }

    /// Recorded final score, or one derived from the sets for records without it
    pub fn result(&self) -> FinalScore {
        self.final_score
            .unwrap_or_else(|| evaluate_match_state(&self.state.sets).final_score())
    }

    /// One-line summary for history listings
    pub fn summary(&self) -> String {
        let result = self.result();
        let outcome = if result.is_won() { "Won" } else { "Lost" };
        let when = self
            .state
            .started_at()
            .map(|dt| dt.format("%d-%m-%Y %H:%M").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        let sets: Vec<String> = self
            .state
            .sets
            .iter()
            .map(|s| format!("{}:{}", s.set, s.score_label()))
            .collect();
        let partial = if self.is_complete { "" } else { " (unfinished)" };
        format!(
            "{} {} {}{} [{}]",
            when,
            outcome,
            result.label(),
            partial,
            sets.join(" ")
        )
    }
}
