//! Lineup models - our six court slots and the opponent's roles

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Number of players on court per team
pub const COURT_SLOTS: usize = 6;

/// Court position (1..=6) for each slot index
///
/// Slots are stored front row first, left to right, then back row left to right.
pub const COURT_POSITIONS: [u8; COURT_SLOTS] = [4, 3, 2, 5, 6, 1];

/// Slot index on the front left (court position 4), where the libero leaves the court
pub const LIBERO_EXIT_SLOT: usize = 0;

/// Slot index at back middle (court position 6), where the libero enters the court
pub const LIBERO_ENTRY_SLOT: usize = 4;

/// Roles handed out when a player is assigned to a slot without one (5-1 system)
pub const DEFAULT_SLOT_ROLES: [Role; COURT_SLOTS] = [
    Role::Opposite,
    Role::Middle,
    Role::PasserRunner,
    Role::PasserRunner,
    Role::Middle,
    Role::Setter,
];

/// Playing role of a court slot
///
/// Serialized with the labels of the stored match data; English names are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Passer/Loper", alias = "PasserRunner", alias = "Passer/Runner")]
    PasserRunner,
    #[serde(rename = "Midden", alias = "Middle")]
    Middle,
    #[serde(rename = "Spelverdeler", alias = "Setter")]
    Setter,
    #[serde(rename = "Diagonaal", alias = "Opposite")]
    Opposite,
    #[serde(rename = "Libero")]
    Libero,
}

impl Role {
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::PasserRunner => "Passer/Runner",
            Role::Middle => "Middle",
            Role::Setter => "Setter",
            Role::Opposite => "Opposite",
            Role::Libero => "Libero",
        }
    }

    /// Four-letter tag used on the court diagram
    pub fn short_name(&self) -> &'static str {
        match self {
            Role::PasserRunner => "Pass",
            Role::Middle => "Midd",
            Role::Setter => "Sett",
            Role::Opposite => "Diag",
            Role::Libero => "Libe",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "passer" | "runner" | "passer/runner" | "passer/loper" | "pass" => {
                Some(Role::PasserRunner)
            }
            "middle" | "midden" | "midd" => Some(Role::Middle),
            "setter" | "spelverdeler" | "sett" => Some(Role::Setter),
            "opposite" | "diagonaal" | "diag" => Some(Role::Opposite),
            "libero" => Some(Role::Libero),
            _ => None,
        }
    }
}

/// One of our six court slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupSlot {
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub role: Option<Role>,
    /// Who the libero is standing in for; otherwise the assigned player
    #[serde(default)]
    pub original_player_id: Option<PlayerId>,
}

impl LineupSlot {
    /// A slot assigned directly by the coach
    pub fn assigned(player_id: PlayerId, role: Option<Role>) -> Self {
        Self {
            player_id: Some(player_id),
            role,
            original_player_id: Some(player_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.player_id.is_none()
    }

    pub fn is_libero(&self) -> bool {
        self.role == Some(Role::Libero)
    }

    /// The slot with the middle the libero replaced standing back in
    pub fn without_libero(&self) -> Self {
        Self {
            player_id: self.original_player_id,
            role: self.original_player_id.map(|_| Role::Middle),
            original_player_id: None,
        }
    }
}

/// Our six court slots, indexed as in [`COURT_POSITIONS`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lineup(pub [LineupSlot; COURT_SLOTS]);

impl Lineup {
    pub fn slots(&self) -> &[LineupSlot; COURT_SLOTS] {
        &self.0
    }

    /// Court position (1..=6) of a slot index
    pub fn court_position(index: usize) -> Option<u8> {
        COURT_POSITIONS.get(index).copied()
    }

    /// Slot index currently holding a player
    pub fn index_of(&self, player_id: PlayerId) -> Option<usize> {
        self.0.iter().position(|s| s.player_id == Some(player_id))
    }

    pub fn contains_player(&self, player_id: PlayerId) -> bool {
        self.index_of(player_id).is_some()
    }

    /// Players currently on court, in slot order
    pub fn on_court(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.0.iter().filter_map(|s| s.player_id)
    }

    /// Number of slots tagged as libero
    pub fn libero_count(&self) -> usize {
        self.0.iter().filter(|s| s.is_libero()).count()
    }

    /// Drop slot references the roster does not back
    ///
    /// A libero slot survives only while it holds the designated libero in
    /// place of a rostered player; otherwise the replaced middle stands back
    /// in. A player found in two slots keeps the first.
    pub fn repair(&mut self, is_rostered: impl Fn(PlayerId) -> bool, libero: Option<PlayerId>) {
        let mut seen: Vec<PlayerId> = Vec::new();
        let mut libero_kept = false;
        for slot in self.0.iter_mut() {
            if slot.is_libero() {
                let keep = !libero_kept
                    && libero.is_some()
                    && slot.player_id == libero
                    && slot.original_player_id.is_some_and(&is_rostered);
                if keep {
                    libero_kept = true;
                } else {
                    *slot = slot.without_libero();
                }
            }
            if let Some(id) = slot.player_id {
                if is_rostered(id) && !seen.contains(&id) {
                    seen.push(id);
                } else {
                    *slot = LineupSlot::default();
                }
            }
        }
    }

    /// Empty every slot that references a player
    pub fn clear_player(&mut self, player_id: PlayerId) {
        for slot in self.0.iter_mut() {
            if slot.player_id == Some(player_id) || slot.original_player_id == Some(player_id) {
                *slot = LineupSlot::default();
            }
        }
    }
}

/// One of the opponent's six positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentSlot {
    /// Rotation position 1..=6
    pub pos: u8,
    pub role: Role,
}

/// Opponent roles by rotation position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpponentLineup(pub [OpponentSlot; COURT_SLOTS]);

impl OpponentLineup {
    pub fn slots(&self) -> &[OpponentSlot; COURT_SLOTS] {
        &self.0
    }

    /// Change the role shown at a position index
    pub fn set_role(&mut self, index: usize, role: Role) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = OpponentSlot {
                    pos: index as u8 + 1,
                    role,
                };
                true
            }
            None => false,
        }
    }
}

impl Default for OpponentLineup {
    /// A 5-1 system
    fn default() -> Self {
        Self([
            OpponentSlot { pos: 1, role: Role::Opposite },
            OpponentSlot { pos: 2, role: Role::Middle },
            OpponentSlot { pos: 3, role: Role::PasserRunner },
            OpponentSlot { pos: 4, role: Role::PasserRunner },
            OpponentSlot { pos: 5, role: Role::Middle },
            OpponentSlot { pos: 6, role: Role::Setter },
        ])
    }
}
