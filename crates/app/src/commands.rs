//! Console command parsing

use std::path::PathBuf;

use courtside_core::{PlayerId, Role, Team};

/// Error type for command parsing
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Not a number: {0}")]
    BadNumber(String),
    #[error("Unknown role '{0}'")]
    BadRole(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Points to a team; negative to correct
    Score { team: Team, delta: i32 },
    Tap { team: Team, x: f64, y: f64 },
    Timeout,
    NextSet { force: bool },
    Status,
    Players,
    /// Heat map of a set's taps; the set in play when absent
    Hits(Option<u8>),
    AddPlayer { number: String, name: String },
    RemovePlayer(PlayerId),
    Slot {
        index: usize,
        player: Option<PlayerId>,
        role: Option<Role>,
    },
    Libero(Option<PlayerId>),
    Substitute { index: usize, player: PlayerId },
    OpponentRole { index: usize, role: Role },
    OpponentReset,
    Stats,
    History,
    Load { id: String, force: bool },
    Delete(String),
    ClearHistory { force: bool },
    Export(PathBuf),
    Import(PathBuf),
    NewMatch { force: bool },
    Abandon { force: bool },
    Help,
    Quit,
}

pub const HELP: &str = "\
us [n] | them [n]          score a rally (n may be negative to correct)
tap us|them <x> <y>        score a tap on the court diagram (0-100)
timeout                    log a timeout
next[!]                    finish the set (! leaves an undecided set)
status                     scoreboard and lineup
players                    roster and bench
hits [set]                 where taps landed in a set
add <number> <name>        add a player
remove <id>                remove a player
slot <index> <id|-> [role] place a player in slot 0-5
libero <id|->              designate or clear the libero
sub <index> <id>           substitute a bench player
opp <index> <role>         set an opponent role; 'opp reset' restores 5-1
stats                      sets played per player
history                    archived matches
load[!] <id>               resume an archived match
delete <id>                delete an archived match
clear-history[!]           delete all archived matches
export <path>              write a backup file
import <path>              merge a backup file into history
new[!]                     start over, keeping the roster
abandon[!]                 archive as unfinished and start over
help | quit";

fn number<T: std::str::FromStr>(s: &str) -> Result<T, CommandError> {
    s.parse().map_err(|_| CommandError::BadNumber(s.to_string()))
}

fn player_or_none(s: &str) -> Result<Option<PlayerId>, CommandError> {
    if s == "-" {
        Ok(None)
    } else {
        number(s).map(Some)
    }
}

fn role(s: &str) -> Result<Role, CommandError> {
    Role::from_str(s).ok_or_else(|| CommandError::BadRole(s.to_string()))
}

fn team(s: &str) -> Result<Team, CommandError> {
    Team::from_str(s).ok_or(CommandError::Usage("tap us|them <x> <y>"))
}

/// Parse one input line; `None` for a blank line
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(None);
    };

    let (verb, force) = match head.strip_suffix('!') {
        Some(verb) => (verb.to_lowercase(), true),
        None => (head.to_lowercase(), false),
    };

    let command = match (verb.as_str(), args) {
        ("us" | "them", []) => Command::Score {
            team: team(&verb)?,
            delta: 1,
        },
        ("us" | "them", [delta]) => Command::Score {
            team: team(&verb)?,
            delta: number(delta)?,
        },
        ("tap", [side, x, y]) => Command::Tap {
            team: team(side)?,
            x: number(x)?,
            y: number(y)?,
        },
        ("tap", _) => return Err(CommandError::Usage("tap us|them <x> <y>")),
        ("timeout", []) => Command::Timeout,
        ("next", []) => Command::NextSet { force },
        ("status", []) => Command::Status,
        ("players", []) => Command::Players,
        ("hits", []) => Command::Hits(None),
        ("hits", [set]) => Command::Hits(Some(number(set)?)),
        ("add", [num, name @ ..]) if !name.is_empty() => Command::AddPlayer {
            number: num.to_string(),
            name: name.join(" "),
        },
        ("add", _) => return Err(CommandError::Usage("add <number> <name>")),
        ("remove", [id]) => Command::RemovePlayer(number(id)?),
        ("slot", [index, player]) => Command::Slot {
            index: number(index)?,
            player: player_or_none(player)?,
            role: None,
        },
        ("slot", [index, player, r]) => Command::Slot {
            index: number(index)?,
            player: player_or_none(player)?,
            role: Some(role(r)?),
        },
        ("slot", _) => return Err(CommandError::Usage("slot <index> <id|-> [role]")),
        ("libero", [player]) => Command::Libero(player_or_none(player)?),
        ("sub", [index, player]) => Command::Substitute {
            index: number(index)?,
            player: number(player)?,
        },
        ("sub", _) => return Err(CommandError::Usage("sub <index> <id>")),
        ("opp", ["reset"]) => Command::OpponentReset,
        ("opp", [index, r]) => Command::OpponentRole {
            index: number(index)?,
            role: role(r)?,
        },
        ("opp", _) => return Err(CommandError::Usage("opp <index> <role> | opp reset")),
        ("stats", []) => Command::Stats,
        ("history", []) => Command::History,
        ("load", [id]) => Command::Load {
            id: id.to_string(),
            force,
        },
        ("delete", [id]) => Command::Delete(id.to_string()),
        ("clear-history", []) => Command::ClearHistory { force },
        ("export", [path]) => Command::Export(PathBuf::from(*path)),
        ("import", [path]) => Command::Import(PathBuf::from(*path)),
        ("new", []) => Command::NewMatch { force },
        ("abandon", []) => Command::Abandon { force },
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => return Err(CommandError::Unknown(line.trim().to_string())),
    };
    Ok(Some(command))
}
