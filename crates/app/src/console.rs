//! Console front-end: runs parsed commands against the match controller

use std::io::{self, Write};

use courtside_core::{
    export_document, heat_intensity, hits_in_set, roster, DiscardRisk, Hit,
    KeyValueStore, Lineup, MatchController, NextSet, RallyOutcome, Team, COURT_EXTENT,
};
use tracing::warn;

use crate::commands::{Command, HELP};

/// Heat map cells along each side of the court diagram
const HEAT_CELLS: usize = 5;

/// Cell shading from no nearby hits up to saturated
const HEAT_SHADES: [char; 4] = [' ', '.', '*', '#'];

/// Whether the loop keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one command, writing feedback to `out`
pub fn execute<S, W>(ctl: &mut MatchController<S>, command: Command, out: &mut W) -> io::Result<Flow>
where
    S: KeyValueStore,
    W: Write,
{
    match command {
        Command::Score { team, delta } => {
            let outcome = ctl.adjust_score(team, delta);
            report_rally(ctl, outcome, out)?;
        }
        Command::Tap { team, x, y } => match ctl.record_point_at(team, x, y) {
            Ok(outcome) => report_rally(ctl, outcome, out)?,
            Err(e) => writeln!(out, "{}", e)?,
        },
        Command::Timeout => {
            if ctl.record_timeout() {
                let used = ctl.state().current().map(|s| s.timeouts.len()).unwrap_or(0);
                writeln!(out, "Timeout {} logged", used)?;
            } else {
                writeln!(out, "No timeouts left in this set")?;
            }
        }
        Command::NextSet { force } => {
            let undecided = ctl.state().current().is_some_and(|s| !s.is_concluded());
            if undecided && !force && !ctl.is_complete() {
                writeln!(out, "The set has no winner yet; use next! to move on anyway")?;
            } else {
                report_next_set(ctl.next_set(), out)?;
            }
        }
        Command::Status => write_status(ctl, out)?,
        Command::Players => write_players(ctl, out)?,
        Command::Hits(set) => write_hits(ctl, set, out)?,
        Command::AddPlayer { number, name } => match ctl.add_player(&name, &number) {
            Ok(id) => writeln!(out, "Added #{} {} (id {})", number.trim(), name.trim(), id)?,
            Err(e) => writeln!(out, "{}", e)?,
        },
        Command::RemovePlayer(id) => match ctl.remove_player(id) {
            Ok(player) => writeln!(out, "Removed {}", player.label())?,
            Err(e) => writeln!(out, "{}", e)?,
        },
        Command::Slot {
            index,
            player,
            role,
        } => report(ctl.assign_slot(index, player, role), out)?,
        Command::Libero(player) => report(ctl.set_libero(player), out)?,
        Command::Substitute { index, player } => match ctl.substitute(index, player) {
            Ok(outgoing) => writeln!(out, "{} off, {} on", outgoing, player)?,
            Err(e) => writeln!(out, "{}", e)?,
        },
        Command::OpponentRole { index, role } => report(ctl.set_opponent_role(index, role), out)?,
        Command::OpponentReset => {
            ctl.reset_opponent_lineup();
            writeln!(out, "Opponent lineup reset")?;
        }
        Command::Stats => {
            for (player, sets) in roster::playing_time(ctl.state()) {
                writeln!(out, "{:<24} {} sets", player.label(), sets)?;
            }
        }
        Command::History => {
            let history = ctl.history();
            if history.is_empty() {
                writeln!(out, "No matches in history")?;
            }
            for record in history {
                writeln!(out, "{}  {}", record.id(), record.summary())?;
            }
        }
        Command::Load { id, force } => {
            if confirmed(ctl, force, out)? {
                report(ctl.load_by_id(&id), out)?;
            }
        }
        Command::Delete(id) => {
            if ctl.delete_from_history(&id) {
                writeln!(out, "Deleted {}", id)?;
            } else {
                writeln!(out, "No match {}", id)?;
            }
        }
        Command::ClearHistory { force } => {
            if force {
                writeln!(out, "Deleted {} matches", ctl.clear_history())?;
            } else {
                writeln!(out, "This deletes every archived match; repeat as clear-history!")?;
            }
        }
        Command::Export(path) => match export_document(ctl.archive().store()) {
            Ok(doc) => match std::fs::write(&path, doc) {
                Ok(()) => writeln!(out, "Backup written to {}", path.display())?,
                Err(e) => writeln!(out, "Could not write {}: {}", path.display(), e)?,
            },
            Err(e) => writeln!(out, "{}", e)?,
        },
        Command::Import(path) => {
            let imported = std::fs::read_to_string(&path)
                .map_err(courtside_core::Error::from)
                .and_then(|doc| ctl.import_backup(&doc));
            match imported {
                Ok(count) => writeln!(
                    out,
                    "Imported {} entries into history; the match in play is unchanged",
                    count
                )?,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Import failed");
                    writeln!(out, "Import failed: {}", e)?;
                }
            }
        }
        Command::NewMatch { force } => {
            if confirmed(ctl, force, out)? {
                ctl.new_match();
                writeln!(out, "New match started")?;
            }
        }
        Command::Abandon { force } => {
            if confirmed(ctl, force, out)? {
                match ctl.abandon_match() {
                    Some(key) => writeln!(out, "Saved as {}; new match started", key)?,
                    None => writeln!(out, "Could not save the match; new match started")?,
                }
            }
        }
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn report<W: Write>(result: courtside_core::Result<()>, out: &mut W) -> io::Result<()> {
    match result {
        Ok(()) => writeln!(out, "OK"),
        Err(e) => writeln!(out, "{}", e),
    }
}

fn report_next_set<W: Write>(next: NextSet, out: &mut W) -> io::Result<()> {
    match next {
        NextSet::Advanced(set) => writeln!(out, "Set {} started", set),
        NextSet::MatchComplete {
            final_score,
            archived_key,
        } => {
            let verdict = if final_score.is_won() {
                "Match won"
            } else {
                "Match lost"
            };
            writeln!(out, "{} {}", verdict, final_score.label())?;
            match archived_key {
                Some(key) => writeln!(out, "Saved to history as {}", key),
                None => writeln!(out, "Could not save the match to history"),
            }
        }
        NextSet::Ignored => writeln!(out, "No further set to play"),
    }
}

/// Gate for commands that drop the current match
fn confirmed<S: KeyValueStore, W: Write>(
    ctl: &MatchController<S>,
    force: bool,
    out: &mut W,
) -> io::Result<bool> {
    if force || ctl.discard_risk() != DiscardRisk::UnsavedProgress {
        return Ok(true);
    }
    writeln!(out, "The current match has unsaved progress; add ! to go ahead")?;
    Ok(false)
}

fn report_rally<S: KeyValueStore, W: Write>(
    ctl: &MatchController<S>,
    outcome: RallyOutcome,
    out: &mut W,
) -> io::Result<()> {
    if outcome == RallyOutcome::Ignored {
        return writeln!(out, "Set is decided; use 'next'");
    }
    write_score(ctl, out)?;
    if outcome.is_side_out() {
        writeln!(out, "Side-out, rotated")?;
    }
    match outcome.set_winner() {
        Some(Team::Us) => writeln!(out, "Set won!")?,
        Some(Team::Them) => writeln!(out, "Set lost")?,
        None => {}
    }
    Ok(())
}

fn write_score<S: KeyValueStore, W: Write>(ctl: &MatchController<S>, out: &mut W) -> io::Result<()> {
    let Some(set) = ctl.state().current() else {
        return Ok(());
    };
    let serve = match set.last_scorer {
        Some(Team::Us) => "we serve",
        Some(Team::Them) => "they serve",
        None => "",
    };
    writeln!(
        out,
        "Set {}  {}  {}  {}",
        set.set,
        set.score_label(),
        set.target_hint(),
        serve
    )
}

fn write_status<S: KeyValueStore, W: Write>(ctl: &MatchController<S>, out: &mut W) -> io::Result<()> {
    let state = ctl.state();
    let status = ctl.status();
    writeln!(
        out,
        "Sets {}  {}",
        status.final_score().label(),
        if status.is_complete { "(final)" } else { "" }
    )?;
    for set in &state.sets {
        writeln!(out, "  Set {}: {}  timeouts {:?}", set.set, set.score_label(), set.timeouts)?;
    }
    write_score(ctl, out)?;

    for (index, slot) in state.lineup.slots().iter().enumerate() {
        let who = slot
            .player_id
            .and_then(|id| state.player(id))
            .map(|p| p.label())
            .unwrap_or_else(|| "-".to_string());
        let role = slot.role.map(|r| r.short_name()).unwrap_or("");
        writeln!(
            out,
            "  [{}] pos {}  {:<4} {}",
            index,
            Lineup::court_position(index).unwrap_or(0),
            role,
            who
        )?;
    }

    let opponent: Vec<String> = state
        .opponent_lineup
        .slots()
        .iter()
        .map(|slot| format!("{} {}", slot.pos, slot.role.display_name()))
        .collect();
    writeln!(out, "  Opponent: {}", opponent.join(", "))
}

fn write_hits<S: KeyValueStore, W: Write>(
    ctl: &MatchController<S>,
    set: Option<u8>,
    out: &mut W,
) -> io::Result<()> {
    let state = ctl.state();
    let set = set.unwrap_or(state.current_set);
    if !state.sets.iter().any(|s| s.set == set) {
        return writeln!(out, "No set {}", set);
    }

    let sides = [
        ("their serves and points, our court", &state.service_hits),
        ("our points, their court", &state.our_point_hits),
    ];
    let cell = COURT_EXTENT / HEAT_CELLS as f64;
    for (title, hits) in sides {
        let in_set: Vec<Hit> = hits_in_set(hits, set).copied().collect();
        writeln!(out, "Set {} {}: {}", set, title, in_set.len())?;
        for row in 0..HEAT_CELLS {
            let line: String = (0..HEAT_CELLS)
                .map(|col| {
                    let x = (col as f64 + 0.5) * cell;
                    let y = (row as f64 + 0.5) * cell;
                    let heat = heat_intensity(&in_set, x, y);
                    HEAT_SHADES[((heat * 3.0).round() as usize).min(HEAT_SHADES.len() - 1)]
                })
                .collect();
            writeln!(out, "  |{}|", line)?;
        }
    }
    Ok(())
}

fn write_players<S: KeyValueStore, W: Write>(ctl: &MatchController<S>, out: &mut W) -> io::Result<()> {
    let state = ctl.state();
    for player in &state.all_players {
        let mut tags = Vec::new();
        if state.libero_player == Some(player.id) {
            tags.push("libero");
        }
        if state.lineup.contains_player(player.id) {
            tags.push("on court");
        }
        writeln!(out, "{:>16}  {}  {}", player.id, player.label(), tags.join(", "))?;
    }
    let bench: Vec<String> = roster::bench(state).iter().map(|p| p.label()).collect();
    writeln!(out, "Bench: {}", bench.join(", "))
}
