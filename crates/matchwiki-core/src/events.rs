//! Player-event timeline for the players-events template field.
//!
//! Every recorded event becomes one entry. Players without a line-up event
//! also get one synthesized `Benched` entry at minute 0. Entries are ordered
//! by minute with a stable sort, so ties keep the order they were produced in:
//!
//! 1. home players' recorded events
//! 2. home bench entries
//! 3. away players' recorded events
//! 4. away bench entries
//!
//! Wire format: `name::number::minute::kind::sub-kind::side`, entries joined by `,`.

use std::fmt;

use tracing::debug;

use crate::model::{EventKind, GoalType, MatchRecord, TeamRecord};

/// Separator between the attributes of one entry.
pub const FIELD_SEPARATOR: &str = "::";
/// Separator between entries.
pub const ENTRY_SEPARATOR: &str = ",";

const MINUTE_POSITION: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEventEntry {
    pub name: String,
    pub number: u32,
    pub minute: u32,
    pub kind: EventKind,
    pub sub_kind: Option<GoalType>,
    pub home_side: bool,
}

impl fmt::Display for PlayerEventEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = FIELD_SEPARATOR;
        write!(
            f,
            "{name}{sep}{number}{sep}{minute}{sep}{kind}{sep}{sub}{sep}{side}",
            name = self.name,
            number = self.number,
            minute = self.minute,
            kind = self.kind.label(),
            sub = self.sub_kind.map(GoalType::label).unwrap_or_default(),
            side = if self.home_side { 1 } else { 0 },
        )
    }
}

/// Names are trimmed so that a stored, re-sorted value reads back identical.
fn push_team(entries: &mut Vec<PlayerEventEntry>, team: &TeamRecord, home_side: bool) {
    for player in &team.players {
        for event in &player.events {
            entries.push(PlayerEventEntry {
                name: player.name.trim().to_string(),
                number: player.number,
                minute: event.minute,
                kind: event.kind,
                sub_kind: event.goal_type,
                home_side,
            });
        }
    }

    for player in team.players.iter().filter(|p| !p.has_event(EventKind::LineUp)) {
        entries.push(PlayerEventEntry {
            name: player.name.trim().to_string(),
            number: player.number,
            minute: 0,
            kind: EventKind::Benched,
            sub_kind: None,
            home_side,
        });
    }
}

/// All entries for `record`, in timeline order.
pub fn entries_for(record: &MatchRecord) -> Vec<PlayerEventEntry> {
    let mut entries = Vec::new();
    push_team(&mut entries, &record.home_team, true);
    push_team(&mut entries, &record.away_team, false);

    // `sort_by_key` is stable: equal minutes keep production order.
    entries.sort_by_key(|e| e.minute);
    entries
}

/// Serialized players-events value for `record`.
pub fn events_for(record: &MatchRecord) -> String {
    let entries = entries_for(record);
    debug!(count = entries.len(), "built player events");
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

/// Re-order an already serialized players-events value by minute.
///
/// Entries whose minute cannot be read keep their relative order and sort
/// after every readable one. Surrounding whitespace around each entry is
/// dropped.
pub fn sort_serialized(blob: &str) -> String {
    let mut entries: Vec<(Option<u32>, &str)> = blob
        .split(ENTRY_SEPARATOR)
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| {
            let minute = e
                .split(FIELD_SEPARATOR)
                .nth(MINUTE_POSITION)
                .and_then(|m| m.trim().parse().ok());
            (minute, e)
        })
        .collect();

    entries.sort_by_key(|(minute, _)| minute.unwrap_or(u32::MAX));
    entries
        .into_iter()
        .map(|(_, e)| e)
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}
