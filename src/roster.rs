use std::cmp::Ordering;

use serde::Serialize;

use crate::ingest::{StatRow, read_id};
use crate::record::SubjectId;

pub const DEFAULT_ROSTER_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub player_id: SubjectId,
    pub full_name: String,
    pub mins_pg: Option<f64>,
    pub usage_pct: Option<f64>,
}

/// A team's top `size` players by minutes per game, then usage.
pub fn select_roster(player_rows: &[StatRow], team_id: SubjectId, size: usize) -> Vec<RosterEntry> {
    let mut entries: Vec<RosterEntry> = player_rows
        .iter()
        .filter(|row| read_id(row, "teamId") == Some(team_id))
        .filter_map(|row| {
            let player_id = read_id(row, "playerId")?;
            Some(RosterEntry {
                player_id,
                full_name: row
                    .get("fullName")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                mins_pg: field_f64(row, "minsPg"),
                usage_pct: field_f64(row, "usagePct"),
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        desc_missing_last(a.mins_pg, b.mins_pg).then(desc_missing_last(a.usage_pct, b.usage_pct))
    });
    entries.truncate(size);
    entries
}

fn field_f64(row: &StatRow, key: &str) -> Option<f64> {
    row.get(key)?.as_f64().filter(|v| v.is_finite())
}

fn desc_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
