use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::IngestError;
use crate::metric::MetricRegistry;
use crate::record::{StatRecord, SubjectId};

pub type StatRow = Map<String, Value>;

pub const CONFERENCE_FIELD: &str = "conferenceId";
pub const QUAD_FIELD: &str = "quadAgst";
pub const QUAD_GROUP_FIELD: &str = "quadGroup";
pub const QUAD_1_2: &str = "Quad 1 & 2";
pub const QUAD_3_4: &str = "Quad 3 & 4";

/// Identifier and grouping columns that are never ranked.
const NON_METRIC_FIELDS: &[&str] = &[
    "teamId",
    "playerId",
    "conferenceId",
    "divisionId",
    "competitionId",
    "leagueId",
    "seasonId",
];

/// Game-log columns whose per-game mean means nothing.
const QUAD_DROPPED_FIELDS: &[&str] = &[
    "overallWins",
    "overallLosses",
    "leagueId",
    "competitionId",
    "gameId",
    "teamId",
    "homeId",
    "conferenceId",
    "divisionId",
    "teamIdAgst",
    "conferenceIdAgst",
    "divisionIdAgst",
    "apPollAgst",
    "teamGameRecency",
    "netRankAgst",
    "confWins",
    "confLosses",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    Team,
    Player,
}

impl SubjectKind {
    pub fn id_field(self) -> &'static str {
        match self {
            SubjectKind::Team => "teamId",
            SubjectKind::Player => "playerId",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub records: Vec<StatRecord>,
    pub skipped_rows: Vec<IngestError>,
}

/// Parses a service payload into rows. `null` is treated as no rows.
pub fn parse_rows_json(raw: &str) -> Result<Vec<StatRow>, IngestError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| IngestError::Json(err.to_string()))?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                _ => Err(IngestError::NotAnArray),
            })
            .collect(),
        _ => Err(IngestError::NotAnArray),
    }
}

/// Inner join of two payloads on `id_field`. Columns present in both come
/// from `secondary`.
pub fn merge_rows(primary: &[StatRow], secondary: &[StatRow], id_field: &str) -> Vec<StatRow> {
    let by_id: HashMap<SubjectId, &StatRow> = secondary
        .iter()
        .filter_map(|row| read_id(row, id_field).map(|id| (id, row)))
        .collect();

    primary
        .iter()
        .filter_map(|row| {
            let id = read_id(row, id_field)?;
            let other = by_id.get(&id)?;
            let mut merged = row.clone();
            for (key, value) in other.iter() {
                merged.insert(key.clone(), value.clone());
            }
            Some(merged)
        })
        .collect()
}

/// One record per numeric stat column per row.
///
/// Rows without an id or conference are skipped and reported, as is any later
/// row for a subject already seen. Columns that are null, boolean, non-numeric
/// text or non-finite never become records, and neither do columns the
/// registry excludes. Zone metrics take their attempts from the row's
/// `{zone}Fga` column.
pub fn records_from_rows(
    rows: &[StatRow],
    kind: SubjectKind,
    registry: &MetricRegistry,
) -> Ingested {
    let id_field = kind.id_field();
    let mut out = Ingested::default();
    let mut seen = HashSet::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(subject_id) = read_id(row, id_field) else {
            warn!(index, field = id_field, "skipping stat row without id");
            out.skipped_rows.push(IngestError::MissingField {
                index,
                field: id_field,
            });
            continue;
        };
        let Some(conference_id) = read_id(row, CONFERENCE_FIELD) else {
            warn!(index, subject_id, "skipping stat row without conference");
            out.skipped_rows.push(IngestError::MissingField {
                index,
                field: CONFERENCE_FIELD,
            });
            continue;
        };
        if !seen.insert(subject_id) {
            warn!(index, subject_id, "skipping repeated row for subject");
            out.skipped_rows.push(IngestError::DuplicateSubject { index, subject_id });
            continue;
        }

        for (key, value) in row {
            if NON_METRIC_FIELDS.contains(&key.as_str()) || registry.is_excluded(key) {
                continue;
            }
            let Some(value) = number_value(value) else {
                continue;
            };
            let attempts = registry
                .zone_for(key)
                .and_then(|zone| row.get(&format!("{zone}Fga")))
                .and_then(attempts_value);
            let record = StatRecord {
                subject_id,
                conference_id,
                metric_key: key.clone(),
                value,
                attempts,
            };
            out.records.push(record);
        }
    }
    out
}

/// Splits a team's game log into per-game means against Quad 1 & 2 opponents
/// and against everyone else.
///
/// A game belongs to the first group when its `quadAgst` is `quad1` or
/// `quad2`. Each column is averaged over the games that carry a number for it;
/// identifier and record columns are dropped. Groups with no games are
/// omitted, so the result has zero, one or two rows.
pub fn quad_split(game_rows: &[StatRow]) -> Vec<StatRow> {
    let (top, rest): (Vec<&StatRow>, Vec<&StatRow>) = game_rows.iter().partition(|row| {
        matches!(
            row.get(QUAD_FIELD).and_then(Value::as_str),
            Some("quad1" | "quad2")
        )
    });

    [(QUAD_1_2, top), (QUAD_3_4, rest)]
        .into_iter()
        .filter(|(_, games)| !games.is_empty())
        .map(|(label, games)| {
            let mut row = column_means(&games);
            row.insert(QUAD_GROUP_FIELD.to_string(), Value::from(label));
            row
        })
        .collect()
}

fn column_means(games: &[&StatRow]) -> StatRow {
    let mut sums: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for game in games {
        for (key, value) in game.iter() {
            if QUAD_DROPPED_FIELDS.contains(&key.as_str()) {
                continue;
            }
            let Some(v) = number_value(value) else {
                continue;
            };
            let slot = sums.entry(key.as_str()).or_insert((0.0, 0));
            slot.0 += v;
            slot.1 += 1;
        }
    }
    sums.into_iter()
        .filter_map(|(key, (sum, count))| {
            let mean = serde_json::Number::from_f64(sum / f64::from(count))?;
            Some((key.to_string(), Value::Number(mean)))
        })
        .collect()
}

pub(crate) fn read_id(row: &StatRow, field: &str) -> Option<u32> {
    let raw = number_value(row.get(field)?)?;
    if raw < 0.0 || raw.fract() != 0.0 || raw > u32::MAX as f64 {
        return None;
    }
    Some(raw as u32)
}

fn number_value(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_number(s)?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn attempts_value(value: &Value) -> Option<u32> {
    let v = number_value(value)?;
    if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return None;
    }
    Some(v as u32)
}

fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    s.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_value_accepts_numeric_text_only() {
        assert_eq!(number_value(&json!(12.5)), Some(12.5));
        assert_eq!(number_value(&json!(" 7 ")), Some(7.0));
        assert_eq!(number_value(&json!("-")), None);
        assert_eq!(number_value(&json!("NaN")), None);
        assert_eq!(number_value(&json!(true)), None);
        assert_eq!(number_value(&Value::Null), None);
    }

    #[test]
    fn read_id_rejects_fractional_and_negative() {
        let row = json!({"a": 4.0, "b": 4.5, "c": -1}).as_object().cloned().unwrap();
        assert_eq!(read_id(&row, "a"), Some(4));
        assert_eq!(read_id(&row, "b"), None);
        assert_eq!(read_id(&row, "c"), None);
        assert_eq!(read_id(&row, "missing"), None);
    }

    #[test]
    fn attempts_must_be_whole_counts() {
        assert_eq!(attempts_value(&json!(30)), Some(30));
        assert_eq!(attempts_value(&json!("12")), Some(12));
        assert_eq!(attempts_value(&json!(9.5)), None);
        assert_eq!(attempts_value(&json!(-2)), None);
    }
}
