use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FactParseError;

/// Rank token for "not qualified or ranking unavailable".
pub const UNRANKED: &str = "_";
pub const SEPARATOR: char = '|';

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedFact {
    pub value: f64,
    pub national_rank: Option<u32>,
    pub conference_rank: Option<u32>,
    pub precision: usize,
}

impl RankedFact {
    pub fn unranked(value: f64, precision: usize) -> Self {
        Self {
            value,
            national_rank: None,
            conference_rank: None,
            precision,
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.national_rank.is_some() || self.conference_rank.is_some()
    }

    /// `value|national_rank|conference_rank`, the string narrative generation reads.
    pub fn encode(&self) -> String {
        format_fact(
            self.value,
            self.precision,
            self.national_rank,
            self.conference_rank,
        )
    }

    /// Inverse of [`RankedFact::encode`]; precision is taken from the digits
    /// after the decimal point.
    pub fn parse(raw: &str) -> Result<Self, FactParseError> {
        let fields: Vec<&str> = raw.split(SEPARATOR).collect();
        let [value, national, conference] = fields[..] else {
            return Err(FactParseError::FieldCount(fields.len()));
        };
        let parsed = value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FactParseError::Value(value.to_string()))?;
        let precision = value.split_once('.').map_or(0, |(_, frac)| frac.len());
        Ok(Self {
            value: parsed,
            national_rank: parse_rank(national)?,
            conference_rank: parse_rank(conference)?,
            precision,
        })
    }
}

impl fmt::Display for RankedFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

pub fn format_fact(
    value: f64,
    precision: usize,
    national_rank: Option<u32>,
    conference_rank: Option<u32>,
) -> String {
    format!(
        "{value:.precision$}{SEPARATOR}{}{SEPARATOR}{}",
        rank_token(national_rank),
        rank_token(conference_rank)
    )
}

fn rank_token(rank: Option<u32>) -> String {
    match rank {
        Some(r) => r.to_string(),
        None => UNRANKED.to_string(),
    }
}

fn parse_rank(raw: &str) -> Result<Option<u32>, FactParseError> {
    if raw == UNRANKED {
        return Ok(None);
    }
    match raw.parse::<u32>() {
        Ok(rank) if rank >= 1 && !raw.starts_with('+') => Ok(Some(rank)),
        _ => Err(FactParseError::Rank(raw.to_string())),
    }
}
