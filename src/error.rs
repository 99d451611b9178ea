use std::path::PathBuf;

use thiserror::Error;

use crate::record::SubjectId;

/// Per-record failures raised while qualifying or ranking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    #[error("invalid input for subject {subject_id}: {reason}")]
    InvalidInput { subject_id: SubjectId, reason: String },

    #[error("metric {metric_key} references unknown zone `{zone}`")]
    UnknownZone { metric_key: String, zone: String },
}

/// Startup failures while loading thresholds or the metric registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown zone key `{0}` in threshold table")]
    UnknownZoneKey(String),

    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("stat payload is not a JSON array of rows")]
    NotAnArray,

    #[error("malformed stat payload: {0}")]
    Json(String),

    #[error("row {index} has no numeric `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("row {index} repeats subject {subject_id}")]
    DuplicateSubject { index: usize, subject_id: SubjectId },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactParseError {
    #[error("expected 3 `|`-separated fields, found {0}")]
    FieldCount(usize),

    #[error("bad fact value `{0}`")]
    Value(String),

    #[error("bad fact rank `{0}`")]
    Rank(String),
}
