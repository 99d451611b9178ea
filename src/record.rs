use serde::{Deserialize, Serialize};

use crate::error::RankError;

pub type SubjectId = u32;
pub type ConferenceId = u32;

/// One observed metric value for one team or player.
///
/// Build through [`StatRecord::new`] so the value is checked once at ingestion;
/// the ranker re-checks and refuses anything non-finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    pub subject_id: SubjectId,
    pub conference_id: ConferenceId,
    pub metric_key: String,
    pub value: f64,
    #[serde(default)]
    pub attempts: Option<u32>,
}

impl StatRecord {
    pub fn new(
        subject_id: SubjectId,
        conference_id: ConferenceId,
        metric_key: impl Into<String>,
        value: f64,
    ) -> Result<Self, RankError> {
        check_value(subject_id, value)?;
        Ok(Self {
            subject_id,
            conference_id,
            metric_key: metric_key.into(),
            value,
            attempts: None,
        })
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }
}

pub(crate) fn check_value(subject_id: SubjectId, value: f64) -> Result<(), RankError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RankError::InvalidInput {
            subject_id,
            reason: format!("non-numeric value {value}"),
        })
    }
}
