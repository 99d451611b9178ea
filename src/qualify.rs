use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RankError};
use crate::record::StatRecord;

/// Shooting zones that carry a minimum-attempts threshold.
pub const KNOWN_ZONES: [&str; 5] = ["rim3s", "lane2", "paint2", "c3", "atb3"];

const DEFAULT_THRESHOLDS: [(&str, u32); 5] = [
    ("rim3s", 25),
    ("lane2", 20),
    ("paint2", 20),
    ("c3", 10),
    ("atb3", 25),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneThreshold {
    pub zone_key: String,
    pub min_attempts: u32,
}

/// Read-only threshold table, loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneThresholds {
    by_zone: HashMap<String, ZoneThreshold>,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            by_zone: DEFAULT_THRESHOLDS
                .iter()
                .map(|(zone, min)| {
                    (
                        zone.to_string(),
                        ZoneThreshold {
                            zone_key: zone.to_string(),
                            min_attempts: *min,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl ZoneThresholds {
    /// Builds a table from `(zone_key, min_attempts)` entries. Zones outside
    /// [`KNOWN_ZONES`] are rejected; zones left out have no threshold.
    pub fn new<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, u32)>,
    ) -> Result<Self, ConfigError> {
        let mut by_zone = HashMap::new();
        for (zone, min_attempts) in entries {
            let zone_key = zone.into();
            if !KNOWN_ZONES.contains(&zone_key.as_str()) {
                return Err(ConfigError::UnknownZoneKey(zone_key));
            }
            by_zone.insert(
                zone_key.clone(),
                ZoneThreshold {
                    zone_key,
                    min_attempts,
                },
            );
        }
        Ok(Self { by_zone })
    }

    pub fn get(&self, zone_key: &str) -> Option<&ZoneThreshold> {
        self.by_zone.get(zone_key)
    }

    pub fn len(&self) -> usize {
        self.by_zone.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zone.is_empty()
    }
}

pub fn is_eligible(record: &StatRecord, threshold: &ZoneThreshold) -> bool {
    record
        .attempts
        .is_some_and(|attempts| attempts >= threshold.min_attempts)
}

/// Whether `record` may be ranked. Metrics without a zone always qualify.
pub fn qualify(
    record: &StatRecord,
    zone: Option<&str>,
    thresholds: &ZoneThresholds,
) -> Result<bool, RankError> {
    let Some(zone) = zone else {
        return Ok(true);
    };
    let threshold = thresholds.get(zone).ok_or_else(|| RankError::UnknownZone {
        metric_key: record.metric_key.clone(),
        zone: zone.to_string(),
    })?;
    Ok(is_eligible(record, threshold))
}
