use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Zone bindings every registry starts with.
const BUILTIN_ZONES: &[(&str, &str)] = &[
    ("rim3sFgPct", "rim3s"),
    ("lane2FgPct", "lane2"),
    ("paint2FgPct", "paint2"),
    ("c3FgPct", "c3"),
    ("atb3FgPct", "atb3"),
];

const PCT_PRECISION: usize = 3;
const DEFAULT_PRECISION: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Polarity {
    #[default]
    HigherBetter,
    LowerBetter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub key: String,
    pub polarity: Polarity,
    /// Decimal places used when the value is encoded.
    pub precision: usize,
    pub zone: Option<String>,
}

impl MetricSpec {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let precision = default_precision(&key);
        Self {
            key,
            polarity: Polarity::HigherBetter,
            precision,
            zone: None,
        }
    }

    pub fn lower_is_better(mut self) -> Self {
        self.polarity = Polarity::LowerBetter;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }
}

/// Per-metric polarity, precision and zone binding.
///
/// Polarity is never inferred from the key: anything not listed as
/// lower-is-better ranks higher-is-better. Excluded keys are never ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRegistry {
    lower_is_better: HashSet<String>,
    precision: HashMap<String, usize>,
    zones: HashMap<String, String>,
    excluded: HashSet<String>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self {
            lower_is_better: HashSet::new(),
            precision: HashMap::new(),
            zones: BUILTIN_ZONES
                .iter()
                .map(|(metric, zone)| (metric.to_string(), zone.to_string()))
                .collect(),
            excluded: HashSet::new(),
        }
    }
}

impl MetricRegistry {
    pub fn with_lower_is_better(mut self, key: impl Into<String>) -> Self {
        self.lower_is_better.insert(key.into());
        self
    }

    pub fn with_precision(mut self, key: impl Into<String>, precision: usize) -> Self {
        self.precision.insert(key.into(), precision);
        self
    }

    pub fn with_zone(mut self, key: impl Into<String>, zone: impl Into<String>) -> Self {
        self.zones.insert(key.into(), zone.into());
        self
    }

    pub fn with_excluded(mut self, key: impl Into<String>) -> Self {
        self.excluded.insert(key.into());
        self
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded.contains(key)
    }

    pub fn zone_for(&self, key: &str) -> Option<&str> {
        self.zones.get(key).map(String::as_str)
    }

    pub fn spec(&self, key: &str) -> MetricSpec {
        MetricSpec {
            key: key.to_string(),
            polarity: if self.lower_is_better.contains(key) {
                Polarity::LowerBetter
            } else {
                Polarity::HigherBetter
            },
            precision: self
                .precision
                .get(key)
                .copied()
                .unwrap_or_else(|| default_precision(key)),
            zone: self.zones.get(key).cloned(),
        }
    }
}

// Percentages come from the service as fractions (0.589), so they keep 3 places.
fn default_precision(key: &str) -> usize {
    if key.ends_with("Pct") {
        PCT_PRECISION
    } else {
        DEFAULT_PRECISION
    }
}
