use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::metric::MetricRegistry;
use crate::qualify::ZoneThresholds;

pub const CONFIG_ENV: &str = "CBB_ENGINE_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    zone_thresholds: Option<HashMap<String, u32>>,
    lower_is_better: Vec<String>,
    precision: HashMap<String, usize>,
    zones: HashMap<String, String>,
    exclude: Vec<String>,
}

/// Thresholds and metric registry for one run. Built once, then shared
/// read-only by every ranking call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub thresholds: ZoneThresholds,
    pub registry: MetricRegistry,
}

impl EngineConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(raw)?;

        let thresholds = match file.zone_thresholds {
            Some(table) => ZoneThresholds::new(table)?,
            None => ZoneThresholds::default(),
        };

        let mut registry = MetricRegistry::default();
        for key in file.lower_is_better {
            registry = registry.with_lower_is_better(key);
        }
        for (key, precision) in file.precision {
            registry = registry.with_precision(key, precision);
        }
        for (key, zone) in file.zones {
            registry = registry.with_zone(key, zone);
        }
        for key in file.exclude {
            registry = registry.with_excluded(key);
        }

        Ok(Self {
            thresholds,
            registry,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }
}

pub fn config_path_from_env() -> Option<PathBuf> {
    let raw = env::var(CONFIG_ENV).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
