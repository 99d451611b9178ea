use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::RankError;
use crate::fact::RankedFact;
use crate::metric::{MetricRegistry, MetricSpec, Polarity};
use crate::qualify::{ZoneThresholds, qualify};
use crate::rank::dense_rank;
use crate::record::{ConferenceId, StatRecord, SubjectId};
use crate::scope::{group_by_conference, value_pairs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Scope {
    National,
    Conference(ConferenceId),
}

/// Non-fatal conditions seen while ranking a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RankWarning {
    EmptyPool {
        metric_key: String,
        scope: Scope,
    },
    UnknownZone {
        metric_key: String,
        zone: String,
        records: usize,
    },
}

#[derive(Debug, Clone)]
pub struct MetricRanking {
    pub metric_key: String,
    /// One fact per input record, in input order.
    pub facts: Vec<(SubjectId, RankedFact)>,
    pub warnings: Vec<RankWarning>,
}

/// Ranks one metric for every subject that reported it.
///
/// Records whose `metric_key` differs from `spec.key` are ignored. Every
/// remaining record yields a fact; records that fail zone qualification (or
/// point at a zone with no threshold) come back unranked.
pub fn rank_metric<'a>(
    records: impl IntoIterator<Item = &'a StatRecord>,
    spec: &MetricSpec,
    thresholds: &ZoneThresholds,
) -> Result<MetricRanking, RankError> {
    let records: Vec<&StatRecord> = records
        .into_iter()
        .filter(|r| r.metric_key == spec.key)
        .collect();

    let mut warnings = Vec::new();
    let mut qualified = Vec::with_capacity(records.len());
    let mut unknown_zone: Option<(String, usize)> = None;
    for record in &records {
        match qualify(record, spec.zone.as_deref(), thresholds) {
            Ok(ok) => qualified.push(ok),
            Err(RankError::UnknownZone { zone, .. }) => {
                qualified.push(false);
                unknown_zone.get_or_insert((zone, 0)).1 += 1;
            }
            Err(err) => return Err(err),
        }
    }
    if let Some((zone, count)) = unknown_zone {
        warn!(metric = %spec.key, zone = %zone, records = count, "zone has no threshold; leaving unranked");
        warnings.push(RankWarning::UnknownZone {
            metric_key: spec.key.clone(),
            zone,
            records: count,
        });
    }

    let pool: Vec<&StatRecord> = records
        .iter()
        .zip(&qualified)
        .filter_map(|(record, ok)| ok.then_some(*record))
        .collect();

    let national = rank_pool(&pool, spec.polarity)?;
    if pool.is_empty() {
        warnings.push(empty_pool(&spec.key, Scope::National));
    }

    let mut conference: HashMap<ConferenceId, HashMap<SubjectId, u32>> = HashMap::new();
    for (conference_id, members) in group_by_conference(&pool) {
        conference.insert(conference_id, rank_pool(&members, spec.polarity)?);
    }
    let all_conferences: BTreeSet<ConferenceId> =
        records.iter().map(|r| r.conference_id).collect();
    for conference_id in all_conferences {
        if !conference.contains_key(&conference_id) {
            warnings.push(empty_pool(&spec.key, Scope::Conference(conference_id)));
        }
    }

    let facts = records
        .iter()
        .zip(&qualified)
        .map(|(record, ok)| {
            let fact = if *ok {
                RankedFact {
                    value: record.value,
                    national_rank: national.get(&record.subject_id).copied(),
                    conference_rank: conference
                        .get(&record.conference_id)
                        .and_then(|ranks| ranks.get(&record.subject_id))
                        .copied(),
                    precision: spec.precision,
                }
            } else {
                RankedFact::unranked(record.value, spec.precision)
            };
            (record.subject_id, fact)
        })
        .collect();

    debug!(
        metric = %spec.key,
        records = records.len(),
        qualified = pool.len(),
        "ranked metric"
    );
    Ok(MetricRanking {
        metric_key: spec.key.clone(),
        facts,
        warnings,
    })
}

fn rank_pool(pool: &[&StatRecord], polarity: Polarity) -> Result<HashMap<SubjectId, u32>, RankError> {
    dense_rank(&value_pairs(pool), polarity)
}

fn empty_pool(metric_key: &str, scope: Scope) -> RankWarning {
    warn!(metric = %metric_key, ?scope, "no qualifying subjects in scope");
    RankWarning::EmptyPool {
        metric_key: metric_key.to_string(),
        scope,
    }
}

/// Encoded facts keyed by subject, then metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactSheet {
    facts: BTreeMap<SubjectId, BTreeMap<String, RankedFact>>,
}

impl FactSheet {
    pub fn insert(&mut self, subject_id: SubjectId, metric_key: &str, fact: RankedFact) {
        self.facts
            .entry(subject_id)
            .or_default()
            .insert(metric_key.to_string(), fact);
    }

    pub fn get(&self, subject_id: SubjectId, metric_key: &str) -> Option<&RankedFact> {
        self.facts.get(&subject_id)?.get(metric_key)
    }

    pub fn subject(&self, subject_id: SubjectId) -> Option<&BTreeMap<String, RankedFact>> {
        self.facts.get(&subject_id)
    }

    pub fn subjects(&self) -> impl Iterator<Item = SubjectId> + '_ {
        self.facts.keys().copied()
    }

    pub fn retain_subjects(&mut self, keep: &HashSet<SubjectId>) {
        self.facts.retain(|id, _| keep.contains(id));
    }

    pub fn len(&self) -> usize {
        self.facts.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The wire form handed to narrative generation.
    pub fn encoded(&self) -> BTreeMap<SubjectId, BTreeMap<String, String>> {
        self.facts
            .iter()
            .map(|(id, metrics)| {
                let row = metrics
                    .iter()
                    .map(|(key, fact)| (key.clone(), fact.encode()))
                    .collect();
                (*id, row)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RankReport {
    pub sheet: FactSheet,
    pub metrics: usize,
    pub warnings: Vec<RankWarning>,
}

/// Ranks every metric present in `records`. Metrics are independent and run
/// in parallel; only the registry and threshold table are shared.
pub fn rank_all(
    records: &[StatRecord],
    registry: &MetricRegistry,
    thresholds: &ZoneThresholds,
) -> Result<RankReport, RankError> {
    let mut by_metric: BTreeMap<&str, Vec<&StatRecord>> = BTreeMap::new();
    for record in records {
        by_metric
            .entry(record.metric_key.as_str())
            .or_default()
            .push(record);
    }

    let rankings = by_metric
        .into_par_iter()
        .map(|(key, group)| rank_metric(group, &registry.spec(key), thresholds))
        .collect::<Result<Vec<_>, _>>()?;

    let mut report = RankReport {
        metrics: rankings.len(),
        ..RankReport::default()
    };
    for ranking in rankings {
        for (subject_id, fact) in ranking.facts {
            report.sheet.insert(subject_id, &ranking.metric_key, fact);
        }
        report.warnings.extend(ranking.warnings);
    }
    Ok(report)
}
