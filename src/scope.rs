use std::collections::HashMap;

use crate::record::{ConferenceId, StatRecord, SubjectId};

/// National and conference pools for one target subject.
#[derive(Debug, Clone)]
pub struct ScopePools<'a> {
    pub national: Vec<&'a StatRecord>,
    pub conference: Vec<&'a StatRecord>,
}

/// Splits an already-qualified pool for one metric. Run after zone filtering
/// so ineligible subjects never hold a slot in either scope.
pub fn partition<'a>(pool: &[&'a StatRecord], conference_id: ConferenceId) -> ScopePools<'a> {
    ScopePools {
        national: pool.to_vec(),
        conference: pool
            .iter()
            .copied()
            .filter(|r| r.conference_id == conference_id)
            .collect(),
    }
}

/// Every conference's pool at once; each group equals `partition(..).conference`
/// for any of its members.
pub fn group_by_conference<'a>(
    pool: &[&'a StatRecord],
) -> HashMap<ConferenceId, Vec<&'a StatRecord>> {
    let mut out: HashMap<ConferenceId, Vec<&'a StatRecord>> = HashMap::new();
    for &record in pool {
        out.entry(record.conference_id).or_default().push(record);
    }
    out
}

pub fn value_pairs(pool: &[&StatRecord]) -> Vec<(SubjectId, f64)> {
    pool.iter().map(|r| (r.subject_id, r.value)).collect()
}
