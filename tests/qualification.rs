use cbb_notes::error::{ConfigError, RankError};
use cbb_notes::qualify::{ZoneThreshold, ZoneThresholds, is_eligible, qualify};
use cbb_notes::record::StatRecord;
use cbb_notes::scope::{group_by_conference, partition};

fn c3(subject_id: u32, conference_id: u32, value: f64, attempts: Option<u32>) -> StatRecord {
    let record = StatRecord::new(subject_id, conference_id, "c3FgPct", value).unwrap();
    match attempts {
        Some(a) => record.with_attempts(a),
        None => record,
    }
}

#[test]
fn attempts_must_reach_threshold() {
    let threshold = ZoneThreshold {
        zone_key: "c3".to_string(),
        min_attempts: 10,
    };
    assert!(!is_eligible(&c3(1, 1, 0.45, Some(8)), &threshold));
    assert!(is_eligible(&c3(1, 1, 0.45, Some(10)), &threshold));
    assert!(is_eligible(&c3(1, 1, 0.45, Some(11)), &threshold));
    assert!(!is_eligible(&c3(1, 1, 0.45, None), &threshold));
}

#[test]
fn unzoned_metrics_always_qualify() {
    let thresholds = ZoneThresholds::default();
    let record = StatRecord::new(1, 1, "efgPct", 0.55).unwrap();
    assert_eq!(qualify(&record, None, &thresholds), Ok(true));
}

#[test]
fn unknown_zone_is_an_error_not_a_pass() {
    let thresholds = ZoneThresholds::new([("c3", 10)]).unwrap();
    let record = c3(1, 1, 0.45, Some(500));
    let err = qualify(&record, Some("atb3"), &thresholds).unwrap_err();
    assert_eq!(
        err,
        RankError::UnknownZone {
            metric_key: "c3FgPct".to_string(),
            zone: "atb3".to_string(),
        }
    );
}

#[test]
fn threshold_table_rejects_unknown_zone_keys() {
    let err = ZoneThresholds::new([("c3", 10), ("mid2", 5)]).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownZoneKey(zone) if zone == "mid2"));
}

#[test]
fn conference_pool_only_holds_peers() {
    let records = [
        c3(1, 10, 0.40, Some(20)),
        c3(2, 10, 0.35, Some(20)),
        c3(3, 20, 0.50, Some(20)),
    ];
    let pool: Vec<&StatRecord> = records.iter().collect();

    let pools = partition(&pool, 10);
    assert_eq!(pools.national.len(), 3);
    let ids: Vec<u32> = pools.conference.iter().map(|r| r.subject_id).collect();
    assert_eq!(ids, vec![1, 2]);

    let groups = group_by_conference(&pool);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[&20].len(), 1);
    let grouped: Vec<u32> = groups[&10].iter().map(|r| r.subject_id).collect();
    assert_eq!(grouped, ids);
}
