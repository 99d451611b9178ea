use cbb_notes::error::FactParseError;
use cbb_notes::fact::{RankedFact, format_fact};

#[test]
fn canonical_encoding() {
    assert_eq!(format_fact(85.5, 1, Some(17), Some(2)), "85.5|17|2");
    assert_eq!(format_fact(0.589, 3, Some(5), Some(2)), "0.589|5|2");
    assert_eq!(format_fact(14.0, 1, Some(8), None), "14.0|8|_");
    assert_eq!(format_fact(23.5, 1, None, Some(3)), "23.5|_|3");
    assert_eq!(format_fact(31.0, 0, Some(1), Some(1)), "31|1|1");
}

#[test]
fn unranked_fact_keeps_value() {
    let fact = RankedFact::unranked(0.455, 3);
    assert!(!fact.is_ranked());
    assert_eq!(fact.to_string(), "0.455|_|_");
}

#[test]
fn parse_recovers_the_triple() {
    let facts = [
        RankedFact {
            value: 85.5,
            national_rank: Some(17),
            conference_rank: Some(2),
            precision: 1,
        },
        RankedFact {
            value: 0.412,
            national_rank: None,
            conference_rank: Some(1),
            precision: 3,
        },
        RankedFact::unranked(12.0, 1),
    ];
    for fact in facts {
        let parsed = RankedFact::parse(&fact.encode()).expect("encoded fact parses");
        assert_eq!(parsed, fact);
    }
}

#[test]
fn parse_rejects_malformed_strings() {
    assert_eq!(RankedFact::parse("85.5|17"), Err(FactParseError::FieldCount(2)));
    assert_eq!(RankedFact::parse("85.5|17|2|1"), Err(FactParseError::FieldCount(4)));
    assert_eq!(
        RankedFact::parse("abc|1|1"),
        Err(FactParseError::Value("abc".to_string()))
    );
    assert_eq!(
        RankedFact::parse("85.5|0|1"),
        Err(FactParseError::Rank("0".to_string()))
    );
    assert_eq!(
        RankedFact::parse("85.5||1"),
        Err(FactParseError::Rank(String::new()))
    );
}
