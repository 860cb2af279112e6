//! Contract Test: Weighted Collection Codec
//!
//! Constraints verified:
//! - decode(encode(seq)) == seq and encode regenerates weights 0..N-1
//! - Duplicates, out-of-range weights and gaps are rejected as a whole
//! - Empty collections pass through both directions
//! - Every rule family behaves the same

use striketracker_core::codec::{self, RuleFamily, Weighted};
use striketracker_core::models::StaticHeader;
use striketracker_core::resources::blocks::StaticHeaderBlock;
use striketracker_core::Error;

fn header(http: &str) -> StaticHeaderBlock {
    StaticHeaderBlock {
        http: http.to_string(),
        ..Default::default()
    }
}

#[test]
fn round_trip_preserves_positions() {
    for len in 0..8usize {
        let seq: Vec<String> = (0..len).map(|i| format!("rule-{i}")).collect();
        let encoded = codec::encode(seq.clone());
        let weights: Vec<i64> = encoded.iter().map(|r| r.weight).collect();
        assert_eq!(weights, (0..len as i64).collect::<Vec<_>>());

        for family in RuleFamily::ALL {
            assert_eq!(codec::decode(family, encoded.clone()).unwrap(), seq);
        }
    }
}

#[test]
fn decode_is_independent_of_input_order() {
    let mut records = codec::encode(vec!["A", "B", "C", "D"]);
    records.reverse();
    records.swap(0, 2);
    assert_eq!(
        codec::decode(RuleFamily::OriginPullPolicy, records).unwrap(),
        vec!["A", "B", "C", "D"]
    );
}

#[test]
fn remote_to_local_scenario() {
    let remote = vec![StaticHeader::from(header("X")), StaticHeader::from(header("Y"))];
    let local: Vec<Weighted<StaticHeaderBlock>> = codec::encode_from(remote);
    assert_eq!(local, vec![Weighted::new(0, header("X")), Weighted::new(1, header("Y"))]);
}

#[test]
fn local_to_remote_scenario() {
    let local = vec![Weighted::new(1, header("Y")), Weighted::new(0, header("X"))];
    let remote: Vec<StaticHeader> = codec::decode_into(RuleFamily::StaticHeader, local).unwrap();
    let http: Vec<&str> = remote.iter().map(|h| h.http.as_str()).collect();
    assert_eq!(http, vec!["X", "Y"]);
}

#[test]
fn every_violation_is_a_configuration_error() {
    let cases: Vec<Vec<Weighted<&str>>> = vec![
        vec![Weighted::new(0, "A"), Weighted::new(0, "B")],
        vec![Weighted::new(0, "A"), Weighted::new(2, "B")],
        vec![Weighted::new(-1, "A")],
        vec![Weighted::new(0, "A"), Weighted::new(1, "B"), Weighted::new(3, "C")],
    ];
    for records in cases {
        let err = codec::decode(RuleFamily::ClientResponseEdgeRule, records).unwrap_err();
        assert!(err.is_configuration(), "{err}");
        assert!(err.to_string().contains("client_response_edge_rule"), "{err}");
    }
}

#[test]
fn negative_weight_reports_collection_size() {
    let err = codec::decode(RuleFamily::OriginRequestEdgeRule, vec![Weighted::new(-1, ())])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::WeightOutOfRange {
            family: RuleFamily::OriginRequestEdgeRule,
            weight: -1,
            len: 1
        }
    ));
}

#[test]
fn empty_collections() {
    let empty: Vec<Weighted<u8>> = Vec::new();
    assert!(codec::decode(RuleFamily::StaticHeader, empty).unwrap().is_empty());
    assert!(codec::encode(Vec::<u8>::new()).is_empty());
}
