use super::*;
use crate::codec::CustomPayloadField;
use crate::error::{Error, ErrorKind};
use crate::restapi::{Seasonality, Threshold};
use crate::types::Severity;
use pretty_assertions::assert_eq;
use serde::Serialize;
use test_case::test_case;

#[derive(Debug, Default, Serialize)]
struct Block {
    a: Option<String>,
    b: Option<i64>,
}

#[derive(Debug, Default, Serialize)]
struct Marker {}

fn block(a: &str) -> Block {
    Block {
        a: Some(a.to_string()),
        b: None,
    }
}

fn field_of(err: Error) -> String {
    match err {
        Error::InvalidConfiguration { field, .. } => field,
        other => panic!("expected invalid configuration, got {other:?}"),
    }
}

// ============================================================================
// One-of groups
// ============================================================================

#[test]
fn test_is_set_rules() {
    assert!(!is_set::<Block>(None));
    assert!(!is_set(Some(&Block::default())));
    assert!(is_set(Some(&block("x"))));
    assert!(is_set(Some(&Marker {})));
}

#[test]
fn test_one_of_picks_single_set_block() {
    let first = block("first");
    let result = OneOf::new("rule")
        .variant("first", Some(&first), |b| Ok(b.a.clone()))
        .variant("second", None::<&Block>, |_| Ok(None))
        .required()
        .unwrap();
    assert_eq!(result.as_deref(), Some("first"));
}

#[test]
fn test_one_of_none_set_is_rejected() {
    let empty = Block::default();
    let err = OneOf::<()>::new("rule")
        .variant("first", Some(&empty), |_| Ok(()))
        .variant("second", None::<&Block>, |_| Ok(()))
        .required()
        .unwrap_err();
    assert!(err.to_string().contains("exactly one of first, second must be set"));
    assert_eq!(field_of(err), "rule");
}

#[test]
fn test_one_of_two_set_is_rejected() {
    let first = block("1");
    let second = block("2");
    let err = OneOf::<()>::new("rule")
        .variant("first", Some(&first), |_| Ok(()))
        .variant("second", Some(&second), |_| Ok(()))
        .required()
        .unwrap_err();
    assert!(err.to_string().contains("got first, second"));
}

#[test]
fn test_one_of_optional_allows_none() {
    let result = OneOf::<u8>::new("time_threshold")
        .variant("first", None::<&Block>, |_| Ok(1))
        .optional()
        .unwrap();
    assert_eq!(result, None);
}

#[test]
fn test_one_of_mapper_errors_propagate() {
    let first = block("x");
    let err = OneOf::<()>::new("rule")
        .variant("first", Some(&first), |_| {
            Err(Error::invalid_configuration("rule.first.a", "bad"))
        })
        .required()
        .unwrap_err();
    assert_eq!(field_of(err), "rule.first.a");
}

// ============================================================================
// Thresholds
// ============================================================================

#[test]
fn test_static_threshold_rounds_to_two_places() {
    let state = ThresholdState {
        static_threshold: Some(StaticThresholdState {
            operator: Some(">=".to_string()),
            value: Some(12.3456),
        }),
        ..Default::default()
    };
    let threshold = threshold_to_api("threshold", &state).unwrap();
    assert_eq!(threshold, Threshold::static_threshold(">=", 12.35));
}

#[test]
fn test_threshold_requires_exactly_one_variant() {
    let err = threshold_to_api("threshold", &ThresholdState::default()).unwrap_err();
    assert!(err.to_string().contains("static, adaptive_baseline, historic_baseline"));
}

#[test]
fn test_threshold_rejects_unknown_operator() {
    let state = ThresholdState {
        static_threshold: Some(StaticThresholdState {
            operator: Some("=>".to_string()),
            value: Some(1.0),
        }),
        ..Default::default()
    };
    let err = threshold_to_api("rule.threshold", &state).unwrap_err();
    assert_eq!(field_of(err), "rule.threshold.static.operator");
}

#[test]
fn test_adaptive_baseline_reads_back_rounded() {
    let threshold = Threshold::AdaptiveBaseline {
        operator: Some(">".to_string()),
        deviation_factor: Some(2.123456),
        adaptability: Some(0.5),
        seasonality: Some(Seasonality::Weekly),
    };
    let state = threshold_from_api(&threshold);
    let adaptive = state.adaptive_baseline.unwrap();
    assert_eq!(adaptive.deviation_factor, Some(2.1235));
    assert_eq!(adaptive.seasonality.as_deref(), Some("WEEKLY"));
    assert!(state.static_threshold.is_none());
}

#[test]
fn test_severity_thresholds_round_trip() {
    let state = SeverityThresholdsState {
        warning: None,
        critical: Some(ThresholdState {
            static_threshold: Some(StaticThresholdState {
                operator: Some(">".to_string()),
                value: Some(95.0),
            }),
            ..Default::default()
        }),
    };
    let api = severity_thresholds_to_api("thresholds", &state).unwrap();
    assert_eq!(api.keys().copied().collect::<Vec<_>>(), vec![Severity::Critical]);
    assert_eq!(severity_thresholds_from_api(&api), state);
}

#[test]
fn test_severity_thresholds_need_one_level() {
    let err =
        severity_thresholds_to_api("thresholds", &SeverityThresholdsState::default()).unwrap_err();
    assert_eq!(field_of(err), "thresholds");
}

// ============================================================================
// Custom payload fields
// ============================================================================

#[test]
fn test_custom_payload_fields_to_api() {
    let fields = vec![
        CustomPayloadFieldState {
            key: "team".to_string(),
            value: Some("sre".to_string()),
            dynamic_value: None,
        },
        CustomPayloadFieldState {
            key: "host".to_string(),
            value: None,
            dynamic_value: Some(DynamicValueState {
                key: None,
                tag_name: "host.name".to_string(),
            }),
        },
    ];
    let api = custom_payload_fields_to_api(Some(&fields)).unwrap();
    assert_eq!(
        api,
        vec![
            CustomPayloadField::static_string("team", "sre"),
            CustomPayloadField::dynamic("host", "host.name", None),
        ]
    );
    assert_eq!(custom_payload_fields_from_api(&api), Some(fields));
}

#[test]
fn test_custom_payload_field_needs_one_value() {
    let fields = vec![CustomPayloadFieldState {
        key: "team".to_string(),
        value: Some("sre".to_string()),
        dynamic_value: Some(DynamicValueState {
            key: None,
            tag_name: "x".to_string(),
        }),
    }];
    let err = custom_payload_fields_to_api(Some(&fields)).unwrap_err();
    assert_eq!(field_of(err), "custom_payload_field[0]");
}

#[test]
fn test_empty_custom_payload_fields_read_as_none() {
    assert_eq!(custom_payload_fields_from_api(&[]), None);
    assert!(custom_payload_fields_to_api(None).unwrap().is_empty());
}

// ============================================================================
// Scalars and tag filters
// ============================================================================

#[test_case(1.005, 2, 1.0; "binary representation rounds down")]
#[test_case(2.5, 0, 3.0; "half away from zero")]
#[test_case(-2.5, 0, -3.0; "negative")]
fn test_round_to(value: f64, places: i32, expected: f64) {
    assert_eq!(round_to(value, places), expected);
}

#[test]
fn test_validate_value() {
    assert_eq!(validate_value("op", ">", THRESHOLD_OPERATORS).unwrap(), ">");
    let err = validate_value("op", "!", THRESHOLD_OPERATORS).unwrap_err();
    assert!(err.to_string().contains("is not one of >, >=, <, <="));
}

#[test]
fn test_severity_mapping() {
    assert_eq!(severity_to_api("severity", "critical").unwrap(), 10);
    assert_eq!(severity_from_api(5).unwrap(), "warning");
    assert!(severity_to_api("severity", "minor").is_err());
}

#[test]
fn test_tag_filter_attribute_round_trip() {
    let wire = tag_filter_to_api("tag_filter", Some("a equals 'x' or b not_empty"))
        .unwrap()
        .unwrap();
    assert_eq!(
        tag_filter_from_api(Some(&wire)).unwrap().as_deref(),
        Some(r#"a EQUALS "x" OR b NOT_EMPTY"#)
    );
    assert_eq!(tag_filter_to_api("tag_filter", Some("  ")).unwrap(), None);
}

#[test]
fn test_tag_filter_attribute_reports_field() {
    let err = tag_filter_to_api("rule.tag_filter", Some("a EQUALS")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert!(err.to_string().contains("'rule.tag_filter'"));

    let err = tag_filter_to_api("tag_filter", Some("a EQUALS 'x")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert!(matches!(
        err,
        Error::Context { ref source, .. } if matches!(**source, Error::TagFilter { offset: 9, .. })
    ));
}

#[test]
fn test_require_helpers() {
    assert_eq!(require("name", Some(3)).unwrap(), 3);
    assert_eq!(field_of(require::<u8>("name", None).unwrap_err()), "name");
    assert!(require_str("label", " ").is_err());
}
