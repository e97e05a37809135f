use crate::errors::PhiError;
use crate::params::{
    MalformedPolicy, PipelineParams, RoundingMode, TieBreak, UndefinedAssociationPolicy,
};

#[test]
fn test_defaults() {
    let p = PipelineParams::default();
    assert_eq!(p.delimiter, ":");
    assert_eq!(p.top_k, 2);
    assert_eq!(p.tie_break, TieBreak::ByIdAscending);
    assert_eq!(p.undefined_association, UndefinedAssociationPolicy::Exclude);
    assert_eq!(p.malformed, MalformedPolicy::Skip);
    assert_eq!(p.rounding, RoundingMode::HalfEven);
    assert_eq!(p.decimals, 2);
    assert!(p.validate().is_ok());
    assert!(!p.strict());
}

#[test]
fn test_json_partial_config() {
    let p = PipelineParams::from_json_str(
        r#"{ "top_k": 3, "delimiter": ",", "malformed": "strict", "rounding": "half-away-from-zero" }"#,
    )
    .unwrap();
    assert_eq!(p.top_k, 3);
    assert_eq!(p.delimiter, ",");
    assert!(p.strict());
    assert_eq!(p.rounding, RoundingMode::HalfAwayFromZero);
    assert_eq!(p.decimals, 2);
    assert_eq!(p.pair_block_size, 64);
}

#[test]
fn test_json_round_trip_of_defaults() {
    let json = serde_json::to_string(&PipelineParams::default()).unwrap();
    assert!(json.contains("\"tie_break\":\"by-id-ascending\""));
    assert!(json.contains("\"undefined_association\":\"exclude\""));
    assert_eq!(PipelineParams::from_json_str(&json).unwrap(), PipelineParams::default());
}

#[test]
fn test_json_unknown_field_rejected() {
    let err = PipelineParams::from_json_str(r#"{ "topk": 3 }"#).unwrap_err();
    assert!(matches!(err, PhiError::Json(_)));
}

#[test]
fn test_json_invalid_values_rejected() {
    let err = PipelineParams::from_json_str(r#"{ "top_k": 0 }"#).unwrap_err();
    assert!(matches!(err, PhiError::InvalidConfig { .. }));

    let err = PipelineParams::from_json_str(r#"{ "decimals": 9 }"#).unwrap_err();
    match err {
        PhiError::InvalidConfig { param, value, .. } => {
            assert_eq!(param, "decimals");
            assert_eq!(value, "9");
        }
        other => panic!("unexpected {:?}", other),
    }

    let err = PipelineParams::from_json_str(r#"{ "pair_block_size": 0 }"#).unwrap_err();
    assert!(err.to_string().contains("pair_block_size"));
}

#[test]
fn test_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    std::fs::write(&path, r#"{ "top_k": 5 }"#).unwrap();
    assert_eq!(PipelineParams::from_json_file(&path).unwrap().top_k, 5);

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        PipelineParams::from_json_file(&missing),
        Err(PhiError::Io(_))
    ));
}

#[test]
fn test_rounding_mode_parsing() {
    assert_eq!("half-even".parse::<RoundingMode>().unwrap(), RoundingMode::HalfEven);
    assert_eq!("AWAY".parse::<RoundingMode>().unwrap(), RoundingMode::HalfAwayFromZero);
    assert!("ceil".parse::<RoundingMode>().is_err());
    assert_eq!(RoundingMode::HalfAwayFromZero.to_string(), "half-away-from-zero");
}
