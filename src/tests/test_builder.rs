use crate::builder::PhiSpaceBuilder;
use crate::core::PairStats;
use crate::errors::PhiError;
use crate::params::{MalformedPolicy, PipelineParams};
use crate::ranking::Recommendation;
use crate::tests::{init, ABC_LINES, WXYZ_LINES, XYZ_LINES};

fn pairs_of(rec: &Recommendation) -> Vec<(&str, f64)> {
    rec.neighbors.iter().map(|n| (n.item.as_str(), n.phi)).collect()
}

#[test]
fn test_reference_scenario() {
    init();
    let (space, matrix) = PhiSpaceBuilder::new().build(ABC_LINES).unwrap();

    assert_eq!(space.n_items(), 3);
    assert_eq!(space.n_users(), 3);
    assert_eq!(
        space.pair_stats(),
        &PairStats { considered: 3, defined: 3, undefined: 0 }
    );
    assert!(matrix.is_symmetric());

    let a = space.recommendations_for("A").unwrap();
    assert_eq!(pairs_of(a), vec![("B", 1.0), ("C", -1.0)]);
    let b = space.recommendations_for("B").unwrap();
    assert_eq!(pairs_of(b), vec![("A", 1.0), ("C", -1.0)]);
    let c = space.recommendations_for("C").unwrap();
    assert_eq!(pairs_of(c), vec![("A", -1.0), ("B", -1.0)]);
}

#[test]
fn test_top_one() {
    let (space, _) = PhiSpaceBuilder::new().with_top_k(1).build(ABC_LINES).unwrap();
    for rec in &space {
        assert_eq!(rec.neighbors.len(), 1);
        assert_eq!(rec.k(), 1);
    }
    assert_eq!(space.recommendations_for("A").unwrap().top().unwrap().item, "B");
    assert_eq!(space.recommendations_for("B").unwrap().top().unwrap().item, "A");
}

#[test]
fn test_undefined_item_gets_empty_list() {
    init();
    let (space, matrix) = PhiSpaceBuilder::new().build(XYZ_LINES).unwrap();

    assert_eq!(space.pair_stats().undefined, 2);
    let z = space.recommendations_for("Z").unwrap();
    assert!(z.is_empty());
    assert_eq!(z.slots().len(), 2);
    assert!(z.slots().iter().all(Option::is_none));
    assert!(matrix.neighbors(2).is_empty());

    let x = space.recommendations_for("X").unwrap();
    assert_eq!(pairs_of(x), vec![("Y", 1.0)]);
    assert_eq!(space.non_empty().count(), 2);
}

#[test]
fn test_every_item_present_once() {
    let (space, _) = PhiSpaceBuilder::new().build(WXYZ_LINES).unwrap();
    let items: Vec<&str> = space.iter().map(|r| r.item.as_str()).collect();
    assert_eq!(items, vec!["W", "X", "Y", "Z"]);
}

#[test]
fn test_custom_delimiter_and_duplicates() {
    let lines = "alice|dune\nbob|dune\nalice|dune\nalice|emma\nbob|emma\ncarol|faust";
    let (space, _) = PhiSpaceBuilder::new()
        .with_delimiter("|")
        .build(lines.lines())
        .unwrap();

    assert_eq!(space.index_stats().duplicates, 1);
    assert_eq!(space.index_stats().distinct_records, 5);
    let dune = space.recommendations_for("dune").unwrap();
    assert_eq!(pairs_of(dune), vec![("emma", 1.0), ("faust", -1.0)]);
}

#[test]
fn test_empty_input_is_not_an_error() {
    let lines: [&str; 0] = [];
    let (space, matrix) = PhiSpaceBuilder::new().build(lines).unwrap();
    assert_eq!(space.n_items(), 0);
    assert!(space.recommendations().is_empty());
    assert_eq!(matrix.n_items(), 0);
}

#[test]
fn test_single_item() {
    let (space, _) = PhiSpaceBuilder::new().build(["u1:A", "u2:A"]).unwrap();
    assert_eq!(space.n_items(), 1);
    assert!(space.recommendations_for("A").unwrap().is_empty());
    assert_eq!(space.pair_stats().considered, 0);
}

#[test]
fn test_invalid_top_k() {
    match PhiSpaceBuilder::new().with_top_k(0).build(ABC_LINES) {
        Err(PhiError::InvalidConfig { param, .. }) => assert_eq!(param, "top_k"),
        other => panic!("expected InvalidConfig, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_invalid_delimiter() {
    match PhiSpaceBuilder::new().with_delimiter("").build(ABC_LINES) {
        Err(PhiError::InvalidConfig { param, .. }) => assert_eq!(param, "delimiter"),
        other => panic!("expected InvalidConfig, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_strict_parsing() {
    init();
    let lines = ["u1:A", "u2-A", "u2:B"];

    let (space, _) = PhiSpaceBuilder::new().build(lines).unwrap();
    assert_eq!(space.index_stats().malformed, 1);

    let err = PhiSpaceBuilder::new()
        .with_strict_parsing(true)
        .build(lines)
        .err()
        .unwrap();
    assert!(matches!(err, PhiError::MalformedRecord { line: 2, .. }));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_with_params() {
    let params = PipelineParams {
        top_k: 3,
        malformed: MalformedPolicy::Strict,
        ..PipelineParams::default()
    };
    let builder = PhiSpaceBuilder::new().with_params(params.clone());
    assert_eq!(builder.params(), &params);

    let (space, _) = builder.build(WXYZ_LINES).unwrap();
    assert_eq!(space.params().top_k, 3);
    assert!(space.iter().all(|r| r.neighbors.len() == 3));
}

#[test]
fn test_deterministic_across_runs_and_blocks() {
    init();
    let lines: Vec<String> = (0..120)
        .map(|i| format!("user{}:book{}", (i * 13) % 17, (i * 5) % 23))
        .collect();

    let (first, _) = PhiSpaceBuilder::new().with_top_k(3).build(&lines).unwrap();
    for block in [1, 4, 64] {
        let (again, _) = PhiSpaceBuilder::new()
            .with_top_k(3)
            .with_pair_block_size(block)
            .build(&lines)
            .unwrap();
        assert_eq!(first.recommendations(), again.recommendations(), "block {}", block);
    }
}
