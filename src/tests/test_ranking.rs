use crate::interactions::ItemUserIndex;
use crate::pairs::PairwiseAssociation;
use crate::params::TieBreak;
use crate::ranking::{RankedNeighbor, Recommendation, TopKRanker};
use crate::similarity::{AdjacencyEntry, SimilarityMatrix};
use crate::tests::{default_params, init, WXYZ_LINES};

fn entry(neighbor: usize, phi: f64) -> AdjacencyEntry {
    AdjacencyEntry { neighbor, phi }
}

#[test]
fn test_rank_descending_and_truncated() {
    let ranker = TopKRanker::new(2, TieBreak::ByIdAscending);
    let row = [entry(0, 0.1), entry(1, 0.9), entry(2, -0.4), entry(3, 0.5)];
    assert_eq!(ranker.rank(&row), vec![entry(1, 0.9), entry(3, 0.5)]);
}

#[test]
fn test_ties_resolved_by_id_ascending() {
    let ranker = TopKRanker::new(3, TieBreak::ByIdAscending);
    // input order deliberately scrambled
    let row = [entry(7, 0.3), entry(2, 0.3), entry(5, 0.8), entry(4, 0.3)];
    assert_eq!(
        ranker.rank(&row),
        vec![entry(5, 0.8), entry(2, 0.3), entry(4, 0.3)]
    );
}

#[test]
fn test_fewer_neighbors_than_k() {
    let ranker = TopKRanker::new(5, TieBreak::ByIdAscending);
    let row = [entry(1, -0.2), entry(0, 0.2)];
    assert_eq!(ranker.rank(&row), vec![entry(0, 0.2), entry(1, -0.2)]);
    assert!(ranker.rank(&[]).is_empty());
}

#[test]
#[should_panic(expected = "top-k must be at least 1")]
fn test_zero_k_rejected() {
    TopKRanker::new(0, TieBreak::ByIdAscending);
}

#[test]
fn test_slots_mark_missing_neighbors() {
    let rec = Recommendation::new(
        "A".to_string(),
        vec![RankedNeighbor { item: "B".to_string(), phi: 1.0 }],
        3,
    );
    let slots = rec.slots();
    assert_eq!(slots.len(), 3);
    assert_eq!(slots[0].map(|n| n.item.as_str()), Some("B"));
    assert!(slots[1].is_none());
    assert!(slots[2].is_none());
    assert_eq!(rec.top().map(|n| n.phi), Some(1.0));
}

#[test]
fn test_rank_all_resolves_names() {
    init();
    let index = ItemUserIndex::from_lines(WXYZ_LINES, &default_params()).unwrap().0;
    let pairs = PairwiseAssociation::new(&index, &default_params()).compute();
    let matrix = SimilarityMatrix::from_pair_scores(&pairs.scores, index.n_items());

    let recs = TopKRanker::new(2, TieBreak::ByIdAscending).rank_all(&matrix, &index);
    let names = |r: &Recommendation| -> Vec<(String, f64)> {
        r.neighbors.iter().map(|n| (n.item.clone(), n.phi)).collect()
    };

    assert_eq!(recs.len(), 4);
    // W ties at 0.0 with everyone: id order decides
    assert_eq!(recs[0].item, "W");
    assert_eq!(names(&recs[0]), vec![("X".to_string(), 0.0), ("Y".to_string(), 0.0)]);
    assert_eq!(names(&recs[1]), vec![("Y".to_string(), 1.0), ("W".to_string(), 0.0)]);
    assert_eq!(names(&recs[2]), vec![("X".to_string(), 1.0), ("W".to_string(), 0.0)]);
    assert_eq!(names(&recs[3]), vec![("W".to_string(), 0.0), ("X".to_string(), -1.0)]);
}
