//! Top-K selection over a similarity matrix.
//!
//! Ordering is fully deterministic: phi descending, then neighbor id
//! ascending. Neighbor indices follow lexicographic id order, so the secondary
//! key compares indices.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::Serialize;

use log::{debug, info};

use crate::interactions::ItemUserIndex;
use crate::params::{PipelineParams, TieBreak};
use crate::similarity::{AdjacencyEntry, SimilarityMatrix};

/// A ranked neighbor, resolved to its item id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedNeighbor {
    pub item: String,
    pub phi: f64,
}

/// Up to `k` most associated items for one source item.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub item: String,
    pub neighbors: Vec<RankedNeighbor>,
    #[serde(skip)]
    k: usize,
}

impl Recommendation {
    pub fn new(item: String, neighbors: Vec<RankedNeighbor>, k: usize) -> Self {
        debug_assert!(neighbors.len() <= k);
        Self { item, neighbors, k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Exactly `k` slots; slots past the available neighbors are `None`.
    pub fn slots(&self) -> Vec<Option<&RankedNeighbor>> {
        (0..self.k).map(|i| self.neighbors.get(i)).collect()
    }

    pub fn top(&self) -> Option<&RankedNeighbor> {
        self.neighbors.first()
    }
}

/// Sorts neighbor lists and keeps the first `k`.
#[derive(Clone, Copy, Debug)]
pub struct TopKRanker {
    k: usize,
    tie_break: TieBreak,
}

impl TopKRanker {
    pub fn new(k: usize, tie_break: TieBreak) -> Self {
        assert!(k > 0, "top-k must be at least 1");
        Self { k, tie_break }
    }

    pub fn from_params(params: &PipelineParams) -> Self {
        Self::new(params.top_k, params.tie_break)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn compare(&self, x: &AdjacencyEntry, y: &AdjacencyEntry) -> Ordering {
        let by_score = y.phi.partial_cmp(&x.phi).unwrap_or(Ordering::Equal);
        match self.tie_break {
            TieBreak::ByIdAscending => by_score.then_with(|| x.neighbor.cmp(&y.neighbor)),
        }
    }

    /// Rank one raw neighbor list, keeping at most `k` entries.
    pub fn rank(&self, row: &[AdjacencyEntry]) -> Vec<AdjacencyEntry> {
        let mut ranked = row.to_vec();
        ranked.sort_unstable_by(|x, y| self.compare(x, y));
        ranked.truncate(self.k);
        ranked
    }

    /// Rank every item of `matrix`, resolving indices through `index`.
    ///
    /// The result has one entry per item, in item order, including items with
    /// no neighbors.
    pub fn rank_all(&self, matrix: &SimilarityMatrix, index: &ItemUserIndex) -> Vec<Recommendation> {
        assert_eq!(
            matrix.n_items(),
            index.n_items(),
            "similarity matrix and index disagree on item count"
        );
        info!("Ranking top-{} neighbors for {} items", self.k, matrix.n_items());

        let recs: Vec<Recommendation> = matrix
            .rows()
            .par_iter()
            .enumerate()
            .map(|(i, row)| {
                let neighbors = self
                    .rank(row)
                    .into_iter()
                    .map(|e| RankedNeighbor {
                        item: index.item(e.neighbor).to_string(),
                        phi: e.phi,
                    })
                    .collect();
                Recommendation::new(index.item(i).to_string(), neighbors, self.k)
            })
            .collect();

        debug!(
            "{} items have fewer than {} neighbors",
            recs.iter().filter(|r| r.neighbors.len() < self.k).count(),
            self.k
        );
        recs
    }
}
