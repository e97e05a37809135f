//! # Symmetric sparse similarity matrix
//!
//! Each directed-once pair score `(a, b, phi)` is mirrored into both
//! `a → (b, phi)` and `b → (a, phi)`. Contributions are grouped per item in
//! parallel through a `DashMap` of buckets; bucket arrival order is irrelevant
//! because every list is sorted by neighbor index when the matrix is
//! materialised.
//!
//! Items without a defined pair keep an empty row. The diagonal is always
//! empty.

use dashmap::DashMap;
use rayon::prelude::*;
use sprs::{CsMat, TriMat};

use log::{debug, info, trace};

use crate::pairs::ItemPairScore;

/// One neighbor of an item in the similarity structure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdjacencyEntry {
    pub neighbor: usize,
    pub phi: f64,
}

/// Item × item phi scores as per-item adjacency lists.
#[derive(Clone, Debug, Default)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<AdjacencyEntry>>,
}

impl SimilarityMatrix {
    /// Mirror `scores` into a symmetric structure over `n_items` items.
    ///
    /// # Panics
    ///
    /// On a self pair or an item index outside `0..n_items`.
    pub fn from_pair_scores(scores: &[ItemPairScore], n_items: usize) -> Self {
        info!(
            "Building symmetric similarity matrix: {} items, {} pair scores",
            n_items,
            scores.len()
        );

        let buckets: DashMap<usize, Vec<AdjacencyEntry>> = DashMap::with_capacity(n_items);

        scores.par_iter().for_each(|s| {
            assert!(s.a != s.b, "self pair ({}, {}) in pair scores", s.a, s.b);
            assert!(
                s.a < n_items && s.b < n_items,
                "pair ({}, {}) out of bounds for {} items",
                s.a,
                s.b,
                n_items
            );
            buckets
                .entry(s.a)
                .or_default()
                .push(AdjacencyEntry { neighbor: s.b, phi: s.phi });
            buckets
                .entry(s.b)
                .or_default()
                .push(AdjacencyEntry { neighbor: s.a, phi: s.phi });
        });
        debug!("Grouped contributions into {} non-empty buckets", buckets.len());

        let mut rows: Vec<Vec<AdjacencyEntry>> = vec![Vec::new(); n_items];
        for (item, entries) in buckets.into_iter() {
            rows[item] = entries;
        }
        rows.par_iter_mut().for_each(|row| {
            row.sort_unstable_by_key(|e| e.neighbor);
        });

        let matrix = Self { rows };
        trace!(
            "Empty rows after mirroring: {}",
            matrix.rows.iter().filter(|r| r.is_empty()).count()
        );
        info!(
            "Similarity matrix built: {}×{} with {} stored entries",
            n_items,
            n_items,
            matrix.nnz()
        );
        matrix
    }

    pub fn n_items(&self) -> usize {
        self.rows.len()
    }

    /// Stored entries, both directions counted.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Raw neighbor list of item `i`, ascending by neighbor index.
    pub fn neighbors(&self, i: usize) -> &[AdjacencyEntry] {
        &self.rows[i]
    }

    pub fn rows(&self) -> &[Vec<AdjacencyEntry>] {
        &self.rows
    }

    /// Score between `a` and `b`, `None` if the pair was not emitted.
    pub fn get(&self, a: usize, b: usize) -> Option<f64> {
        self.rows
            .get(a)?
            .binary_search_by_key(&b, |e| e.neighbor)
            .ok()
            .map(|pos| self.rows[a][pos].phi)
    }

    /// True if every stored `(a, b, phi)` has a matching `(b, a, phi)`.
    pub fn is_symmetric(&self) -> bool {
        self.rows.iter().enumerate().all(|(a, row)| {
            row.iter()
                .all(|e| e.neighbor != a && self.get(e.neighbor, a) == Some(e.phi))
        })
    }

    /// Export as an `n_items × n_items` CSR matrix.
    pub fn to_csr(&self) -> CsMat<f64> {
        let n = self.n_items();
        let mut triplets = TriMat::with_capacity((n, n), self.nnz());
        for (a, row) in self.rows.iter().enumerate() {
            for e in row {
                triplets.add_triplet(a, e.neighbor, e.phi);
            }
        }
        let csr: CsMat<f64> = triplets.to_csr();
        debug!("Exported similarity matrix to CSR with {} non-zeros", csr.nnz());
        csr
    }
}
