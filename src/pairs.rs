//! # Pairwise association over the strict upper triangle of items
//!
//! Every unordered pair `{a, b}` is visited exactly once, as `(a, b)` with
//! `a < b` in item order (items are sorted lexicographically by id, so index
//! order and id order agree). Self pairs never occur.
//!
//! ## Triangular block decomposition
//!
//! The N×N pair space is tiled into square blocks of `block` items per side.
//! Only blocks on or above the diagonal (`row_block <= col_block`) hold pairs
//! with `a < b`; diagonal blocks are themselves triangular. Blocks are scored
//! independently on the rayon pool and concatenated in block order, so the
//! output does not depend on the number of threads.
//!
//! ```text
//!          b0   b1   b2
//!   b0  [ ◸ ][ ■ ][ ■ ]
//!   b1       [ ◸ ][ ■ ]
//!   b2            [ ◸ ]
//! ```

use std::ops::Range;

use rayon::prelude::*;

use log::{debug, info, trace};

use crate::contingency::ContingencyTable;
use crate::interactions::ItemUserIndex;
use crate::params::{PipelineParams, RoundingMode, UndefinedAssociationPolicy};

/// Phi score of one unordered item pair, `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemPairScore {
    pub a: usize,
    pub b: usize,
    pub phi: f64,
}

/// One tile of the pair space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairBlock {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl PairBlock {
    /// Pairs `(a, b)` with `a < b` inside this block, row-major.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.clone().flat_map(move |a| {
            let start = self.cols.start.max(a + 1);
            (start..self.cols.end).map(move |b| (a, b))
        })
    }

    pub fn is_diagonal(&self) -> bool {
        self.rows == self.cols
    }
}

/// Tile the strict upper triangle of an `n × n` pair space.
pub fn triangular_blocks(n: usize, block: usize) -> Vec<PairBlock> {
    assert!(block > 0, "block size must be positive");
    let n_blocks = n.div_ceil(block);
    let span = |k: usize| (k * block)..((k + 1) * block).min(n);

    let mut blocks = Vec::with_capacity(n_blocks * (n_blocks + 1) / 2);
    for rb in 0..n_blocks {
        for cb in rb..n_blocks {
            blocks.push(PairBlock {
                rows: span(rb),
                cols: span(cb),
            });
        }
    }
    blocks
}

/// Output of the association stage.
#[derive(Clone, Debug, Default)]
pub struct PairScores {
    /// Defined scores in `(a, b)` lexicographic order
    pub scores: Vec<ItemPairScore>,
    /// Pairs visited
    pub considered: usize,
    /// Pairs dropped for a zero marginal
    pub undefined: usize,
}

/// Scores all item pairs of an index.
///
/// The index carries the global user count; it is borrowed read-only for the
/// whole stage.
pub struct PairwiseAssociation<'a> {
    index: &'a ItemUserIndex,
    rounding: RoundingMode,
    decimals: u32,
    block: usize,
    undefined_policy: UndefinedAssociationPolicy,
}

impl<'a> PairwiseAssociation<'a> {
    pub fn new(index: &'a ItemUserIndex, params: &PipelineParams) -> Self {
        Self {
            index,
            rounding: params.rounding,
            decimals: params.decimals,
            block: params.pair_block_size,
            undefined_policy: params.undefined_association,
        }
    }

    /// Contingency table for items `a` and `b`.
    pub fn table(&self, a: usize, b: usize) -> ContingencyTable {
        ContingencyTable::from_sorted(
            self.index.users_of(a),
            self.index.users_of(b),
            self.index.n_users(),
        )
    }

    /// Rounded phi for one pair, `None` when the association is undefined.
    pub fn score(&self, a: usize, b: usize) -> Option<f64> {
        self.table(a, b).rounded_phi(self.rounding, self.decimals)
    }

    fn score_block(&self, block: &PairBlock) -> (Vec<ItemPairScore>, usize, usize) {
        let mut out = Vec::new();
        let mut considered = 0usize;
        let mut undefined = 0usize;
        for (a, b) in block.pairs() {
            considered += 1;
            match self.score(a, b) {
                Some(phi) => out.push(ItemPairScore { a, b, phi }),
                None => match self.undefined_policy {
                    UndefinedAssociationPolicy::Exclude => {
                        trace!(
                            "Excluding ({}, {}): undefined association",
                            self.index.item(a),
                            self.index.item(b)
                        );
                        undefined += 1;
                    }
                },
            }
        }
        (out, considered, undefined)
    }

    /// Score every unordered pair once.
    pub fn compute(&self) -> PairScores {
        let n = self.index.n_items();
        let blocks = triangular_blocks(n, self.block);
        info!(
            "Scoring {} item pairs over {} blocks (block size {})",
            n * n.saturating_sub(1) / 2,
            blocks.len(),
            self.block
        );
        debug!(
            "Association parameters: n_users={}, rounding={}, decimals={}",
            self.index.n_users(),
            self.rounding,
            self.decimals
        );

        let per_block: Vec<(Vec<ItemPairScore>, usize, usize)> = blocks
            .par_iter()
            .map(|block| self.score_block(block))
            .collect();

        let mut result = PairScores::default();
        for (scores, considered, undefined) in per_block {
            result.scores.extend(scores);
            result.considered += considered;
            result.undefined += undefined;
        }
        // block order is row-block major, restore global (a, b) order
        result
            .scores
            .par_sort_unstable_by(|x, y| (x.a, x.b).cmp(&(y.a, y.b)));

        info!(
            "Pair scoring done: {} defined, {} excluded as undefined",
            result.scores.len(),
            result.undefined
        );
        result
    }
}
