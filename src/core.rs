//! PhiSpace: the result of one pipeline run.
//!
//! Holds the frozen interaction index, the run counters and one
//! [`Recommendation`] per item (items without neighbors included, with an
//! empty list).
//!
//! ```
//! use phispace::builder::PhiSpaceBuilder;
//!
//! // Z is read by every user, so its association with anything is undefined
//! let lines = ["u1:X", "u2:X", "u1:Y", "u2:Y", "u1:Z", "u2:Z", "u3:Z"];
//! let (space, _matrix) = PhiSpaceBuilder::new().with_top_k(1).build(lines).unwrap();
//!
//! let x = space.recommendations_for("X").unwrap();
//! assert_eq!(x.neighbors[0].item, "Y");
//! assert_eq!(x.neighbors[0].phi, 1.0);
//! assert!(space.recommendations_for("Z").unwrap().is_empty());
//! ```

use serde::Serialize;

use crate::interactions::{IndexStats, ItemUserIndex};
use crate::params::PipelineParams;
use crate::ranking::Recommendation;

/// Pair-stage counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PairStats {
    pub considered: usize,
    pub defined: usize,
    pub undefined: usize,
}

#[derive(Clone, Debug)]
pub struct PhiSpace {
    pub(crate) index: ItemUserIndex,
    pub(crate) params: PipelineParams,
    pub(crate) index_stats: IndexStats,
    pub(crate) pair_stats: PairStats,
    pub(crate) recommendations: Vec<Recommendation>,
}

impl PhiSpace {
    pub fn index(&self) -> &ItemUserIndex {
        &self.index
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn index_stats(&self) -> &IndexStats {
        &self.index_stats
    }

    pub fn pair_stats(&self) -> &PairStats {
        &self.pair_stats
    }

    pub fn n_items(&self) -> usize {
        self.index.n_items()
    }

    pub fn n_users(&self) -> usize {
        self.index.n_users()
    }

    /// All recommendations, one per item, in ascending item order.
    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn recommendations_for(&self, item_id: &str) -> Option<&Recommendation> {
        self.index
            .item_index(item_id)
            .map(|idx| &self.recommendations[idx])
    }

    /// Only items that received at least one recommendation.
    pub fn non_empty(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.iter().filter(|r| !r.is_empty())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recommendation> {
        self.recommendations.iter()
    }
}

impl<'a> IntoIterator for &'a PhiSpace {
    type Item = &'a Recommendation;
    type IntoIter = std::slice::Iter<'a, Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.recommendations.iter()
    }
}
