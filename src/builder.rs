use crate::core::{PairStats, PhiSpace};
use crate::errors::PhiError;
use crate::interactions::ItemUserIndex;
use crate::pairs::PairwiseAssociation;
use crate::params::{MalformedPolicy, PipelineParams, RoundingMode, TieBreak};
use crate::ranking::TopKRanker;
use crate::similarity::SimilarityMatrix;

// Add logging
use log::{debug, info, trace};

pub struct PhiSpaceBuilder {
    params: PipelineParams,
}

impl Default for PhiSpaceBuilder {
    fn default() -> Self {
        debug!("Creating PhiSpaceBuilder with default parameters");
        Self {
            params: PipelineParams::default(),
        }
    }
}

impl PhiSpaceBuilder {
    pub fn new() -> Self {
        info!("Initializing new PhiSpaceBuilder");
        Self::default()
    }

    // -------------------- Configuration --------------------

    /// Replace every parameter at once, e.g. with a loaded JSON config.
    pub fn with_params(mut self, params: PipelineParams) -> Self {
        info!("Using provided pipeline parameters: {:?}", params);
        self.params = params;
        self
    }

    /// Field separator between user and item on each line (default `:`).
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.params.delimiter = delimiter.into();
        info!("Setting delimiter: {:?}", self.params.delimiter);
        self
    }

    /// Number of neighbors kept per item (default 2).
    pub fn with_top_k(mut self, k: usize) -> Self {
        info!("Setting top-k: {}", k);
        self.params.top_k = k;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        info!("Setting tie break: {:?}", tie_break);
        self.params.tie_break = tie_break;
        self
    }

    /// Abort on the first malformed line instead of skipping it.
    pub fn with_strict_parsing(mut self, strict: bool) -> Self {
        info!("Setting strict parsing: {}", strict);
        self.params.malformed = if strict {
            MalformedPolicy::Strict
        } else {
            MalformedPolicy::Skip
        };
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode, decimals: u32) -> Self {
        info!("Setting rounding: {} to {} decimals", rounding, decimals);
        self.params.rounding = rounding;
        self.params.decimals = decimals;
        self
    }

    /// Side length of the blocks used to split the pair space across workers.
    pub fn with_pair_block_size(mut self, block: usize) -> Self {
        info!("Setting pair block size: {}", block);
        self.params.pair_block_size = block;
        self
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    // -------------------- Build --------------------

    /// Run the whole pipeline over raw lines.
    ///
    /// Stages, each fully materialised before the next starts:
    ///   1) interaction index + distinct user count
    ///   2) phi for every unordered item pair (undefined pairs excluded)
    ///   3) symmetric similarity matrix
    ///   4) top-k ranking per item
    ///
    /// Returns the ranked [`PhiSpace`] and the unranked [`SimilarityMatrix`].
    pub fn build<I, S>(self, lines: I) -> Result<(PhiSpace, SimilarityMatrix), PhiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.params.validate()?;
        debug!("Build configuration: {:?}", self.params);

        // 1) Interaction index
        let (index, index_stats) = ItemUserIndex::from_lines(lines, &self.params)?;
        if index.is_empty() {
            info!("No interactions accepted, producing an empty PhiSpace");
        }

        // 2) Pairwise association
        let scores = PairwiseAssociation::new(&index, &self.params).compute();
        let pair_stats = PairStats {
            considered: scores.considered,
            defined: scores.scores.len(),
            undefined: scores.undefined,
        };
        trace!("Pair stats: {:?}", pair_stats);

        // 3) Symmetric sparse matrix
        let matrix = SimilarityMatrix::from_pair_scores(&scores.scores, index.n_items());
        debug_assert!(matrix.is_symmetric());

        // 4) Top-k
        let recommendations = TopKRanker::from_params(&self.params).rank_all(&matrix, &index);

        info!(
            "PhiSpace built: {} items, {} users, {} with recommendations",
            index.n_items(),
            index.n_users(),
            recommendations.iter().filter(|r| !r.is_empty()).count()
        );

        Ok((
            PhiSpace {
                index,
                params: self.params,
                index_stats,
                pair_stats,
                recommendations,
            },
            matrix,
        ))
    }
}
