use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Add logging
use log::{debug, info};

use crate::errors::PhiError;

/// Secondary ordering applied when two neighbors carry the same rounded phi.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    #[default]
    ByIdAscending,
}

/// What happens to a pair whose contingency table has a zero marginal.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UndefinedAssociationPolicy {
    /// Drop the pair: it never reaches the similarity matrix.
    #[default]
    Exclude,
}

/// Handling of lines that do not split into `<user><delim><item>`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedPolicy {
    /// Skip the line, count it and keep going.
    #[default]
    Skip,
    /// Abort the run on the first malformed line.
    Strict,
}

/// Rounding applied to phi before ranking. Affects tie groups.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Banker's rounding: exact halves go to the even neighbour.
    #[default]
    HalfEven,
    /// Exact halves go away from zero.
    HalfAwayFromZero,
}

impl RoundingMode {
    /// Round `value` to `decimals` places.
    #[inline]
    pub fn round(self, value: f64, decimals: u32) -> f64 {
        let scale = 10f64.powi(decimals as i32);
        let scaled = value * scale;
        let r = match self {
            RoundingMode::HalfEven => scaled.round_ties_even(),
            RoundingMode::HalfAwayFromZero => scaled.round(),
        };
        r / scale
    }

    /// Round the exact ratio `numerator / denominator` to `decimals` places.
    ///
    /// Halves are detected in integer arithmetic, so a value like 46/80 is a
    /// true tie even though 0.575 has no exact binary form. Returns `None` if
    /// the scaled numerator does not fit in `u128`.
    pub fn round_ratio(
        self,
        numerator: i128,
        denominator: u128,
        decimals: u32,
    ) -> Option<f64> {
        if denominator == 0 {
            return None;
        }
        let scale = 10u128.checked_pow(decimals)?;
        let scaled = numerator.unsigned_abs().checked_mul(scale)?;
        let (quot, rem) = (scaled / denominator, scaled % denominator);

        let twice_rem = rem.checked_mul(2)?;
        let magnitude = match twice_rem.cmp(&denominator) {
            std::cmp::Ordering::Less => quot,
            std::cmp::Ordering::Greater => quot + 1,
            std::cmp::Ordering::Equal => match self {
                RoundingMode::HalfEven => quot + (quot & 1),
                RoundingMode::HalfAwayFromZero => quot + 1,
            },
        };

        let value = magnitude as f64 / scale as f64;
        Some(if numerator < 0 { -value } else { value })
    }
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "half-even" | "even" | "bankers" => Ok(RoundingMode::HalfEven),
            "half-away-from-zero" | "away" | "half-up" => Ok(RoundingMode::HalfAwayFromZero),
            other => Err(format!(
                "unknown rounding mode '{}', expected half-even or half-away-from-zero",
                other
            )),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::HalfEven => write!(f, "half-even"),
            RoundingMode::HalfAwayFromZero => write!(f, "half-away-from-zero"),
        }
    }
}

pub const MAX_DECIMALS: u32 = 6;

/// Parameters for one pipeline run.
///
/// Missing fields in a JSON config take the defaults below; unknown fields are
/// rejected.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineParams {
    pub delimiter: String,
    pub top_k: usize,
    pub tie_break: TieBreak,
    pub undefined_association: UndefinedAssociationPolicy,
    pub malformed: MalformedPolicy,
    pub rounding: RoundingMode,
    pub decimals: u32,
    /// Side length (in items) of a block in the triangular pair decomposition
    pub pair_block_size: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            delimiter: ":".to_string(),
            top_k: 2,
            tie_break: TieBreak::ByIdAscending,
            undefined_association: UndefinedAssociationPolicy::Exclude,
            malformed: MalformedPolicy::Skip,
            rounding: RoundingMode::HalfEven,
            decimals: 2,
            pair_block_size: 64,
        }
    }
}

impl PipelineParams {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), PhiError> {
        if self.delimiter.is_empty() {
            return Err(PhiError::invalid_config(
                "delimiter",
                "\"\"",
                "must be a non-empty string",
            ));
        }
        if self.top_k == 0 {
            return Err(PhiError::invalid_config("top_k", self.top_k, "must be >= 1"));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(PhiError::invalid_config(
                "decimals",
                self.decimals,
                "must be <= 6",
            ));
        }
        if self.pair_block_size == 0 {
            return Err(PhiError::invalid_config(
                "pair_block_size",
                self.pair_block_size,
                "must be >= 1",
            ));
        }
        debug!("Pipeline parameters validated: {:?}", self);
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, PhiError> {
        let params: PipelineParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PhiError> {
        let path = path.as_ref();
        info!("Loading pipeline parameters from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn strict(&self) -> bool {
        self.malformed == MalformedPolicy::Strict
    }
}
