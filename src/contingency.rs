//! 2×2 contingency table and phi coefficient for a pair of items.
//!
//! - yes_yes: users of both items
//! - yes_no:  users of the first item only
//! - no_yes:  users of the second item only
//! - no_no:   the rest of the population
//!
//! phi = (yes_yes·no_no − yes_no·no_yes) / sqrt(r1·r2·c1·c2) over the four
//! marginals. A zero marginal leaves phi undefined and is reported as `None`.

use std::cmp::Ordering;

use crate::params::RoundingMode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContingencyTable {
    pub yes_yes: u64,
    pub yes_no: u64,
    pub no_yes: u64,
    pub no_no: u64,
}

impl ContingencyTable {
    /// Build the table from two strictly ascending user-id lists and the total
    /// user population `n_users`.
    ///
    /// # Panics
    ///
    /// If the two sets together cover more users than `n_users`.
    pub fn from_sorted(a: &[u32], b: &[u32], n_users: usize) -> Self {
        let yes_yes = intersection_len(a, b) as u64;
        let yes_no = a.len() as u64 - yes_yes;
        let no_yes = b.len() as u64 - yes_yes;
        let covered = yes_yes + yes_no + no_yes;
        assert!(
            covered <= n_users as u64,
            "user sets cover {} users but population is {}",
            covered,
            n_users
        );
        Self {
            yes_yes,
            yes_no,
            no_yes,
            no_no: n_users as u64 - covered,
        }
    }

    /// The four marginal sums: (first row, second row, first col, second col).
    #[inline]
    pub fn marginals(&self) -> (u64, u64, u64, u64) {
        (
            self.yes_yes + self.yes_no,
            self.no_yes + self.no_no,
            self.yes_yes + self.no_yes,
            self.yes_no + self.no_no,
        )
    }

    pub fn total(&self) -> u64 {
        self.yes_yes + self.yes_no + self.no_yes + self.no_no
    }

    /// Unrounded phi, `None` when any marginal is zero.
    pub fn phi(&self) -> Option<f64> {
        let (r1, r2, c1, c2) = self.marginals();
        if r1 == 0 || r2 == 0 || c1 == 0 || c2 == 0 {
            return None;
        }
        // products taken in f64: u64 overflows on large populations
        let denominator = (r1 as f64 * r2 as f64 * c1 as f64 * c2 as f64).sqrt();
        let numerator = self.yes_yes as f64 * self.no_no as f64
            - self.yes_no as f64 * self.no_yes as f64;
        let phi = numerator / denominator;
        if phi.is_finite() { Some(phi) } else { None }
    }

    /// Phi rounded to `decimals` places and clamped into [-1, 1].
    ///
    /// When the marginal product is a perfect square phi is rational and is
    /// rounded exactly, so halves follow `rounding`. Otherwise phi is
    /// irrational, cannot sit on a half, and the float path is used.
    pub fn rounded_phi(&self, rounding: RoundingMode, decimals: u32) -> Option<f64> {
        let phi = self.phi()?;
        let rounded = self
            .rational_phi()
            .and_then(|(num, root)| rounding.round_ratio(num, root, decimals))
            .unwrap_or_else(|| rounding.round(phi, decimals));
        // `+ 0.0` folds a rounded -0.0 into 0.0
        Some(rounded.clamp(-1.0, 1.0) + 0.0)
    }

    /// `(numerator, sqrt(r1·r2·c1·c2))` when the square root is an integer.
    fn rational_phi(&self) -> Option<(i128, u128)> {
        let (r1, r2, c1, c2) = self.marginals();
        let rows = (r1 as u128).checked_mul(r2 as u128)?;
        let cols = (c1 as u128).checked_mul(c2 as u128)?;
        let product = rows.checked_mul(cols)?;
        let root = product.isqrt();
        if root == 0 || root.checked_mul(root)? != product {
            return None;
        }

        let agree = i128::try_from(self.yes_yes as u128 * self.no_no as u128).ok()?;
        let disagree = i128::try_from(self.yes_no as u128 * self.no_yes as u128).ok()?;
        Some((agree - disagree, root))
    }
}

/// Size of the intersection of two strictly ascending slices (linear merge).
pub fn intersection_len(a: &[u32], b: &[u32]) -> usize {
    let (mut i, mut j, mut n) = (0usize, 0usize, 0usize);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                n += 1;
                i += 1;
                j += 1;
            }
        }
    }
    n
}
