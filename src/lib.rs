//! # phispace
//!
//! "Customers who bought X also bought Y" recommendations from raw
//! `(user, item)` interaction lines, ranked by the phi coefficient of each
//! item pair's 2×2 user contingency table.
//!
//! Pipeline, each stage fully materialised before the next:
//!
//! 1. [`interactions`]: parse and deduplicate lines into item → user-set, count
//!    distinct users
//! 2. [`pairs`] / [`contingency`]: phi for every unordered item pair, pairs
//!    with a zero marginal excluded
//! 3. [`similarity`]: mirror pair scores into a symmetric sparse matrix
//! 4. [`ranking`]: top-k neighbors per item, phi descending then id ascending
//!
//! [`builder::PhiSpaceBuilder`] wires the stages together; [`format`] and
//! [`io`] cover reading input and rendering output.
//!
//! ```
//! use phispace::builder::PhiSpaceBuilder;
//! use phispace::format::{render_space, OutputStyle};
//!
//! let lines = ["u1:A", "u2:A", "u1:B", "u2:B", "u3:C"];
//! let (space, _) = PhiSpaceBuilder::new().build(lines).unwrap();
//! let out = render_space(&space, OutputStyle::List, false).unwrap();
//! assert_eq!(out, vec!["A : B, C", "B : A, C", "C : A, B"]);
//! ```

pub mod builder;
pub mod contingency;
pub mod core;
pub mod errors;
pub mod format;
pub mod interactions;
pub mod io;
pub mod pairs;
pub mod params;
pub mod ranking;
pub mod similarity;

#[cfg(test)]
mod tests;

/// Install the `env_logger` backend, `info` unless `RUST_LOG` says otherwise.
/// Safe to call more than once.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
