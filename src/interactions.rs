//! # Interaction index: raw `(user, item)` lines to item → user-set
//!
//! Parses each raw line on a delimiter, collapses duplicate records through set
//! insertion and freezes the result into an immutable, index-addressed layout:
//!
//! - items sorted lexicographically, addressed by a dense `usize`;
//! - users interned to dense `u32` ids;
//! - one strictly ascending `Vec<u32>` of user ids per item.
//!
//! The distinct user count is computed once, when the index is frozen, and is
//! handed to every pair score as a read-only value.
//!
//! ```
//! use phispace::interactions::ItemUserIndex;
//! use phispace::params::PipelineParams;
//!
//! let lines = ["u1:A", "u2:A", "u1:B", "u1:B"];
//! let (index, stats) = ItemUserIndex::from_lines(lines, &PipelineParams::default()).unwrap();
//! assert_eq!(index.n_items(), 2);
//! assert_eq!(index.n_users(), 2);
//! assert_eq!(stats.duplicates, 1);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use log::{debug, info, trace, warn};

use crate::errors::PhiError;
use crate::params::PipelineParams;

/// One parsed `(user, item)` interaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InteractionRecord {
    pub user_id: String,
    pub item_id: String,
}

/// Split one raw line into an [`InteractionRecord`].
///
/// The line must split on `delimiter` into exactly two tokens, both non-empty
/// after trimming surrounding whitespace. `line_no` is only used for the error.
pub fn parse_record(
    raw: &str,
    delimiter: &str,
    line_no: usize,
) -> Result<InteractionRecord, PhiError> {
    let malformed = |reason: &str| PhiError::MalformedRecord {
        line: line_no,
        content: raw.to_string(),
        reason: reason.to_string(),
    };

    let tokens: Vec<&str> = raw.split(delimiter).map(str::trim).collect();
    match tokens.len() {
        0 | 1 => return Err(malformed("expected two tokens, found one")),
        2 => {}
        n => return Err(malformed(&format!("expected two tokens, found {}", n))),
    }
    if tokens[0].is_empty() {
        return Err(malformed("empty user id"));
    }
    if tokens[1].is_empty() {
        return Err(malformed("empty item id"));
    }

    Ok(InteractionRecord {
        user_id: tokens[0].to_string(),
        item_id: tokens[1].to_string(),
    })
}

/// Counters collected while building the index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Raw lines seen
    pub lines: usize,
    /// Empty or whitespace-only lines
    pub blank: usize,
    /// Lines rejected as malformed
    pub malformed: usize,
    /// Accepted records, duplicates included
    pub records: usize,
    pub distinct_records: usize,
    pub duplicates: usize,
    pub n_items: usize,
    pub n_users: usize,
}

/// Immutable item → user-set index.
#[derive(Clone, Debug, Default)]
pub struct ItemUserIndex {
    /// Item ids, ascending
    items: Vec<String>,
    /// Per item, ascending interned user ids
    users: Vec<Vec<u32>>,
    /// Interned id → user id
    user_ids: Vec<String>,
    n_users: usize,
}

/// Maps user ids to dense `u32` indices in first-seen order.
#[derive(Debug, Default)]
struct UserInterner {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl UserInterner {
    fn intern(&mut self, user: String) -> Result<u32, PhiError> {
        if let Some(&uid) = self.ids.get(&user) {
            return Ok(uid);
        }
        let uid = next_user_id(self.names.len())?;
        self.names.push(user.clone());
        self.ids.insert(user, uid);
        Ok(uid)
    }
}

/// Index for the next distinct user, given how many are already interned.
pub(crate) fn next_user_id(interned: usize) -> Result<u32, PhiError> {
    u32::try_from(interned).map_err(|_| PhiError::TooManyUsers {
        limit: u32::MAX as u64 + 1,
    })
}

impl ItemUserIndex {
    /// Parse, deduplicate and freeze a sequence of raw lines.
    ///
    /// With `MalformedPolicy::Skip` malformed lines are logged and counted;
    /// with `MalformedPolicy::Strict` the first one aborts the build.
    pub fn from_lines<I, S>(
        lines: I,
        params: &PipelineParams,
    ) -> Result<(Self, IndexStats), PhiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        info!(
            "Building interaction index (delimiter={:?}, malformed={:?})",
            params.delimiter, params.malformed
        );

        let mut stats = IndexStats::default();
        let mut users = UserInterner::default();
        let mut by_item: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();

        for (i, line) in lines.into_iter().enumerate() {
            let raw = line.as_ref();
            stats.lines += 1;

            if raw.trim().is_empty() {
                stats.blank += 1;
                continue;
            }

            let record = match parse_record(raw, &params.delimiter, i + 1) {
                Ok(record) => record,
                Err(err) if params.strict() => {
                    warn!("Aborting on malformed record: {}", err);
                    return Err(err);
                }
                Err(err) => {
                    warn!("Skipping {}", err);
                    stats.malformed += 1;
                    continue;
                }
            };
            stats.records += 1;

            let uid = users.intern(record.user_id)?;

            // set semantics absorb repeated (user, item) records
            if !by_item.entry(record.item_id).or_default().insert(uid) {
                stats.duplicates += 1;
            }
        }

        let index = Self::freeze(by_item, users.names);

        stats.distinct_records = stats.records - stats.duplicates;
        stats.n_items = index.n_items();
        stats.n_users = index.n_users();

        info!(
            "Interaction index built: {} items, {} users, {} distinct records",
            stats.n_items, stats.n_users, stats.distinct_records
        );
        debug!(
            "Index stats: lines={}, blank={}, malformed={}, records={}, duplicates={}",
            stats.lines, stats.blank, stats.malformed, stats.records, stats.duplicates
        );

        Ok((index, stats))
    }

    /// Build directly from already parsed records.
    pub fn from_records<I>(records: I) -> Result<Self, PhiError>
    where
        I: IntoIterator<Item = InteractionRecord>,
    {
        let mut users = UserInterner::default();
        let mut by_item: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();

        for record in records {
            let uid = users.intern(record.user_id)?;
            by_item.entry(record.item_id).or_default().insert(uid);
        }

        Ok(Self::freeze(by_item, users.names))
    }

    fn freeze(by_item: BTreeMap<String, BTreeSet<u32>>, user_ids: Vec<String>) -> Self {
        let mut items = Vec::with_capacity(by_item.len());
        let mut users = Vec::with_capacity(by_item.len());
        for (item, set) in by_item {
            trace!("Item {} has {} users", item, set.len());
            items.push(item);
            users.push(set.into_iter().collect::<Vec<u32>>());
        }

        // size of the union of all per-item user sets
        let mut seen = vec![false; user_ids.len()];
        let mut n_users = 0usize;
        for &u in users.iter().flatten() {
            if !seen[u as usize] {
                seen[u as usize] = true;
                n_users += 1;
            }
        }

        Self {
            items,
            users,
            user_ids,
            n_users,
        }
    }

    #[inline]
    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    /// Number of distinct users across the whole accepted input.
    #[inline]
    pub fn n_users(&self) -> usize {
        self.n_users
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item ids in ascending order; position is the item index.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[inline]
    pub fn item(&self, idx: usize) -> &str {
        &self.items[idx]
    }

    pub fn item_index(&self, item_id: &str) -> Option<usize> {
        self.items
            .binary_search_by(|probe| probe.as_str().cmp(item_id))
            .ok()
    }

    /// Interned, ascending user ids of item `idx`.
    #[inline]
    pub fn users_of(&self, idx: usize) -> &[u32] {
        &self.users[idx]
    }

    /// User ids of an item by name, ascending by interned id.
    pub fn user_names_of(&self, item_id: &str) -> Option<Vec<&str>> {
        self.item_index(item_id).map(|idx| {
            self.users[idx]
                .iter()
                .map(|&u| self.user_ids[u as usize].as_str())
                .collect()
        })
    }
}
