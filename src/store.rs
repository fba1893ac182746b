// Copyright 2019 Fullstop000 <fullstop1005@gmail.com>.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// See the License for the specific language governing permissions and
// limitations under the License.

//! The two-tier entry store (spec §3, §4.3): an append-only vector of
//! entries plus an inverted index from path segment to entry indices.
//!
//! One `EntryStore` backs the base tier, a second backs the overlay tier;
//! the [`crate::resolver`] module is what knows how to combine the two.

use std::collections::{HashMap, HashSet};

use crate::value::{DbType, Permission, Value};

/// A single configuration record (spec §3).
#[derive(Debug, Clone)]
pub struct Entry {
    pub key: String,
    pub permission: Permission,
    pub ty: DbType,
    pub values: Vec<Value>,
    /// Session-local tombstone flag. Only ever set on overlay entries.
    pub erased: bool,
}

impl Entry {
    pub fn new(key: impl Into<String>, permission: Permission, ty: DbType, values: Vec<Value>) -> Self {
        Entry {
            key: key.into(),
            permission,
            ty,
            values,
            erased: false,
        }
    }
}

/// An append-only vector of entries plus its inverted index.
///
/// Invariant 1 (spec §3): every index held in `index` points at a live
/// entry in `entries`. Removal (used only by `restore`, see
/// [`crate::mutator::restore`]) keeps this invariant by rebuilding the
/// whole index after shrinking `entries`, rather than leaving holes.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    index: HashMap<String, HashSet<usize>>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(cap: usize) -> Self {
        EntryStore {
            entries: Vec::with_capacity(cap),
            index: HashMap::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> &Entry {
        &self.entries[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Entry {
        &mut self.entries[index]
    }

    /// Appends `entry`, indexing it under every segment of its key, and
    /// returns its new index.
    pub fn push(&mut self, entry: Entry) -> usize {
        let index = self.entries.len();
        for segment in crate::util::tokenize(&entry.key, "/") {
            self.index.entry(segment).or_default().insert(index);
        }
        self.entries.push(entry);
        index
    }

    /// Removes the entry at `index`, preserving the relative order of the
    /// rest, and rebuilds the inverted index from scratch (spec §4.6:
    /// `restore` "remove[s] it from the overlay store and rebuild[s]
    /// indices").
    pub fn remove(&mut self, index: usize) -> Entry {
        let removed = self.entries.remove(index);
        self.rebuild_index();
        removed
    }

    /// Drops every entry and clears the index (spec §4.6 `reset`).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (index, entry) in self.entries.iter().enumerate() {
            for segment in crate::util::tokenize(&entry.key, "/") {
                self.index.entry(segment).or_default().insert(index);
            }
        }
    }

    /// Intersects the per-segment buckets for `tokens` (spec §4.4 step
    /// 2/3): returns the sorted indices whose key contains *every* token,
    /// or an empty vector the moment any token has no bucket at all —
    /// matching the original's early-return-on-miss behavior.
    pub fn resolve_tokens(&self, tokens: &[String]) -> Vec<usize> {
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut matches: Option<HashSet<usize>> = None;
        for token in tokens {
            let Some(bucket) = self.index.get(token) else {
                return Vec::new();
            };
            matches = Some(match matches {
                None => bucket.clone(),
                Some(acc) => acc.intersection(bucket).copied().collect(),
            });
        }

        let mut out: Vec<usize> = matches.unwrap_or_default().into_iter().collect();
        out.sort_unstable();
        out
    }
}
