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

//! The loader core: owns both tiers and the persister, and is what
//! [`crate::facade::ConfigDb`] delegates every operation to (spec §4.1,
//! §5's documented lock order).

use std::fs;
use std::sync::Mutex;

use crate::codec::{base, overlay};
use crate::config::LoaderConfig;
use crate::diag::{trace_error, trace_info};
use crate::error::LoaderError;
use crate::mutator::{self, RestoreOutcome};
use crate::query;
use crate::resolver::{resolve, Resolution, Tier};
use crate::persist::OverlayPersister;
use crate::store::EntryStore;
use crate::value::{DbValue, Rc, Value};

/// Owns the base tier (read-only once loaded), the overlay tier (guarded
/// by a single lock — spec §5's correctness-preserving collapse of the
/// `overlay_store`/`overlay_index` pair), and the overlay persister.
pub struct Loader {
    base: EntryStore,
    overlay: Mutex<EntryStore>,
    persister: OverlayPersister,
}

impl Loader {
    /// Loads the base image (fatal on any malformed-image error — spec
    /// §4.2/§7) and the overlay file (non-fatal: a malformed or missing
    /// overlay degrades to an empty one, logged at ERROR, per spec §7's
    /// "the process continues with no persisted overrides").
    pub fn open(config: LoaderConfig) -> Result<Self, LoaderError> {
        let base_bytes = fs::read(config.base_path())?;
        let base_entries = base::decode(&base_bytes)?;

        let mut base = EntryStore::with_capacity(config.initial_store_capacity().max(base_entries.len()));
        for entry in base_entries {
            base.push(entry);
        }
        trace_info!("loaded base image with {} entries", base.len());

        let overlay_entries = match fs::read(config.overlay_path()) {
            Ok(bytes) => match overlay::decode(&bytes) {
                Ok(decoded) => decoded.entries,
                Err(err) => {
                    trace_error!("overlay file at {:?} is malformed ({err}); starting with an empty overlay", config.overlay_path());
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                trace_error!("overlay file at {:?} could not be read ({err}); starting with an empty overlay", config.overlay_path());
                Vec::new()
            }
        };

        let mut overlay = EntryStore::with_capacity(config.initial_store_capacity());
        for entry in overlay_entries {
            overlay.push(entry);
        }
        trace_info!("loaded overlay with {} entries", overlay.len());

        Ok(Loader {
            base,
            overlay: Mutex::new(overlay),
            persister: OverlayPersister::new(config.overlay_path().to_path_buf()),
        })
    }

    /// spec §4.5: resolve `key`, then type-check/erasure-check the typed
    /// read.
    pub fn get<T: DbValue>(&self, key: &str) -> Result<Vec<T>, Rc> {
        let overlay = self.overlay.lock().unwrap();
        let resolution = resolve(&self.base, &overlay, key);
        let entry = match resolution {
            Resolution::NotFound => return Err(Rc::KeyNotFound),
            Resolution::Found { tier: Tier::Base, index } => self.base.get(index),
            Resolution::Found { tier: Tier::Overlay, index } => overlay.get(index),
        };
        let values = query::query_typed(entry, T::TY)?;
        Ok(values
            .into_iter()
            .map(|v| T::unwrap(v).expect("query_typed already checked the type tag"))
            .collect())
    }

    /// spec §4.6 `update`. When `persistent` is set, the overlay lock is
    /// held across the call into the persister (spec §5's documented lock
    /// order: overlay before `persist_file`), so a concurrent reader never
    /// observes the in-memory write without the on-disk write, or vice
    /// versa.
    pub fn update<T: DbValue>(&self, key: &str, values: Vec<T>, persistent: bool) -> Result<(), Rc> {
        let supplied: Vec<Value> = values.into_iter().map(DbValue::wrap).collect();
        let mut overlay = self.overlay.lock().unwrap();
        let index = mutator::update(&self.base, &mut overlay, key, T::TY, supplied)?;

        if persistent {
            let entry = overlay.get(index).clone();
            if let Err(err) = self.persister.persist(&entry) {
                trace_error!("failed to persist update for \"{key}\": {err}");
            }
        }
        Ok(())
    }

    /// spec §4.6 `restore`. A persistent restore also drops the on-disk
    /// overlay record (spec §9 Open Question 1's resolution).
    pub fn restore(&self, key: &str, persistent: bool) -> Result<(), Rc> {
        let mut overlay = self.overlay.lock().unwrap();
        match mutator::restore(&self.base, &mut overlay, key)? {
            RestoreOutcome::NoOverlayEntry => Ok(()),
            RestoreOutcome::Removed(_) => {
                if persistent {
                    if let Err(err) = self.persister.remove(key) {
                        trace_error!("failed to remove persisted record for \"{key}\": {err}");
                    }
                }
                Ok(())
            }
        }
    }

    /// spec §4.6 `erase`. Session-local only — there is no on-disk
    /// tombstone format (Non-goals; spec §9 Open Question 1).
    pub fn erase(&self, key: &str) -> Result<(), Rc> {
        let mut overlay = self.overlay.lock().unwrap();
        mutator::erase(&self.base, &mut overlay, key)
    }

    /// spec §4.6 `reset`: clears the overlay store, its index, and the
    /// on-disk overlay file.
    pub fn reset(&self) {
        let mut overlay = self.overlay.lock().unwrap();
        overlay.clear();
        if let Err(err) = self.persister.clear() {
            trace_error!("failed to clear the on-disk overlay: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::base;
    use crate::store::Entry;
    use crate::value::{DbType, Permission};
    use tempfile::tempdir;

    fn open_with(entries: Vec<Entry>) -> (Loader, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let base_path = dir.path().join("base.bin");
        let overlay_path = dir.path().join("overlay.bin");
        fs::write(&base_path, base::encode(&entries)).unwrap();
        let loader = Loader::open(LoaderConfig::new(base_path, overlay_path)).unwrap();
        (loader, dir)
    }

    #[test]
    fn get_reads_straight_through_to_base_when_unshadowed() {
        let (loader, _dir) = open_with(vec![Entry::new(
            "/isFeatureXyzEnabled",
            Permission::ReadWrite,
            DbType::U8,
            vec![Value::U8(1)],
        )]);
        assert_eq!(loader.get::<u8>("/isFeatureXyzEnabled"), Ok(vec![1u8]));
    }

    #[test]
    fn update_shadows_without_touching_base_and_is_visible_on_next_get() {
        let (loader, _dir) = open_with(vec![Entry::new(
            "/a",
            Permission::ReadWrite,
            DbType::U8,
            vec![Value::U8(1)],
        )]);
        loader.update::<u8>("/a", vec![9], false).unwrap();
        assert_eq!(loader.get::<u8>("/a"), Ok(vec![9u8]));
    }

    #[test]
    fn persistent_update_is_visible_after_a_fresh_open() {
        let (loader, dir) = open_with(vec![Entry::new(
            "/a",
            Permission::ReadWrite,
            DbType::U8,
            vec![Value::U8(1)],
        )]);
        loader.update::<u8>("/a", vec![9], true).unwrap();
        drop(loader);

        let reopened = Loader::open(LoaderConfig::new(dir.path().join("base.bin"), dir.path().join("overlay.bin"))).unwrap();
        assert_eq!(reopened.get::<u8>("/a"), Ok(vec![9u8]));
    }

    #[test]
    fn erase_then_get_is_key_not_found_even_though_the_type_matches() {
        let (loader, _dir) = open_with(vec![Entry::new(
            "/a",
            Permission::ReadWrite,
            DbType::U8,
            vec![Value::U8(1)],
        )]);
        loader.erase("/a").unwrap();
        assert_eq!(loader.get::<u8>("/a"), Err(Rc::KeyNotFound));
    }

    #[test]
    fn reset_drops_every_overlay_entry_and_deletes_the_overlay_file() {
        let (loader, dir) = open_with(vec![Entry::new(
            "/a",
            Permission::ReadWrite,
            DbType::U8,
            vec![Value::U8(1)],
        )]);
        loader.update::<u8>("/a", vec![9], true).unwrap();
        assert!(dir.path().join("overlay.bin").exists());

        loader.reset();
        assert_eq!(loader.get::<u8>("/a"), Ok(vec![1u8]));
        assert!(!dir.path().join("overlay.bin").exists());
    }
}
