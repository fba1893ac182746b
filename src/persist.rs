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

//! The overlay persister (C6, spec §4.7): the rewrite-and-rename file
//! mutator that keeps the on-disk overlay in sync with a persistent
//! mutation, without disturbing unrelated entries or trailing bytes it
//! doesn't understand.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::codec::overlay;
use crate::error::LoaderError;
use crate::store::Entry;

/// Guards the rewrite-and-rename sequence with its own lock (spec §5's
/// `persist_file` mutex), independent of the in-memory overlay lock the
/// caller already holds.
pub struct OverlayPersister {
    path: PathBuf,
    persist_file: Mutex<()>,
}

impl OverlayPersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OverlayPersister {
            path: path.into(),
            persist_file: Mutex::new(()),
        }
    }

    fn read_existing(&self) -> Result<overlay::DecodedOverlay, LoaderError> {
        match fs::read(&self.path) {
            Ok(bytes) => overlay::decode(&bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => overlay::decode(&[]),
            Err(err) => Err(err.into()),
        }
    }

    fn write_atomically(&self, bytes: &[u8]) -> Result<(), LoaderError> {
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Writes `entry` into the overlay file, replacing any existing record
    /// for the same key (spec §4.7 step 3: "if a record for the key already
    /// exists, replace it in place; otherwise append").
    pub fn persist(&self, entry: &Entry) -> Result<(), LoaderError> {
        let _guard = self.persist_file.lock().unwrap();
        let mut existing = self.read_existing()?;

        match existing.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(slot) => *slot = entry.clone(),
            None => existing.entries.push(entry.clone()),
        }

        let bytes = overlay::encode(&existing.entries, &existing.trailing);
        self.write_atomically(&bytes)
    }

    /// Drops the on-disk record for `key`, if one exists (spec §9's
    /// resolution of persistent `restore`). A missing record is not an
    /// error — restoring a key that was never persisted is a no-op.
    pub fn remove(&self, key: &str) -> Result<(), LoaderError> {
        let _guard = self.persist_file.lock().unwrap();
        let mut existing = self.read_existing()?;

        let before = existing.entries.len();
        existing.entries.retain(|e| e.key != key);
        if existing.entries.len() == before {
            return Ok(());
        }

        let bytes = overlay::encode(&existing.entries, &existing.trailing);
        self.write_atomically(&bytes)
    }

    /// Deletes the overlay file outright (spec §4.6 `reset`: "delete the
    /// overlay file"). A missing file is not an error — resetting an
    /// overlay that was never persisted is a no-op.
    pub fn clear(&self) -> Result<(), LoaderError> {
        let _guard = self.persist_file.lock().unwrap();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{DbType, Permission, Value};
    use tempfile::tempdir;

    #[test]
    fn persist_then_remove_round_trips_through_an_empty_file() {
        let dir = tempdir().unwrap();
        let persister = OverlayPersister::new(dir.path().join("overlay.bin"));

        let entry = Entry::new("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(9)]);
        persister.persist(&entry).unwrap();

        let decoded = overlay::decode(&fs::read(persister.path()).unwrap()).unwrap();
        assert_eq!(decoded.entries.len(), 1);
        assert_eq!(decoded.entries[0].key, "/a");

        persister.remove("/a").unwrap();
        let decoded = overlay::decode(&fs::read(persister.path()).unwrap()).unwrap();
        assert!(decoded.entries.is_empty());
    }

    #[test]
    fn persist_replaces_an_existing_record_for_the_same_key() {
        let dir = tempdir().unwrap();
        let persister = OverlayPersister::new(dir.path().join("overlay.bin"));

        persister
            .persist(&Entry::new("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)]))
            .unwrap();
        persister
            .persist(&Entry::new("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(2)]))
            .unwrap();

        let decoded = overlay::decode(&fs::read(persister.path()).unwrap()).unwrap();
        assert_eq!(decoded.entries.len(), 1);
        assert_eq!(decoded.entries[0].values, vec![Value::U8(2)]);
    }

    #[test]
    fn persist_preserves_unrelated_existing_entries() {
        let dir = tempdir().unwrap();
        let persister = OverlayPersister::new(dir.path().join("overlay.bin"));

        persister
            .persist(&Entry::new("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)]))
            .unwrap();
        persister
            .persist(&Entry::new("/b", Permission::ReadWrite, DbType::U8, vec![Value::U8(2)]))
            .unwrap();

        let decoded = overlay::decode(&fs::read(persister.path()).unwrap()).unwrap();
        assert_eq!(decoded.entries.len(), 2);
    }

    #[test]
    fn missing_file_persists_cleanly() {
        let dir = tempdir().unwrap();
        let persister = OverlayPersister::new(dir.path().join("does-not-exist-yet.bin"));
        persister
            .persist(&Entry::new("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)]))
            .unwrap();
        assert!(persister.path().exists());
    }

    #[test]
    fn clear_deletes_the_overlay_file_outright() {
        let dir = tempdir().unwrap();
        let persister = OverlayPersister::new(dir.path().join("overlay.bin"));
        persister
            .persist(&Entry::new("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)]))
            .unwrap();
        assert!(persister.path().exists());

        persister.clear().unwrap();
        assert!(!persister.path().exists());
    }

    #[test]
    fn clear_on_a_missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let persister = OverlayPersister::new(dir.path().join("does-not-exist.bin"));
        persister.clear().unwrap();
        assert!(!persister.path().exists());
    }
}
