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

//! The public facade (C1's consumer-facing half, spec §4.1): the type
//! applications actually hold onto, wrapping a [`Loader`] and adding the
//! scalar/vector convenience reads plus an optional process-wide
//! singleton.
//!
//! Collapses the original's nine hand-written per-type overloads
//! (`databaseIf.h`'s `getU8`/`getS8`/.../`getString`, `updateU8`/...) into
//! one generic method per operation, the same way `wickdb`'s options
//! structs replace per-call parameter lists with one generic config type.

use once_cell::sync::OnceCell;

use crate::config::LoaderConfig;
use crate::error::LoaderError;
use crate::loader::Loader;
use crate::value::{DbValue, Rc};

static GLOBAL: OnceCell<ConfigDb> = OnceCell::new();

/// A configuration database handle. Cheap to share: every method takes
/// `&self`, so a `ConfigDb` is typically held behind an `Arc` or, for the
/// common case of one database per process, installed as the
/// [`global`] singleton.
pub struct ConfigDb {
    loader: Loader,
}

impl ConfigDb {
    /// Opens the base image (fatal on failure) and the overlay file
    /// (non-fatal — see [`Loader::open`]).
    pub fn open(config: LoaderConfig) -> Result<Self, LoaderError> {
        Ok(ConfigDb { loader: Loader::open(config)? })
    }

    /// Installs `self` as the process-wide singleton. Returns `self` back
    /// as `Err` if one is already installed — this crate never silently
    /// replaces an existing global database.
    pub fn install_global(self) -> Result<(), Self> {
        GLOBAL.set(self)
    }

    /// Returns the process-wide singleton, if [`install_global`] has been
    /// called.
    ///
    /// [`install_global`]: ConfigDb::install_global
    pub fn global() -> Option<&'static ConfigDb> {
        GLOBAL.get()
    }

    /// Raw typed read: the full value sequence for `key` (spec §4.1's
    /// `get`). Most callers want [`get_scalar`] or [`get_vec`] instead.
    ///
    /// [`get_scalar`]: ConfigDb::get_scalar
    /// [`get_vec`]: ConfigDb::get_vec
    pub fn get<T: DbValue>(&self, key: &str) -> Result<Vec<T>, Rc> {
        self.loader.get::<T>(key)
    }

    /// The first element for a numeric key, or the trailing untokenized
    /// whole value for a `STRING` key (spec §4.1's scalar convenience).
    pub fn get_scalar<T: DbValue>(&self, key: &str) -> Result<T, Rc> {
        let mut values = self.loader.get::<T>(key)?;
        if values.is_empty() {
            return Err(Rc::KeyNotFound);
        }
        if T::TY == crate::value::DbType::Str {
            Ok(values.pop().expect("checked non-empty above"))
        } else {
            Ok(values.remove(0))
        }
    }

    /// The full element sequence for a numeric key; for `STRING`, the
    /// tokenized words with the trailing whole-string element dropped
    /// (spec §4.1's vector convenience).
    pub fn get_vec<T: DbValue>(&self, key: &str) -> Result<Vec<T>, Rc> {
        let mut values = self.loader.get::<T>(key)?;
        if T::TY == crate::value::DbType::Str && !values.is_empty() {
            values.pop();
        }
        Ok(values)
    }

    /// spec §4.1 `update`. `persistent = true` is the "hard write" spec §1
    /// describes; `false` is ephemeral and session-local.
    pub fn update<T: DbValue>(&self, key: &str, values: Vec<T>, persistent: bool) -> Result<(), Rc> {
        self.loader.update(key, values, persistent)
    }

    /// spec §4.1 `restore`.
    pub fn restore(&self, key: &str, persistent: bool) -> Result<(), Rc> {
        self.loader.restore(key, persistent)
    }

    /// spec §4.1 `erase`. Session-local only (see [`Loader::erase`]).
    pub fn erase(&self, key: &str) -> Result<(), Rc> {
        self.loader.erase(key)
    }

    /// spec §4.1 `reset`.
    pub fn reset(&self) {
        self.loader.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::base;
    use crate::store::Entry;
    use crate::value::{DbType, Permission, Value};
    use std::fs;
    use tempfile::tempdir;

    fn open_with(entries: Vec<Entry>) -> (ConfigDb, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let base_path = dir.path().join("base.bin");
        let overlay_path = dir.path().join("overlay.bin");
        fs::write(&base_path, base::encode(&entries)).unwrap();
        let db = ConfigDb::open(LoaderConfig::new(base_path, overlay_path)).unwrap();
        (db, dir)
    }

    #[test]
    fn get_scalar_returns_the_trailing_whole_string() {
        let (db, _dir) = open_with(vec![Entry::new(
            "/driverName",
            Permission::ReadWrite,
            DbType::Str,
            vec![
                Value::Str("acme".into()),
                Value::Str("usb".into()),
                Value::Str("driver".into()),
                Value::Str("acme usb driver".into()),
            ],
        )]);
        assert_eq!(db.get_scalar::<String>("/driverName"), Ok("acme usb driver".to_string()));
    }

    #[test]
    fn get_vec_drops_the_trailing_whole_string() {
        let (db, _dir) = open_with(vec![Entry::new(
            "/driverName",
            Permission::ReadWrite,
            DbType::Str,
            vec![
                Value::Str("acme".into()),
                Value::Str("usb".into()),
                Value::Str("driver".into()),
                Value::Str("acme usb driver".into()),
            ],
        )]);
        assert_eq!(
            db.get_vec::<String>("/driverName"),
            Ok(vec!["acme".to_string(), "usb".to_string(), "driver".to_string()])
        );
    }

    #[test]
    fn get_scalar_on_numeric_returns_the_first_element() {
        let (db, _dir) = open_with(vec![Entry::new(
            "/temperatureRanges",
            Permission::ReadWrite,
            DbType::S16,
            vec![Value::S16(-40), Value::S16(85)],
        )]);
        assert_eq!(db.get_scalar::<i16>("/temperatureRanges"), Ok(-40i16));
    }
}
