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

//! Mutator (C5, spec §4.6): `update`/`restore`/`erase`/`reset` against the
//! overlay tier. Never touches the base tier's entries, only reads them to
//! shadow-copy (spec §3 invariant 2: "the base store is immutable after
//! load").

use crate::resolver::{resolve, Resolution, Tier};
use crate::store::{Entry, EntryStore};
use crate::value::{DbType, Permission, Rc, Value};

/// Rebuilds a `STRING` entry's value sequence per spec §3 invariant 6: the
/// supplied tokens, followed by their single-space join — resolving Open
/// Question 2 exactly as spec §9 directs (no trailing space).
fn rebuild_values(ty: DbType, supplied: Vec<Value>) -> Vec<Value> {
    if ty != DbType::Str {
        return supplied;
    }

    let words: Vec<String> = supplied
        .into_iter()
        .map(|v| match v {
            Value::Str(s) => s,
            _ => unreachable!("rebuild_values called with a non-STRING value for a STRING entry"),
        })
        .collect();
    let whole = words.join(" ");
    let mut out: Vec<Value> = words.into_iter().map(Value::Str).collect();
    out.push(Value::Str(whole));
    out
}

/// spec §4.6 `update`: resolve, check permission, check type, check
/// erasure, then mutate in place (overlay hit) or shadow-copy (base hit).
/// Returns the overlay index the write landed at.
pub fn update(
    base: &EntryStore,
    overlay: &mut EntryStore,
    key: &str,
    want: DbType,
    supplied: Vec<Value>,
) -> Result<usize, Rc> {
    match resolve(base, overlay, key) {
        Resolution::NotFound => Err(Rc::KeyNotFound),
        Resolution::Found { tier: Tier::Overlay, index } => {
            let entry = overlay.get(index);
            if entry.permission == Permission::ReadOnly {
                return Err(Rc::NotWritable);
            }
            if entry.ty != want {
                return Err(Rc::TypeMismatch);
            }
            if entry.erased {
                return Err(Rc::KeyNotFound);
            }
            overlay.get_mut(index).values = rebuild_values(want, supplied);
            Ok(index)
        }
        Resolution::Found { tier: Tier::Base, index } => {
            let base_entry = base.get(index);
            if base_entry.permission == Permission::ReadOnly {
                return Err(Rc::NotWritable);
            }
            if base_entry.ty != want {
                return Err(Rc::TypeMismatch);
            }
            let mut shadow = base_entry.clone();
            shadow.values = rebuild_values(want, supplied);
            Ok(overlay.push(shadow))
        }
    }
}

/// Outcome of [`restore`], distinguishing "nothing to do, the key only
/// ever lived in the base tier" from "an overlay entry was dropped" so the
/// caller knows whether a persistent cleanup is worth attempting.
pub enum RestoreOutcome {
    NoOverlayEntry,
    Removed(Entry),
}

/// spec §4.6 `restore`: discard the overlay entry for `key`, if any,
/// reverting observability to the base entry.
pub fn restore(base: &EntryStore, overlay: &mut EntryStore, key: &str) -> Result<RestoreOutcome, Rc> {
    match resolve(base, overlay, key) {
        Resolution::NotFound => Err(Rc::KeyNotFound),
        Resolution::Found { tier: Tier::Base, .. } => Ok(RestoreOutcome::NoOverlayEntry),
        Resolution::Found { tier: Tier::Overlay, index } => Ok(RestoreOutcome::Removed(overlay.remove(index))),
    }
}

/// spec §4.6 `erase`: set the overlay entry's tombstone, shadow-copying
/// from base first if the key has not been shadowed yet. Session-local
/// only (Non-goals; spec §9 Open Question 1 leaves persistent erase
/// unspecified).
pub fn erase(base: &EntryStore, overlay: &mut EntryStore, key: &str) -> Result<(), Rc> {
    match resolve(base, overlay, key) {
        Resolution::NotFound => Err(Rc::KeyNotFound),
        Resolution::Found { tier: Tier::Overlay, index } => {
            overlay.get_mut(index).erased = true;
            Ok(())
        }
        Resolution::Found { tier: Tier::Base, index } => {
            let mut shadow = base.get(index).clone();
            shadow.erased = true;
            overlay.push(shadow);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_with(key: &str, permission: Permission, ty: DbType, values: Vec<Value>) -> EntryStore {
        let mut store = EntryStore::new();
        store.push(Entry::new(key, permission, ty, values));
        store
    }

    #[test]
    fn update_shadows_base_entry_into_overlay() {
        let base = base_with("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)]);
        let mut overlay = EntryStore::new();
        let idx = update(&base, &mut overlay, "/a", DbType::U8, vec![Value::U8(9)]).unwrap();
        assert_eq!(overlay.get(idx).values, vec![Value::U8(9)]);
        assert_eq!(base.get(0).values, vec![Value::U8(1)], "base must stay unchanged");
    }

    #[test]
    fn update_on_read_only_is_rejected() {
        let base = base_with("/a", Permission::ReadOnly, DbType::U8, vec![Value::U8(1)]);
        let mut overlay = EntryStore::new();
        assert_eq!(
            update(&base, &mut overlay, "/a", DbType::U8, vec![Value::U8(9)]),
            Err(Rc::NotWritable)
        );
    }

    #[test]
    fn update_with_wrong_type_is_rejected() {
        let base = base_with("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)]);
        let mut overlay = EntryStore::new();
        assert_eq!(
            update(&base, &mut overlay, "/a", DbType::U16, vec![Value::U16(9)]),
            Err(Rc::TypeMismatch)
        );
    }

    #[test]
    fn update_string_rebuilds_whole_value_with_single_space_join() {
        let base = base_with(
            "/name",
            Permission::ReadWrite,
            DbType::Str,
            vec![Value::Str("old".into()), Value::Str("old".into())],
        );
        let mut overlay = EntryStore::new();
        let idx = update(
            &base,
            &mut overlay,
            "/name",
            DbType::Str,
            vec![Value::Str("acme".into()), Value::Str("driver".into())],
        )
        .unwrap();
        assert_eq!(
            overlay.get(idx).values,
            vec![
                Value::Str("acme".into()),
                Value::Str("driver".into()),
                Value::Str("acme driver".into()),
            ]
        );
    }

    #[test]
    fn restore_drops_overlay_entry_and_reverts_to_base() {
        let base = base_with("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)]);
        let mut overlay = EntryStore::new();
        update(&base, &mut overlay, "/a", DbType::U8, vec![Value::U8(9)]).unwrap();
        assert!(matches!(restore(&base, &mut overlay, "/a"), Ok(RestoreOutcome::Removed(_))));
        assert!(overlay.is_empty());
    }

    #[test]
    fn erase_then_restore_round_trips_through_base() {
        let base = base_with("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)]);
        let mut overlay = EntryStore::new();
        erase(&base, &mut overlay, "/a").unwrap();
        assert!(overlay.get(0).erased);
        restore(&base, &mut overlay, "/a").unwrap();
        assert!(overlay.is_empty());
    }
}
