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

//! Query engine (C4, spec §4.5): typed read against a resolved entry.

use crate::store::Entry;
use crate::value::{DbType, Rc, Value};

/// Returns the resolved entry's full value sequence for `want`, or the
/// request error spec §4.5 specifies.
///
/// Erasure is checked before the type tag, exactly as spec §4.5 orders the
/// two conditions: a tombstoned entry of the *requested* type still reads
/// as `KEY_NOT_FOUND`, not `TYPE_MISMATCH`.
///
/// The "per-element downcast failure" branch spec §4.5 describes cannot
/// occur here: `Value` is a tagged enum decoded once at parse time, so once
/// `entry.ty == want` has been checked there is no way for an individual
/// element to carry the wrong runtime type.
pub fn query_typed(entry: &Entry, want: DbType) -> Result<Vec<Value>, Rc> {
    if entry.erased {
        return Err(Rc::KeyNotFound);
    }
    if entry.ty != want {
        return Err(Rc::TypeMismatch);
    }
    Ok(entry.values.clone())
}
