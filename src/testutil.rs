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

//! In-crate fixture builders for tests (spec §1's note that the offline
//! text→binary compiler is out of scope as a shipped tool, but tests still
//! need well-formed images). Mirrors `wickdb`'s `sstable::test_footer`
//! pattern of encoding fixtures inline rather than shelling out to an
//! external tool.

use crate::codec::base;
use crate::store::Entry;
use crate::value::{DbType, Permission, Value};

/// Builds a single entry, for use with [`encode_base_image`]/
/// [`encode_overlay_image`].
pub fn entry(key: &str, permission: Permission, ty: DbType, values: Vec<Value>) -> Entry {
    Entry::new(key, permission, ty, values)
}

/// Encodes `entries` as a complete, checksummed base image.
pub fn encode_base_image(entries: &[Entry]) -> Vec<u8> {
    base::encode(entries)
}

/// Encodes `entries` as an overlay file with no trailing bytes.
pub fn encode_overlay_image(entries: &[Entry]) -> Vec<u8> {
    crate::codec::overlay::encode(entries, &[])
}
