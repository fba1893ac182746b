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

//! The overlay file codec (spec §4.7): a 4-byte entry count followed by
//! repeated `ENTRY` records, no header or CRC. A missing file decodes as an
//! empty overlay (spec §4.7 step 1).

use crate::codec::entry::{decode_entry, encode_entry};
use crate::error::LoaderError;
use crate::store::Entry;

const COUNT_LEN: usize = 4;

/// The result of decoding an overlay file: the entries it held, plus any
/// bytes after the last entry the decoder didn't need to look at (spec
/// §4.7 step 6: "copy any trailing bytes after the last recognized entry
/// verbatim"). [`crate::persist::OverlayPersister`] preserves this tail
/// across rewrites.
pub struct DecodedOverlay {
    pub entries: Vec<Entry>,
    pub trailing: Vec<u8>,
}

/// Decodes an overlay file's bytes. An empty `bytes` slice (missing file)
/// decodes to an empty overlay with no trailing bytes.
pub fn decode(bytes: &[u8]) -> Result<DecodedOverlay, LoaderError> {
    if bytes.is_empty() {
        return Ok(DecodedOverlay {
            entries: Vec::new(),
            trailing: Vec::new(),
        });
    }

    if bytes.len() < COUNT_LEN {
        return Ok(DecodedOverlay {
            entries: Vec::new(),
            trailing: bytes.to_vec(),
        });
    }

    let declared_count = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let mut pos = COUNT_LEN;
    let mut entries = Vec::with_capacity(declared_count.min(bytes.len()));

    for _ in 0..declared_count {
        if pos >= bytes.len() {
            break;
        }
        match decode_entry(bytes, &mut pos) {
            Ok(entry) => entries.push(entry),
            Err(_) => break,
        }
    }

    Ok(DecodedOverlay {
        entries,
        trailing: bytes[pos..].to_vec(),
    })
}

/// Encodes `entries` plus a preserved `trailing` tail back into an overlay
/// file's bytes.
pub fn encode(entries: &[Entry], trailing: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    for entry in entries {
        encode_entry(entry, &mut out);
    }
    out.extend_from_slice(trailing);
    out
}
