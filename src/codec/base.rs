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

//! The base image codec (spec §4.2): header, Entries section, footer.
//!
//! ```text
//! Header:  1B 'H'  1B revision  4B reserved  4B payload_len
//! Entries: payload_len bytes of repeated ENTRY records
//! Footer:  1B 'E'  2B crc16 (over the Entries section only)
//! ```

use crate::codec::crc16;
use crate::codec::entry::{decode_entry, encode_entry};
use crate::error::{LoaderError, Status};
use crate::store::Entry;

const MAGIC: u8 = b'H';
const REVISION: u8 = 10;
const END_MARKER: u8 = b'E';
const HEADER_LEN: usize = 1 + 1 + 4 + 4;
const FOOTER_LEN: usize = 1 + 2;

/// Decodes a complete base image, failing fast on any of the load errors
/// spec §4.2 names as fatal: bad magic, bad revision, unrecognized
/// permission/type byte, missing `'E'`, CRC mismatch, or truncation.
pub fn decode(bytes: &[u8]) -> Result<Vec<Entry>, LoaderError> {
    if bytes.len() < HEADER_LEN + FOOTER_LEN {
        return Err(LoaderError::new(Status::Truncated, Some("image shorter than header + footer")));
    }

    if bytes[0] != MAGIC {
        return Err(LoaderError::new(Status::BadMagic, Some(format!("{:#04x}", bytes[0]))));
    }
    if bytes[1] != REVISION {
        return Err(LoaderError::new(Status::BadRevision, Some(format!("{}", bytes[1]))));
    }
    // bytes[2..6] are the reserved field; spec §4.2 defines no meaning for
    // it yet, so it is read but not interpreted.

    let payload_len = u32::from_be_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
    let payload_start = HEADER_LEN;
    let payload_end = payload_start
        .checked_add(payload_len)
        .ok_or_else(|| LoaderError::new(Status::Truncated, Some("payload_len overflow")))?;

    if bytes.len() < payload_end + FOOTER_LEN {
        return Err(LoaderError::new(Status::Truncated, Some("image shorter than declared payload_len")));
    }

    let payload = &bytes[payload_start..payload_end];

    if bytes[payload_end] != END_MARKER {
        return Err(LoaderError::new(Status::MissingEndMarker, None::<String>));
    }

    let stored_crc = u16::from_be_bytes([bytes[payload_end + 1], bytes[payload_end + 2]]);
    let computed_crc = crc16::checksum(payload);
    if stored_crc != computed_crc {
        return Err(LoaderError::new(
            Status::CrcMismatch,
            Some(format!("stored {stored_crc:#06x}, computed {computed_crc:#06x}")),
        ));
    }

    let mut entries = Vec::new();
    let mut pos = 0;
    while pos < payload.len() {
        entries.push(decode_entry(payload, &mut pos)?);
    }

    Ok(entries)
}

/// Encodes `entries` into a complete base image. Used by
/// [`crate::testutil`] to build fixtures in tests; the standalone
/// text-to-binary compiler that produces production images is out of
/// scope for this crate (spec §1).
pub fn encode(entries: &[Entry]) -> Vec<u8> {
    let mut payload = Vec::new();
    for entry in entries {
        encode_entry(entry, &mut payload);
    }

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len() + FOOTER_LEN);
    out.push(MAGIC);
    out.push(REVISION);
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(&payload);
    out.push(END_MARKER);
    out.extend_from_slice(&crc16::checksum(&payload).to_be_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{DbType, Permission, Value};

    #[test]
    fn round_trips_through_encode_decode() {
        let entries = vec![
            Entry::new("/isFeatureXyzEnabled", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)]),
            Entry::new(
                "/temperatureRanges",
                Permission::ReadWrite,
                DbType::S16,
                vec![Value::S16(-40), Value::S16(85)],
            ),
        ];
        let bytes = encode(&entries);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.len(), entries.len());
        assert_eq!(decoded[0].key, "/isFeatureXyzEnabled");
        assert_eq!(decoded[1].values, vec![Value::S16(-40), Value::S16(85)]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = encode(&[]);
        bytes[0] = b'X';
        assert_eq!(decode(&bytes).unwrap_err().status(), Status::BadMagic);
    }

    #[test]
    fn rejects_bad_revision() {
        let mut bytes = encode(&[]);
        bytes[1] = 9;
        assert_eq!(decode(&bytes).unwrap_err().status(), Status::BadRevision);
    }

    #[test]
    fn rejects_corrupted_crc() {
        let entries = vec![Entry::new("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)])];
        let mut bytes = encode(&entries);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert_eq!(decode(&bytes).unwrap_err().status(), Status::CrcMismatch);
    }

    #[test]
    fn rejects_missing_end_marker() {
        let entries = vec![Entry::new("/a", Permission::ReadWrite, DbType::U8, vec![Value::U8(1)])];
        let mut bytes = encode(&entries);
        let payload_len = entries.len(); // irrelevant, just need the index of 'E'
        let _ = payload_len;
        let end_marker_index = bytes.len() - 3;
        bytes[end_marker_index] = b'X';
        assert_eq!(decode(&bytes).unwrap_err().status(), Status::MissingEndMarker);
    }
}
