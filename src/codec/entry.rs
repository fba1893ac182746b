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

//! The `ENTRY` record shape shared by the base image and the overlay file
//! (spec §4.2): `'F'` marker, NUL-terminated key, permission byte, type
//! byte, NUL-terminated value.

use crate::codec::grammar;
use crate::error::{LoaderError, Status};
use crate::store::Entry;
use crate::value::{DbType, Permission};

const ENTRY_MARKER: u8 = b'F';

/// Reads a NUL-terminated string starting at `*pos`, advancing `*pos` past
/// the terminator.
fn read_cstr(bytes: &[u8], pos: &mut usize) -> Result<String, LoaderError> {
    let start = *pos;
    while bytes.get(*pos).is_some_and(|b| *b != 0) {
        *pos += 1;
    }
    if *pos >= bytes.len() {
        return Err(LoaderError::new(Status::Truncated, Some("unterminated string field")));
    }
    let s = String::from_utf8_lossy(&bytes[start..*pos]).into_owned();
    *pos += 1; // skip the NUL
    Ok(s)
}

fn read_byte(bytes: &[u8], pos: &mut usize) -> Result<u8, LoaderError> {
    let b = *bytes
        .get(*pos)
        .ok_or_else(|| LoaderError::new(Status::Truncated, Some("entry record cut off")))?;
    *pos += 1;
    Ok(b)
}

/// Decodes one `ENTRY` record starting at `*pos` (which must point at the
/// `'F'` marker), advancing `*pos` past it.
pub(crate) fn decode_entry(bytes: &[u8], pos: &mut usize) -> Result<Entry, LoaderError> {
    let marker = read_byte(bytes, pos)?;
    if marker != ENTRY_MARKER {
        return Err(LoaderError::new(
            Status::Truncated,
            Some(format!("expected entry marker 'F', found {marker:#04x}")),
        ));
    }

    let key = read_cstr(bytes, pos)?;

    let permission_byte = read_byte(bytes, pos)?;
    let permission = Permission::from_byte(permission_byte)
        .ok_or_else(|| LoaderError::new(Status::BadPermission, Some(format!("{permission_byte}"))))?;

    let type_byte = read_byte(bytes, pos)?;
    let ty = DbType::from_byte(type_byte)
        .ok_or_else(|| LoaderError::new(Status::BadType, Some(format!("{type_byte}"))))?;

    let raw_value = read_cstr(bytes, pos)?;
    let values = grammar::parse(ty, &raw_value)?;

    Ok(Entry {
        key,
        permission,
        ty,
        values,
        erased: false,
    })
}

/// Encodes one `ENTRY` record, appending it to `out`.
pub(crate) fn encode_entry(entry: &Entry, out: &mut Vec<u8>) {
    out.push(ENTRY_MARKER);
    out.extend_from_slice(entry.key.as_bytes());
    out.push(0);
    out.push(entry.permission.as_byte());
    out.push(entry.ty.as_byte());
    out.extend_from_slice(grammar::serialize(entry.ty, &entry.values).as_bytes());
    out.push(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn round_trips_a_numeric_entry() {
        let entry = Entry::new("/x/y", Permission::ReadOnly, DbType::U16, vec![Value::U16(42)]);
        let mut bytes = Vec::new();
        encode_entry(&entry, &mut bytes);

        let mut pos = 0;
        let decoded = decode_entry(&bytes, &mut pos).unwrap();
        assert_eq!(decoded.key, "/x/y");
        assert_eq!(decoded.permission, Permission::ReadOnly);
        assert_eq!(decoded.ty, DbType::U16);
        assert_eq!(decoded.values, vec![Value::U16(42)]);
        assert_eq!(pos, bytes.len());
    }

    #[test]
    fn round_trips_a_string_entry() {
        let entry = Entry::new(
            "/driverName",
            Permission::ReadWrite,
            DbType::Str,
            vec![
                Value::Str("acme".into()),
                Value::Str("usb".into()),
                Value::Str("driver".into()),
                Value::Str("acme usb driver".into()),
            ],
        );
        let mut bytes = Vec::new();
        encode_entry(&entry, &mut bytes);

        let mut pos = 0;
        let decoded = decode_entry(&bytes, &mut pos).unwrap();
        assert_eq!(decoded.values, entry.values);
    }

    #[test]
    fn rejects_unrecognized_permission_byte() {
        let mut bytes = vec![ENTRY_MARKER];
        bytes.extend_from_slice(b"/a\0");
        bytes.push(9); // not 1 or 2
        bytes.push(DbType::U8.as_byte());
        bytes.extend_from_slice(b"1\0");

        let mut pos = 0;
        let err = decode_entry(&bytes, &mut pos).unwrap_err();
        assert_eq!(err.status(), Status::BadPermission);
    }
}
