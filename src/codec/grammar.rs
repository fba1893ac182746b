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

//! The value grammar (spec §4.2): how a NUL-terminated wire value decodes
//! into an entry's `values` sequence, and back.

use crate::diag::trace_error;
use crate::error::{LoaderError, Status};
use crate::value::{DbType, Value};

/// Parses a wire value string for `ty` into its element sequence.
///
/// For `STRING`, a missing or mismatched pair of quotes is a fatal
/// [`Status::BadStringQuoting`] (spec §4.2 load failures). For numeric
/// types, an individual out-of-range or non-numeric token is a *value*
/// error (spec §7): it is dropped with a diagnostic, and parsing continues
/// — never fatal.
pub fn parse(ty: DbType, raw: &str) -> Result<Vec<Value>, LoaderError> {
    if ty == DbType::Str {
        return parse_string(raw);
    }

    let mut values = Vec::new();
    for token in crate::util::tokenize(raw, ",") {
        match parse_numeric_token(&token, ty) {
            Some(value) => values.push(value),
            None => trace_error!("dropping malformed or out-of-range DB value token \"{token}\" for type {ty}"),
        }
    }
    Ok(values)
}

fn parse_string(raw: &str) -> Result<Vec<Value>, LoaderError> {
    if raw.len() < 2 || !raw.starts_with('"') || !raw.ends_with('"') {
        return Err(LoaderError::new(
            Status::BadStringQuoting,
            Some(format!("value field too short or not quoted: {raw}")),
        ));
    }

    let inner = &raw[1..raw.len() - 1];
    let mut values: Vec<Value> = crate::util::tokenize(inner, " ")
        .into_iter()
        .map(Value::Str)
        .collect();
    values.push(Value::Str(inner.to_string()));
    Ok(values)
}

fn parse_numeric_token(token: &str, ty: DbType) -> Option<Value> {
    if token.is_empty() {
        return None;
    }

    let hex = token.contains("0x");
    let (negative, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };

    let magnitude: i64 = if hex {
        let digits = rest.trim_start_matches("0x").trim_start_matches("0X");
        i64::from_str_radix(digits, 16).ok()?
    } else {
        rest.parse().ok()?
    };

    let parsed = if negative { -magnitude } else { magnitude };
    if !fits(ty, parsed) {
        return None;
    }
    Some(Value::from_i64(ty, parsed))
}

/// Single exhaustive match over the type tag (spec §9 Open Question 3):
/// the original's two `if`/`else if` chains let the `U16`/`S16` branches
/// run even after `U8`/`S8` already matched, which this replaces. `U64`
/// and `S64` never reject — the check would be vacuous against an `i64`
/// input, as the original source notes.
fn fits(ty: DbType, v: i64) -> bool {
    match ty {
        DbType::U8 => (0..=u8::MAX as i64).contains(&v),
        DbType::S8 => (i8::MIN as i64..=i8::MAX as i64).contains(&v),
        DbType::U16 => (0..=u16::MAX as i64).contains(&v),
        DbType::S16 => (i16::MIN as i64..=i16::MAX as i64).contains(&v),
        DbType::U32 => (0..=u32::MAX as i64).contains(&v),
        DbType::S32 => (i32::MIN as i64..=i32::MAX as i64).contains(&v),
        DbType::U64 | DbType::S64 => true,
        DbType::Str => unreachable!("numeric range check never invoked for STRING entries"),
    }
}

/// Serializes an entry's values back to the wire value grammar (used by
/// [`crate::codec::overlay`] when re-encoding the overlay file, and by
/// [`crate::testutil`] to build synthetic images).
///
/// Resolves spec §9 Open Question 4: integers join on `,` only, matching
/// the reader's accepted grammar exactly (the original persister wrote
/// `", "`, harmless only because the reader stripped whitespace).
pub fn serialize(ty: DbType, values: &[Value]) -> String {
    if ty == DbType::Str {
        let whole = match values.last() {
            Some(Value::Str(s)) => s.as_str(),
            _ => "",
        };
        return format!("\"{whole}\"");
    }

    values
        .iter()
        .map(|v| v.as_i64().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex_integers() {
        let values = parse(DbType::U8, "0x10,0x20,0x30").unwrap();
        assert_eq!(values, vec![Value::U8(16), Value::U8(32), Value::U8(48)]);
    }

    #[test]
    fn parses_negative_decimal() {
        let values = parse(DbType::S16, "-40,85").unwrap();
        assert_eq!(values, vec![Value::S16(-40), Value::S16(85)]);
    }

    #[test]
    fn out_of_range_token_is_dropped_not_fatal() {
        let values = parse(DbType::U8, "1,999,2").unwrap();
        assert_eq!(values, vec![Value::U8(1), Value::U8(2)]);
    }

    #[test]
    fn string_requires_matching_quotes() {
        assert!(parse(DbType::Str, "acme usb driver").is_err());
    }

    #[test]
    fn string_tokenizes_and_keeps_whole_value_last() {
        let values = parse(DbType::Str, "\"acme usb driver\"").unwrap();
        assert_eq!(
            values,
            vec![
                Value::Str("acme".into()),
                Value::Str("usb".into()),
                Value::Str("driver".into()),
                Value::Str("acme usb driver".into()),
            ]
        );
    }

    #[test]
    fn serialize_numeric_uses_comma_only_separator() {
        let values = vec![Value::U8(1), Value::U8(2), Value::U8(3)];
        assert_eq!(serialize(DbType::U8, &values), "1,2,3");
    }

    #[test]
    fn serialize_string_uses_trailing_whole_value() {
        let values = vec![Value::Str("a".into()), Value::Str("b".into()), Value::Str("a b".into())];
        assert_eq!(serialize(DbType::Str, &values), "\"a b\"");
    }
}
