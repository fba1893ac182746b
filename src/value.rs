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

//! Entry types, the tagged value union, and the facade return codes.
//!
//! `wickdb` decodes its on-disk records into concrete Rust types up front
//! (`BlockHandle`, `Footer`, ...) rather than keeping a runtime-`Any`
//! container around; this module does the same for DB entries. `Value` is
//! decoded once at parse time and carries its variant for the lifetime of
//! the entry, so the query engine's type check (spec §4.5) never needs a
//! fallible downcast.

use std::fmt;

/// Wire type tag, one byte, values `1..=9` per spec §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DbType {
    U8 = 1,
    S8 = 2,
    U16 = 3,
    S16 = 4,
    U32 = 5,
    S32 = 6,
    U64 = 7,
    S64 = 8,
    Str = 9,
}

impl DbType {
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            1 => DbType::U8,
            2 => DbType::S8,
            3 => DbType::U16,
            4 => DbType::S16,
            5 => DbType::U32,
            6 => DbType::S32,
            7 => DbType::U64,
            8 => DbType::S64,
            9 => DbType::Str,
            _ => return None,
        })
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DbType::U8 => "U8",
            DbType::S8 => "S8",
            DbType::U16 => "U16",
            DbType::S16 => "S16",
            DbType::U32 => "U32",
            DbType::S32 => "S32",
            DbType::U64 => "U64",
            DbType::S64 => "S64",
            DbType::Str => "STRING",
        };
        f.write_str(name)
    }
}

/// Wire permission tag. `UNDEFINED` (spec §3) is deliberately not a variant
/// here: a corrupt permission byte is an [`crate::error::LoaderError`]
/// raised at load time, never a live value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Permission {
    ReadOnly = 1,
    ReadWrite = 2,
}

impl Permission {
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            1 => Permission::ReadOnly,
            2 => Permission::ReadWrite,
            _ => return None,
        })
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// A decoded element. One variant per [`DbType`] (spec §9's "polymorphic
/// value storage" design note, realized as a tagged union instead of a
/// runtime-`Any` container).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    S8(i8),
    U16(u16),
    S16(i16),
    U32(u32),
    S32(i32),
    U64(u64),
    S64(i64),
    Str(String),
}

impl Value {
    pub fn ty(&self) -> DbType {
        match self {
            Value::U8(_) => DbType::U8,
            Value::S8(_) => DbType::S8,
            Value::U16(_) => DbType::U16,
            Value::S16(_) => DbType::S16,
            Value::U32(_) => DbType::U32,
            Value::S32(_) => DbType::S32,
            Value::U64(_) => DbType::U64,
            Value::S64(_) => DbType::S64,
            Value::Str(_) => DbType::Str,
        }
    }

    /// Widens any numeric variant back to `i64` for range checks and
    /// re-serialization; the `U64` case reinterprets the bit pattern
    /// exactly as the original source's `(uint64_t)numeric` cast did.
    pub(crate) fn as_i64(&self) -> i64 {
        match *self {
            Value::U8(v) => v as i64,
            Value::S8(v) => v as i64,
            Value::U16(v) => v as i64,
            Value::S16(v) => v as i64,
            Value::U32(v) => v as i64,
            Value::S32(v) => v as i64,
            Value::U64(v) => v as i64,
            Value::S64(v) => v,
            Value::Str(_) => unreachable!("numeric widening never invoked for STRING values"),
        }
    }

    pub(crate) fn from_i64(ty: DbType, v: i64) -> Value {
        match ty {
            DbType::U8 => Value::U8(v as u8),
            DbType::S8 => Value::S8(v as i8),
            DbType::U16 => Value::U16(v as u16),
            DbType::S16 => Value::S16(v as i16),
            DbType::U32 => Value::U32(v as u32),
            DbType::S32 => Value::S32(v as i32),
            DbType::U64 => Value::U64(v as u64),
            DbType::S64 => Value::S64(v),
            DbType::Str => unreachable!("from_i64 never invoked for STRING values"),
        }
    }
}

/// Stable facade/core return codes (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rc {
    Ok = 0,
    KeyNotFound = 1,
    TypeMismatch = 2,
    NotWritable = 3,
    Undefined = 4,
}

impl Default for Rc {
    fn default() -> Self {
        Rc::Undefined
    }
}

/// Sealed binding between a Rust type and its [`DbType`]/[`Value`] pair.
///
/// Generics let this crate express the facade's nine hand-written C++
/// overloads (`databaseIf.h`) as one generic method per operation; `T` is
/// restricted to the nine element types spec §4.1 names.
pub trait DbValue: Sized + sealed::Sealed {
    const TY: DbType;

    fn wrap(self) -> Value;
    fn unwrap(value: Value) -> Option<Self>;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for i8 {}
    impl Sealed for u16 {}
    impl Sealed for i16 {}
    impl Sealed for u32 {}
    impl Sealed for i32 {}
    impl Sealed for u64 {}
    impl Sealed for i64 {}
    impl Sealed for String {}
}

macro_rules! impl_db_value_numeric {
    ($t:ty, $ty_tag:expr, $variant:ident) => {
        impl DbValue for $t {
            const TY: DbType = $ty_tag;

            fn wrap(self) -> Value {
                Value::$variant(self)
            }

            fn unwrap(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_db_value_numeric!(u8, DbType::U8, U8);
impl_db_value_numeric!(i8, DbType::S8, S8);
impl_db_value_numeric!(u16, DbType::U16, U16);
impl_db_value_numeric!(i16, DbType::S16, S16);
impl_db_value_numeric!(u32, DbType::U32, U32);
impl_db_value_numeric!(i32, DbType::S32, S32);
impl_db_value_numeric!(u64, DbType::U64, U64);
impl_db_value_numeric!(i64, DbType::S64, S64);

impl DbValue for String {
    const TY: DbType = DbType::Str;

    fn wrap(self) -> Value {
        Value::Str(self)
    }

    fn unwrap(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}
