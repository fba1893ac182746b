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

//! Error taxonomy for the loader core.
//!
//! Mirrors the `Status`/`WickErr` split used throughout `wickdb`: a small
//! `Copy` enum names *what kind* of failure occurred, and the error type
//! wraps it with an optional human-readable message. Only the fatal
//! failures named in spec §4.2/§4.7 are represented here — per-call
//! request errors (`KEY_NOT_FOUND`, `TYPE_MISMATCH`, `NOT_WRITABLE`) are a
//! separate, infallible `RC` enum (see [`crate::value::Rc`]) since they are
//! never thrown, only returned.

use std::fmt;
use std::io;

/// The kind of fatal failure behind a [`LoaderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The base image's first byte was not `'H'`.
    BadMagic,
    /// The base image's revision byte was not the one this crate speaks.
    BadRevision,
    /// An entry's permission byte was neither `1` nor `2`.
    BadPermission,
    /// An entry's type byte was not in `1..=9`.
    BadType,
    /// A `STRING` value was not wrapped in a matching pair of `"`.
    BadStringQuoting,
    /// The byte stream ended before a well-formed record could be read.
    Truncated,
    /// The footer's `'E'` end marker was missing.
    MissingEndMarker,
    /// The stored CRC-16 did not match the one computed over the payload.
    CrcMismatch,
    /// Failure came from the filesystem rather than the codec.
    Io,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::BadMagic => "bad magic",
            Status::BadRevision => "bad revision",
            Status::BadPermission => "bad permission byte",
            Status::BadType => "bad type byte",
            Status::BadStringQuoting => "string value not doubly quoted",
            Status::Truncated => "truncated image",
            Status::MissingEndMarker => "missing end marker",
            Status::CrcMismatch => "crc16 mismatch",
            Status::Io => "io error",
        }
    }
}

/// A fatal, load-time or persistence-time error.
#[derive(Debug)]
pub struct LoaderError {
    status: Status,
    message: Option<String>,
}

impl LoaderError {
    pub fn new(status: Status, message: Option<impl Into<String>>) -> Self {
        Self {
            status,
            message: message.map(Into::into),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.status.as_str(), msg),
            None => write!(f, "{}", self.status.as_str()),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<io::Error> for LoaderError {
    fn from(err: io::Error) -> Self {
        LoaderError::new(Status::Io, Some(err.to_string()))
    }
}
