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

//! An embedded, in-process configuration database.
//!
//! A typed key/value store compiled ahead of time from a human-authored
//! text source into a checksummed binary image (the *base* tier), loaded
//! once at process start, then read and optionally mutated at runtime.
//! Mutations are either ephemeral (session-local) or persistent (written
//! through to an *overlay* file that survives a restart).
//!
//! The crate root wires together:
//! - [`codec`] — the base image and overlay wire formats, CRC-16, and the
//!   shared value grammar.
//! - [`store`] — the append-only entry vector plus its inverted index.
//! - [`resolver`] — turns a path-style key into a resolved `{tier, index}`.
//! - [`query`] — the typed read against a resolved entry.
//! - [`mutator`] — `update`/`restore`/`erase`/`reset` against the overlay
//!   tier.
//! - [`persist`] — the rewrite-and-rename overlay file writer.
//! - [`loader`] and [`facade`] — the assembled database: [`facade::ConfigDb`]
//!   is the type applications hold onto.

pub mod codec;
pub mod config;
mod diag;
pub mod error;
pub mod facade;
pub mod loader;
pub mod mutator;
pub mod persist;
pub mod query;
pub mod resolver;
pub mod store;
pub mod testutil;
mod util;
pub mod value;

pub use config::LoaderConfig;
pub use error::{LoaderError, Status};
pub use facade::ConfigDb;
pub use value::{DbType, DbValue, Permission, Rc, Value};
