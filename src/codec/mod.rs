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

//! Wire codecs: CRC-16, the shared value grammar, the `ENTRY` record, and
//! the two file formats built from it (spec §4.2, §4.7).

pub mod base;
pub mod crc16;
mod entry;
pub(crate) mod grammar;
pub mod overlay;
