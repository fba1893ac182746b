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

//! Maps the three trace levels from spec §7 (INFO, ABN, ERROR) onto the
//! `log` facade, so call sites read the same way the original source's
//! `TPT_TRACE(level, ...)` calls did.

macro_rules! trace_info {
    ($($arg:tt)*) => { log::info!(target: "dbloader", $($arg)*) };
}

macro_rules! trace_abn {
    ($($arg:tt)*) => { log::warn!(target: "dbloader", $($arg)*) };
}

macro_rules! trace_error {
    ($($arg:tt)*) => { log::error!(target: "dbloader", $($arg)*) };
}

pub(crate) use trace_abn;
pub(crate) use trace_error;
pub(crate) use trace_info;
