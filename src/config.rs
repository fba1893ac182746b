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

//! Loader configuration (spec §4.9, §9: "global tuning constants... must
//! become explicit configuration"). Paths are always supplied by the
//! embedding application — this crate never hard-codes them.

use std::path::PathBuf;

/// Parameters for [`crate::loader::Loader::open`].
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    base_path: PathBuf,
    overlay_path: PathBuf,
    initial_store_capacity: usize,
}

impl LoaderConfig {
    pub fn new(base_path: impl Into<PathBuf>, overlay_path: impl Into<PathBuf>) -> Self {
        LoaderConfig {
            base_path: base_path.into(),
            overlay_path: overlay_path.into(),
            initial_store_capacity: 0,
        }
    }

    /// Reserves capacity up front in the base/overlay entry vectors, useful
    /// when the caller knows roughly how many entries the image holds.
    pub fn with_initial_store_capacity(mut self, capacity: usize) -> Self {
        self.initial_store_capacity = capacity;
        self
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    pub fn overlay_path(&self) -> &std::path::Path {
        &self.overlay_path
    }

    pub fn initial_store_capacity(&self) -> usize {
        self.initial_store_capacity
    }
}
