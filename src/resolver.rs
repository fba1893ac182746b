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

//! Resolver (C3, spec §4.4): turns a path-style key into at most one
//! `{tier, index}` pair, preferring the overlay tier.

use crate::diag::trace_abn;
use crate::store::EntryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Base,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Found { tier: Tier, index: usize },
    NotFound,
}

/// Tokenizes `key` on `/`, discarding empty segments produced by leading
/// or repeated slashes (spec §4.4 step 1).
pub fn tokenize_key(key: &str) -> Vec<String> {
    crate::util::tokenize(key, "/")
}

/// Resolves `key` against the overlay tier first, falling back to the base
/// tier, per spec §4.4 steps 2-4. Logs an "ambiguous key" diagnostic (but
/// still resolves to the lowest index) whenever a tier's intersection
/// yields more than one candidate.
pub fn resolve(base: &EntryStore, overlay: &EntryStore, key: &str) -> Resolution {
    let tokens = tokenize_key(key);
    if tokens.is_empty() {
        return Resolution::NotFound;
    }

    let overlay_matches = overlay.resolve_tokens(&tokens);
    if !overlay_matches.is_empty() {
        if overlay_matches.len() > 1 {
            trace_abn!(
                "ambiguous key \"{}\": {} overlay entries matched, returning the lowest index",
                key,
                overlay_matches.len()
            );
        }
        return Resolution::Found {
            tier: Tier::Overlay,
            index: overlay_matches[0],
        };
    }

    let base_matches = base.resolve_tokens(&tokens);
    if !base_matches.is_empty() {
        if base_matches.len() > 1 {
            trace_abn!(
                "ambiguous key \"{}\": {} base entries matched, returning the lowest index",
                key,
                base_matches.len()
            );
        }
        return Resolution::Found {
            tier: Tier::Base,
            index: base_matches[0],
        };
    }

    Resolution::NotFound
}
