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

//! Small free functions shared by the codec, resolver and store — this
//! crate's analogue of `wickdb`'s `util::coding`/`util::varint` modules.

/// Splits `input` on `delim`, discarding empty segments (so leading or
/// repeated delimiters never produce empty tokens — spec §4.4 step 1) and
/// stripping embedded spaces/tabs from every token (spec §4.2: "Whitespace
/// and tabs within tokens are stripped before parsing").
pub(crate) fn tokenize(input: &str, delim: &str) -> Vec<String> {
    input
        .split(delim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.chars().filter(|c| *c != ' ' && *c != '\t').collect())
        .filter(|token: &String| !token.is_empty())
        .collect()
}
