// Copyright 2026 The Cairn Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Why a block was refused by `Chain::append`. Kept as one variant per
/// rejection cause — mirroring the shape of `grin_chain::error::ErrorKind` —
/// even though the wire layer collapses all of them into the single
/// `InvalidBlock` kind spec.md §7 names; the variant is what ends up in
/// logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("block index {got} does not follow tip index {expected}")]
    WrongIndex { expected: u64, got: u64 },

    #[error("block previous_hash {got} does not match tip hash {expected}")]
    WrongPreviousHash { expected: String, got: String },

    #[error("block hash {claimed} does not match its recomputed hash {recomputed}")]
    HashMismatch { claimed: String, recomputed: String },

    #[error("block hash {hash} does not meet difficulty {difficulty}")]
    DifficultyNotMet { hash: String, difficulty: u32 },
}
