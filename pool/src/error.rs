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

/// Errors the coordinator raises. `NotRegistered` covers any miner-facing
/// operation on an unknown id; `NotFound` is the admin-surface analogue for
/// the same underlying condition (spec.md §7 keeps them distinct so RPC and
/// admin callers can tell which surface rejected the request).
#[derive(Debug, Clone, Error)]
pub enum CoordinatorError {
    #[error("miner is not registered")]
    NotRegistered,

    #[error("no pending work for this miner")]
    NoPendingWork,

    #[error("submitted index does not match the pending assignment")]
    IndexMismatch,

    #[error("chain tip has advanced past the submitted index")]
    Stale,

    #[error("block was rejected by the chain: {0}")]
    InvalidBlock(#[from] cairn_chain::Error),

    #[error("argument out of range: {0}")]
    InvalidArgument(String),

    #[error("no such miner")]
    NotFound,
}
