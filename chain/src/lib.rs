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

//! The proof-of-work chain: an append-only, hash-linked sequence of blocks
//! with a difficulty invariant, concurrent readers and a single-writer
//! append path. Generalizes `grin_chain::Chain` to the simple leading-zero
//! SHA-256 proof of work this workspace uses instead of Cuckoo Cycle.

mod chain;
mod error;

pub use chain::Chain;
pub use error::Error;
