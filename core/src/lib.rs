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

//! Block type and proof-of-work primitives shared by the chain and pool
//! crates. Nothing in this crate locks, spawns, or does I/O — it is pure
//! data and hashing, the same separation `grin_core` draws between the
//! chain's data model and its concurrency (`grin_chain`).

mod block;
mod hash;
mod pow;

pub use block::{Block, BlockTemplate};
pub use hash::canonical_preimage;
pub use pow::{clamp_difficulty, meets_difficulty, MIN_DIFFICULTY, MAX_DIFFICULTY};
