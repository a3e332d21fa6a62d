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

use cairn_core::{clamp_difficulty, meets_difficulty, Block};
use cairn_util::sync::RwLock;
use cairn_util::time::now_unix;
use log::{info, warn};

use crate::error::Error;

/// The append-only proof-of-work chain. One exclusive writer at a time;
/// readers (`latest`, `height`, `snapshot`, `validate_all`) never block each
/// other. This is the only mutable shared state the submission path writes
/// to — `grin_chain::Chain` draws the same line between "the chain" and
/// everything that decides what to append to it.
pub struct Chain {
    difficulty: u32,
    blocks: RwLock<Vec<Block>>,
}

impl Chain {
    /// Builds a fresh chain with a genesis block. `difficulty` is clamped to
    /// `[MIN_DIFFICULTY, MAX_DIFFICULTY]`.
    pub fn new(difficulty: u32) -> Self {
        let difficulty = clamp_difficulty(difficulty);
        let genesis = Block::genesis(now_unix());
        Chain { difficulty, blocks: RwLock::new(vec![genesis]) }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// The current tip.
    pub fn latest(&self) -> Block {
        self.blocks.read().last().expect("chain always has a genesis block").clone()
    }

    /// Block count, including genesis.
    pub fn height(&self) -> u64 {
        self.blocks.read().len() as u64
    }

    /// A defensive copy of the ordered sequence. The returned `Vec` is
    /// disjoint from internal storage; the `Block`s inside it are immutable
    /// and safe to share.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.read().clone()
    }

    /// Accepts `block` onto the tip iff its index, previous-hash linkage,
    /// hash and proof-of-work all check out. Serializes with any other
    /// append and excludes concurrent readers for the duration of the
    /// mutation.
    pub fn append(&self, block: Block) -> Result<(), Error> {
        let mut blocks = self.blocks.write();
        let tip = blocks.last().expect("chain always has a genesis block");

        if block.index != tip.index + 1 {
            let err = Error::WrongIndex { expected: tip.index + 1, got: block.index };
            warn!("rejecting block {}: {}", block.index, err);
            return Err(err);
        }
        if block.previous_hash != tip.hash {
            let err = Error::WrongPreviousHash {
                expected: tip.hash.clone(),
                got: block.previous_hash.clone(),
            };
            warn!("rejecting block {}: {}", block.index, err);
            return Err(err);
        }
        let recomputed = block.recompute_hash();
        if recomputed != block.hash {
            let err = Error::HashMismatch { claimed: block.hash.clone(), recomputed };
            warn!("rejecting block {}: {}", block.index, err);
            return Err(err);
        }
        if !meets_difficulty(&block.hash, self.difficulty) {
            let err = Error::DifficultyNotMet { hash: block.hash.clone(), difficulty: self.difficulty };
            warn!("rejecting block {}: {}", block.index, err);
            return Err(err);
        }

        info!(
            "accepted block {} hash {} mined_by {}",
            block.index, block.hash, block.mined_by
        );
        blocks.push(block);
        Ok(())
    }

    /// Re-checks every linkage and proof-of-work from block 1 onward.
    pub fn validate_all(&self) -> bool {
        let blocks = self.blocks.read();
        for i in 1..blocks.len() {
            let prev = &blocks[i - 1];
            let cur = &blocks[i];
            if cur.index != prev.index + 1 {
                return false;
            }
            if cur.previous_hash != prev.hash {
                return false;
            }
            if cur.recompute_hash() != cur.hash {
                return false;
            }
            if !meets_difficulty(&cur.hash, self.difficulty) {
                return false;
            }
        }
        true
    }
}
