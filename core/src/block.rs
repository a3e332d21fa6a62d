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

use serde::{Deserialize, Serialize};

use crate::hash::{canonical_preimage, hash_preimage};

/// A candidate next block, missing the fields only a miner can supply:
/// nonce, hash, and who mined it. This is what `GetWork` hands out and what
/// `SubmitWork` stamps and hands back to the chain.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockTemplate {
    pub index: u64,
    pub timestamp: i64,
    pub data: String,
    pub previous_hash: String,
}

impl BlockTemplate {
    pub fn new(index: u64, timestamp: i64, data: String, previous_hash: String) -> Self {
        BlockTemplate { index, timestamp, data, previous_hash }
    }

    /// Stamps this template with a miner's solution, producing a `Block`
    /// ready to be offered to `Chain::append`. Does not itself check the
    /// hash or the difficulty — that is `Chain::append`'s job.
    pub fn into_block(self, nonce: u64, hash: String, mined_by: String) -> Block {
        Block {
            index: self.index,
            timestamp: self.timestamp,
            data: self.data,
            previous_hash: self.previous_hash,
            hash,
            nonce,
            mined_by,
        }
    }
}

/// An immutable, already-solved block.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64,
    pub data: String,
    pub previous_hash: String,
    pub hash: String,
    pub nonce: u64,
    pub mined_by: String,
}

impl Block {
    /// The index-0 block every chain starts with. Not required to meet the
    /// chain's difficulty target.
    pub fn genesis(timestamp: i64) -> Self {
        let index = 0;
        let data = "Genesis Block".to_string();
        let previous_hash = "0".to_string();
        let nonce = 0;
        let preimage = canonical_preimage(index, timestamp, &data, &previous_hash, nonce);
        let hash = hash_preimage(&preimage);
        Block { index, timestamp, data, previous_hash, hash, nonce, mined_by: String::new() }
    }

    /// Recomputes this block's hash from its own fields, independent of
    /// whatever is stored in `self.hash`. Used by `Chain::append` and
    /// `Chain::validate_all` to check that a claimed hash is genuine.
    pub fn recompute_hash(&self) -> String {
        let preimage = canonical_preimage(self.index, self.timestamp, &self.data, &self.previous_hash, self.nonce);
        hash_preimage(&preimage)
    }

    pub fn hash_matches(&self) -> bool {
        self.recompute_hash() == self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_has_expected_shape() {
        let g = Block::genesis(1_000);
        assert_eq!(g.index, 0);
        assert_eq!(g.data, "Genesis Block");
        assert_eq!(g.previous_hash, "0");
        assert_eq!(g.nonce, 0);
        assert_eq!(g.mined_by, "");
        assert!(g.hash_matches());
    }

    #[test]
    fn template_into_block_stamps_fields() {
        let t = BlockTemplate::new(1, 5, "d1".to_string(), "deadbeef".to_string());
        let b = t.into_block(42, "abc123".to_string(), "miner-1".to_string());
        assert_eq!(b.index, 1);
        assert_eq!(b.nonce, 42);
        assert_eq!(b.hash, "abc123");
        assert_eq!(b.mined_by, "miner-1");
    }
}
