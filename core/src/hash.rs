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

use sha2::{Digest, Sha256};

/// Builds the canonical SHA-256 preimage for a block: decimal index, decimal
/// timestamp, data, previous hash and decimal nonce, concatenated as UTF-8
/// bytes with no separators. Every implementer of this wire contract (the
/// pool coordinator and every miner) must reproduce this exactly, since the
/// hash — not a separate signature — is what `Chain::append` checks.
pub fn canonical_preimage(index: u64, timestamp: i64, data: &str, previous_hash: &str, nonce: u64) -> String {
    format!("{}{}{}{}{}", index, timestamp, data, previous_hash, nonce)
}

/// Lowercase hex SHA-256 of the canonical preimage.
pub fn hash_preimage(preimage: &str) -> String {
    let digest = Sha256::digest(preimage.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preimage_has_no_separators() {
        let p = canonical_preimage(1, 2, "data", "prev", 3);
        assert_eq!(p, "12dataprev3");
    }

    #[test]
    fn hash_is_deterministic_and_hex() {
        let p = canonical_preimage(0, 100, "Genesis Block", "0", 0);
        let h1 = hash_preimage(&p);
        let h2 = hash_preimage(&p);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
