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

/// Optional accelerator telemetry a miner may report alongside its CPU
/// stats. Kept as its own small struct so the common CPU-only heartbeat
/// path doesn't have to thread four extra arguments through.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GpuReport {
    pub gpu_devices: Vec<String>,
    pub gpu_hash_rate: u64,
    pub gpu_enabled: bool,
    pub hybrid_mode: bool,
}

/// Everything the coordinator knows about one miner. Keyed by `miner_id` in
/// the coordinator's map; never handed out as a mutable alias — callers
/// outside the coordinator only ever see a clone.
#[derive(Clone, Debug)]
pub struct MinerRecord {
    pub miner_id: String,
    pub reported_ip: String,
    pub actual_ip: String,
    pub hostname: String,

    pub registered_at: i64,
    pub last_heartbeat: i64,

    pub active: bool,
    pub should_mine: bool,
    pub throttle_percent: u8,

    pub blocks_mined: u64,
    pub hash_rate: u64,
    pub total_hashes: u64,
    pub total_mining_time_secs: u64,
    pub cpu_percent: f64,

    pub gpu: GpuReport,
}

impl MinerRecord {
    pub fn new(miner_id: String, reported_ip: String, actual_ip: String, hostname: String, now: i64) -> Self {
        MinerRecord {
            miner_id,
            reported_ip,
            actual_ip,
            hostname,
            registered_at: now,
            last_heartbeat: now,
            active: true,
            should_mine: true,
            throttle_percent: 0,
            blocks_mined: 0,
            hash_rate: 0,
            total_hashes: 0,
            total_mining_time_secs: 0,
            cpu_percent: 0.0,
            gpu: GpuReport::default(),
        }
    }

    /// True iff this miner counts as "currently active": `active` is set and
    /// its last heartbeat is inside the activity window.
    pub fn is_currently_active(&self, now: i64, activity_window_secs: i64) -> bool {
        self.active && now - self.last_heartbeat < activity_window_secs
    }
}
