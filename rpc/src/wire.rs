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

/// One JSON-RPC-shaped envelope per line, directly generalizing the
/// `RpcRequest`/`RpcResponse` pair `grin_servers::mining::stratumserver`
/// wraps every stratum message in, with `params`/`result` now typed per
/// method instead of a raw `serde_json::Value`.
#[derive(Serialize, Deserialize, Debug)]
pub struct Envelope<T> {
    pub id: String,
    pub method: String,
    pub payload: T,
}

/// The framed response counterpart to `Envelope<T>`: exactly one of
/// `result`/`error` is set, same as `grin_servers::mining::stratumserver`'s
/// `RpcResponse`.
#[derive(Serialize, Deserialize, Debug)]
pub struct ResponseEnvelope {
    pub id: String,
    pub method: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        RpcError { code, message: message.into() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MinerInfo {
    pub miner_id: String,
    pub reported_ip: String,
    pub hostname: String,
    pub timestamp: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegistrationResponse {
    pub success: bool,
    pub message: String,
    pub miner_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorkRequest {
    pub miner_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorkResponse {
    pub block_index: u64,
    pub previous_hash: String,
    pub data: String,
    pub difficulty: u32,
    pub timestamp: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorkSubmission {
    pub miner_id: String,
    pub block_index: u64,
    pub nonce: u64,
    pub hash: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubmissionResponse {
    pub accepted: bool,
    pub message: String,
    pub reward: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GpuDevice {
    pub name: String,
    pub hash_rate: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MinerStatus {
    pub miner_id: String,
    pub hash_rate: u64,
    pub cpu_percent: f64,
    pub total_hashes: u64,
    pub mining_time_seconds: u64,
    #[serde(default)]
    pub gpu_devices: Vec<GpuDevice>,
    #[serde(default)]
    pub gpu_hash_rate: u64,
    #[serde(default)]
    pub gpu_enabled: bool,
    #[serde(default)]
    pub hybrid_mode: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HeartbeatResponse {
    pub active: bool,
    pub message: String,
    pub should_mine: bool,
    pub cpu_throttle_percent: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StopResponse {
    pub success: bool,
    pub message: String,
    pub total_blocks_mined: u64,
}
