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

use cairn_chain::Chain;
use cairn_pool::{Coordinator, CoordinatorError};

use crate::wire::{
    HeartbeatResponse, MinerInfo, MinerStatus, RegistrationResponse, RpcError, StopResponse, SubmissionResponse,
    WorkRequest, WorkResponse, WorkSubmission,
};

/// `NotRegistered` on RegisterMiner/GetWork/SubmitWork/StopMining becomes a
/// wire-level RPC error (spec.md §7). `Heartbeat` is the one call site that
/// does not go through this path — see `handle_heartbeat`.
fn not_registered() -> RpcError {
    RpcError::new(-32001, "miner is not registered")
}

pub fn handle_register(coordinator: &Coordinator, actual_ip: &str, info: MinerInfo) -> RegistrationResponse {
    coordinator.register(&info.miner_id, &info.reported_ip, &info.hostname, actual_ip);
    RegistrationResponse { success: true, message: "registered".to_string(), miner_id: info.miner_id }
}

pub fn handle_get_work(coordinator: &Coordinator, chain: &Chain, req: WorkRequest) -> Result<WorkResponse, RpcError> {
    let template = coordinator.get_work(&req.miner_id).map_err(|e| match e {
        CoordinatorError::NotRegistered => not_registered(),
        other => RpcError::new(-32000, other.to_string()),
    })?;
    Ok(WorkResponse {
        block_index: template.index,
        previous_hash: template.previous_hash,
        data: template.data,
        difficulty: chain.difficulty(),
        timestamp: template.timestamp,
    })
}

pub fn handle_submit_work(coordinator: &Coordinator, submission: WorkSubmission) -> Result<SubmissionResponse, RpcError> {
    match coordinator.submit_work(&submission.miner_id, submission.block_index, submission.nonce, &submission.hash) {
        Ok(accepted) => Ok(SubmissionResponse { accepted: true, message: "accepted".to_string(), reward: accepted.reward }),
        Err(CoordinatorError::NotRegistered) => Err(not_registered()),
        Err(CoordinatorError::NoPendingWork) => {
            Ok(SubmissionResponse { accepted: false, message: "no pending work for this miner".to_string(), reward: 0 })
        }
        Err(CoordinatorError::IndexMismatch) => {
            Ok(SubmissionResponse { accepted: false, message: "submitted index does not match pending work".to_string(), reward: 0 })
        }
        Err(CoordinatorError::Stale) => {
            Ok(SubmissionResponse { accepted: false, message: "chain tip has advanced; solution is stale".to_string(), reward: 0 })
        }
        Err(e @ CoordinatorError::InvalidBlock(_)) => Ok(SubmissionResponse { accepted: false, message: e.to_string(), reward: 0 }),
        Err(other) => Err(RpcError::new(-32000, other.to_string())),
    }
}

pub fn handle_heartbeat(coordinator: &Coordinator, status: MinerStatus) -> HeartbeatResponse {
    let gpu = cairn_pool::GpuReport {
        gpu_devices: status.gpu_devices.into_iter().map(|d| d.name).collect(),
        gpu_hash_rate: status.gpu_hash_rate,
        gpu_enabled: status.gpu_enabled,
        hybrid_mode: status.hybrid_mode,
    };
    let result = coordinator.heartbeat(
        &status.miner_id,
        status.hash_rate,
        status.cpu_percent,
        status.total_hashes,
        status.mining_time_seconds,
        Some(gpu),
    );

    match result {
        Err(CoordinatorError::NotRegistered) => HeartbeatResponse {
            active: false,
            message: "Miner has been deleted from the pool".to_string(),
            should_mine: false,
            cpu_throttle_percent: 0,
        },
        Err(other) => HeartbeatResponse {
            active: false,
            message: other.to_string(),
            should_mine: false,
            cpu_throttle_percent: 0,
        },
        Ok(view) => HeartbeatResponse {
            active: view.active,
            message: "ok".to_string(),
            should_mine: view.should_mine,
            cpu_throttle_percent: view.throttle_percent,
        },
    }
}

pub fn handle_stop(coordinator: &Coordinator, info: MinerInfo) -> Result<StopResponse, RpcError> {
    let total_blocks_mined = coordinator.stop_miner(&info.miner_id).map_err(|e| match e {
        CoordinatorError::NotRegistered => not_registered(),
        other => RpcError::new(-32000, other.to_string()),
    })?;
    Ok(StopResponse { success: true, message: "stopped".to_string(), total_blocks_mined })
}
