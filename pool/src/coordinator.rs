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

use std::collections::HashMap;
use std::sync::Arc;

use cairn_chain::Chain;
use cairn_core::BlockTemplate;
use cairn_util::sync::RwLock;
use cairn_util::time::now_unix;
use log::info;

use crate::error::CoordinatorError;
use crate::events::{EventAttr, EventAttrs, EventSink};
use crate::generator::{WorkGenerator, WorkQueue};
use crate::miner::{GpuReport, MinerRecord};
use crate::pending::PendingWork;

/// Repeated `GetWork` polls inside this window get back the same assignment
/// instead of fanning out new templates on every retry.
pub const STALENESS_WINDOW_SECS: i64 = 5 * 60;

/// A miner counts as "currently active" only if it heartbeat within this
/// window.
pub const ACTIVITY_WINDOW_SECS: i64 = 2 * 60;

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub reward: u64,
    pub block_index: u64,
    pub hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinerStatusView {
    pub active: bool,
    pub should_mine: bool,
    pub throttle_percent: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateStats {
    pub active_count: u64,
    pub total_hash_rate: u64,
    pub average_cpu_percent: f64,
}

struct State {
    miners: HashMap<String, MinerRecord>,
    pending: HashMap<String, PendingWork>,
}

/// Per-miner state, pending-work ledger, work assignment and solution
/// validation, and the admin control surface — all mediated by one
/// exclusive lock over both maps together, which is what makes
/// single-winner-per-height and "no intra-operation race" hold (spec.md
/// §4.3, §5). Generalizes the worker bookkeeping in
/// `grin_servers::mining::stratumserver::StratumServer` (a `Vec<Worker>` plus
/// a separately locked `StratumStats`) to one map keyed by miner id guarded
/// by a single lock, since this workspace has no per-connection `Worker`
/// object — miners are addressed purely by id across RPC calls.
pub struct Coordinator {
    chain: Arc<Chain>,
    queue: Arc<WorkQueue>,
    block_reward: u64,
    sink: Option<Arc<dyn EventSink>>,
    state: RwLock<State>,
}

impl Coordinator {
    pub fn new(chain: Arc<Chain>, queue: Arc<WorkQueue>, block_reward: u64, sink: Option<Arc<dyn EventSink>>) -> Self {
        Coordinator {
            chain,
            queue,
            block_reward,
            sink,
            state: RwLock::new(State { miners: HashMap::new(), pending: HashMap::new() }),
        }
    }

    fn emit(&self, event_type: &str, message: &str, miner_id: Option<&str>, attrs: EventAttrs) {
        if let Some(sink) = &self.sink {
            sink.emit(event_type, message, miner_id, attrs);
        }
    }

    /// Registers a new miner, or refreshes an existing one. Re-registration
    /// preserves counters and control flags; only `actual_ip` and
    /// `last_heartbeat` are refreshed, and `active` is forced back to true.
    pub fn register(&self, miner_id: &str, reported_ip: &str, hostname: &str, actual_ip: &str) {
        let now = now_unix();
        let mut state = self.state.write();
        match state.miners.get_mut(miner_id) {
            Some(record) => {
                record.active = true;
                record.last_heartbeat = now;
                record.actual_ip = actual_ip.to_string();
                record.reported_ip = reported_ip.to_string();
                record.hostname = hostname.to_string();
            }
            None => {
                let record = MinerRecord::new(
                    miner_id.to_string(),
                    reported_ip.to_string(),
                    actual_ip.to_string(),
                    hostname.to_string(),
                    now,
                );
                state.miners.insert(miner_id.to_string(), record);
                self.emit(
                    "miner_registered",
                    "miner registered",
                    Some(miner_id),
                    EventAttrs::from([("reported_ip".to_string(), EventAttr::Str(reported_ip.to_string()))]),
                );
            }
        }
    }

    /// Returns this miner's pending assignment if it is still within the
    /// staleness window, otherwise assigns a fresh one (from the generator
    /// queue, or synthesized on demand if the queue is empty).
    pub fn get_work(&self, miner_id: &str) -> Result<BlockTemplate, CoordinatorError> {
        let now = now_unix();
        let mut state = self.state.write();
        {
            let record = state.miners.get_mut(miner_id).ok_or(CoordinatorError::NotRegistered)?;
            record.last_heartbeat = now;
        }

        if let Some(pending) = state.pending.get(miner_id) {
            if now - pending.assigned_at < STALENESS_WINDOW_SECS {
                return Ok(pending.template.clone());
            }
        }

        let template = self.queue.try_take().unwrap_or_else(|| WorkGenerator::template_from_tip(&self.chain));
        state.pending.insert(miner_id.to_string(), PendingWork { template: template.clone(), assigned_at: now });
        Ok(template)
    }

    /// Validates and, on success, appends a miner's solution to the chain.
    /// The whole operation — map lookups plus the chain append — runs under
    /// one held lock, which is what makes the first valid submission for a
    /// height win the reward and every other concurrent submission for that
    /// height deterministically lose it.
    pub fn submit_work(&self, miner_id: &str, claimed_index: u64, nonce: u64, hash: &str) -> Result<Accepted, CoordinatorError> {
        let mut state = self.state.write();

        if !state.miners.contains_key(miner_id) {
            return Err(CoordinatorError::NotRegistered);
        }

        let pending = match state.pending.get(miner_id) {
            Some(p) => p.clone(),
            None => return Err(CoordinatorError::NoPendingWork),
        };
        if pending.template.index != claimed_index {
            return Err(CoordinatorError::IndexMismatch);
        }

        let tip = self.chain.latest();
        if claimed_index != tip.index + 1 {
            state.pending.remove(miner_id);
            return Err(CoordinatorError::Stale);
        }

        let block = pending.template.into_block(nonce, hash.to_string(), miner_id.to_string());
        let block_index = block.index;
        let block_hash = block.hash.clone();

        if let Err(e) = self.chain.append(block) {
            state.pending.remove(miner_id);
            return Err(CoordinatorError::InvalidBlock(e));
        }

        if let Some(record) = state.miners.get_mut(miner_id) {
            record.blocks_mined += 1;
        }
        state.pending.remove(miner_id);
        // Every other miner's assignment at this height is now stale by
        // construction: the tip has moved and their previous_hash no longer
        // matches it.
        let same_height: Vec<String> = state
            .pending
            .iter()
            .filter(|(id, work)| *id != miner_id && work.template.index == claimed_index)
            .map(|(id, _)| id.clone())
            .collect();
        for id in same_height {
            state.pending.remove(&id);
        }

        info!("block {} mined by {} hash {}", block_index, miner_id, block_hash);
        self.emit(
            "block_mined",
            "block accepted",
            Some(miner_id),
            EventAttrs::from([
                ("index".to_string(), EventAttr::Int(block_index as i64)),
                ("hash".to_string(), EventAttr::Str(block_hash.clone())),
                ("reward".to_string(), EventAttr::Int(self.block_reward as i64)),
                ("nonce".to_string(), EventAttr::Int(nonce as i64)),
            ]),
        );

        Ok(Accepted { reward: self.block_reward, block_index, hash: block_hash })
    }

    /// Refreshes heartbeat and reported performance fields and reads back the
    /// resulting control-flag view, all under one lock acquisition — so a
    /// concurrent `delete_miner` can never land between the update and the
    /// reply the way it could if these were two separate calls. Does not
    /// itself touch `active`, `should_mine`, or `throttle_percent`.
    pub fn heartbeat(
        &self,
        miner_id: &str,
        hash_rate: u64,
        cpu_percent: f64,
        total_hashes: u64,
        mining_time_secs: u64,
        gpu: Option<GpuReport>,
    ) -> Result<MinerStatusView, CoordinatorError> {
        let now = now_unix();
        let mut state = self.state.write();
        let record = state.miners.get_mut(miner_id).ok_or(CoordinatorError::NotRegistered)?;
        record.last_heartbeat = now;
        record.hash_rate = hash_rate;
        record.cpu_percent = cpu_percent;
        record.total_hashes = total_hashes;
        record.total_mining_time_secs = mining_time_secs;
        if let Some(gpu) = gpu {
            record.gpu = gpu;
        }
        Ok(MinerStatusView { active: record.active, should_mine: record.should_mine, throttle_percent: record.throttle_percent })
    }

    /// Marks a miner inactive and clears its pending work, preserving
    /// counters. Returns the final `blocks_mined` count.
    pub fn stop_miner(&self, miner_id: &str) -> Result<u64, CoordinatorError> {
        let mut state = self.state.write();
        let blocks_mined = {
            let record = state.miners.get_mut(miner_id).ok_or(CoordinatorError::NotRegistered)?;
            record.active = false;
            record.blocks_mined
        };
        state.pending.remove(miner_id);
        Ok(blocks_mined)
    }

    pub fn pause_miner(&self, miner_id: &str) -> Result<(), CoordinatorError> {
        let mut state = self.state.write();
        let record = state.miners.get_mut(miner_id).ok_or(CoordinatorError::NotFound)?;
        record.should_mine = false;
        drop(state);
        self.emit("miner_paused", "miner paused", Some(miner_id), EventAttrs::new());
        Ok(())
    }

    pub fn resume_miner(&self, miner_id: &str) -> Result<(), CoordinatorError> {
        let mut state = self.state.write();
        let record = state.miners.get_mut(miner_id).ok_or(CoordinatorError::NotFound)?;
        record.should_mine = true;
        drop(state);
        self.emit("miner_resumed", "miner resumed", Some(miner_id), EventAttrs::new());
        Ok(())
    }

    pub fn set_throttle(&self, miner_id: &str, percent: u8) -> Result<(), CoordinatorError> {
        if percent > 100 {
            return Err(CoordinatorError::InvalidArgument(format!("throttle percent {} out of [0,100]", percent)));
        }
        let mut state = self.state.write();
        let record = state.miners.get_mut(miner_id).ok_or(CoordinatorError::NotFound)?;
        record.throttle_percent = percent;
        drop(state);
        self.emit(
            "miner_throttled",
            "throttle updated",
            Some(miner_id),
            EventAttrs::from([("throttle_percent".to_string(), EventAttr::Int(percent as i64))]),
        );
        Ok(())
    }

    /// Final removal: the next heartbeat from this miner will be told
    /// `active=false` because the record (and its pending work) is gone.
    pub fn delete_miner(&self, miner_id: &str) -> Result<(), CoordinatorError> {
        let mut state = self.state.write();
        let record = state.miners.remove(miner_id).ok_or(CoordinatorError::NotFound)?;
        state.pending.remove(miner_id);
        drop(state);
        self.emit(
            "miner_deleted",
            "miner deleted",
            Some(miner_id),
            EventAttrs::from([
                ("blocks_mined".to_string(), EventAttr::Int(record.blocks_mined as i64)),
                ("total_hashes".to_string(), EventAttr::Int(record.total_hashes as i64)),
            ]),
        );
        Ok(())
    }

    /// Pure read used by the RPC layer to assemble heartbeat and status
    /// replies. `None` means the miner is unknown (deleted or never
    /// registered) — the RPC layer turns that into the terminal
    /// `active=false` eviction signal.
    pub fn get_miner_status(&self, miner_id: &str) -> Option<MinerStatusView> {
        let state = self.state.read();
        state.miners.get(miner_id).map(|record| MinerStatusView {
            active: record.active,
            should_mine: record.should_mine,
            throttle_percent: record.throttle_percent,
        })
    }

    pub fn get_throttle(&self, miner_id: &str) -> Option<u8> {
        self.state.read().miners.get(miner_id).map(|r| r.throttle_percent)
    }

    pub fn get_miner_record(&self, miner_id: &str) -> Option<MinerRecord> {
        self.state.read().miners.get(miner_id).cloned()
    }

    pub fn has_pending_work(&self, miner_id: &str) -> bool {
        self.state.read().pending.contains_key(miner_id)
    }

    pub fn aggregate_stats(&self) -> AggregateStats {
        let now = now_unix();
        let state = self.state.read();
        let active: Vec<&MinerRecord> =
            state.miners.values().filter(|r| r.is_currently_active(now, ACTIVITY_WINDOW_SECS)).collect();
        if active.is_empty() {
            return AggregateStats::default();
        }
        let total_hash_rate: u64 = active.iter().map(|r| r.hash_rate).sum();
        let average_cpu_percent = active.iter().map(|r| r.cpu_percent).sum::<f64>() / active.len() as f64;
        AggregateStats { active_count: active.len() as u64, total_hash_rate, average_cpu_percent }
    }
}
