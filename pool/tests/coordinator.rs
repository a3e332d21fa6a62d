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

use std::sync::Arc;

use cairn_chain::Chain;
use cairn_core::{meets_difficulty, BlockTemplate};
use cairn_pool::{Coordinator, CoordinatorError, EventAttrs, EventSink, GpuReport, WorkGenerator};
use cairn_util::sync::Mutex;

struct RecordingEventSink {
    events: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingEventSink {
    fn new() -> Self {
        RecordingEventSink { events: Mutex::new(Vec::new()) }
    }

    fn types_for(&self, miner: &str) -> Vec<String> {
        self.events.lock().iter().filter(|(_, id)| id.as_deref() == Some(miner)).map(|(t, _)| t.clone()).collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event_type: &str, _message: &str, miner_id: Option<&str>, _attrs: EventAttrs) {
        self.events.lock().push((event_type.to_string(), miner_id.map(|s| s.to_string())));
    }
}

fn mine_nonce(template: &BlockTemplate, difficulty: u32, miner: &str) -> (u64, String) {
    let mut nonce = 0u64;
    loop {
        let hash = template.clone().into_block(nonce, String::new(), miner.to_string()).recompute_hash();
        if meets_difficulty(&hash, difficulty) {
            return (nonce, hash);
        }
        nonce += 1;
    }
}

fn coordinator_with(difficulty: u32, sink: Arc<RecordingEventSink>) -> (Arc<Coordinator>, Arc<Chain>) {
    let chain = Arc::new(Chain::new(difficulty));
    let (_gen, queue) = WorkGenerator::new(chain.clone());
    let coordinator = Arc::new(Coordinator::new(chain.clone(), queue, 50, Some(sink)));
    (coordinator, chain)
}

#[test]
fn s2_single_miner_happy_path() {
    let sink = Arc::new(RecordingEventSink::new());
    let (coordinator, chain) = coordinator_with(2, sink);

    coordinator.register("m1", "1.2.3.4", "host1", "5.6.7.8");
    let template = coordinator.get_work("m1").unwrap();
    assert_eq!(template.index, 1);

    let (nonce, hash) = mine_nonce(&template, chain.difficulty(), "m1");
    let accepted = coordinator.submit_work("m1", template.index, nonce, &hash).unwrap();

    assert_eq!(accepted.reward, 50);
    assert_eq!(chain.height(), 2);
    assert_eq!(coordinator.get_miner_record("m1").unwrap().blocks_mined, 1);
    assert!(!coordinator.has_pending_work("m1"));
}

#[test]
fn s3_stale_tie_break() {
    let sink = Arc::new(RecordingEventSink::new());
    let (coordinator, chain) = coordinator_with(1, sink);

    coordinator.register("m1", "", "", "");
    coordinator.register("m2", "", "", "");
    let t1 = coordinator.get_work("m1").unwrap();
    let t2 = coordinator.get_work("m2").unwrap();
    assert_eq!(t1.index, 1);
    assert_eq!(t2.index, 1);

    let (n1, h1) = mine_nonce(&t1, chain.difficulty(), "m1");
    let accepted = coordinator.submit_work("m1", t1.index, n1, &h1).unwrap();

    let (n2, h2) = mine_nonce(&t2, chain.difficulty(), "m2");
    let result = coordinator.submit_work("m2", t2.index, n2, &h2);
    assert!(matches!(result, Err(CoordinatorError::Stale)));
    assert!(!coordinator.has_pending_work("m2"));

    let next = coordinator.get_work("m2").unwrap();
    assert_eq!(next.index, 2);
    assert_eq!(next.previous_hash, accepted.hash);
}

#[test]
fn s4_eviction_terminal_signal() {
    let sink = Arc::new(RecordingEventSink::new());
    let (coordinator, _chain) = coordinator_with(1, sink);

    coordinator.register("m1", "", "", "");
    let _ = coordinator.get_work("m1").unwrap();
    assert!(coordinator.get_miner_status("m1").unwrap().active);

    coordinator.delete_miner("m1").unwrap();

    assert!(coordinator.get_miner_status("m1").is_none());
    assert!(coordinator.heartbeat("m1", 0, 0.0, 0, 0, None).is_err());
    assert!(!coordinator.has_pending_work("m1"));
}

#[test]
fn s5_throttle_and_pause_propagation() {
    let sink = Arc::new(RecordingEventSink::new());
    let (coordinator, _chain) = coordinator_with(1, sink.clone());

    coordinator.register("m1", "", "", "");
    coordinator.set_throttle("m1", 40).unwrap();
    coordinator.pause_miner("m1").unwrap();

    let status = coordinator.get_miner_status("m1").unwrap();
    assert!(!status.should_mine);
    assert_eq!(status.throttle_percent, 40);

    coordinator.resume_miner("m1").unwrap();
    let status = coordinator.get_miner_status("m1").unwrap();
    assert!(status.should_mine);
    assert_eq!(status.throttle_percent, 40);

    let events = sink.types_for("m1");
    assert!(events.contains(&"miner_throttled".to_string()));
    assert!(events.contains(&"miner_paused".to_string()));
    assert!(events.contains(&"miner_resumed".to_string()));
}

#[test]
fn s6_invalid_block_rejected() {
    let sink = Arc::new(RecordingEventSink::new());
    let (coordinator, chain) = coordinator_with(2, sink);

    coordinator.register("m1", "", "", "");
    let template = coordinator.get_work("m1").unwrap();

    let result = coordinator.submit_work("m1", template.index, 0, "deadbeefdeadbeef");
    assert!(matches!(result, Err(CoordinatorError::InvalidBlock(_))));
    assert_eq!(chain.height(), 1);
    assert!(!coordinator.has_pending_work("m1"));

    let fresh = coordinator.get_work("m1").unwrap();
    assert_eq!(fresh.index, template.index);
}

#[test]
fn throttle_out_of_range_is_rejected() {
    let sink = Arc::new(RecordingEventSink::new());
    let (coordinator, _chain) = coordinator_with(1, sink);
    coordinator.register("m1", "", "", "");
    assert!(matches!(coordinator.set_throttle("m1", 101), Err(CoordinatorError::InvalidArgument(_))));
}

#[test]
fn admin_ops_on_unknown_miner_return_not_found() {
    let sink = Arc::new(RecordingEventSink::new());
    let (coordinator, _chain) = coordinator_with(1, sink);
    assert!(matches!(coordinator.pause_miner("ghost"), Err(CoordinatorError::NotFound)));
    assert!(matches!(coordinator.delete_miner("ghost"), Err(CoordinatorError::NotFound)));
}

#[test]
fn reregistration_preserves_counters() {
    let sink = Arc::new(RecordingEventSink::new());
    let (coordinator, chain) = coordinator_with(1, sink);
    coordinator.register("m1", "1.1.1.1", "host", "2.2.2.2");
    let template = coordinator.get_work("m1").unwrap();
    let (nonce, hash) = mine_nonce(&template, chain.difficulty(), "m1");
    coordinator.submit_work("m1", template.index, nonce, &hash).unwrap();

    coordinator.register("m1", "1.1.1.1", "host", "3.3.3.3");
    let record = coordinator.get_miner_record("m1").unwrap();
    assert_eq!(record.blocks_mined, 1);
    assert_eq!(record.actual_ip, "3.3.3.3");
    assert!(record.active);
}

#[test]
fn heartbeat_updates_fields_but_not_control_flags() {
    let sink = Arc::new(RecordingEventSink::new());
    let (coordinator, _chain) = coordinator_with(1, sink);
    coordinator.register("m1", "", "", "");
    coordinator.pause_miner("m1").unwrap();
    coordinator
        .heartbeat("m1", 1000, 55.5, 500, 10, Some(GpuReport { gpu_enabled: true, ..Default::default() }))
        .unwrap();
    let status = coordinator.get_miner_status("m1").unwrap();
    assert!(!status.should_mine);
    let record = coordinator.get_miner_record("m1").unwrap();
    assert_eq!(record.hash_rate, 1000);
    assert!(record.gpu.gpu_enabled);
}
