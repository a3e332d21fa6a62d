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
use std::time::Duration;

use cairn_chain::Chain;
use cairn_core::meets_difficulty;
use cairn_pool::{Coordinator, WorkGenerator};
use cairn_rpc::wire::{
    Envelope, HeartbeatResponse, MinerInfo, MinerStatus, RegistrationResponse, ResponseEnvelope, SubmissionResponse,
    WorkRequest, WorkResponse, WorkSubmission,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

async fn spawn_server() -> (std::net::SocketAddr, Arc<Coordinator>, Arc<Chain>, CancellationToken) {
    let chain = Arc::new(Chain::new(1));
    let (_gen, queue) = WorkGenerator::new(chain.clone());
    let coordinator = Arc::new(Coordinator::new(chain.clone(), queue, 50, None));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    let cancel = CancellationToken::new();

    let coordinator_clone = coordinator.clone();
    let chain_clone = chain.clone();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        cairn_rpc::serve(listener, coordinator_clone, chain_clone, cancel_clone).await;
    });

    (addr, coordinator, chain, cancel)
}

async fn call<P: Serialize, R: serde::de::DeserializeOwned>(
    stream: &mut TcpStream,
    method: &str,
    payload: P,
) -> Result<R, cairn_rpc::wire::RpcError> {
    let request = Envelope { id: "1".to_string(), method: method.to_string(), payload };
    let line = serde_json::to_string(&request).unwrap();
    let (read_half, mut write_half) = stream.split();
    write_half.write_all(line.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();

    let mut reader = BufReader::new(read_half);
    let mut response_line = String::new();
    reader.read_line(&mut response_line).await.unwrap();
    let envelope: ResponseEnvelope = serde_json::from_str(&response_line).unwrap();
    match (envelope.result, envelope.error) {
        (Some(v), None) => Ok(serde_json::from_value(v).unwrap()),
        (None, Some(e)) => Err(e),
        _ => panic!("response had neither or both of result/error"),
    }
}

#[tokio::test]
async fn s2_happy_path_over_the_wire() {
    let (addr, _coordinator, chain, _cancel) = spawn_server().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let reg: RegistrationResponse = call(
        &mut stream,
        "RegisterMiner",
        MinerInfo { miner_id: "m1".to_string(), reported_ip: "1.1.1.1".to_string(), hostname: "h".to_string(), timestamp: 0 },
    )
    .await
    .unwrap();
    assert!(reg.success);

    let work: WorkResponse = call(&mut stream, "GetWork", WorkRequest { miner_id: "m1".to_string() }).await.unwrap();
    assert_eq!(work.block_index, 1);

    let mut nonce = 0u64;
    let hash = loop {
        let preimage = cairn_core::canonical_preimage(work.block_index, work.timestamp, &work.data, &work.previous_hash, nonce);
        let candidate = sha2_hex(&preimage);
        if meets_difficulty(&candidate, work.difficulty) {
            break candidate;
        }
        nonce += 1;
    };

    let submission: SubmissionResponse = call(
        &mut stream,
        "SubmitWork",
        WorkSubmission { miner_id: "m1".to_string(), block_index: work.block_index, nonce, hash },
    )
    .await
    .unwrap();
    assert!(submission.accepted);
    assert_eq!(submission.reward, 50);
    assert_eq!(chain.height(), 2);
}

#[tokio::test]
async fn unregistered_get_work_is_a_wire_error() {
    let (addr, _coordinator, _chain, _cancel) = spawn_server().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let result: Result<WorkResponse, _> = call(&mut stream, "GetWork", WorkRequest { miner_id: "ghost".to_string() }).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn s4_eviction_over_the_wire() {
    let (addr, coordinator, _chain, _cancel) = spawn_server().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let _: RegistrationResponse = call(
        &mut stream,
        "RegisterMiner",
        MinerInfo { miner_id: "m1".to_string(), reported_ip: "".to_string(), hostname: "".to_string(), timestamp: 0 },
    )
    .await
    .unwrap();

    coordinator.delete_miner("m1").unwrap();

    let hb: HeartbeatResponse = call(
        &mut stream,
        "Heartbeat",
        MinerStatus {
            miner_id: "m1".to_string(),
            hash_rate: 0,
            cpu_percent: 0.0,
            total_hashes: 0,
            mining_time_seconds: 0,
            gpu_devices: vec![],
            gpu_hash_rate: 0,
            gpu_enabled: false,
            hybrid_mode: false,
        },
    )
    .await
    .unwrap();

    assert!(!hb.active);
    assert!(hb.message.to_lowercase().contains("deleted"));
    assert!(!hb.should_mine);
}

#[tokio::test]
async fn server_stops_promptly_on_cancellation() {
    let chain = Arc::new(Chain::new(1));
    let (_gen, queue) = WorkGenerator::new(chain.clone());
    let coordinator = Arc::new(Coordinator::new(chain.clone(), queue, 50, None));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(cairn_rpc::serve(listener, coordinator, chain, cancel.clone()));
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle).await.expect("server task should exit promptly").unwrap();
}

fn sha2_hex(preimage: &str) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(preimage.as_bytes()))
}
