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

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use cairn_chain::Chain;
use cairn_pool::Coordinator;
use log::{info, warn};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use crate::dispatch;
use crate::peer::normalize_peer_address;
use crate::wire::{Envelope, MinerInfo, MinerStatus, ResponseEnvelope, RpcError, WorkRequest, WorkSubmission};

/// Accepts connections and spawns one task per connection — "many may be in
/// flight concurrently", no single event loop (spec.md §5) — generalizing
/// `grin_servers::mining::stratumserver::accept_workers` from a blocking
/// `TcpListener::incoming()` thread to an async accept loop.
pub async fn serve(listener: TcpListener, coordinator: Arc<Coordinator>, chain: Arc<Chain>, cancel: CancellationToken) {
    info!("rpc server listening on {:?}", listener.local_addr());
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("rpc server stopping");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        let coordinator = coordinator.clone();
                        let chain = chain.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, addr, coordinator, chain).await {
                                warn!("connection from {} ended: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => warn!("error accepting connection: {}", e),
                }
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    coordinator: Arc<Coordinator>,
    chain: Arc<Chain>,
) -> io::Result<()> {
    let peer_ip = normalize_peer_address(Some(&addr.to_string()));
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = process_line(&coordinator, &chain, &peer_ip, &line);
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    Ok(())
}

/// Parses one NDJSON request, dispatches it, and serializes the response.
/// Pulled out of `handle_connection` so it can be unit-tested without a real
/// socket.
pub fn process_line(coordinator: &Coordinator, chain: &Chain, peer_ip: &str, line: &str) -> String {
    let request: Envelope<Value> = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            let envelope = ResponseEnvelope {
                id: String::new(),
                method: String::new(),
                result: None,
                error: Some(RpcError::new(-32700, format!("parse error: {}", e))),
            };
            return serde_json::to_string(&envelope).expect("ResponseEnvelope always serializes");
        }
    };

    let result = route(coordinator, chain, peer_ip, &request.method, request.payload);
    let envelope = match result {
        Ok(value) => ResponseEnvelope { id: request.id, method: request.method, result: Some(value), error: None },
        Err(e) => ResponseEnvelope { id: request.id, method: request.method, result: None, error: Some(e) },
    };
    serde_json::to_string(&envelope).expect("ResponseEnvelope always serializes")
}

fn route(coordinator: &Coordinator, chain: &Chain, peer_ip: &str, method: &str, payload: Value) -> Result<Value, RpcError> {
    match method {
        "RegisterMiner" => {
            let info: MinerInfo = parse_payload(payload)?;
            let response = dispatch::handle_register(coordinator, peer_ip, info);
            Ok(serde_json::to_value(response).expect("RegistrationResponse always serializes"))
        }
        "GetWork" => {
            let req: WorkRequest = parse_payload(payload)?;
            let response = dispatch::handle_get_work(coordinator, chain, req)?;
            Ok(serde_json::to_value(response).expect("WorkResponse always serializes"))
        }
        "SubmitWork" => {
            let submission: WorkSubmission = parse_payload(payload)?;
            let response = dispatch::handle_submit_work(coordinator, submission)?;
            Ok(serde_json::to_value(response).expect("SubmissionResponse always serializes"))
        }
        "Heartbeat" => {
            let status: MinerStatus = parse_payload(payload)?;
            let response = dispatch::handle_heartbeat(coordinator, status);
            Ok(serde_json::to_value(response).expect("HeartbeatResponse always serializes"))
        }
        "StopMining" => {
            let info: MinerInfo = parse_payload(payload)?;
            let response = dispatch::handle_stop(coordinator, info)?;
            Ok(serde_json::to_value(response).expect("StopResponse always serializes"))
        }
        other => Err(RpcError::new(-32601, format!("method not found: {}", other))),
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, RpcError> {
    serde_json::from_value(payload).map_err(|e| RpcError::new(-32600, format!("invalid params: {}", e)))
}
