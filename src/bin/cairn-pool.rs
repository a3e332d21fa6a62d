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

//! Process entry point: reads a small CLI, wires the chain, work generator,
//! pool coordinator and RPC server together, and runs until interrupted.
//! Generalizes `grin`'s `src/bin/grin.rs` + `src/bin/cmd/server.rs` wiring to
//! this workspace's narrower set of components — configuration parsing and
//! logging setup live here, outside the core, exactly as spec.md §1 scopes
//! them.

use std::sync::Arc;
use std::time::Duration;

use cairn_chain::Chain;
use cairn_pool::{Coordinator, LogEventSink, WorkGenerator};
use clap::Parser;
use log::info;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "cairn-pool", about = "Proof-of-work mining pool coordinator")]
struct Args {
    /// Address to listen for miner RPC connections on.
    #[arg(long, default_value = "0.0.0.0:3333")]
    listen: String,

    /// Chain difficulty, clamped to [1, 10].
    #[arg(long, default_value_t = 4)]
    difficulty: u32,

    /// Reward credited to a miner for each accepted block.
    #[arg(long, default_value_t = 50)]
    block_reward: u64,

    /// How often the work generator rebuilds a template from the chain tip.
    #[arg(long, default_value_t = WorkGenerator::DEFAULT_TICK_INTERVAL_SECS)]
    tick_interval_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let chain = Arc::new(Chain::new(args.difficulty));
    let (generator, queue) =
        WorkGenerator::with_tick_interval(chain.clone(), Duration::from_secs(args.tick_interval_secs));
    let coordinator = Arc::new(Coordinator::new(chain.clone(), queue, args.block_reward, Some(Arc::new(LogEventSink))));

    let cancel = CancellationToken::new();
    let generator_handle = generator.spawn(cancel.clone());

    let listener = TcpListener::bind(&args.listen).await?;
    info!("cairn-pool listening on {} (difficulty {})", args.listen, chain.difficulty());

    let server_cancel = cancel.clone();
    let server_coordinator = coordinator.clone();
    let server_chain = chain.clone();
    let server_handle = tokio::spawn(async move {
        cairn_rpc::serve(listener, server_coordinator, server_chain, server_cancel).await;
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    cancel.cancel();

    let _ = generator_handle.await;
    let _ = server_handle.await;
    Ok(())
}
