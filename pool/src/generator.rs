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
use cairn_core::BlockTemplate;
use cairn_util::sync::Mutex;
use cairn_util::time::now_unix;
use log::{info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Bounded FIFO of candidate templates, capacity 100. Push is non-blocking
/// (drop-on-full, realized by `try_send`); pop is non-blocking (`try_recv`).
/// Shared between the periodic generator (producer) and the coordinator
/// (consumer) as an `Arc<WorkQueue>`.
pub struct WorkQueue {
    rx: Mutex<mpsc::Receiver<BlockTemplate>>,
}

impl WorkQueue {
    /// Takes the next queued template, if any, without blocking.
    pub fn try_take(&self) -> Option<BlockTemplate> {
        self.rx.lock().try_recv().ok()
    }
}

/// Periodically materializes a candidate next-block template from the
/// current chain tip and pushes it onto the queue. Generalizes
/// `grin_servers::mining::stratumserver::StratumServer`'s block-rebuilding
/// loop, replaced with a plain interval tick since this workspace has no
/// transaction pool to watch for new fee-bearing transactions.
pub struct WorkGenerator {
    chain: Arc<Chain>,
    tx: mpsc::Sender<BlockTemplate>,
    tick_interval: Duration,
}

impl WorkGenerator {
    pub const CAPACITY: usize = 100;
    pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 30;

    pub fn new(chain: Arc<Chain>) -> (Self, Arc<WorkQueue>) {
        Self::with_tick_interval(chain, Duration::from_secs(Self::DEFAULT_TICK_INTERVAL_SECS))
    }

    /// Same as `new`, but with a caller-supplied tick period instead of the
    /// default 30s — how the binary crate's `--tick-interval-secs` flag
    /// reaches the generator.
    pub fn with_tick_interval(chain: Arc<Chain>, tick_interval: Duration) -> (Self, Arc<WorkQueue>) {
        let (tx, rx) = mpsc::channel(Self::CAPACITY);
        (WorkGenerator { chain, tx, tick_interval }, Arc::new(WorkQueue { rx: Mutex::new(rx) }))
    }

    /// Builds a template from the chain's current tip: index = tip + 1,
    /// timestamp = now, a deterministic label derived from the index,
    /// previous_hash = tip hash. Used both by the periodic tick and by the
    /// coordinator when it must synthesize a template on demand because the
    /// queue is empty.
    pub fn template_from_tip(chain: &Chain) -> BlockTemplate {
        let tip = chain.latest();
        let index = tip.index + 1;
        BlockTemplate::new(index, now_unix(), format!("block-{}", index), tip.hash)
    }

    /// Runs the periodic tick until `cancel` fires, then returns promptly.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.tick_interval);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("work generator stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        let template = Self::template_from_tip(&self.chain);
                        if self.tx.try_send(template).is_err() {
                            warn!("work queue full, dropping generated template");
                        }
                    }
                }
            }
        })
    }
}
