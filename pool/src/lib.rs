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

//! The pool coordinator: per-miner state, the pending-work ledger, work
//! assignment with staleness handling, solution validation against the
//! chain tip, and the admin control surface (pause/resume/throttle/delete).
//! Generalizes the worker bookkeeping and submission handling in
//! `grin_servers::mining::stratumserver` from a single in-process `Vec<Worker>`
//! to a map of long-lived miner identities that survive disconnects.

mod coordinator;
mod error;
mod events;
mod generator;
mod miner;
mod pending;

pub use coordinator::{
    Accepted, AggregateStats, Coordinator, MinerStatusView, ACTIVITY_WINDOW_SECS, STALENESS_WINDOW_SECS,
};
pub use error::CoordinatorError;
pub use events::{EventAttr, EventAttrs, EventSink, LogEventSink};
pub use generator::{WorkGenerator, WorkQueue};
pub use miner::{GpuReport, MinerRecord};
pub use pending::PendingWork;
