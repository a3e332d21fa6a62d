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

use log::info;

/// One value in an event's open `attributes` bag (spec.md §9) — a tagged sum
/// of primitives rather than a stringly-typed blob.
#[derive(Clone, Debug, PartialEq)]
pub enum EventAttr {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

pub type EventAttrs = HashMap<String, EventAttr>;

/// A write-only consumer of coordinator events. Implementations must not
/// block or assume delivery is reliable — generalizes
/// `grin_servers::common::hooks::{NetEvents, ChainEvents}`'s default-method,
/// trait-per-event-family shape to the six events the coordinator emits.
pub trait EventSink: Send + Sync {
    fn emit(&self, event_type: &str, message: &str, miner_id: Option<&str>, attrs: EventAttrs);
}

/// The only concrete sink this crate ships: formats and logs. Anything
/// richer (a durable JSON event log, metrics) is explicitly external per
/// spec.md §1 — this mirrors `grin`'s own `EventLogger`.
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&self, event_type: &str, message: &str, miner_id: Option<&str>, attrs: EventAttrs) {
        match miner_id {
            Some(id) => info!("[{}] miner={} {} {:?}", event_type, id, message, attrs),
            None => info!("[{}] {} {:?}", event_type, message, attrs),
        }
    }
}
