// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process-wide directory of live canvases.
//!
//! [`Space`] maps a canvas id to a [`RegistryRecord`]: the canvas' dimensions and
//! visibility, the sending half of its queue, and its termination token. One mutex
//! guards the whole map. Every method takes the lock for its own read-modify-write
//! and releases it before returning, so no caller ever holds it across a send, a
//! buffer mutation or a second registry call. The price is staleness: a record
//! returned by [`Space::lookup`] is a snapshot that a concurrent `update` may
//! already have superseded.
//!
//! Cloning a `Space` clones a handle to the same map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::canvas::Envelope;
use crate::errors::SpaceError;
use crate::observability::messages::space::{CanvasDeregistered, CanvasRegistered};
use crate::observability::messages::StructuredLog;
use crate::packet::Packet;

/// Registry entry for one live canvas.
#[derive(Debug, Clone)]
pub struct RegistryRecord {
    pub id: String,
    pub owner: String,
    pub height: usize,
    pub width: usize,
    pub visible: bool,
    pub host: Option<String>,
    pub queue: UnboundedSender<Envelope>,
    pub terminator: CancellationToken,
}

/// Fields to overwrite in an existing record. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub height: Option<usize>,
    pub width: Option<usize>,
    pub visible: Option<bool>,
    pub host: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Space {
    records: Arc<Mutex<HashMap<String, RegistryRecord>>>,
}

impl Space {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by everything in this process.
    pub fn global() -> &'static Space {
        static GLOBAL: OnceLock<Space> = OnceLock::new();
        GLOBAL.get_or_init(Space::new)
    }

    /// Insert `record`, replacing any record under the same id.
    ///
    /// Returns the replaced record, if there was one.
    pub fn register(&self, record: RegistryRecord) -> Option<RegistryRecord> {
        let id = record.id.clone();
        let replaced = self.records().insert(id.clone(), record);
        CanvasRegistered {
            canvas_id: &id,
            replaced: replaced.is_some(),
        }
        .log();
        replaced
    }

    /// Snapshot of the record registered under `id`.
    pub fn lookup(&self, id: &str) -> Option<RegistryRecord> {
        self.records().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records().contains_key(id)
    }

    /// Apply `update` to the record under `id`. Returns `false` when absent.
    pub fn update(&self, id: &str, update: RecordUpdate) -> bool {
        let mut records = self.records();
        let Some(record) = records.get_mut(id) else {
            return false;
        };
        if let Some(height) = update.height {
            record.height = height;
        }
        if let Some(width) = update.width {
            record.width = width;
        }
        if let Some(visible) = update.visible {
            record.visible = visible;
        }
        if let Some(host) = update.host {
            record.host = Some(host);
        }
        true
    }

    /// Remove whatever record is registered under `id`.
    pub fn remove(&self, id: &str) -> Option<RegistryRecord> {
        let removed = self.records().remove(id);
        if removed.is_some() {
            CanvasDeregistered { canvas_id: id }.log();
        }
        removed
    }

    /// Remove the record under `id` only if it still belongs to `queue`.
    ///
    /// A stopping actor uses this so that it never evicts a newer canvas that
    /// re-registered the same id in the meantime.
    pub fn deregister(&self, id: &str, queue: &UnboundedSender<Envelope>) -> bool {
        let removed = {
            let mut records = self.records();
            match records.get(id) {
                Some(record) if record.queue.same_channel(queue) => records.remove(id).is_some(),
                _ => false,
            }
        };
        if removed {
            CanvasDeregistered { canvas_id: id }.log();
        }
        removed
    }

    /// Enqueue `packet` on the canvas registered under `id`.
    pub fn send(&self, id: &str, packet: Packet) -> Result<(), SpaceError> {
        let queue = self
            .lookup_queue(id)
            .ok_or_else(|| SpaceError::NotFound(id.to_string()))?;
        queue
            .send(Envelope::Packet(packet))
            .map_err(|_| SpaceError::Disconnected(id.to_string()))
    }

    /// Fire the termination token of the canvas under `id`.
    pub fn terminate(&self, id: &str) -> Result<(), SpaceError> {
        let token = self
            .records()
            .get(id)
            .map(|record| record.terminator.clone())
            .ok_or_else(|| SpaceError::NotFound(id.to_string()))?;
        token.cancel();
        Ok(())
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    fn lookup_queue(&self, id: &str) -> Option<UnboundedSender<Envelope>> {
        self.records().get(id).map(|record| record.queue.clone())
    }

    // The map has no cross-entry invariants, so a panic while the lock was held
    // cannot leave it inconsistent.
    fn records(&self) -> MutexGuard<'_, HashMap<String, RegistryRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn record(id: &str) -> (RegistryRecord, mpsc::UnboundedReceiver<Envelope>) {
        let (queue, receiver) = mpsc::unbounded_channel();
        let record = RegistryRecord {
            id: id.to_string(),
            owner: "tester".to_string(),
            height: 3,
            width: 4,
            visible: true,
            host: None,
            queue,
            terminator: CancellationToken::new(),
        };
        (record, receiver)
    }

    #[test]
    fn test_register_lookup_remove() {
        let space = Space::new();
        let (rec, _rx) = record("a");

        assert!(space.register(rec).is_none());
        assert!(space.contains("a"));
        assert_eq!(space.lookup("a").map(|r| (r.height, r.width)), Some((3, 4)));

        assert!(space.remove("a").is_some());
        assert!(space.lookup("a").is_none());
        assert!(space.remove("a").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let space = Space::new();
        let (first, _rx1) = record("a");
        let (mut second, _rx2) = record("a");
        second.height = 9;

        space.register(first);
        let replaced = space.register(second);

        assert!(replaced.is_some());
        assert_eq!(space.len(), 1);
        assert_eq!(space.lookup("a").map(|r| r.height), Some(9));
    }

    #[test]
    fn test_update_partial_fields() {
        let space = Space::new();
        let (rec, _rx) = record("a");
        space.register(rec);

        assert!(space.update(
            "a",
            RecordUpdate {
                width: Some(20),
                ..Default::default()
            }
        ));
        assert!(!space.update("missing", RecordUpdate::default()));

        let snapshot = space.lookup("a").unwrap();
        assert_eq!((snapshot.height, snapshot.width, snapshot.visible), (3, 20, true));
    }

    #[test]
    fn test_deregister_ignores_newer_owner() {
        let space = Space::new();
        let (old, _rx1) = record("a");
        let old_queue = old.queue.clone();
        let (new, _rx2) = record("a");

        space.register(old);
        space.register(new);

        assert!(!space.deregister("a", &old_queue));
        assert!(space.contains("a"));
    }

    #[test]
    fn test_send_reports_missing_and_disconnected() {
        let space = Space::new();
        let packet = Packet::control(&crate::packet::Command::Clear);
        assert_eq!(
            space.send("nobody", packet.clone()),
            Err(SpaceError::NotFound("nobody".into()))
        );

        let (rec, rx) = record("a");
        space.register(rec);
        drop(rx);
        assert_eq!(
            space.send("a", packet),
            Err(SpaceError::Disconnected("a".into()))
        );
    }

    #[test]
    fn test_send_enqueues_packet() {
        let space = Space::new();
        let (rec, mut rx) = record("a");
        space.register(rec);

        space
            .send("a", Packet::control(&crate::packet::Command::Clear))
            .unwrap();

        assert!(matches!(rx.try_recv(), Ok(Envelope::Packet(_))));
    }

    #[test]
    fn test_terminate_cancels_token() {
        let space = Space::new();
        let (rec, _rx) = record("a");
        let token = rec.terminator.clone();
        space.register(rec);

        space.terminate("a").unwrap();
        assert!(token.is_cancelled());
        assert!(space.terminate("b").is_err());
    }

    #[test]
    fn test_ids_sorted() {
        let space = Space::new();
        let (b, _rx1) = record("b");
        let (a, _rx2) = record("a");
        space.register(b);
        space.register(a);
        assert_eq!(space.ids(), vec!["a".to_string(), "b".to_string()]);
    }
}
