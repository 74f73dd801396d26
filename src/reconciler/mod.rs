// Client-side merge of snapshots and live updates into a local position list

use crate::position::PositionRecord;
use crate::subscription::ServerMessage;

/// Local, ordered view of tracked positions owned by a single subscriber.
///
/// Pure in-memory merge: no I/O, no locking.
#[derive(Debug, Default, Clone)]
pub struct Reconciler {
    records: Vec<PositionRecord>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list.
    pub fn apply_snapshot(&mut self, records: Vec<PositionRecord>) {
        self.records = records;
    }

    /// Replace the entry with the same id in place, or append it.
    pub fn apply_update(&mut self, record: PositionRecord) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Drop the entry with this id, if any.
    pub fn apply_eviction(&mut self, id: &str) {
        self.records.retain(|r| r.id != id);
    }

    /// Merge a decoded server message. Non-position messages are ignored.
    pub fn apply(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Snapshot { records } => self.apply_snapshot(records),
            ServerMessage::LocationUpdate { record } => self.apply_update(record),
            ServerMessage::LocationEvicted { id } => self.apply_eviction(&id),
            ServerMessage::Pong | ServerMessage::Error { .. } => {}
        }
    }

    pub fn records(&self) -> &[PositionRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&PositionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
