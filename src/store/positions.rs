use crate::position::{PositionRecord, PositionReport};
use crate::snapshot::{SnapshotSource, UpstreamUnavailable};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::info;

/// Latest position per tracked entity, held in memory for the life of the process.
pub struct PositionStore {
    /// Lock-free concurrent map keyed by entity id
    records: DashMap<String, PositionRecord>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Insert or replace the record for `report.id` (last write wins).
    pub fn upsert(&self, report: PositionReport) -> PositionRecord {
        let record = report.into_record(Utc::now());
        self.records.insert(record.id.clone(), record.clone());
        record
    }

    /// Get record by entity id
    pub fn get(&self, id: &str) -> Option<PositionRecord> {
        self.records.get(id).map(|r| r.clone())
    }

    /// All records, ordered by id
    pub fn all(&self) -> Vec<PositionRecord> {
        let mut records: Vec<PositionRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record last updated strictly before `cutoff`.
    ///
    /// Returns the evicted ids.
    pub fn evict_older_than(&self, cutoff: DateTime<Utc>) -> Vec<String> {
        let stale: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.timestamp < cutoff)
            .map(|r| r.key().clone())
            .collect();

        // Re-check under the shard lock: a fresh report may have landed
        // between the scan and the removal.
        let evicted: Vec<String> = stale
            .into_iter()
            .filter_map(|id| {
                self.records
                    .remove_if(&id, |_, r| r.timestamp < cutoff)
                    .map(|(id, _)| id)
            })
            .collect();

        if !evicted.is_empty() {
            info!(
                evicted = evicted.len(),
                remaining = self.records.len(),
                "Evicted stale positions"
            );
        }

        evicted
    }
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for PositionStore {
    fn load(&self) -> Result<Vec<PositionRecord>, UpstreamUnavailable> {
        Ok(self.all())
    }
}
