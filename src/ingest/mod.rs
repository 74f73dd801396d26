// Update ingest: validate, store, broadcast

use crate::hub::{BroadcastHub, HubEvent};
use crate::position::{validate_report, PositionRecord, PositionReport, ValidationError};
use crate::store::PositionStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Accepted/rejected report counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IngestStats {
    pub accepted: u64,
    pub rejected: u64,
}

/// Entry point for producer reports.
///
/// Holds the store and hub it writes to; nothing here is process-global.
pub struct UpdateIngest {
    store: Arc<PositionStore>,
    hub: Arc<BroadcastHub>,

    /// Serializes store write + publish so every subscriber sees reports in
    /// the same order the store applied them.
    ordering: Mutex<()>,

    accepted: AtomicU64,
    rejected: AtomicU64,
}

impl UpdateIngest {
    pub fn new(store: Arc<PositionStore>, hub: Arc<BroadcastHub>) -> Self {
        Self {
            store,
            hub,
            ordering: Mutex::new(()),
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Validate a raw report, then store and broadcast it.
    ///
    /// Invalid reports leave the store untouched and are not broadcast.
    pub fn submit(&self, body: &Value) -> Result<PositionRecord, ValidationError> {
        let report = self.validate(body)?;
        Ok(self.submit_report(report))
    }

    /// Validate without storing. Failures count as rejected reports.
    pub fn validate(&self, body: &Value) -> Result<PositionReport, ValidationError> {
        validate_report(body).map_err(|e| {
            self.reject();
            warn!(error = %e, "Rejected position report");
            e
        })
    }

    /// Count a request refused outside validation (oversized, unparseable, empty batch)
    pub fn reject(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Store and broadcast an already-validated report.
    pub fn submit_report(&self, report: PositionReport) -> PositionRecord {
        let (record, reached) = {
            let _guard = self.ordering.lock().unwrap_or_else(PoisonError::into_inner);
            let record = self.store.upsert(report);
            let reached = self.hub.publish(HubEvent::Update(record.clone()));
            (record, reached)
        };

        self.accepted.fetch_add(1, Ordering::Relaxed);
        debug!(
            id = %record.id,
            lat = record.lat,
            lng = record.lng,
            subscribers = reached,
            "Accepted position report"
        );

        record
    }

    /// Evict positions last reported before `cutoff` and announce each one.
    ///
    /// Runs under the same ordering lock as `submit_report`, so a report that
    /// lands during a sweep is either evicted with its announcement or
    /// survives with no announcement at all.
    pub fn evict_older_than(&self, cutoff: DateTime<Utc>) -> Vec<String> {
        let _guard = self.ordering.lock().unwrap_or_else(PoisonError::into_inner);
        let evicted = self.store.evict_older_than(cutoff);
        for id in &evicted {
            let reached = self.hub.publish(HubEvent::Evicted { id: id.clone() });
            debug!(id = %id, subscribers = reached, "Broadcast eviction");
        }
        evicted
    }

    pub fn stats(&self) -> IngestStats {
        IngestStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}
