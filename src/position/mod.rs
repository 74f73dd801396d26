use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::{validate_report, ValidationError};

/// Latest known location of a tracked entity (e.g. a delivery courier).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Opaque entity identifier, unique within the store
    pub id: String,

    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,

    /// Server time at which the report was accepted
    pub timestamp: DateTime<Utc>,
}

/// A validated producer report, not yet stamped or stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
}

impl PositionReport {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
        }
    }

    /// Stamp the report with an acceptance time.
    pub fn into_record(self, timestamp: DateTime<Utc>) -> PositionRecord {
        PositionRecord {
            id: self.id,
            lat: self.lat,
            lng: self.lng,
            timestamp,
        }
    }
}
