// Snapshot query: full current position list for newly connecting viewers

use crate::position::PositionRecord;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// The backing store could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamUnavailable(pub String);

impl fmt::Display for UpstreamUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position source unavailable: {}", self.0)
    }
}

impl std::error::Error for UpstreamUnavailable {}

/// Anything that can produce the full current set of positions.
pub trait SnapshotSource: Send + Sync {
    fn load(&self) -> Result<Vec<PositionRecord>, UpstreamUnavailable>;
}

/// Side-effect-free read of every current position.
#[derive(Clone)]
pub struct SnapshotQuery {
    source: Arc<dyn SnapshotSource>,
}

impl SnapshotQuery {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self { source }
    }

    /// Full contents of the source at call time.
    ///
    /// An unavailable source yields an empty list rather than an error, so a
    /// viewer still gets a (blank) map and fills in from live updates.
    pub fn snapshot(&self) -> Vec<PositionRecord> {
        match self.source.load() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Snapshot source unavailable, serving empty snapshot");
                Vec::new()
            }
        }
    }
}
