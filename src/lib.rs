// Position records and report validation
pub mod position;

// Latest-position store and TTL eviction
pub mod store;

// Subscriber fan-out
pub mod hub;

// Validate, store, broadcast
pub mod ingest;

// Full-state reads for new subscribers
pub mod snapshot;

// Client-side list reconciliation
pub mod reconciler;

// WebSocket connection handling and wire protocol
pub mod subscription;

// HTTP and WebSocket APIs
pub mod api;

// File and environment configuration
pub mod config;

// Random-walk producer
pub mod simulator;
