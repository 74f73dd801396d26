// Position store and TTL eviction

mod positions;
mod sweeper;

pub use positions::PositionStore;
pub use sweeper::run_eviction_sweeper;

#[cfg(test)]
mod tests;
