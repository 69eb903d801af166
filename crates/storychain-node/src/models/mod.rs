//! Data models for story chains.
//!
//! # Core Types
//!
//! - [`Chain`] - one collaborative story with an Open → Finished lifecycle
//! - [`ChainStatus`] - lifecycle discriminator
//! - [`Contribution`] - one participant's sentence, ordered by insertion

mod chain;
mod contribution;

pub use chain::{Chain, ChainStatus};
pub use contribution::Contribution;

/// Current unix time in milliseconds.
pub(crate) fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
