//! Chain model - a single collaborative story instance.

use super::unix_millis;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainStatus {
    Open,
    Finished,
}

/// A collaborative story chain.
///
/// Created open with no paragraph; transitions to finished exactly once,
/// when paragraph generation succeeds, and never reverts. `paragraph` is
/// present iff the chain is finished.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    /// Unique identifier (blake3 hash, assigned on creation)
    pub id: String,

    /// Current lifecycle status
    pub status: ChainStatus,

    /// Synthesized paragraph, set when the chain finishes
    pub paragraph: Option<String>,

    /// Creation timestamp (unix millis)
    pub created_at: u64,
}

impl Chain {
    /// Create a new open chain with a freshly assigned id.
    pub fn new() -> Self {
        let created_at = unix_millis();
        let content = format!("chain:{}:{}", created_at, rand::random::<u64>());
        Self {
            id: Self::generate_id(content.as_bytes()),
            status: ChainStatus::Open,
            paragraph: None,
            created_at,
        }
    }

    /// Generate an id from a content hash.
    pub fn generate_id(content: &[u8]) -> String {
        let hash = blake3::hash(content);
        hex::encode(hash.as_bytes())
    }

    /// Mark the chain finished with its synthesized paragraph.
    pub fn finish(&mut self, paragraph: impl Into<String>) {
        self.status = ChainStatus::Finished;
        self.paragraph = Some(paragraph.into());
    }

    /// The paragraph must be present exactly when the chain is finished.
    pub fn invariant_holds(&self) -> bool {
        self.paragraph.is_some() == (self.status == ChainStatus::Finished)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
