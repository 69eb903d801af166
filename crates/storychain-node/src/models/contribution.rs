//! Contribution model - one participant's sentence in a chain.

use super::unix_millis;
use serde::{Deserialize, Serialize};

/// A single contribution to a chain.
///
/// Immutable once stored. Order within a chain is the store's insertion
/// order, which is authoritative for generation input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    /// Unique identifier (blake3 hash, assigned on creation)
    pub id: String,

    /// Owning chain
    pub chain_id: String,

    /// Contribution text (validated by the service layer, not here)
    pub text: String,

    /// Creation timestamp (unix millis)
    pub created_at: u64,
}

impl Contribution {
    /// Create a contribution record for the given chain and sequence slot.
    pub fn new(chain_id: &str, seq: u64, text: &str) -> Self {
        let created_at = unix_millis();
        let content = format!("{}:{}:{}", chain_id, seq, created_at);
        Self {
            id: Self::generate_id(content.as_bytes()),
            chain_id: chain_id.to_string(),
            text: text.to_string(),
            created_at,
        }
    }

    /// Generate an id from a content hash.
    pub fn generate_id(content: &[u8]) -> String {
        let hash = blake3::hash(content);
        hex::encode(hash.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_contribution() {
        let contribution = Contribution::new("chain1", 0, "Once upon a time.");
        assert_eq!(contribution.chain_id, "chain1");
        assert_eq!(contribution.text, "Once upon a time.");
        assert!(!contribution.id.is_empty());
    }

    #[test]
    fn ids_differ_per_slot() {
        let a = Contribution::new("chain1", 0, "A.");
        let b = Contribution::new("chain1", 1, "A.");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serialize_deserialize() {
        let contribution = Contribution::new("chain1", 3, "And then it rained.");
        let json = serde_json::to_string(&contribution).unwrap();
        assert!(json.contains("\"chainId\""));

        let parsed: Contribution = serde_json::from_str(&json).unwrap();
        assert_eq!(contribution, parsed);
    }
}
