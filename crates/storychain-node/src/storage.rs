//! Persistent storage for chains and contributions.
//!
//! [`ChainStore`] is the seam the orchestrator is built against.
//! [`RocksStore`] is the durable RocksDB implementation; [`MemoryStore`] is
//! a process-local one for tests and ephemeral runs.

use crate::error::Result;
use crate::models::{Chain, Contribution};
use rocksdb::{Options, DB};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Width of the zero-padded sequence component in contribution keys.
/// Keeps lexicographic key order equal to insertion order.
const SEQ_WIDTH: usize = 10;

/// Store contract for chains and their ordered contributions.
///
/// Implementations do not validate contribution text - that is the service
/// layer's job - and do not check chain existence or status on insert:
/// recording a contribution for an unknown or already-finished chain is
/// accepted. Contributions are never deleted or reordered.
pub trait ChainStore: Send + Sync {
    /// Create a new open chain and return it.
    fn create_chain(&self) -> Result<Chain>;

    /// Append a contribution to the chain's ordered sequence.
    fn add_contribution(&self, chain_id: &str, text: &str) -> Result<Contribution>;

    /// Number of contributions recorded so far for the chain.
    fn count_contributions(&self, chain_id: &str) -> Result<usize>;

    /// All contribution texts for the chain, in insertion order.
    fn list_contributions(&self, chain_id: &str) -> Result<Vec<String>>;

    /// Fetch a chain by id.
    fn get_chain(&self, chain_id: &str) -> Result<Option<Chain>>;

    /// Set the chain finished and store its paragraph.
    ///
    /// Idempotent in effect; a no-op for an unknown chain id.
    fn finish_chain(&self, chain_id: &str, paragraph: &str) -> Result<()>;
}

/// RocksDB-backed store.
///
/// Keys: `chain:{id}` for chain records and `contrib:{chain_id}:{seq}` for
/// contributions, with a zero-padded per-chain sequence so that prefix
/// iteration yields insertion order. Values are JSON documents.
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Open or create storage at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }

    fn chain_key(id: &str) -> String {
        format!("chain:{}", id)
    }

    fn contrib_prefix(chain_id: &str) -> String {
        format!("contrib:{}:", chain_id)
    }

    fn contrib_key(chain_id: &str, seq: u64) -> String {
        format!("contrib:{}:{:0width$}", chain_id, seq, width = SEQ_WIDTH)
    }

    /// All contribution records for a chain, in key order.
    fn contributions(&self, chain_id: &str) -> Result<Vec<Contribution>> {
        let prefix = Self::contrib_prefix(chain_id);
        let mut contributions = Vec::new();

        let iter = self.db.prefix_iterator(prefix.as_bytes());
        for item in iter {
            let (key, value) = item?;
            if key.starts_with(prefix.as_bytes()) {
                let contribution: Contribution = serde_json::from_slice(&value)?;
                contributions.push(contribution);
            } else {
                break;
            }
        }

        Ok(contributions)
    }

    /// Next free sequence slot for a chain.
    fn next_seq(&self, chain_id: &str) -> Result<u64> {
        let prefix = Self::contrib_prefix(chain_id);
        let mut count = 0;

        let iter = self.db.prefix_iterator(prefix.as_bytes());
        for item in iter {
            let (key, _) = item?;
            if key.starts_with(prefix.as_bytes()) {
                count += 1;
            } else {
                break;
            }
        }

        Ok(count)
    }
}

impl ChainStore for RocksStore {
    fn create_chain(&self) -> Result<Chain> {
        let chain = Chain::new();
        let value = serde_json::to_vec(&chain)?;
        self.db.put(Self::chain_key(&chain.id).as_bytes(), value)?;
        Ok(chain)
    }

    fn add_contribution(&self, chain_id: &str, text: &str) -> Result<Contribution> {
        let seq = self.next_seq(chain_id)?;
        let contribution = Contribution::new(chain_id, seq, text);
        let value = serde_json::to_vec(&contribution)?;
        self.db
            .put(Self::contrib_key(chain_id, seq).as_bytes(), value)?;
        Ok(contribution)
    }

    fn count_contributions(&self, chain_id: &str) -> Result<usize> {
        Ok(self.next_seq(chain_id)? as usize)
    }

    fn list_contributions(&self, chain_id: &str) -> Result<Vec<String>> {
        Ok(self
            .contributions(chain_id)?
            .into_iter()
            .map(|c| c.text)
            .collect())
    }

    fn get_chain(&self, chain_id: &str) -> Result<Option<Chain>> {
        match self.db.get(Self::chain_key(chain_id).as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    fn finish_chain(&self, chain_id: &str, paragraph: &str) -> Result<()> {
        // Unknown ids fall through silently, like an unkeyed UPDATE.
        if let Some(mut chain) = self.get_chain(chain_id)? {
            chain.finish(paragraph);
            let value = serde_json::to_vec(&chain)?;
            self.db.put(Self::chain_key(chain_id).as_bytes(), value)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    chains: HashMap<String, Chain>,
    contributions: HashMap<String, Vec<Contribution>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChainStore for MemoryStore {
    fn create_chain(&self) -> Result<Chain> {
        let chain = Chain::new();
        let mut inner = self.inner.lock().unwrap();
        inner.chains.insert(chain.id.clone(), chain.clone());
        Ok(chain)
    }

    fn add_contribution(&self, chain_id: &str, text: &str) -> Result<Contribution> {
        let mut inner = self.inner.lock().unwrap();
        let entries = inner.contributions.entry(chain_id.to_string()).or_default();
        let contribution = Contribution::new(chain_id, entries.len() as u64, text);
        entries.push(contribution.clone());
        Ok(contribution)
    }

    fn count_contributions(&self, chain_id: &str) -> Result<usize> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.contributions.get(chain_id).map_or(0, Vec::len))
    }

    fn list_contributions(&self, chain_id: &str) -> Result<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .contributions
            .get(chain_id)
            .map_or_else(Vec::new, |entries| {
                entries.iter().map(|c| c.text.clone()).collect()
            }))
    }

    fn get_chain(&self, chain_id: &str) -> Result<Option<Chain>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.chains.get(chain_id).cloned())
    }

    fn finish_chain(&self, chain_id: &str, paragraph: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(chain) = inner.chains.get_mut(chain_id) {
            chain.finish(paragraph);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChainStatus;
    use tempfile::tempdir;

    #[test]
    fn chain_roundtrip() {
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        let chain = store.create_chain().unwrap();
        assert_eq!(chain.status, ChainStatus::Open);
        assert!(chain.invariant_holds());

        let loaded = store.get_chain(&chain.id).unwrap().unwrap();
        assert_eq!(chain, loaded);
    }

    #[test]
    fn unknown_chain_is_none() {
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        assert!(store.get_chain("missing").unwrap().is_none());
    }

    #[test]
    fn contributions_keep_insertion_order() {
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        let chain = store.create_chain().unwrap();
        for text in ["A.", "B.", "C."] {
            store.add_contribution(&chain.id, text).unwrap();
        }

        assert_eq!(store.count_contributions(&chain.id).unwrap(), 3);
        assert_eq!(
            store.list_contributions(&chain.id).unwrap(),
            vec!["A.", "B.", "C."]
        );
    }

    #[test]
    fn contributions_isolated_per_chain() {
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        let first = store.create_chain().unwrap();
        let second = store.create_chain().unwrap();
        store.add_contribution(&first.id, "one").unwrap();
        store.add_contribution(&second.id, "two").unwrap();

        assert_eq!(store.list_contributions(&first.id).unwrap(), vec!["one"]);
        assert_eq!(store.list_contributions(&second.id).unwrap(), vec!["two"]);
    }

    #[test]
    fn finish_chain_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        let chain = store.create_chain().unwrap();
        store.finish_chain(&chain.id, "The end.").unwrap();
        store.finish_chain(&chain.id, "The end.").unwrap();

        let loaded = store.get_chain(&chain.id).unwrap().unwrap();
        assert_eq!(loaded.status, ChainStatus::Finished);
        assert_eq!(loaded.paragraph.as_deref(), Some("The end."));
        assert!(loaded.invariant_holds());
    }

    #[test]
    fn store_accepts_contributions_for_unknown_chain() {
        // Observed behavior of the store contract: inserts are not guarded
        // by chain existence or status.
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        store.add_contribution("ghost", "still recorded").unwrap();
        assert_eq!(store.count_contributions("ghost").unwrap(), 1);
        assert!(store.get_chain("ghost").unwrap().is_none());

        // Finishing an unknown chain is a silent no-op.
        store.finish_chain("ghost", "nothing").unwrap();
        assert!(store.get_chain("ghost").unwrap().is_none());
    }

    #[test]
    fn contributions_survive_reopen() {
        let dir = tempdir().unwrap();
        let chain_id = {
            let store = RocksStore::open(dir.path()).unwrap();
            let chain = store.create_chain().unwrap();
            store.add_contribution(&chain.id, "persisted").unwrap();
            chain.id
        };

        let store = RocksStore::open(dir.path()).unwrap();
        assert_eq!(
            store.list_contributions(&chain_id).unwrap(),
            vec!["persisted"]
        );
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();

        let chain = store.create_chain().unwrap();
        store.add_contribution(&chain.id, "A.").unwrap();
        store.add_contribution(&chain.id, "B.").unwrap();

        assert_eq!(store.count_contributions(&chain.id).unwrap(), 2);
        assert_eq!(store.list_contributions(&chain.id).unwrap(), vec!["A.", "B."]);

        store.finish_chain(&chain.id, "Done.").unwrap();
        let loaded = store.get_chain(&chain.id).unwrap().unwrap();
        assert_eq!(loaded.status, ChainStatus::Finished);
        assert!(loaded.invariant_holds());
    }

    #[test]
    fn memory_store_unguarded_insert() {
        let store = MemoryStore::new();
        store.add_contribution("ghost", "text").unwrap();
        assert_eq!(store.count_contributions("ghost").unwrap(), 1);
        assert!(store.get_chain("ghost").unwrap().is_none());
    }
}
