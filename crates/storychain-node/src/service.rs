//! Chain service - the orchestrator for contributions and generation.
//!
//! Composes the store and the paragraph generator: validate, persist, count,
//! and once the threshold is crossed, generate the paragraph and finish the
//! chain. Generation failures leave the chain open with its contributions
//! intact; the next contribution that meets the threshold re-attempts.

use crate::error::{Error, Result};
use crate::generation::ParagraphGenerator;
use crate::models::Chain;
use crate::storage::ChainStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Default number of contributions that triggers generation.
pub const DEFAULT_THRESHOLD: usize = 6;

/// Maximum contribution length in characters.
pub const MAX_TEXT_LEN: usize = 300;

/// Outcome of a contribute call.
#[derive(Debug, Clone, PartialEq)]
pub enum ContributeOutcome {
    /// Below threshold; the chain stays open.
    Accepted { count: usize },
    /// Threshold crossed and generation succeeded; the chain is finished.
    Finished { paragraph: String },
}

/// Read-only composition of a chain and its ordered contributions.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainView {
    pub chain: Chain,
    pub contributions: Vec<String>,
}

/// Orchestrates the chain lifecycle over an injected store and generator.
pub struct ChainService {
    store: Arc<dyn ChainStore>,
    generator: Arc<dyn ParagraphGenerator>,
    threshold: usize,
    // Serializes contribute per chain id, so a chain transitions at most
    // once and at most one generation call fires per transition.
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ChainService {
    /// Create a service over the given store and generator.
    pub fn new(
        store: Arc<dyn ChainStore>,
        generator: Arc<dyn ParagraphGenerator>,
        threshold: usize,
    ) -> Self {
        Self {
            store,
            generator,
            threshold,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a new open chain and return its id.
    pub fn create_chain(&self) -> Result<String> {
        Ok(self.store.create_chain()?.id)
    }

    /// Submit one contribution; may finish the chain.
    pub async fn contribute(&self, chain_id: &str, text: &str) -> Result<ContributeOutcome> {
        validate_text(text)?;

        let lock = self.chain_lock(chain_id);
        let _guard = lock.lock().await;

        self.store.add_contribution(chain_id, text)?;
        let count = self.store.count_contributions(chain_id)?;

        if count < self.threshold {
            return Ok(ContributeOutcome::Accepted { count });
        }

        // Threshold crossed: a single generation attempt over the full
        // ordered contribution list.
        let contributions = self.store.list_contributions(chain_id)?;
        let paragraph = match self.generator.generate_paragraph(&contributions).await {
            Ok(paragraph) => paragraph,
            Err(e) => {
                tracing::error!("Paragraph generation failed for chain {}: {}", chain_id, e);
                return Err(e);
            }
        };

        self.store.finish_chain(chain_id, &paragraph)?;
        tracing::info!(
            "Chain {} finished after {} contributions",
            chain_id,
            count
        );

        Ok(ContributeOutcome::Finished { paragraph })
    }

    /// Read-only view of a chain and its contributions.
    pub fn chain_view(&self, chain_id: &str) -> Result<ChainView> {
        let chain = self
            .store
            .get_chain(chain_id)?
            .ok_or_else(|| Error::NotFound(format!("chain {}", chain_id)))?;
        let contributions = self.store.list_contributions(chain_id)?;
        Ok(ChainView {
            chain,
            contributions,
        })
    }

    fn chain_lock(&self, chain_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        Arc::clone(locks.entry(chain_id.to_string()).or_default())
    }
}

/// Reject contributions outside 1-300 characters or containing links.
fn validate_text(text: &str) -> Result<()> {
    let len = text.chars().count();
    if len == 0 || len > MAX_TEXT_LEN {
        return Err(Error::Validation("text required (1-300 chars)".to_string()));
    }

    let lower = text.to_ascii_lowercase();
    if lower.contains("http://") || lower.contains("https://") {
        return Err(Error::Validation("no links allowed".to_string()));
    }

    Ok(())
}
