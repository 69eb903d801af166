//! StoryChain - Collaborative Story Chains
//!
//! Anonymous participants co-author a short story by each submitting one
//! sentence to a shared chain. Once a configured number of contributions
//! accumulate, an external text-generation service synthesizes them into a
//! single paragraph and the chain freezes as finished.
//!
//! # Architecture
//!
//! - **Models**: chain and contribution records with the open → finished lifecycle
//! - **Storage**: `ChainStore` trait with RocksDB-backed and in-memory implementations
//! - **Generation**: OpenAI-compatible paragraph synthesis client
//! - **Service**: the orchestrator - validation, threshold checks, finishing
//! - **API**: HTTP endpoints for chains and contributions
//!
//! # Example
//!
//! ```no_run
//! use storychain_node::{NodeConfig, StoryNode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NodeConfig::default();
//!     let node = StoryNode::new(config)?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
pub mod generation;
pub mod models;
pub mod node;
pub mod service;
pub mod storage;

pub use error::{Error, Result};
pub use generation::{MockGenerator, OpenAiGenerator, ParagraphGenerator};
pub use models::{Chain, ChainStatus, Contribution};
pub use node::{NodeConfig, NodeState, StoryNode};
pub use service::{ChainService, ChainView, ContributeOutcome};
pub use storage::{ChainStore, MemoryStore, RocksStore};
