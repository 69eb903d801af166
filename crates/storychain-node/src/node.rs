//! StoryChain node - the main application entry point.
//!
//! Architecture:
//! - Single daemon process with RocksDB storage
//! - OpenAI-compatible generation client for finished paragraphs
//! - HTTP API for chains and contributions

use crate::api;
use crate::error::Result;
use crate::generation::{OpenAiGenerator, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::service::{ChainService, DEFAULT_THRESHOLD};
use crate::storage::RocksStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a StoryChain node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Data directory for storage
    pub data_dir: PathBuf,

    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Contribution count that triggers paragraph generation
    pub threshold: usize,

    /// Credential for the generation service; never exposed through the API
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible generation endpoint
    pub generation_url: String,

    /// Model requested from the generation service
    pub generation_model: String,

    /// Public donation receiver address served via /config
    pub receiver_address: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl NodeConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(
            std::env::var("STORYCHAIN_DATA_DIR")
                .unwrap_or_else(|_| "./storychain-data".to_string()),
        );

        let api_addr = std::env::var("STORYCHAIN_API_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .expect("Invalid STORYCHAIN_API_ADDR");

        let threshold = std::env::var("STORYCHAIN_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_THRESHOLD);

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let generation_url = std::env::var("STORYCHAIN_GENERATION_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let generation_model = std::env::var("STORYCHAIN_GENERATION_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let receiver_address = std::env::var("RECEIVER_ADDRESS")
            .ok()
            .filter(|a| !a.is_empty());

        Self {
            data_dir,
            api_addr,
            threshold,
            api_key,
            generation_url,
            generation_model,
            receiver_address,
        }
    }
}

/// Shared state for the node - service and public config for API handlers.
pub struct NodeState {
    pub service: ChainService,
    pub config: NodeConfig,
}

/// A StoryChain node instance.
pub struct StoryNode {
    state: Arc<NodeState>,
    config: NodeConfig,
}

impl StoryNode {
    /// Create a new node with RocksDB storage and the OpenAI generator.
    pub fn new(config: NodeConfig) -> Result<Self> {
        // Ensure data directory exists
        std::fs::create_dir_all(&config.data_dir)?;

        let store = Arc::new(RocksStore::open(&config.data_dir)?);

        if config.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; generation will fail until configured");
        }

        let generator = Arc::new(OpenAiGenerator::new(
            config.generation_url.clone(),
            config.generation_model.clone(),
            config.api_key.clone(),
        ));

        let service = ChainService::new(store, generator, config.threshold);
        let state = Arc::new(NodeState {
            service,
            config: config.clone(),
        });

        Ok(Self { state, config })
    }

    /// Get the shared state (for API handlers).
    pub fn state(&self) -> Arc<NodeState> {
        Arc::clone(&self.state)
    }

    /// Run the node (starts the HTTP server).
    pub async fn run(self) -> Result<()> {
        tracing::info!("StoryChain node starting");
        tracing::info!("  API: http://{}", self.config.api_addr);
        tracing::info!("  Data: {:?}", self.config.data_dir);
        tracing::info!("  Threshold: {}", self.config.threshold);

        // Build HTTP API
        let app = api::build_router(self.state.clone());

        // Start HTTP server
        let listener = tokio::net::TcpListener::bind(self.config.api_addr).await?;
        tracing::info!("HTTP server listening on {}", self.config.api_addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
