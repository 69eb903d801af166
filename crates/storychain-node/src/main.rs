//! StoryChain node binary
//!
//! A collaborative-story service: contributions accumulate per chain and an
//! external generation service synthesizes the finished paragraph.

use storychain_node::{NodeConfig, StoryNode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storychain_node=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting StoryChain Node");

    let config = NodeConfig::from_env();

    let node = StoryNode::new(config)?;
    node.run().await?;

    Ok(())
}
