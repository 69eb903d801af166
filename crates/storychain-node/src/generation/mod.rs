//! Paragraph generation for chains that reach their threshold.
//!
//! [`ParagraphGenerator`] abstracts over the external text-generation
//! service; [`OpenAiGenerator`] talks to any OpenAI-compatible
//! chat-completions API and [`MockGenerator`] is a configurable test double.
//!
//! The prompting contract is fixed here: a system instruction pinning the
//! output shape, and a user payload enumerating the contributions in order.

mod mock;
mod openai;

pub use mock::MockGenerator;
pub use openai::{OpenAiGenerator, DEFAULT_BASE_URL, DEFAULT_MODEL};

use crate::error::Result;
use async_trait::async_trait;

/// Maximum tokens requested from the completion service.
pub const MAX_COMPLETION_TOKENS: u32 = 300;

/// Sampling temperature; favors variety over determinism.
pub const TEMPERATURE: f32 = 0.9;

/// System instruction fixing the output shape.
pub(crate) const SYSTEM_PROMPT: &str = "You are an imaginative editor. \
    Produce a single coherent paragraph (70-160 words) that continues this \
    collaborative story. Include or echo each contributor's sentence in \
    order, but do not mention contributors or metadata. Keep it literary \
    and surprising. Output only the paragraph.";

/// Turns an ordered sequence of contribution texts into one continuation
/// paragraph.
#[async_trait]
pub trait ParagraphGenerator: Send + Sync {
    /// Generate a single paragraph from the contributions, in order.
    ///
    /// One attempt only: failures surface immediately, with no retry and no
    /// fallback output.
    async fn generate_paragraph(&self, contributions: &[String]) -> Result<String>;
}

/// Enumerate contributions as a 1-indexed quoted list for the user message.
/// Double quotes inside a contribution are stripped.
pub(crate) fn render_contributions(contributions: &[String]) -> String {
    let mut out = String::from("Here are the contributions in order:\n");
    for (i, text) in contributions.iter().enumerate() {
        out.push_str(&format!("{}) \"{}\"\n", i + 1, text.replace('"', "")));
    }
    out.push_str("\nNow produce one single paragraph continuation.");
    out
}
