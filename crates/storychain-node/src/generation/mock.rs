//! Mock paragraph generator for testing.

use super::ParagraphGenerator;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Mock generator with a configurable outcome and a call counter.
pub struct MockGenerator {
    paragraph: String,
    failing: AtomicBool,
    call_count: AtomicU32,
}

impl MockGenerator {
    /// Create a mock generator that succeeds with a fixed paragraph.
    pub fn new() -> Self {
        Self {
            paragraph: "And so the story found its ending.".to_string(),
            failing: AtomicBool::new(false),
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the paragraph returned on success.
    pub fn with_paragraph(mut self, paragraph: impl Into<String>) -> Self {
        self.paragraph = paragraph.into();
        self
    }

    /// Make every call fail with a generation error.
    pub fn with_failure(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// Switch failure mode on or off.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of generate calls so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ParagraphGenerator for MockGenerator {
    async fn generate_paragraph(&self, _contributions: &[String]) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Generation("mock generator failing".to_string()));
        }

        Ok(self.paragraph.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn succeeds_with_configured_paragraph() {
        let generator = MockGenerator::new().with_paragraph("Fixed.");
        let paragraph = generator.generate_paragraph(&[]).await.unwrap();
        assert_eq!(paragraph, "Fixed.");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn failure_mode_returns_generation_error() {
        let generator = MockGenerator::new().with_failure();
        let err = generator.generate_paragraph(&[]).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));

        generator.set_failing(false);
        assert!(generator.generate_paragraph(&[]).await.is_ok());
        assert_eq!(generator.call_count(), 2);
    }
}
