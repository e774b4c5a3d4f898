use anyhow::Result;
use std::time::Duration;

/// Fixed text used when a summary is synthesized locally.
pub const PLACEHOLDER_SUMMARY: &str =
    "Summary generation is not available for this recording yet.";

/// Strategy for producing a summary when the backend did not return one.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<String>;
}

/// Local placeholder variant: a fixed delay followed by fixed text.
pub struct PlaceholderSummarizer {
    delay: Duration,
}

impl PlaceholderSummarizer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for PlaceholderSummarizer {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait::async_trait]
impl Summarizer for PlaceholderSummarizer {
    async fn summarize(&self, _transcript: &str) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        Ok(PLACEHOLDER_SUMMARY.to_string())
    }
}
