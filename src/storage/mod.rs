use crate::models::prompt::Prompt;
use anyhow::{Context, Result};
use async_trait::async_trait;

pub mod filesystem;

pub use filesystem::FileSystemFeed;

/// Trait defining the interface for prompt feeds.
///
/// A feed is read once at startup; the returned records are immutable for the
/// rest of the session.
#[async_trait]
pub trait PromptFeed: Send + Sync + 'static {
    /// Loads every prompt in feed order.
    async fn load_prompts(&self) -> Result<Vec<Prompt>>;
}

/// Decodes a JSON array of prompt records, applying per-field defaults.
pub fn parse_prompts(json: &str) -> Result<Vec<Prompt>> {
    serde_json::from_str(json).context("Prompt feed is not a JSON array of prompt records")
}

/// A feed backed by an in-memory list, handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    prompts: Vec<Prompt>,
}

impl StaticFeed {
    pub fn new(prompts: Vec<Prompt>) -> Self {
        Self { prompts }
    }
}

#[async_trait]
impl PromptFeed for StaticFeed {
    async fn load_prompts(&self) -> Result<Vec<Prompt>> {
        Ok(self.prompts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompts_keeps_feed_order() {
        let prompts = parse_prompts(r#"[{"id": "b"}, {"id": "a"}, {"id": "c"}]"#).unwrap();
        let ids: Vec<&str> = prompts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_prompts_rejects_non_array() {
        assert!(parse_prompts(r#"{"id": "a"}"#).is_err());
        assert!(parse_prompts("not json").is_err());
    }

    #[tokio::test]
    async fn test_static_feed_returns_prompts() {
        let feed = StaticFeed::new(vec![Prompt::new("One", "body", vec![])]);
        let prompts = feed.load_prompts().await.unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].display_title(), "One");
    }
}
