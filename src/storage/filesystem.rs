use crate::models::prompt::Prompt;
use crate::storage::{parse_prompts, PromptFeed};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, instrument};

/// Reads the prompt feed from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSystemFeed {
    feed_path: PathBuf,
}

impl FileSystemFeed {
    /// Creates a new FileSystemFeed instance. The file is not touched until
    /// `load_prompts` is called.
    pub fn new<P: AsRef<Path>>(feed_path: P) -> Self {
        Self {
            feed_path: feed_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.feed_path
    }
}

#[async_trait]
impl PromptFeed for FileSystemFeed {
    // Always re-reads the file; there is no cache between calls.
    #[instrument(skip(self), fields(path = %self.feed_path.display()))]
    async fn load_prompts(&self) -> Result<Vec<Prompt>> {
        let mut file = fs::File::open(&self.feed_path)
            .await
            .with_context(|| format!("Failed to open prompt feed: {}", self.feed_path.display()))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .await
            .with_context(|| format!("Failed to read prompt feed: {}", self.feed_path.display()))?;
        debug!(bytes = contents.len(), "Read prompt feed");

        let prompts = parse_prompts(&contents)
            .with_context(|| format!("Failed to deserialize prompt feed: {}", self.feed_path.display()))?;
        info!(count = prompts.len(), "Loaded prompts");
        Ok(prompts)
    }
}
