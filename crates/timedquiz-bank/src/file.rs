//! Question bank stored on the local filesystem.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::instrument;

use timedquiz_core::bank::{parse_bank_str, QuestionBank};
use timedquiz_core::traits::QuestionSource;

use crate::error::SourceError;

/// Reads a JSON bank file on every load.
pub struct FileSource {
    path: PathBuf,
    location: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }
}

#[async_trait]
impl QuestionSource for FileSource {
    fn location(&self) -> &str {
        &self.location
    }

    #[instrument(skip(self), fields(path = %self.location))]
    async fn load(&self) -> anyhow::Result<QuestionBank> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SourceError::NotFound(self.location.clone()),
                _ => SourceError::Io {
                    path: self.location.clone(),
                    source: e,
                },
            })?;

        parse_bank_str(&content, &self.location)
    }
}
