//! Question bank fetched over HTTP(S).

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use timedquiz_core::bank::{parse_bank_str, QuestionBank};
use timedquiz_core::traits::QuestionSource;

use crate::error::SourceError;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Fetches a JSON bank with a single GET per load. Failures are not retried.
pub struct HttpSource {
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            url: url.to_string(),
            timeout,
            client,
        })
    }
}

#[async_trait]
impl QuestionSource for HttpSource {
    fn location(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> anyhow::Result<QuestionBank> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout)
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(SourceError::NotFound(self.url.clone()).into());
        }
        if status >= 400 {
            return Err(SourceError::Http {
                status,
                url: self.url.clone(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        tracing::debug!(bytes = body.len(), "fetched question bank");
        parse_bank_str(&body, &self.url)
    }
}
