//! `WordValidator` backed by a dictionary HTTP API.
//!
//! The service answers `GET {base_url}/{word}` with a success status for
//! known words and an error status otherwise.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use wordclash_core::validator::{LookupError, WordValidator, WordVerdict};

/// Failure to build the HTTP client.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The underlying client could not be constructed.
    #[error("failed to build dictionary client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Dictionary validator speaking to a remote lookup service.
#[derive(Debug, Clone)]
pub struct HttpDictionaryValidator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDictionaryValidator {
    /// Creates a validator for `base_url` whose requests give up after
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError::Client` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DictionaryError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn entry_url(&self, word: &str) -> String {
        format!("{}/{word}", self.base_url)
    }
}

#[async_trait]
impl WordValidator for HttpDictionaryValidator {
    async fn lookup(&self, word: &str) -> Result<WordVerdict, LookupError> {
        let response = self
            .client
            .get(self.entry_url(word))
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(word, %status, "dictionary answered");
        if status.is_success() {
            Ok(WordVerdict::Accepted)
        } else {
            Ok(WordVerdict::Rejected)
        }
    }
}
