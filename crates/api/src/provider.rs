//! People provider backed by a JSON document on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use roster::{PeopleProvider, PeopleResponse, ProviderError};

/// Reads `{"data": [...]}` from a file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFilePeopleProvider {
    path: PathBuf,
}

impl JsonFilePeopleProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PeopleProvider for JsonFilePeopleProvider {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn get_all(&self) -> roster::Result<PeopleResponse> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| ProviderError::Transport(format!("{}: {e}", self.path.display())))?;
        let response: PeopleResponse = serde_json::from_slice(&bytes)?;
        tracing::debug!(people = response.data.len(), "roster file read");
        Ok(response)
    }
}
