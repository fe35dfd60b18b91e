// Record store seam - the backend owns every authoritative record

pub mod backend;

use async_trait::async_trait;
use thiserror::Error;

use crate::workflows::{Record, TransitionRequest};

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

pub use backend::HttpBackend;

/// Failures talking to the record or invoice store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to backend failed: {0}")]
    Http(reqwest::Error),
    #[error("backend did not answer in time")]
    Timeout,
    #[error("backend rejected the request with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("record {0} not found")]
    NotFound(u64),
    #[error("could not decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else {
            StoreError::Http(err)
        }
    }
}

impl StoreError {
    /// Whether the same request may succeed if the caller sends it again
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Http(err) => err.is_connect() || err.is_request(),
            StoreError::Timeout => true,
            StoreError::Rejected { status, .. } => *status == 429 || *status >= 500,
            StoreError::NotFound(_) | StoreError::Decode(_) => false,
        }
    }
}

/// The external authoritative store for resource-center records
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every record
    async fn fetch_all(&self) -> Result<Vec<Record>, StoreError>;

    /// Fetch one record by id
    async fn fetch(&self, id: u64) -> Result<Record, StoreError> {
        self.fetch_all()
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Persist a status transition and return the store's updated record
    async fn persist_transition(
        &self,
        id: u64,
        request: &TransitionRequest,
    ) -> Result<Record, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(StoreError::Timeout.is_retryable());
        assert!(StoreError::Rejected { status: 503, body: String::new() }.is_retryable());
        assert!(StoreError::Rejected { status: 429, body: String::new() }.is_retryable());
        assert!(!StoreError::Rejected { status: 400, body: String::new() }.is_retryable());
        assert!(!StoreError::NotFound(3).is_retryable());
    }

    struct ListOnly(Vec<Record>);

    #[async_trait]
    impl RecordStore for ListOnly {
        async fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
            Ok(self.0.clone())
        }

        async fn persist_transition(
            &self,
            id: u64,
            _request: &TransitionRequest,
        ) -> Result<Record, StoreError> {
            Err(StoreError::NotFound(id))
        }
    }

    #[tokio::test]
    async fn test_default_fetch_finds_by_id() {
        let store = ListOnly(vec![Record::new(1, 10), Record::new(2, 20)]);

        assert_eq!(store.fetch(2).await.unwrap().student_count, 20);
        assert!(matches!(store.fetch(9).await, Err(StoreError::NotFound(9))));
    }
}
