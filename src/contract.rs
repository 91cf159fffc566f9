//! # contract: the remote store capability
//!
//! The orchestrator only needs two things from the site hosting the navigation
//! document: fetch a file by path, and write a file into a folder. [`RemoteStore`]
//! is that capability and nothing more, so the SharePoint client can be swapped for
//! a `mockall` mock in tests without touching the tree builder or the pipeline.
//!
//! Errors are boxed; the orchestrator turns them into
//! [`crate::error::SyncError::RemoteIo`].

use crate::error::BoxError;
use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the raw bytes of the file at `path`.
    async fn download(&self, path: &str) -> Result<Vec<u8>, BoxError>;

    /// Create or overwrite `file_name` inside `folder` with `content`.
    async fn upload(&self, folder: &str, file_name: &str, content: &[u8]) -> Result<(), BoxError>;
}
