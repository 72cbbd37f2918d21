//! The seam between the entity model and the remote service.
//!
//! Entities hold a shared handle to something that can run queries; in
//! production that is the request executor, in tests a scripted fake.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::common::errors::Result;

pub type SharedRemote = Arc<dyn Remote>;

#[async_trait]
pub trait Remote: Send + Sync {
    /// Run a query or mutation to a definitive answer and return its `data`
    /// payload.
    async fn execute(&self, query: &str) -> Result<Value>;

    /// Run a file-upload mutation with the file attached as multipart data.
    async fn execute_file(&self, query: &str, file_path: &Path) -> Result<Value>;
}
