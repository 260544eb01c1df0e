pub mod uploader;

use crate::core::errors::LedgerError;
use async_trait::async_trait;

/// Third-party image host for profile pictures.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Uploads `bytes` and returns a durable public URL.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, LedgerError>;
}
