pub mod openai;

use crate::core::errors::LedgerError;
use async_trait::async_trait;

/// External language model used to draft starter groups.
#[async_trait]
pub trait BudgetPlanner: Send + Sync {
    /// Sends `prompt` as a single system message and returns the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String, LedgerError>;
}
