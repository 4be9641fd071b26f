use async_trait::async_trait;

use crate::error::AnalysisError;

/// Contract for an external analysis agent: a prompt goes in, free-form text
/// comes out. No streaming, no structured output. Retry policy, if any, lives
/// behind this boundary, not in the orchestrator.
#[async_trait]
pub trait AnalysisAgent: Send + Sync {
    /// Agent name for logging ("Stock Analyst", "Research Analyst", ...).
    fn name(&self) -> &str;

    async fn invoke(&self, prompt: &str, model: &str) -> Result<String, AnalysisError>;
}
