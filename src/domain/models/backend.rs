use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::RequestEnvelope;

/// A generative-text service the tutor can ask. Implementations surface backend
/// failures as raw errors; classification happens in the caller.
#[async_trait]
pub trait Backend {
    fn name(&self) -> &'static str;

    /// Used at startup to verify the backend is reachable with the configured
    /// credentials.
    async fn health_check(&self) -> Result<()>;

    /// Models offered by the backend that support text generation.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Issues exactly one generation request and returns the response text,
    /// which may be empty.
    async fn generate(&self, envelope: &RequestEnvelope) -> Result<String>;
}

pub type BackendBox = Arc<dyn Backend + Send + Sync>;
