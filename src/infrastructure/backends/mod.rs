pub mod gemini;

use std::sync::Arc;

use anyhow::Result;

use crate::domain::models::BackendBox;

pub struct BackendManager {}

impl BackendManager {
    /// The configured backend, or `None` when no credential is set and every
    /// question should be answered offline.
    pub fn get() -> Result<Option<BackendBox>> {
        let options = gemini::GeminiOptions::from_config()?;
        if options.token.trim().is_empty() {
            tracing::info!("No Gemini token configured, running offline");
            return Ok(None);
        }

        return Ok(Some(Arc::new(gemini::Gemini::new(options))));
    }
}
