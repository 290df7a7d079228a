//! Backends with scripted behaviour for service tests.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Backend;
use crate::domain::models::BackendBox;
use crate::domain::models::RequestEnvelope;

enum Reply {
    Text(String),
    Error(String),
}

pub struct ScriptedBackend {
    reply: Reply,
    delay: Duration,
    calls: AtomicUsize,
    completed: AtomicUsize,
    last_envelope: Mutex<Option<RequestEnvelope>>,
}

impl ScriptedBackend {
    fn new(reply: Reply, delay: Duration) -> Arc<ScriptedBackend> {
        return Arc::new(ScriptedBackend {
            reply,
            delay,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            last_envelope: Mutex::new(None),
        });
    }

    pub fn replying(text: &str) -> Arc<ScriptedBackend> {
        return ScriptedBackend::new(Reply::Text(text.to_string()), Duration::ZERO);
    }

    pub fn failing(error: &str) -> Arc<ScriptedBackend> {
        return ScriptedBackend::new(Reply::Error(error.to_string()), Duration::ZERO);
    }

    pub fn slow(text: &str, delay: Duration) -> Arc<ScriptedBackend> {
        return ScriptedBackend::new(Reply::Text(text.to_string()), delay);
    }

    pub fn calls(&self) -> usize {
        return self.calls.load(Ordering::SeqCst);
    }

    /// Calls that ran to completion, including ones nobody waited for.
    pub fn completed(&self) -> usize {
        return self.completed.load(Ordering::SeqCst);
    }

    pub fn last_envelope(&self) -> Option<RequestEnvelope> {
        return self.last_envelope.lock().unwrap().clone();
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn name(&self) -> &'static str {
        return "scripted";
    }

    async fn health_check(&self) -> Result<()> {
        return Ok(());
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        return Ok(vec!["scripted-1".to_string(), "scripted-2".to_string()]);
    }

    async fn generate(&self, envelope: &RequestEnvelope) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_envelope.lock().unwrap() = Some(envelope.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        match &self.reply {
            Reply::Text(text) => return Ok(text.to_string()),
            Reply::Error(error) => bail!(error.to_string()),
        }
    }
}

pub fn boxed(backend: &Arc<ScriptedBackend>) -> BackendBox {
    return backend.clone();
}
