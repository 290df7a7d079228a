#[cfg(test)]
#[path = "tutor_test.rs"]
mod tests;

use std::time::Duration;

use super::fallback;
use super::prompt;
use super::transport;
use crate::domain::models::BackendBox;
use crate::domain::models::PromptMode;
use crate::domain::models::ServiceOutcome;
use crate::domain::models::TutorError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TutorOptions {
    pub mode: PromptMode,
    pub timeout: Duration,
}

impl Default for TutorOptions {
    fn default() -> TutorOptions {
        return TutorOptions {
            mode: PromptMode::default(),
            timeout: transport::DEFAULT_TIMEOUT,
        };
    }
}

/// Entry point the chat surfaces call into. Holds no conversation state; every
/// call is independent.
///
/// Built without a backend when no credential is configured, in which case all
/// questions are answered by the offline fallback and nothing touches the
/// network.
pub struct TutorService {
    backend: Option<BackendBox>,
    options: TutorOptions,
}

impl TutorService {
    pub fn new(backend: Option<BackendBox>, options: TutorOptions) -> TutorService {
        return TutorService { backend, options };
    }

    pub fn offline(options: TutorOptions) -> TutorService {
        return TutorService::new(None, options);
    }

    pub fn is_offline(&self) -> bool {
        return self.backend.is_none();
    }

    pub fn backend(&self) -> Option<&BackendBox> {
        return self.backend.as_ref();
    }

    pub fn options(&self) -> TutorOptions {
        return self.options;
    }

    /// Answers `user_text`, rejecting empty input before anything is sent.
    pub async fn outcome(&self, user_text: &str) -> Result<ServiceOutcome, TutorError> {
        let envelope = prompt::compose(user_text, self.options.mode)?;

        let backend = match &self.backend {
            Some(backend) => backend,
            None => {
                tracing::debug!(
                    topic = fallback::topic(&envelope.sanitized_prompt),
                    "No backend configured, answering offline"
                );
                return Ok(ServiceOutcome::Success(fallback::respond(
                    &envelope.sanitized_prompt,
                )));
            }
        };

        tracing::debug!(
            backend = backend.name(),
            mode = %self.options.mode,
            template_version = prompt::TEMPLATE_VERSION,
            "Sending question to backend"
        );

        return Ok(transport::send(backend, envelope, self.options.timeout).await);
    }

    /// Same as `outcome`, flattened for callers that only need the text or a
    /// user-facing error message.
    pub async fn get_response(&self, user_text: &str) -> Result<String, TutorError> {
        let outcome = self.outcome(user_text).await?;
        return Ok(outcome.into_result()?);
    }
}
