#[cfg(test)]
#[path = "outcome_test.rs"]
mod tests;

use std::fmt;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FailureKind {
    ConfigMissing,
    Timeout,
    QuotaExceeded,
    ContentBlocked,
    Unknown,
}

/// A classified failure. `message` is safe to show to the user as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: &str) -> Failure {
        return Failure {
            kind,
            message: message.to_string(),
        };
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.message);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceOutcome {
    Success(String),
    Failure(Failure),
}

impl ServiceOutcome {
    pub fn is_success(&self) -> bool {
        return matches!(self, ServiceOutcome::Success(_));
    }

    pub fn into_result(self) -> Result<String, Failure> {
        match self {
            ServiceOutcome::Success(text) => return Ok(text),
            ServiceOutcome::Failure(failure) => return Err(failure),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TutorError {
    #[error("Please type a question before sending.")]
    InvalidInput,
    #[error("{0}")]
    Failed(Failure),
}

impl From<Failure> for TutorError {
    fn from(failure: Failure) -> TutorError {
        return TutorError::Failed(failure);
    }
}
