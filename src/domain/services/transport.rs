#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;

use std::time::Duration;

use tokio::time;

use super::classifier;
use crate::domain::models::BackendBox;
use crate::domain::models::RequestEnvelope;
use crate::domain::models::ServiceOutcome;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Raw error text for an expired timer, phrased like the backend's own timeout
/// errors so it goes through the same classification rules.
fn timeout_error(timeout: Duration) -> String {
    let millis = timeout.as_millis();
    if millis % 1000 == 0 {
        return format!("Request timeout after {} seconds", millis / 1000);
    }

    return format!("Request timeout after {millis} milliseconds");
}

/// Sends `envelope` to `backend` exactly once and races it against `timeout`.
///
/// The backend call runs on its own task. When the timer wins the task is
/// detached rather than aborted: it may still finish in the background, but
/// its result is dropped and never reaches the caller.
pub async fn send(
    backend: &BackendBox,
    envelope: RequestEnvelope,
    timeout: Duration,
) -> ServiceOutcome {
    let worker_backend = backend.clone();
    let worker = tokio::spawn(async move {
        return worker_backend.generate(&envelope).await;
    });

    tokio::select! {
        res = worker => {
            match res {
                Ok(Ok(text)) => {
                    if text.trim().is_empty() {
                        tracing::warn!(backend = backend.name(), "Backend returned an empty response");
                        return ServiceOutcome::Failure(classifier::classify("empty response"));
                    }

                    return ServiceOutcome::Success(text);
                }
                Ok(Err(err)) => {
                    tracing::error!(backend = backend.name(), error = ?err, "Backend request failed");
                    return ServiceOutcome::Failure(classifier::classify_error(&err));
                }
                Err(join_err) => {
                    tracing::error!(backend = backend.name(), error = ?join_err, "Backend worker did not complete");
                    return ServiceOutcome::Failure(classifier::classify(&join_err.to_string()));
                }
            }
        }
        _ = time::sleep(timeout) => {
            tracing::warn!(
                backend = backend.name(),
                timeout_ms = timeout.as_millis() as u64,
                "Backend request timed out, abandoning it"
            );
            return ServiceOutcome::Failure(classifier::classify(&timeout_error(timeout)));
        }
    }
}
