use anyhow::anyhow;
use anyhow::Context;

use super::classify;
use super::classify_error;
use crate::domain::models::FailureKind;

#[test]
fn it_classifies_missing_credentials() {
    let failure = classify("API key not valid. Please pass a valid API key.");
    assert_eq!(failure.kind, FailureKind::ConfigMissing);
    assert_eq!(
        failure.message,
        "Invalid API key. Please check your environment configuration."
    );
}

#[test]
fn it_classifies_timeouts() {
    let failure = classify("Request timeout after 30 seconds");
    assert_eq!(failure.kind, FailureKind::Timeout);
    assert!(failure.message.contains("Please try again"));
}

#[test]
fn it_classifies_quota() {
    let failure = classify("Resource has been exhausted (e.g. check QUOTA).");
    assert_eq!(failure.kind, FailureKind::QuotaExceeded);
    assert_eq!(failure.message, "API quota exceeded. Please try again later.");
}

#[test]
fn it_classifies_blocked_content() {
    let failure = classify("Prompt was Blocked by the backend: SAFETY");
    assert_eq!(failure.kind, FailureKind::ContentBlocked);
    assert!(failure.message.contains("rephrase"));
}

#[test]
fn it_prefers_timeout_over_quota() {
    assert_eq!(
        classify("quota check hit a timeout").kind,
        FailureKind::Timeout
    );
    assert_eq!(
        classify("timeout while checking quota").kind,
        FailureKind::Timeout
    );
}

#[test]
fn it_prefers_api_key_over_everything() {
    let failure = classify("api key lookup timeout, quota blocked");
    assert_eq!(failure.kind, FailureKind::ConfigMissing);
}

#[test]
fn it_falls_back_to_unknown_with_details() {
    let failure = classify("connection reset by peer");
    assert_eq!(failure.kind, FailureKind::Unknown);
    assert_eq!(
        failure.message,
        "Failed to get AI response: connection reset by peer"
    );
}

#[test]
fn it_handles_empty_errors() {
    let failure = classify("   ");
    assert_eq!(failure.kind, FailureKind::Unknown);
    assert_eq!(
        failure.message,
        "Failed to get AI response: Unknown error occurred"
    );
}

#[test]
fn it_classifies_error_chains() {
    let err = Err::<(), _>(anyhow!("operation timeout"))
        .context("Gemini request failed")
        .unwrap_err();
    assert_eq!(classify_error(&err).kind, FailureKind::Timeout);
}
