#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;

use crate::domain::models::Failure;
use crate::domain::models::FailureKind;

struct Rule {
    needle: &'static str,
    kind: FailureKind,
    message: &'static str,
}

// Case-insensitive substring tests, evaluated in order. First match wins.
const RULES: &[Rule] = &[
    Rule {
        needle: "api key",
        kind: FailureKind::ConfigMissing,
        message: "Invalid API key. Please check your environment configuration.",
    },
    Rule {
        needle: "timeout",
        kind: FailureKind::Timeout,
        message: "The request took too long to complete. Please try again.",
    },
    Rule {
        needle: "quota",
        kind: FailureKind::QuotaExceeded,
        message: "API quota exceeded. Please try again later.",
    },
    Rule {
        needle: "blocked",
        kind: FailureKind::ContentBlocked,
        message: "The request was blocked. Please rephrase your question.",
    },
];

pub fn classify(raw_error: &str) -> Failure {
    let haystack = raw_error.to_lowercase();
    if let Some(rule) = RULES.iter().find(|rule| return haystack.contains(rule.needle)) {
        return Failure::new(rule.kind, rule.message);
    }

    let detail = if raw_error.trim().is_empty() {
        "Unknown error occurred"
    } else {
        raw_error.trim()
    };

    return Failure::new(
        FailureKind::Unknown,
        &format!("Failed to get AI response: {detail}"),
    );
}

/// Classifies using the whole context chain, so wrapped errors still match on
/// their root cause.
pub fn classify_error(err: &anyhow::Error) -> Failure {
    return classify(&format!("{err:#}"));
}
