use super::compose;
use super::sanitize;
use super::PERSONA;
use super::RESPONSE_TEMPLATE;
use super::SEED;
use crate::domain::models::PromptMode;
use crate::domain::models::Role;
use crate::domain::models::TutorError;

#[test]
fn it_rejects_empty_input() {
    assert_eq!(compose("", PromptMode::Single), Err(TutorError::InvalidInput));
}

#[test]
fn it_rejects_whitespace_only_input() {
    assert_eq!(
        compose(" \n\t  ", PromptMode::Conversational),
        Err(TutorError::InvalidInput)
    );
}

#[test]
fn it_rejects_input_made_of_control_characters() {
    assert_eq!(
        compose("\u{0}\u{0}\u{7}", PromptMode::Single),
        Err(TutorError::InvalidInput)
    );
}

#[test]
fn it_strips_nul_and_trims() {
    assert_eq!(sanitize("  What is\u{0} a trie?\u{0}  "), "What is a trie?");
}

#[test]
fn it_keeps_newlines_and_tabs() {
    let code = "Review this:\nfor (int i = 0; i < n; i++) {\n\tsum += a[i];\n}";
    assert_eq!(sanitize(code), code);
}

#[test]
fn it_composes_single_mode() {
    let envelope = compose("  Explain recursion\u{0}  ", PromptMode::Single).unwrap();

    assert_eq!(envelope.instruction_template, RESPONSE_TEMPLATE);
    assert_eq!(envelope.sanitized_prompt, "Explain recursion");
    assert_eq!(envelope.persona, None);
    assert_eq!(envelope.seed, None);

    let turns = envelope.turns();
    assert_eq!(turns.len(), 1);
    assert!(turns[0].text.starts_with("Please analyze the following request."));
    assert!(turns[0].text.ends_with("\n\nExplain recursion"));
}

#[test]
fn it_composes_conversational_mode() {
    let envelope = compose("Explain recursion", PromptMode::Conversational).unwrap();

    assert_eq!(envelope.persona, Some(PERSONA));
    assert_eq!(envelope.seed, Some(SEED));

    let turns = envelope.turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0].text, SEED.user_greeting);
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].text, SEED.assistant_greeting);
    assert!(turns[2].text.ends_with("Explain recursion"));
}

#[test]
fn it_describes_both_response_shapes() {
    assert!(RESPONSE_TEMPLATE.contains("**Theoretical Explanation**"));
    assert!(RESPONSE_TEMPLATE.contains("**Use Cases**"));
    assert!(RESPONSE_TEMPLATE.contains("**Code Analysis**"));
    assert!(RESPONSE_TEMPLATE.contains("**Expected Output**"));
    assert!(RESPONSE_TEMPLATE.contains("Time complexity."));
    assert!(RESPONSE_TEMPLATE.contains("Space complexity."));
    assert!(RESPONSE_TEMPLATE.contains("```java"));
}

#[test]
fn it_is_deterministic() {
    assert_eq!(
        compose("Binary search tree operations", PromptMode::Conversational),
        compose("Binary search tree operations", PromptMode::Conversational)
    );
}
