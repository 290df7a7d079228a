#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;

use crate::domain::models::ConversationSeed;
use crate::domain::models::PromptMode;
use crate::domain::models::RequestEnvelope;
use crate::domain::models::TutorError;

/// Bump whenever `RESPONSE_TEMPLATE` changes.
pub const TEMPLATE_VERSION: u32 = 1;

pub const RESPONSE_TEMPLATE: &str = r#"
Please analyze the following request. Provide your response in this format:

1. **If the user asks about a topic** (without providing code):
   - **Theoretical Explanation**: Provide an in-depth explanation of the topic.
   - **Java Code Example**: Include one relevant Java snippet demonstrating the concept.
   - **Use Cases**: Explain practical applications of the topic.

2. **If the user provides code**:
   1. **Code Analysis**
      - Brief explanation of what the code does.
      - Key components and their purpose.
      - Logic flow explanation.
   2. **Expected Output**
      - Show the expected program output.
      - Explain any conditions or variations.
   3. **Code Quality & Improvements**
      - Potential issues or edge cases.
      - Suggested improvements.
      - Best practices.
   4. **Performance Analysis**
      - Time complexity.
      - Space complexity.
      - Performance considerations.

Format every code example as a fenced markdown code block tagged with its language, for example ```java.
"#;

pub const PERSONA: &str = "You are DSA Master, a patient tutor for data structures and algorithms. \
Explain concepts step by step, prefer small runnable examples, and point out time and space \
complexity whenever it matters. Stay on programming topics.";

pub const SEED: ConversationSeed = ConversationSeed {
    user_greeting: "Hi! I want to get better at data structures and algorithms.",
    assistant_greeting: "Hi! I'm your DSA learning assistant. How can I help you today?",
};

/// Drops control characters other than line breaks and tabs, then trims.
pub fn sanitize(text: &str) -> String {
    return text
        .chars()
        .filter(|c| return !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect::<String>()
        .trim()
        .to_string();
}

pub fn compose(user_text: &str, mode: PromptMode) -> Result<RequestEnvelope, TutorError> {
    if user_text.trim().is_empty() {
        return Err(TutorError::InvalidInput);
    }

    let sanitized_prompt = sanitize(user_text);
    if sanitized_prompt.is_empty() {
        return Err(TutorError::InvalidInput);
    }

    let mut envelope = RequestEnvelope {
        instruction_template: RESPONSE_TEMPLATE,
        sanitized_prompt,
        persona: None,
        seed: None,
    };

    if mode == PromptMode::Conversational {
        envelope.persona = Some(PERSONA);
        envelope.seed = Some(SEED);
    }

    return Ok(envelope);
}
