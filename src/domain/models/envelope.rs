#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;

use super::Role;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumIter, strum::EnumVariantNames, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum PromptMode {
    /// Template and question are sent as a single user turn.
    Single,
    /// Persona instruction and a seed exchange are sent ahead of the question.
    #[default]
    Conversational,
}

/// The fixed `(user-greeting, assistant-greeting)` pair that anchors the
/// backend persona on a stateless call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversationSeed {
    pub user_greeting: &'static str,
    pub assistant_greeting: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// A fully composed request, ready for transport. Built only through the prompt
/// composer, which guarantees `sanitized_prompt` is never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestEnvelope {
    pub instruction_template: &'static str,
    pub sanitized_prompt: String,
    pub persona: Option<&'static str>,
    pub seed: Option<ConversationSeed>,
}

impl RequestEnvelope {
    /// Template followed by the user's question, as sent in the final user turn.
    pub fn prompt_text(&self) -> String {
        return format!(
            "{template}\n\n{prompt}",
            template = self.instruction_template.trim(),
            prompt = self.sanitized_prompt
        );
    }

    /// Ordered turns for the backend: the seed exchange when present, then the
    /// composed prompt.
    pub fn turns(&self) -> Vec<Turn> {
        let mut turns: Vec<Turn> = vec![];
        if let Some(seed) = self.seed {
            turns.push(Turn {
                role: Role::User,
                text: seed.user_greeting.to_string(),
            });
            turns.push(Turn {
                role: Role::Assistant,
                text: seed.assistant_greeting.to_string(),
            });
        }

        turns.push(Turn {
            role: Role::User,
            text: self.prompt_text(),
        });

        return turns;
    }
}
