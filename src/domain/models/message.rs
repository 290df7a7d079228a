#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::Role;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Normal,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

/// A single entry of the conversation log. Messages are never edited after
/// creation, only appended.
#[derive(Clone, Debug)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    mtype: MessageType,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message::new_with_type(role, MessageType::Normal, content);
    }

    pub fn new_with_type(role: Role, mtype: MessageType, content: &str) -> Message {
        return Message {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.replace('\t', "  "),
            timestamp: Utc::now(),
            mtype,
        };
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    pub fn is_error(&self) -> bool {
        return self.mtype == MessageType::Error;
    }

    /// Fenced code blocks in the message, in order of appearance. Blocks without
    /// a language tag are reported with an empty language.
    pub fn codeblocks(&self) -> Vec<CodeBlock> {
        let mut codeblocks: Vec<CodeBlock> = vec![];
        let mut current_codeblock: Vec<&str> = vec![];
        let mut current_language = "".to_string();
        let mut in_codeblock = false;

        for line in self.content.split('\n') {
            let trimmed = line.trim();
            if trimmed.starts_with("```") {
                if in_codeblock {
                    codeblocks.push(CodeBlock {
                        language: current_language.to_string(),
                        code: current_codeblock.join("\n"),
                    });
                    current_codeblock = vec![];
                    in_codeblock = false;
                } else {
                    current_language = trimmed.trim_start_matches('`').trim().to_string();
                    in_codeblock = true;
                }
                continue;
            }

            if in_codeblock {
                current_codeblock.push(line);
            }
        }

        return codeblocks;
    }
}
