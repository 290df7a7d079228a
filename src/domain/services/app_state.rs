#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use super::help_text;
use super::prompt;
use super::suggested_prompts;
use super::ClipboardService;
use crate::domain::models::Action;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;
use crate::domain::models::ServiceOutcome;
use crate::domain::models::SlashCommand;
use crate::domain::models::TurnRequest;

pub const WELCOME_MESSAGE: &str = "Hi! I'm your DSA learning assistant. How can I help you today?";

/// What the chat surface should do after a line of input was handled as a
/// slash command.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Not a slash command, treat the line as a question.
    NotACommand,
    /// Command handled, show this text to the user.
    Notice(String),
    /// Command handled, a backend request or action was dispatched.
    Dispatched,
    Quit,
}

/// The conversation log and the turn currently waiting on the service.
///
/// A turn goes from awaiting input to pending on `submit`, and back once
/// `settle` appends the single assistant reply for it.
pub struct AppState {
    pub messages: Vec<Message>,
    pending_turn: Option<String>,
}

impl Default for AppState {
    fn default() -> AppState {
        return AppState::new();
    }
}

impl AppState {
    pub fn new() -> AppState {
        return AppState {
            messages: vec![Message::new(Role::Assistant, WELCOME_MESSAGE)],
            pending_turn: None,
        };
    }

    pub fn waiting_for_backend(&self) -> bool {
        return self.pending_turn.is_some();
    }

    /// Appends the user's question and marks the turn pending. Empty input and
    /// input arriving while a turn is pending are ignored, leaving the log
    /// untouched.
    pub fn submit(&mut self, text: &str) -> Option<TurnRequest> {
        if self.waiting_for_backend() {
            tracing::debug!("Ignoring submission while a turn is pending");
            return None;
        }

        let sanitized = prompt::sanitize(text);
        if sanitized.is_empty() {
            return None;
        }

        let message = Message::new(Role::User, &sanitized);
        let turn_id = message.id.to_string();
        self.messages.push(message);
        self.pending_turn = Some(turn_id.to_string());

        return Some(TurnRequest {
            turn_id,
            text: sanitized,
        });
    }

    /// Appends exactly one assistant message for the pending turn. Outcomes for
    /// any other turn are stale and dropped. Returns whether the log changed.
    pub fn settle(&mut self, turn_id: &str, outcome: ServiceOutcome) -> bool {
        if self.pending_turn.as_deref() != Some(turn_id) {
            tracing::warn!(turn_id, "Discarding outcome for a turn that is no longer pending");
            return false;
        }

        let message = match outcome {
            ServiceOutcome::Success(text) => Message::new(Role::Assistant, &text),
            ServiceOutcome::Failure(failure) => {
                Message::new_with_type(Role::Assistant, MessageType::Error, &failure.message)
            }
        };

        self.messages.push(message);
        self.pending_turn = None;

        return true;
    }

    /// Resets the log to the welcome message. A pending turn is forgotten, so
    /// its outcome is dropped when it arrives.
    pub fn clear(&mut self) {
        self.messages = vec![Message::new(Role::Assistant, WELCOME_MESSAGE)];
        self.pending_turn = None;
    }

    pub fn last_user_question(&self) -> Option<String> {
        return self
            .messages
            .iter()
            .rev()
            .find(|msg| return msg.role == Role::User)
            .map(|msg| return msg.content.to_string());
    }

    fn codeblock_for(&self, command: &SlashCommand) -> Result<String, String> {
        let codeblocks = self
            .messages
            .iter()
            .filter(|msg| return msg.role == Role::Assistant && !msg.is_error())
            .flat_map(|msg| return msg.codeblocks())
            .collect::<Vec<_>>();

        if codeblocks.is_empty() {
            return Err("There are no code blocks to copy yet.".to_string());
        }

        let idx = match command.index_arg() {
            None => codeblocks.len(),
            Some(Ok(idx)) => idx,
            Some(Err(err)) => return Err(err),
        };

        match codeblocks.get(idx - 1) {
            Some(codeblock) => return Ok(codeblock.code.to_string()),
            None => {
                return Err(format!(
                    "Code block {idx} does not exist, there are {} code blocks.",
                    codeblocks.len()
                ))
            }
        }
    }

    fn submit_and_dispatch(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<CommandResult> {
        if let Some(request) = self.submit(text) {
            tx.send(Action::BackendRequest(request))?;
            return Ok(CommandResult::Dispatched);
        }

        return Ok(CommandResult::Notice(
            "Please wait for the current answer before asking again.".to_string(),
        ));
    }

    pub fn handle_slash_commands(
        &mut self,
        input: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<CommandResult> {
        let command = match SlashCommand::parse(input) {
            Some(command) => command,
            None => return Ok(CommandResult::NotACommand),
        };

        if command.is_quit() {
            return Ok(CommandResult::Quit);
        }

        if command.is_help() {
            return Ok(CommandResult::Notice(help_text()));
        }

        if command.is_clear() {
            self.clear();
            return Ok(CommandResult::Notice("Chat cleared.".to_string()));
        }

        if command.is_prompts() {
            let list = suggested_prompts()
                .iter()
                .enumerate()
                .map(|(idx, prompt)| return format!("- ({}) {prompt}", idx + 1))
                .collect::<Vec<String>>()
                .join("\n");
            return Ok(CommandResult::Notice(list));
        }

        if command.is_ask_prompt() {
            let prompts = suggested_prompts();
            let idx = match command.index_arg() {
                Some(Ok(idx)) => idx,
                Some(Err(err)) => return Ok(CommandResult::Notice(err)),
                None => {
                    return Ok(CommandResult::Notice(
                        "You must pass a prompt number with `/ask`. Run `/prompts` to list them."
                            .to_string(),
                    ))
                }
            };

            match prompts.get(idx - 1) {
                Some(prompt) => return self.submit_and_dispatch(prompt, tx),
                None => {
                    return Ok(CommandResult::Notice(format!(
                        "{idx} is not a valid prompt number."
                    )))
                }
            }
        }

        if command.is_retry() {
            match self.last_user_question() {
                Some(question) => return self.submit_and_dispatch(&question, tx),
                None => {
                    return Ok(CommandResult::Notice(
                        "There is no question to retry yet.".to_string(),
                    ))
                }
            }
        }

        if command.is_copy_code_block() {
            match self.codeblock_for(&command) {
                Ok(code) => {
                    if let Err(err) = ClipboardService::is_available() {
                        tracing::warn!(error = ?err, "Clipboard is unavailable");
                        return Ok(CommandResult::Notice(
                            "The clipboard is not available on this system.".to_string(),
                        ));
                    }
                    tx.send(Action::CopyCodeBlock(code))?;
                    return Ok(CommandResult::Dispatched);
                }
                Err(err) => return Ok(CommandResult::Notice(err)),
            }
        }

        if command.is_model_list() {
            tx.send(Action::ListModels())?;
            return Ok(CommandResult::Dispatched);
        }

        return Ok(CommandResult::NotACommand);
    }
}
