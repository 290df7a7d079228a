#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::classifier;
use super::clipboard::ClipboardService;
use super::TutorService;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::ServiceOutcome;
use crate::domain::models::TurnRequest;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /prompts (/p) - Lists suggested questions to get started.
- /ask (/a) [PROMPT_NUMBER] - Asks the suggested question with the given number from /prompts.
- /retry (/r) - Asks your last question again.
- /copy (/c) [CODE_BLOCK_NUMBER?] - Copies a code block from the answers to your clipboard. Defaults to the last code block.
- /clear - Clears the chat history.
- /models (/ml) - Lists all available models from the backend.
- /quit /exit (/q) - Exit the tutor.
- /help (/h) - Provides this help menu.

Without a Gemini API token configured, answers come from built-in offline explanations covering recursion, graphs, debugging, time complexity and sorting.
        "#;

    return text.trim().to_string();
}

pub fn suggested_prompts() -> Vec<&'static str> {
    return vec![
        "Explain recursion with an example",
        "Give me a graph problem for practice",
        "What is the time complexity of quicksort?",
        "Find the bug in this code: for(int i=0; i<=arr.length; i++) { sum += arr[i]; }",
        "Difference between BFS and DFS",
        "Explain hash table collisions",
    ];
}

async fn model_list(service: &TutorService, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    let backend = match service.backend() {
        Some(backend) => backend,
        None => {
            tx.send(Event::Notice(
                "No backend is configured, answers come from the offline tutor.".to_string(),
            ))?;
            return Ok(());
        }
    };

    let text = match backend.list_models().await {
        Ok(models) => models
            .iter()
            .enumerate()
            .map(|(idx, model)| {
                let n = idx + 1;
                return format!("- ({n}) {model}");
            })
            .collect::<Vec<String>>()
            .join("\n"),
        Err(err) => {
            tracing::error!(error = ?err, "Failed to list models");
            classifier::classify_error(&err).message
        }
    };

    tx.send(Event::Notice(text))?;

    return Ok(());
}

fn copy_codeblock(codeblock: String, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    let notice = match ClipboardService::copy(codeblock) {
        Ok(()) => "Copied code block to clipboard.".to_string(),
        Err(err) => format!("Failed to copy to clipboard: {err}"),
    };
    tx.send(Event::Notice(notice))?;

    return Ok(());
}

async fn answer(service: &TutorService, request: TurnRequest, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    let outcome = match service.outcome(&request.text).await {
        Ok(outcome) => outcome,
        // Every turn gets exactly one outcome, rejected input included.
        Err(err) => ServiceOutcome::Failure(classifier::classify(&err.to_string())),
    };

    tx.send(Event::BackendOutcome(request.turn_id, outcome))?;

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        service: Arc<TutorService>,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            match action {
                Action::BackendRequest(request) => {
                    let worker_service = service.clone();
                    let worker_tx = tx.clone();
                    tokio::spawn(async move {
                        if let Err(err) = answer(&worker_service, request, &worker_tx).await {
                            tracing::error!(error = ?err, "Failed to deliver answer");
                        }
                    });
                }
                Action::CopyCodeBlock(codeblock) => {
                    copy_codeblock(codeblock, &tx)?;
                }
                Action::ListModels() => {
                    model_list(&service, &tx).await?;
                }
            }
        }

        return Ok(());
    }
}
