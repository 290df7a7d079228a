use std::io::Write;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::services::suggested_prompts;
use crate::domain::services::AppState;
use crate::domain::services::CommandResult;
use crate::domain::services::TutorService;

fn print_message(msg: &Message) {
    let header = match msg.role {
        Role::User => Config::get(ConfigKey::Username),
        Role::Assistant => "DSA Master".to_string(),
    };

    println!("\n{}", Paint::cyan(header).bold());
    if msg.is_error() {
        println!("{}\n", Paint::red(&msg.content));
    } else {
        println!("{}\n", msg.content);
    }
}

fn print_notice(text: &str) {
    println!("{}\n", Paint::yellow(text));
}

fn print_input_prompt() -> Result<()> {
    let username = Config::get(ConfigKey::Username);
    print!("{} {} ", Paint::new(username).dimmed(), Paint::green(">").bold());
    std::io::stdout().flush()?;
    return Ok(());
}

async fn greet(service: &TutorService, app_state: &AppState) {
    for msg in app_state.messages.iter() {
        print_message(msg);
    }

    let prompts = suggested_prompts()
        .iter()
        .enumerate()
        .map(|(idx, prompt)| return format!("  /ask {} - {prompt}", idx + 1))
        .collect::<Vec<String>>()
        .join("\n");
    println!("Try one of these to get started:\n{prompts}\n");
    println!("{}\n", Paint::new("Type /help for all commands.").dimmed());

    let backend = match service.backend() {
        Some(backend) => backend,
        None => {
            print_notice("No Gemini API token configured. Answers come from the built-in offline tutor.");
            return;
        }
    };

    if let Err(err) = backend.health_check().await {
        tracing::warn!(error = ?err, "Backend health check failed");
        print_notice(&format!(
            "Could not reach Gemini ({err}). Questions may fail until it is available, use /retry to ask again."
        ));
    }
}

/// Blocks until whatever was dispatched has been answered, printing notices as
/// they arrive.
async fn wait_for_events(
    app_state: &mut AppState,
    rx: &mut mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    if app_state.waiting_for_backend() {
        println!("{}", Paint::new("Thinking...").dimmed());
    }

    loop {
        let event = match rx.recv().await {
            Some(event) => event,
            None => bail!("The tutor service stopped unexpectedly"),
        };

        match event {
            Event::BackendOutcome(turn_id, outcome) => {
                if app_state.settle(&turn_id, outcome) {
                    if let Some(msg) = app_state.messages.last() {
                        print_message(msg);
                    }
                }
            }
            Event::Notice(text) => {
                print_notice(&text);
            }
        }

        if !app_state.waiting_for_backend() {
            return Ok(());
        }
    }
}

/// Runs the interactive chat on stdin/stdout until `/quit` or end of input.
pub async fn start(
    service: Arc<TutorService>,
    tx: mpsc::UnboundedSender<Action>,
    mut rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::default();
    greet(&service, &app_state).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_input_prompt()?;
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };

        match app_state.handle_slash_commands(&line, &tx)? {
            CommandResult::Quit => break,
            CommandResult::Notice(text) => print_notice(&text),
            CommandResult::Dispatched => wait_for_events(&mut app_state, &mut rx).await?,
            CommandResult::NotACommand => {
                if let Some(request) = app_state.submit(&line) {
                    tx.send(Action::BackendRequest(request))?;
                    wait_for_events(&mut app_state, &mut rx).await?;
                }
            }
        }
    }

    return Ok(());
}

/// Answers a single question. Returns false when the answer is a failure, which
/// has already been reported on stderr.
pub async fn ask(service: &TutorService, question: &str) -> bool {
    match service.get_response(question).await {
        Ok(answer) => {
            println!("{answer}");
            return true;
        }
        Err(err) => {
            eprintln!("{}", Paint::red(err.to_string()));
            return false;
        }
    }
}
