pub mod actions;
mod app_state;
pub mod classifier;
pub mod clipboard;
pub mod fallback;
pub mod prompt;
#[cfg(test)]
pub mod test_helpers;
pub mod transport;
mod tutor;

pub use actions::help_text;
pub use actions::suggested_prompts;
pub use app_state::*;
pub use clipboard::ClipboardService;
pub use tutor::*;
