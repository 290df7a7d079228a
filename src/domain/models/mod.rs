mod action;
mod backend;
mod envelope;
mod event;
mod message;
mod outcome;
mod role;
mod slash_commands;

pub use action::*;
pub use backend::*;
pub use envelope::*;
pub use event::*;
pub use message::*;
pub use outcome::*;
pub use role::*;
pub use slash_commands::*;
