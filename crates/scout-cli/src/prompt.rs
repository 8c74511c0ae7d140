use anyhow::Result;
use scout::models::role::Role;

pub mod cliclack;

/// The terminal surface a [`crate::session::Session`] talks through
pub trait Prompt {
    fn render(&mut self, role: Role, text: &str);
    fn render_error(&mut self, message: &str);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self, label: &str);
    fn hide_busy(&mut self);
    fn close(&self);
    fn scout_ready(&self) {
        println!();
        println!("Scout is ready! Ask anything, answers come from a live web search.");
        println!();
    }
}

pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Only set for messages
}

impl Input {
    pub fn message<S: Into<String>>(content: S) -> Self {
        Input {
            input_type: InputType::Message,
            content: Some(content.into()),
        }
    }

    pub fn command(input_type: InputType) -> Self {
        Input {
            input_type,
            content: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    AskAgain, // Ask the user for input again. Control flow command.
    Message,  // User sent a message
    History,  // Replay the conversation so far
    Init,     // Retry agent initialization
    Exit,     // User wants to exit the session
}

pub enum Theme {
    Light,
    Dark,
}

/// Map a trimmed line to a session command, if it is one. Prompt-local
/// commands such as theme switching are handled by the prompt itself.
pub fn parse_command(line: &str) -> Option<InputType> {
    let command = line.to_ascii_lowercase();
    match command.as_str() {
        "/exit" | "/quit" => Some(InputType::Exit),
        "/history" => Some(InputType::History),
        "/init" => Some(InputType::Init),
        "" => Some(InputType::AskAgain),
        _ => None,
    }
}
