use std::io::{self, Write};

use anyhow::Result;
use bat::WrappingMode;
use cliclack::{input, spinner};
use console::style;
use scout::models::role::Role;

use super::{parse_command, Input, InputType, Prompt, Theme};

pub struct CliclackPrompt {
    spinner: Option<cliclack::ProgressBar>,
    input_mode: InputMode,
    theme: Theme,
}

enum InputMode {
    Singleline,
    Multiline,
}

impl CliclackPrompt {
    pub fn new() -> Self {
        CliclackPrompt {
            spinner: None,
            input_mode: InputMode::Singleline,
            theme: Theme::Dark,
        }
    }

    fn theme_name(&self) -> &'static str {
        match self.theme {
            Theme::Light => "GitHub",
            Theme::Dark => "zenburn",
        }
    }
}

impl Default for CliclackPrompt {
    fn default() -> Self {
        Self::new()
    }
}

fn print_markdown(content: &str, theme: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(theme)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();
    if let Err(e) = printed {
        tracing::debug!("Falling back to plain output: {}", e);
        println!("{}", content);
    }
}

fn print_help() {
    println!("Commands:");
    println!("/exit, /quit - Exit the session");
    println!("/history - Show the conversation so far");
    println!("/init - Retry initializing the agent");
    println!("/m - Switch to multiline input mode");
    println!("/s - Switch to singleline input mode");
    println!("/t - Toggle Light/Dark theme");
    println!("/? - Display this help message");
}

impl Prompt for CliclackPrompt {
    fn render(&mut self, role: Role, text: &str) {
        match role {
            Role::User => println!("{} {}", style("you:").cyan().bold(), text),
            Role::Assistant => print_markdown(text, self.theme_name()),
            Role::System | Role::Tool => println!("{}", style(text).dim()),
        }
        println!();
        if let Err(e) = io::stdout().flush() {
            tracing::debug!("Failed to flush stdout: {}", e);
        }
    }

    fn render_error(&mut self, message: &str) {
        println!("{} {}", style("error:").red().bold(), message);
        println!();
    }

    fn show_busy(&mut self, label: &str) {
        let progress = spinner();
        progress.start(label);
        self.spinner = Some(progress);
    }

    fn hide_busy(&mut self) {
        if let Some(progress) = self.spinner.take() {
            progress.stop("");
        }
    }

    fn get_input(&mut self) -> Result<Input> {
        let mut input = input("Scout:  [Help: /?]").placeholder("Ask me anything...");
        if let InputMode::Multiline = self.input_mode {
            input = input.multiline();
        }
        let message_text: String = input.interact()?;
        let message_text = message_text.trim();

        if let Some(input_type) = parse_command(message_text) {
            return Ok(Input::command(input_type));
        }

        if message_text.eq_ignore_ascii_case("/m") {
            self.input_mode = InputMode::Multiline;
            return self.get_input();
        } else if message_text.eq_ignore_ascii_case("/s") {
            self.input_mode = InputMode::Singleline;
            return self.get_input();
        } else if message_text.eq_ignore_ascii_case("/t") {
            self.theme = match self.theme {
                Theme::Light => {
                    println!("Switching to Dark theme");
                    Theme::Dark
                }
                Theme::Dark => {
                    println!("Switching to Light theme");
                    Theme::Light
                }
            };
            return self.get_input();
        } else if message_text.eq_ignore_ascii_case("/?") {
            print_help();
            return self.get_input();
        }

        Ok(Input::message(message_text))
    }

    fn close(&self) {
        println!("{}", style("Closing session.").dim());
    }
}
