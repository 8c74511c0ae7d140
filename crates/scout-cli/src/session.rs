use anyhow::Result;
use scout::bridge::BlockingBridge;
use scout::errors::BridgeError;
use scout::models::role::Role;

use crate::prompt::{InputType, Prompt};

/// One interactive conversation. The bridge outlives any failure here: errors
/// are shown to the user and the loop keeps going.
pub struct Session<'a> {
    bridge: &'a BlockingBridge,
    prompt: Box<dyn Prompt + 'a>,
    history: Vec<(Role, String)>,
}

impl<'a> Session<'a> {
    pub fn new(bridge: &'a BlockingBridge, prompt: Box<dyn Prompt + 'a>) -> Self {
        Session {
            bridge,
            prompt,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[(Role, String)] {
        &self.history
    }

    pub fn start(&mut self) -> Result<()> {
        self.initialize();
        self.prompt.scout_ready();

        loop {
            let input = self.prompt.get_input()?;
            match input.input_type {
                InputType::Message => {
                    if let Some(content) = input.content {
                        self.ask(&content);
                    }
                }
                InputType::History => self.render_history(),
                InputType::Init => {
                    self.initialize();
                }
                InputType::AskAgain => continue,
                InputType::Exit => break,
            }
        }

        self.prompt.close();
        Ok(())
    }

    /// Build the agent if it is not built yet. Returns whether it is ready.
    pub fn initialize(&mut self) -> bool {
        if self.bridge.is_ready() {
            self.prompt.render(Role::System, "Agent already initialized.");
            return true;
        }

        let missing = self.bridge.bridge().settings().missing_credentials();
        if !missing.is_empty() {
            self.prompt.render_error(&format!(
                "Missing credentials: {}. Set them in the environment or a .env file.",
                missing.join(", ")
            ));
        }

        self.prompt.show_busy("Initializing agent...");
        let result = self.bridge.ensure_ready();
        self.prompt.hide_busy();

        match result {
            Ok(()) => {
                self.prompt.render(Role::System, "Agent ready.");
                true
            }
            Err(e) => {
                self.prompt.render_error(&e.to_string());
                self.prompt
                    .render(Role::System, "Type /init to try again once the problem is fixed.");
                false
            }
        }
    }

    /// Ask one question and show whatever comes back, answer or error
    pub fn ask(&mut self, query: &str) {
        self.history.push((Role::User, query.to_string()));

        self.prompt.show_busy("Thinking...");
        let result = self.bridge.ask(query);
        self.prompt.hide_busy();

        let shown = match result {
            Ok(answer) => {
                let text = answer.display_text().to_string();
                self.prompt.render(Role::Assistant, &text);
                text
            }
            Err(e) => {
                let text = e.to_string();
                self.prompt.render_error(&text);
                if e == BridgeError::NotInitialized {
                    self.prompt.render(Role::System, "Type /init to initialize the agent.");
                }
                text
            }
        };
        self.history.push((Role::Assistant, shown));
    }

    fn render_history(&mut self) {
        if self.history.is_empty() {
            self.prompt.render(Role::System, "No messages yet.");
            return;
        }
        for (role, content) in &self.history {
            self.prompt.render(*role, content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Input;
    use scout::config::Settings;
    use scout::models::answer::NO_ANSWER;
    use scout::providers::mock::{MockAgent, MockFactory};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        Text(Role, String),
        Error(String),
    }

    /// Feeds scripted input and records everything the session shows
    struct ScriptedPrompt {
        inputs: VecDeque<Input>,
        shown: Rc<RefCell<Vec<Shown>>>,
        busy: bool,
    }

    impl ScriptedPrompt {
        fn new(inputs: Vec<Input>) -> (Self, Rc<RefCell<Vec<Shown>>>) {
            let shown = Rc::new(RefCell::new(Vec::new()));
            let prompt = ScriptedPrompt {
                inputs: inputs.into(),
                shown: shown.clone(),
                busy: false,
            };
            (prompt, shown)
        }
    }

    impl Prompt for ScriptedPrompt {
        fn render(&mut self, role: Role, text: &str) {
            assert!(!self.busy, "rendered while the spinner was running");
            self.shown.borrow_mut().push(Shown::Text(role, text.to_string()));
        }

        fn render_error(&mut self, message: &str) {
            self.shown.borrow_mut().push(Shown::Error(message.to_string()));
        }

        fn get_input(&mut self) -> Result<Input> {
            Ok(self
                .inputs
                .pop_front()
                .unwrap_or_else(|| Input::command(InputType::Exit)))
        }

        fn show_busy(&mut self, _label: &str) {
            self.busy = true;
        }

        fn hide_busy(&mut self) {
            self.busy = false;
        }

        fn close(&self) {}

        fn scout_ready(&self) {}
    }

    fn settings() -> Settings {
        Settings::default()
            .with_model_api_key("google-key")
            .with_search_api_key("linkup-key")
    }

    fn bridge(factory: Arc<MockFactory>, settings: Settings) -> BlockingBridge {
        BlockingBridge::from_parts(factory, settings).unwrap()
    }

    #[test]
    fn test_session_asks_and_records_history() {
        let factory = Arc::new(MockFactory::new(MockAgent::answering(&[
            "Rust 1.0 shipped in 2015.",
            "",
        ])));
        let bridge = bridge(factory.clone(), settings());
        let (prompt, shown) = ScriptedPrompt::new(vec![
            Input::message("When did Rust 1.0 ship?"),
            Input::command(InputType::AskAgain),
            Input::message("And 2.0?"),
            Input::command(InputType::Exit),
            Input::message("never asked"),
        ]);

        let mut session = Session::new(&bridge, Box::new(prompt));
        session.start().unwrap();

        assert_eq!(factory.builds(), 1);
        assert_eq!(factory.agent().calls(), 2);
        assert_eq!(
            session.history(),
            &[
                (Role::User, "When did Rust 1.0 ship?".to_string()),
                (Role::Assistant, "Rust 1.0 shipped in 2015.".to_string()),
                (Role::User, "And 2.0?".to_string()),
                (Role::Assistant, NO_ANSWER.to_string()),
            ]
        );
        assert!(shown
            .borrow()
            .contains(&Shown::Text(Role::Assistant, NO_ANSWER.to_string())));
    }

    #[test]
    fn test_failed_initialization_keeps_session_alive() {
        let factory = Arc::new(MockFactory::failing("connection refused"));
        let bridge = bridge(factory.clone(), settings());
        let (prompt, shown) = ScriptedPrompt::new(vec![
            Input::message("hello?"),
            Input::command(InputType::Exit),
        ]);

        let mut session = Session::new(&bridge, Box::new(prompt));
        session.start().unwrap();

        let shown = shown.borrow();
        assert!(shown.contains(&Shown::Error(
            "Failed to initialize agent: connection refused".to_string()
        )));
        assert!(shown.contains(&Shown::Error("Agent not initialized".to_string())));
        assert_eq!(factory.builds(), 1);
        assert_eq!(factory.agent().calls(), 0);
        assert_eq!(
            session.history().last(),
            Some(&(Role::Assistant, "Agent not initialized".to_string()))
        );
    }

    #[test]
    fn test_missing_credentials_are_reported() {
        let factory = Arc::new(MockFactory::new(MockAgent::new(Vec::new())));
        let bridge = bridge(factory.clone(), Settings::default());
        let (prompt, shown) = ScriptedPrompt::new(Vec::new());

        let mut session = Session::new(&bridge, Box::new(prompt));
        assert!(!session.initialize());

        let shown = shown.borrow();
        match &shown[0] {
            Shown::Error(message) => {
                assert!(message.contains("GOOGLE_API_KEY"));
                assert!(message.contains("LINKUP_API_KEY"));
            }
            other => panic!("expected a credentials warning, got {:?}", other),
        }
        assert_eq!(factory.builds(), 0);
    }

    #[test]
    fn test_init_command_only_builds_when_needed() {
        let factory = Arc::new(MockFactory::new(MockAgent::answering(&["hi"])));
        let bridge = bridge(factory.clone(), settings());
        let (prompt, shown) = ScriptedPrompt::new(vec![
            Input::command(InputType::Init),
            Input::command(InputType::Init),
            Input::command(InputType::Exit),
        ]);

        let mut session = Session::new(&bridge, Box::new(prompt));
        session.start().unwrap();

        assert_eq!(factory.builds(), 1);
        let already = shown
            .borrow()
            .iter()
            .filter(|s| **s == Shown::Text(Role::System, "Agent already initialized.".to_string()))
            .count();
        assert_eq!(already, 2);
    }

    #[test]
    fn test_history_command_replays_conversation() {
        let factory = Arc::new(MockFactory::new(MockAgent::answering(&["pong"])));
        let bridge = bridge(factory, settings());
        let (prompt, shown) = ScriptedPrompt::new(vec![
            Input::command(InputType::History),
            Input::message("ping"),
            Input::command(InputType::History),
        ]);

        let mut session = Session::new(&bridge, Box::new(prompt));
        session.start().unwrap();

        let shown = shown.borrow();
        assert!(shown.contains(&Shown::Text(Role::System, "No messages yet.".to_string())));
        let tail: Vec<_> = shown.iter().rev().take(2).rev().cloned().collect();
        assert_eq!(
            tail,
            vec![
                Shown::Text(Role::User, "ping".to_string()),
                Shown::Text(Role::Assistant, "pong".to_string()),
            ]
        );
    }
}
