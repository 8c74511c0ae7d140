use super::answer::Answer;
use super::message::Message;
use serde::{Deserialize, Serialize};

/// Everything one invocation of the agent returned, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub messages: Vec<Message>,
}

impl ResponseEnvelope {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn assistant_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|message| message.is_assistant())
    }

    /// Concatenate the text of every assistant message, skipping the ones without text
    pub fn answer(&self) -> Answer {
        let text: String = self
            .assistant_messages()
            .filter_map(Message::text)
            .collect();
        Answer::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer::NO_ANSWER;
    use serde_json::json;

    #[test]
    fn test_answer_keeps_assistant_text_in_order() {
        let envelope = ResponseEnvelope::new(vec![
            Message::user().with_text("x"),
            Message::assistant().with_text("A"),
            Message::assistant().with_text("B"),
            Message::assistant().with_text(""),
        ]);

        assert_eq!(envelope.answer().as_str(), "AB");
    }

    #[test]
    fn test_answer_skips_tool_only_turns() {
        let envelope = ResponseEnvelope::new(vec![
            Message::user().with_text("what happened today?"),
            Message::assistant().with_tool_request("call_1", "search", json!({"query": "news"})),
            Message::tool().with_text("{\"results\": []}"),
            Message::assistant().with_text("Nothing notable."),
        ]);

        assert_eq!(envelope.answer().as_str(), "Nothing notable.");
    }

    #[test]
    fn test_answer_is_empty_without_assistant_text() {
        let envelope = ResponseEnvelope::new(vec![
            Message::user().with_text("hello"),
            Message::system().with_text("scaffolding"),
        ]);

        let answer = envelope.answer();
        assert!(answer.is_empty());
        assert_eq!(answer.display_text(), NO_ANSWER);
        assert!(ResponseEnvelope::default().answer().is_empty());
    }
}
