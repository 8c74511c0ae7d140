use std::fmt;

/// Shown in place of an answer when the agent produced no assistant text
pub const NO_ANSWER: &str = "No answer produced.";

/// The assistant text of one invocation.
///
/// An empty answer is a soft condition, not an error: hosts show
/// [`Answer::display_text`], which substitutes [`NO_ANSWER`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer(String);

impl Answer {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Answer(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The text a user should see
    pub fn display_text(&self) -> &str {
        if self.is_empty() {
            NO_ANSWER
        } else {
            &self.0
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}
