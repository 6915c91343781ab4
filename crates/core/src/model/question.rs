use serde::{Deserialize, Serialize};

use super::combo::Combo;

/// A single quiz item: the expected combo, a friendly rendering of it, and
/// the task description shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    combo: Combo,
    display: String,
    description: String,
}

impl Question {
    /// Creates a question; the display text is derived from the combo.
    #[must_use]
    pub fn new(combo: Combo, description: impl Into<String>) -> Self {
        let display = display_combo(&combo);
        Self {
            combo,
            display,
            description: description.into(),
        }
    }

    #[must_use]
    pub fn combo(&self) -> &Combo {
        &self.combo
    }

    /// Friendly rendering of the combo (`ctrl+right arrow`).
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Maps a technical key token to its friendly label.
fn display_token(token: &str) -> &str {
    match token {
        "arrowright" => "right arrow",
        "arrowleft" => "left arrow",
        "arrowup" => "up arrow",
        "arrowdown" => "down arrow",
        other => other,
    }
}

/// Renders a combo with friendly key labels, keeping the `+` joins.
#[must_use]
pub fn display_combo(combo: &Combo) -> String {
    combo
        .tokens()
        .map(display_token)
        .collect::<Vec<_>>()
        .join("+")
}

/// The built-in shortcut catalog, in authoring order.
///
/// Shuffling happens at session construction, never here.
#[must_use]
pub fn builtin_catalog() -> Vec<Question> {
    [
        ("shift+enter", "Open the message in its own window"),
        ("ctrl+1", "Switch to Mail in Outlook (from your calendar)"),
        ("ctrl+arrowright", "Move the cursor one word to the right"),
        ("ctrl+y", "Repeat the last action"),
        ("ctrl+end", "Jump to the end of the document"),
        ("ctrl+arrowleft", "Move the cursor one word to the left"),
        ("ctrl+2", "Switch to Calendar in Outlook (from your mailbox)"),
        ("ctrl+c", "Copy the selected text or items"),
        ("ctrl+x", "Cut the selected text or items"),
        ("ctrl+z", "Undo the last action"),
        ("ctrl+a", "Select everything in the current window or document"),
        ("ctrl+b", "Make the selection bold"),
        ("ctrl+u", "Underline the selection"),
        ("ctrl+i", "Italicize the selection"),
        ("ctrl+f", "Find"),
        ("ctrl+backspace", "Delete the word left of the cursor"),
        ("ctrl+r", "Reply to the selected message in Outlook"),
    ]
    .into_iter()
    .map(|(combo, description)| Question::new(Combo::new(combo), description))
    .collect()
}
