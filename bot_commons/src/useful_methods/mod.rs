mod split_msg;
pub use split_msg::*;

use teloxide::types::{Message, User};

/// Split a command message's text into a command name and its parameters.
///
/// The command name is lowercased and has the `@bot_username` suffix
/// trimmed off it, so `/Start@my_bot hi` yields `("/start", "hi")`.
/// Returns `None` if the text does not start with `/`.
pub fn parse_command<'a>(text: &'a str, bot_username: &str) -> Option<(String, &'a str)> {
    // Check if it starts with "/", like how a command should.
    if !text.starts_with('/') {
        return None;
    }
    // Get first word in the message, the command itself.
    let command = text.split_whitespace().next()?;
    let params = text[command.len()..].trim_start();

    let username = format!("@{}", bot_username);
    let command = command
        .strip_suffix(username.as_str())
        .unwrap_or(command)
        .to_lowercase();

    Some((command, params))
}

pub trait MessageStuff {
    /// Text of the message, or its caption if there is no text.
    fn text_full(&self) -> Option<&str>;
}

impl MessageStuff for Message {
    fn text_full(&self) -> Option<&str> {
        self.text().or_else(|| self.caption())
    }
}

pub trait UserStuff {
    /// A `@username` if the user has one, otherwise their full name.
    fn handle_or_name(&self) -> String;
}

impl UserStuff for User {
    fn handle_or_name(&self) -> String {
        if let Some(username) = &self.username {
            format!("@{}", username)
        } else {
            self.full_name()
        }
    }
}
