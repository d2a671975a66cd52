use std::future::Future;

use teloxide::{
    payloads::{EditMessageTextSetters, SendMessageSetters},
    requests::Requester,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode},
    Bot, RequestError,
};

/// A button under a message that sends `callback_data` back when tapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceButton {
    pub text: String,
    pub callback_data: String,
}

/// Things the bot sends out. All text is HTML.
pub trait Outbox: Send + Sync {
    fn send_text(
        &self,
        to: ChatId,
        text: String,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;

    /// Send a message with `choices` as a single row of inline buttons.
    fn send_with_choices(
        &self,
        to: ChatId,
        text: String,
        choices: Vec<ChoiceButton>,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;

    fn edit_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: String,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;
}

impl Outbox for Bot {
    async fn send_text(&self, to: ChatId, text: String) -> Result<(), RequestError> {
        self.send_message(to, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn send_with_choices(
        &self,
        to: ChatId,
        text: String,
        choices: Vec<ChoiceButton>,
    ) -> Result<(), RequestError> {
        let row = choices
            .into_iter()
            .map(|x| InlineKeyboardButton::callback(x.text, x.callback_data))
            .collect::<Vec<_>>();

        self.send_message(to, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(InlineKeyboardMarkup::new(vec![row]))
            .await?;
        Ok(())
    }

    async fn edit_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: String,
    ) -> Result<(), RequestError> {
        // Editing the text without a markup also takes the buttons away.
        self.edit_message_text(chat, message, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}
