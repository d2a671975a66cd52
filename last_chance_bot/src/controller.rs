use teloxide::{
    types::{ChatId, MessageId, User, UserId},
    RequestError,
};

use crate::{
    outbox::{ChoiceButton, Outbox},
    replies,
    session::{ConversationState, Phase, SessionStore},
};

/// Who sent something, as far as the conversation cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub first_name: String,
    pub full_name: String,
    pub username: Option<String>,
}

impl From<&User> for Sender {
    fn from(user: &User) -> Self {
        Sender {
            id: user.id,
            first_name: user.first_name.clone(),
            full_name: user.full_name(),
            username: user.username.clone(),
        }
    }
}

/// A message from a user, with whatever text or caption it had.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat: ChatId,
    pub sender: Sender,
    pub text: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymityChoice {
    Anonymous,
    Named,
}

impl AnonymityChoice {
    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data {
            "anon" => Some(AnonymityChoice::Anonymous),
            "not_anon" => Some(AnonymityChoice::Named),
            _ => None,
        }
    }

    pub fn callback_data(self) -> &'static str {
        match self {
            AnonymityChoice::Anonymous => "anon",
            AnonymityChoice::Named => "not_anon",
        }
    }

    pub fn is_anonymous(self) -> bool {
        self == AnonymityChoice::Anonymous
    }

    fn button(self) -> ChoiceButton {
        let text = match self {
            AnonymityChoice::Anonymous => replies::ANONYMOUS_BUTTON,
            AnonymityChoice::Named => replies::NAMED_BUTTON,
        };
        ChoiceButton {
            text: text.to_string(),
            callback_data: self.callback_data().to_string(),
        }
    }
}

/// A tap on one of the buttons under the welcome message.
#[derive(Debug, Clone)]
pub struct ChoiceTap {
    pub chat: ChatId,
    /// The message the buttons are under.
    pub message_id: MessageId,
    pub choice: AnonymityChoice,
}

/// Drives every chat through the start -> choose anonymity -> submit idea flow.
pub struct Controller<S, O> {
    sessions: S,
    outbox: O,
    admin_chat: ChatId,
}

impl<S: SessionStore, O: Outbox> Controller<S, O> {
    pub fn new(sessions: S, outbox: O, admin_chat: ChatId) -> Self {
        Self {
            sessions,
            outbox,
            admin_chat,
        }
    }

    /// Greet the user and ask how they want to be known. Always starts over,
    /// whatever the chat was in the middle of.
    pub async fn start(&self, chat: ChatId, sender: &Sender) -> Result<(), RequestError> {
        self.outbox
            .send_with_choices(
                chat,
                replies::welcome(&sender.first_name),
                vec![
                    AnonymityChoice::Anonymous.button(),
                    AnonymityChoice::Named.button(),
                ],
            )
            .await?;
        self.sessions
            .set(chat, ConversationState::awaiting_choice())
            .await;

        log::info!(
            "User {} (ID: {}) started a conversation.",
            sender.first_name,
            chat
        );
        Ok(())
    }

    /// Returns `true` if the tap was taken, in which case it should be
    /// acknowledged. Taps outside of [`Phase::AwaitingChoice`] are dropped.
    pub async fn choose(&self, tap: &ChoiceTap) -> Result<bool, RequestError> {
        match self.sessions.get(tap.chat).await {
            Some(ConversationState {
                phase: Phase::AwaitingChoice,
                ..
            }) => (),
            Some(_) => {
                log::debug!("Dropping a stale anonymity choice in chat {}", tap.chat);
                return Ok(false);
            }
            None => return Ok(false),
        }

        self.sessions
            .set(
                tap.chat,
                ConversationState::awaiting_message(tap.choice.is_anonymous()),
            )
            .await;
        self.outbox
            .edit_text(tap.chat, tap.message_id, replies::IDEA_PROMPT.to_string())
            .await?;

        log::info!(
            "User {} chose anonymity: {}",
            tap.chat,
            tap.choice.callback_data()
        );
        Ok(true)
    }

    /// Anything that is not `/start` ends up here.
    pub async fn handle_message(&self, message: &IncomingMessage) -> Result<(), RequestError> {
        match self.sessions.get(message.chat).await {
            Some(ConversationState {
                phase: Phase::AwaitingMessage,
                is_anonymous,
            }) => self.submit_idea(message, is_anonymous).await,
            // Still has to tap a button. Nothing to say to that.
            Some(ConversationState {
                phase: Phase::AwaitingChoice,
                ..
            }) => Ok(()),
            None => {
                let reply = replies::auto_reply(
                    message.text.as_deref().unwrap_or_default(),
                    &message.sender.first_name,
                );
                self.outbox.send_text(message.chat, reply).await
            }
        }
    }

    async fn submit_idea(
        &self,
        message: &IncomingMessage,
        is_anonymous: bool,
    ) -> Result<(), RequestError> {
        let body = message.text.as_deref().or(message.caption.as_deref());
        let admin_texts = replies::admin_messages(&message.sender, is_anonymous, body);
        if admin_texts.len() > 1 {
            log::info!(
                "Idea from {} is too long, sending it in {} parts.",
                message.chat,
                admin_texts.len()
            );
        }

        let mut result = Ok(());
        for text in admin_texts {
            result = self.outbox.send_text(self.admin_chat, text).await;
            if result.is_err() {
                break;
            }
        }

        // One idea per conversation, whether it got through or not.
        self.sessions.clear(message.chat).await;

        let reply = match result {
            Ok(()) => {
                log::info!(
                    "Idea from {} sent to admin. Anonymous: {}",
                    message.chat,
                    is_anonymous
                );
                replies::delivered(is_anonymous)
            }
            Err(e) => {
                log::error!("Failed to send idea from {} to admin: {}", message.chat, e);
                replies::DELIVERY_FAILED
            }
        };

        self.outbox
            .send_text(message.chat, reply.to_string())
            .await
    }
}

#[cfg(test)]
impl<S, O> Controller<S, O> {
    pub(crate) fn sessions(&self) -> &S {
        &self.sessions
    }

    pub(crate) fn outbox(&self) -> &O {
        &self.outbox
    }
}
