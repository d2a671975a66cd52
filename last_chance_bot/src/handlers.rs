use std::sync::Arc;

use bot_commons::useful_methods::*;
use teloxide::{
    requests::Requester,
    types::{BotCommand, CallbackQuery, ChatId, Me, Message, MessageId},
    Bot, RequestError,
};

use crate::{
    controller::{AnonymityChoice, ChoiceTap, Controller, IncomingMessage, Sender},
    outbox::Outbox,
    session::{InMemSessionStore, SessionStore},
};

pub type BotController = Controller<InMemSessionStore, Bot>;

pub const START_COMMAND: &str = "/start";

pub fn generate_bot_commands() -> Vec<BotCommand> {
    vec![BotCommand {
        command: START_COMMAND[1..].to_string(),
        description: "Предложить идею для шоу".to_string(),
    }]
}

/// Whether `text` is `/start`, possibly addressed to this bot by name.
fn is_start(text: Option<&str>, bot_username: &str) -> bool {
    text.and_then(|x| parse_command(x, bot_username))
        .is_some_and(|(command, _params)| command == START_COMMAND)
}

/// `/start` always starts over, everything else goes to the conversation.
pub(crate) async fn route_message<S: SessionStore, O: Outbox>(
    controller: &Controller<S, O>,
    bot_username: &str,
    message: IncomingMessage,
) -> Result<(), RequestError> {
    if is_start(message.text.as_deref(), bot_username) {
        return controller.start(message.chat, &message.sender).await;
    }
    controller.handle_message(&message).await
}

/// Returns `true` if the tap should be answered.
///
/// `target` is the chat and message the tapped buttons are under, which
/// Telegram leaves out if the message is too old.
pub(crate) async fn route_tap<S: SessionStore, O: Outbox>(
    controller: &Controller<S, O>,
    data: Option<&str>,
    target: Option<(ChatId, MessageId)>,
) -> Result<bool, RequestError> {
    // Not one of ours. Leave it be.
    let Some(choice) = data.and_then(AnonymityChoice::from_callback_data) else {
        return Ok(false);
    };
    let Some((chat, message_id)) = target else {
        return Ok(false);
    };

    let tap = ChoiceTap {
        chat,
        message_id,
        choice,
    };
    controller.choose(&tap).await
}

pub async fn handle_message(
    me: Me,
    message: Message,
    controller: Arc<BotController>,
) -> Result<(), RequestError> {
    let Some(user) = message.from.as_ref() else {
        log::debug!("Ignoring a message without a sender in {}", message.chat.id);
        return Ok(());
    };

    log::debug!(
        "Message from {} in {}: {:?}",
        user.handle_or_name(),
        message.chat.id,
        message.text_full()
    );

    let incoming = IncomingMessage {
        chat: message.chat.id,
        sender: Sender::from(user),
        text: message.text().map(String::from),
        caption: message.caption().map(String::from),
    };
    route_message(&controller, me.username(), incoming).await
}

pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    controller: Arc<BotController>,
) -> Result<(), RequestError> {
    let target = query.message.as_ref().map(|x| (x.chat().id, x.id()));

    if route_tap(&controller, query.data.as_deref(), target).await? {
        bot.answer_callback_query(query.id).await?;
    } else {
        log::debug!(
            "Ignored a tap from {} that no conversation was waiting for.",
            query.from.handle_or_name()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use teloxide::types::UserId;

    use super::*;
    use crate::{
        outbox::recording::{RecordingOutbox, Sent},
        session::{ConversationState, Phase},
    };

    const BOT_USERNAME: &str = "last_chance_bar_bot";
    const ADMIN: ChatId = ChatId(-1002065680710);
    const USER_CHAT: ChatId = ChatId(1366743555);
    const WELCOME_MESSAGE: MessageId = MessageId(7);

    type TestController = Controller<InMemSessionStore, RecordingOutbox>;

    fn controller() -> TestController {
        Controller::new(InMemSessionStore::new(), RecordingOutbox::default(), ADMIN)
    }

    fn text(text: &str) -> IncomingMessage {
        IncomingMessage {
            chat: USER_CHAT,
            sender: Sender {
                id: UserId(1366743555),
                first_name: "Ivan".to_string(),
                full_name: "Ivan Petrov".to_string(),
                username: None,
            },
            text: Some(text.to_string()),
            caption: None,
        }
    }

    /// Start a conversation and pick a named submission.
    async fn awaiting_idea() -> TestController {
        let c = controller();
        route_message(&c, BOT_USERNAME, text("/start")).await.unwrap();
        let tapped = route_tap(&c, Some("not_anon"), Some((USER_CHAT, WELCOME_MESSAGE)))
            .await
            .unwrap();
        assert!(tapped);
        c.outbox().take();
        c
    }

    #[test]
    fn start_command() {
        assert!(is_start(Some("/start"), BOT_USERNAME));
        assert!(is_start(Some("/start@last_chance_bar_bot"), BOT_USERNAME));
        assert!(is_start(Some("/START please"), BOT_USERNAME));

        assert!(!is_start(Some("/start@other_bot"), BOT_USERNAME));
        assert!(!is_start(Some("/stop"), BOT_USERNAME));
        assert!(!is_start(Some("start"), BOT_USERNAME));
        assert!(!is_start(None, BOT_USERNAME));
    }

    #[tokio::test]
    async fn start_wins_over_waiting_idea() {
        for command in ["/start", "/start@last_chance_bar_bot"] {
            let c = awaiting_idea().await;

            route_message(&c, BOT_USERNAME, text(command)).await.unwrap();
            let sent = c.outbox().take();
            assert!(
                matches!(sent.as_slice(), [Sent::WithChoices(USER_CHAT, _, _)]),
                "{} got {:?}",
                command,
                sent
            );
            assert_eq!(
                c.sessions().get(USER_CHAT).await,
                Some(ConversationState::awaiting_choice())
            );
        }
    }

    #[tokio::test]
    async fn other_bots_start_is_an_idea() {
        let c = awaiting_idea().await;

        route_message(&c, BOT_USERNAME, text("/start@other_bot"))
            .await
            .unwrap();
        let sent = c.outbox().take();
        assert!(matches!(
            sent.as_slice(),
            [Sent::Text(ADMIN, x), Sent::Text(USER_CHAT, _)] if x.ends_with("/start@other_bot")
        ));
        assert_eq!(c.sessions().get(USER_CHAT).await, None);
    }

    #[tokio::test]
    async fn unusable_taps_are_not_answered() {
        let c = controller();
        route_message(&c, BOT_USERNAME, text("/start")).await.unwrap();
        c.outbox().take();

        let target = Some((USER_CHAT, WELCOME_MESSAGE));
        assert!(!route_tap(&c, Some("URL_SPAM"), target).await.unwrap());
        assert!(!route_tap(&c, None, target).await.unwrap());
        assert!(!route_tap(&c, Some("anon"), None).await.unwrap());

        assert!(c.outbox().take().is_empty());
        assert_eq!(
            c.sessions().get(USER_CHAT).await.map(|x| x.phase),
            Some(Phase::AwaitingChoice)
        );

        assert!(route_tap(&c, Some("anon"), target).await.unwrap());
        assert_eq!(
            c.sessions().get(USER_CHAT).await,
            Some(ConversationState::awaiting_message(true))
        );
    }

    #[tokio::test]
    async fn tap_without_conversation_is_not_answered() {
        let c = controller();
        let target = Some((USER_CHAT, WELCOME_MESSAGE));
        assert!(!route_tap(&c, Some("anon"), target).await.unwrap());
        assert!(c.outbox().take().is_empty());
    }

    #[test]
    fn start_is_registered() {
        let commands = generate_bot_commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].command, "start");
        assert!(!commands[0].description.is_empty());
    }
}
