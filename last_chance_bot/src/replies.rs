//! Everything here is sent with HTML markup, so anything that came from a
//! user goes through [`escape`] first.

use std::fmt::Write;

use bot_commons::useful_methods::{telegram_len, SplitToFit, TELEGRAM_MESSAGE_LIMIT};

use crate::controller::Sender;

/// Placeholder for ideas that have neither text nor a caption.
pub const NO_TEXT_PLACEHOLDER: &str = "<i>(без текста)</i>";

pub const ANONYMOUS_BUTTON: &str = "🥸 Анонимно";
pub const NAMED_BUTTON: &str = "😎 С именем";

pub const IDEA_PROMPT: &str = concat!(
    "Отлично. Теперь напиши свою идею для доната.\n",
    "Опиши задание так, чтобы у нас пошли мурашки по коже…"
);

pub const DELIVERED_ANONYMOUSLY: &str =
    "✅ Твоя идея доставлена Бармену анонимно. Если она окажется лучшей – мы свяжемся.";
pub const DELIVERED: &str =
    "✅ Твоя идея доставлена Бармену. Если она окажется лучшей – мы свяжемся.";
pub const DELIVERY_FAILED: &str = "❌ Что-то пошло не так. Попробуй ещё раз позже.";

pub const JUST_A_BARTENDER: &str =
    "🍸 Я всего лишь бармен. Если хочешь предложить идею, нажми /start.";

/// Keyword replies, checked in this order. `{name}` gets replaced
/// with the sender's first name.
pub const AUTO_REPLIES: &[(&str, &str)] = &[
    (
        "привет",
        "🍸 Привет, {name}. Заходи, присаживайся. Есть что предложить для шоу?",
    ),
    (
        "здравствуйте",
        "🍸 Здравствуй, путник. Не хочешь оставить своё пожелание участникам?",
    ),
    (
        "кто ты",
        "Я – Бармен. Хранитель тайн этого заведения и посредник между зрителями и шоу.",
    ),
    (
        "что ты умеешь",
        "Принимаю идеи для донатов. Напиши /start и предложи задание.",
    ),
    ("спасибо", "Это тебе спасибо. Заходи ещё."),
    (
        "пока",
        "Прощай, но помни: дверь в «Последний шанс» всегда открыта.",
    ),
];

pub fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

pub fn welcome(first_name: &str) -> String {
    format!(
        concat!(
            "🍸 Добро пожаловать в бар «Последний шанс», {}.\n\n",
            "Я – Бармен. Здесь каждый гость может повлиять на судьбу участников шоу.\n",
            "Твоя идея для доната (задания) может быть использована в прямом эфире.\n",
            "Просто предложи, что они должны сделать, – мы выберем лучшие.\n\n",
            "Хочешь остаться инкогнито или готов раскрыть имя?"
        ),
        escape(first_name)
    )
}

/// Pick the canned reply for a message that isn't part of a conversation.
pub fn auto_reply(text: &str, first_name: &str) -> String {
    let text = text.to_lowercase();

    AUTO_REPLIES
        .iter()
        .find(|(key, _)| text.contains(key))
        .map(|(_, reply)| reply.replace("{name}", &escape(first_name)))
        .unwrap_or_else(|| JUST_A_BARTENDER.to_string())
}

/// The first line of an idea as the administrator sees it.
///
/// Anonymous ideas are only anonymous to the user: the admin still gets
/// to know who sent it.
pub fn admin_header(sender: &Sender, is_anonymous: bool) -> String {
    let full_name = escape(&sender.full_name);
    let username = sender.username.as_deref().map(escape);

    if is_anonymous {
        let mut info = format!("ID: {}, Имя: {}", sender.id, full_name);
        if let Some(username) = username {
            let _ = write!(info, ", Username: @{}", username);
        }
        format!("🍸 Анонимная идея (реально: {})", info)
    } else {
        let mut header = format!("🍸 Идея от {}", full_name);
        if let Some(username) = username {
            let _ = write!(header, " (@{})", username);
        }
        header
    }
}

/// Messages for the administrator. `body` is the raw idea text, if any.
///
/// Usually that's a single message. Ideas too long for one message are
/// split, the header going on the first part.
pub fn admin_messages(sender: &Sender, is_anonymous: bool, body: Option<&str>) -> Vec<String> {
    let header = admin_header(sender, is_anonymous);

    let mut pieces = SplitToFit::new(body.unwrap_or_default(), TELEGRAM_MESSAGE_LIMIT);
    // Telegram counts the text after the HTML is parsed.
    let header_len = telegram_len(&html_escape::decode_html_entities(&header));
    let first_room = TELEGRAM_MESSAGE_LIMIT.saturating_sub(header_len + 2);

    let first = match pieces.next_fitting(first_room) {
        Some(piece) => escape(piece),
        None => NO_TEXT_PLACEHOLDER.to_string(),
    };

    let mut output = vec![format!("{}\n\n{}", header, first)];
    output.extend(pieces.map(escape));
    output
}

pub fn delivered(is_anonymous: bool) -> &'static str {
    match is_anonymous {
        true => DELIVERED_ANONYMOUSLY,
        false => DELIVERED,
    }
}
