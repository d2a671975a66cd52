//! Source code for the Bartender of the bar «Последний шанс»: a bot that
//! collects ideas for the show and relays them to the administrator chat.

/// Configuration read from the environment at startup.
pub mod config;

/// Per-chat conversation state and where it's kept.
pub mod session;

/// Every piece of text the bot sends.
pub mod replies;

/// The outbound side of the transport the controller talks to.
pub mod outbox;

/// The conversation state machine.
pub mod controller;

/// Functions that handle events from Telegram.
mod handlers;

/// Entry function that starts the bot.
mod entry;
pub use entry::*;
