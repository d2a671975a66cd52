use std::sync::Arc;

use teloxide::{dptree::deps, prelude::*, RequestError};
use thiserror::Error;
use tokio::sync::{mpsc, Notify};

use crate::{
    config::{Config, ConfigError},
    controller::Controller,
    handlers::{self, generate_bot_commands, BotController},
    session::InMemSessionStore,
};

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Bad configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to set bot commands: {0}")]
    SetCommands(#[source] RequestError),
    #[error("Stopped after a handler failed: {0}")]
    Handler(#[source] RequestError),
}

/// Runs the bot until Ctrl-C or until a handler fails.
pub async fn entry() -> Result<(), EntryError> {
    log::info!("ASYNC WOOOO");
    let config = Config::from_env()?;
    log::debug!("Loaded {:?}", config);

    let bot = Bot::new(config.bot_token);

    bot.set_my_commands(generate_bot_commands())
        .await
        .map_err(EntryError::SetCommands)?;

    let controller: Arc<BotController> = Arc::new(Controller::new(
        InMemSessionStore::new(),
        bot.clone(),
        config.admin_chat_id,
    ));

    log::info!("Creating the handler...");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback_query));

    // Errors that get out of a handler are not recovered from. The error
    // handler stashes the error and asks for the dispatcher to be stopped.
    let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel::<RequestError>();
    let stop = Arc::new(Notify::new());
    let error_handler = {
        let stop = stop.clone();
        move |error: RequestError| {
            let fatal_tx = fatal_tx.clone();
            let stop = stop.clone();
            async move {
                log::error!("Unhandled error in a handler: {}", error);
                let _ = fatal_tx.send(error);
                stop.notify_one();
            }
        }
    };

    log::info!("Dispatching the dispatcher!");

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .error_handler(Arc::new(error_handler))
        .dependencies(deps![controller])
        // One queue for everything, so updates are handled one at a time.
        .distribution_function(|_| Some(()))
        .enable_ctrlc_handler()
        .build();

    let shutdown = dispatcher.shutdown_token();
    tokio::spawn(async move {
        stop.notified().await;
        log::warn!("Stopping the dispatcher...");
        // Err here means it's not running anymore anyway.
        if let Ok(stopped) = shutdown.shutdown() {
            stopped.await;
        }
    });

    dispatcher.dispatch().await;

    log::info!("it appears we have been bonked.");

    match fatal_rx.try_recv() {
        Ok(error) => Err(EntryError::Handler(error)),
        Err(_) => Ok(()),
    }
}
