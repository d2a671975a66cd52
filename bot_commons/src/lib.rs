//! This crate houses functions common for my bots, because some things
//! are just boilerplate and aaAAAAAAAAA

pub mod useful_methods;

use std::{fmt::Display, future::Future, process::ExitCode};

/// Load a `.env` file from the working directory into the environment,
/// if there is one. Returns a complaint to log if the file exists but
/// could not be read, since logging is not up yet when this runs.
fn load_dotenv() -> Option<String> {
    match dotenvy::dotenv() {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(format!("Failed to load .env file: {e}")),
    }
}

/// Initialize logging and run the `closure` in an async runtime.
///
/// A `.env` file is loaded first, so it may carry `RUST_LOG` too.
/// Logging uses `default_log_filter` unless overridden
/// by environment variable `RUST_LOG`. This uses the crate
/// [pretty_env_logger][] internally, see its documentation for more details.
///
/// If the closure returns an error, it gets logged and the returned
/// exit code is a failure.
///
/// [pretty_env_logger]: https://docs.rs/pretty_env_logger
pub fn start_everything<E: Display>(
    default_log_filter: &str,
    closure: impl Future<Output = Result<(), E>>,
) -> ExitCode {
    let dotenv_complaint = load_dotenv();

    let log_level = std::env::var_os("RUST_LOG")
        .and_then(|x| x.into_string().ok())
        .unwrap_or_else(|| String::from(default_log_filter));

    let running_as_systemd_service = std::env::var_os("JOURNAL_STREAM").is_some();

    let mut builder = match running_as_systemd_service {
        true => pretty_env_logger::formatted_builder(),
        false => pretty_env_logger::formatted_timed_builder(),
    };

    builder.parse_filters(&log_level);

    if builder.try_init().is_err() {
        log::error!("Tried to init logger twice!");
    }

    if let Some(complaint) = dotenv_complaint {
        log::warn!("{complaint}");
    }

    log::info!("hi");

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Could not build the async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(closure) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Bot stopped with an error: {e}");
            ExitCode::FAILURE
        }
    }
}
