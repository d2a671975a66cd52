use teloxide::types::ChatId;
use thiserror::Error;

/// Environment variable with the bot's API token.
pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
/// Environment variable with the ID of the chat that receives ideas.
pub const ADMIN_CHAT_ID_VAR: &str = "ADMIN_CHAT_ID";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BOT_TOKEN is not set")]
    MissingToken,
    #[error("ADMIN_CHAT_ID is not set")]
    MissingAdminChatId,
    #[error("ADMIN_CHAT_ID is not a valid chat ID: {value:?}")]
    InvalidAdminChatId { value: String },
    #[error("ADMIN_CHAT_ID must not be zero")]
    ZeroAdminChatId,
}

/// Everything the bot needs to know before it starts.
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub admin_chat_id: ChatId,
}

// Keep the token out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<hidden>")
            .field("admin_chat_id", &self.admin_chat_id)
            .finish()
    }
}

impl Config {
    /// Read the config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the config using `lookup` to fetch variables by name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup(BOT_TOKEN_VAR)
            .map(|x| x.trim().to_string())
            .filter(|x| !x.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let admin_chat_id = lookup(ADMIN_CHAT_ID_VAR)
            .map(|x| x.trim().to_string())
            .filter(|x| !x.is_empty())
            .ok_or(ConfigError::MissingAdminChatId)?;

        let admin_chat_id: i64 = admin_chat_id
            .parse()
            .map_err(|_| ConfigError::InvalidAdminChatId {
                value: admin_chat_id.clone(),
            })?;

        if admin_chat_id == 0 {
            return Err(ConfigError::ZeroAdminChatId);
        }

        Ok(Config {
            bot_token,
            admin_chat_id: ChatId(admin_chat_id),
        })
    }
}
