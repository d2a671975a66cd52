use std::{future::Future, sync::Arc};

use teloxide::{
    dispatching::dialogue::{InMemStorage, Storage},
    types::ChatId,
};

/// Where a chat is within the start -> choose anonymity -> submit idea flow.
/// A chat with no [`ConversationState`] at all has no conversation going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingChoice,
    AwaitingMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationState {
    pub phase: Phase,
    pub is_anonymous: bool,
}

impl ConversationState {
    /// State right after `/start`. Anonymity is assumed until told otherwise.
    pub fn awaiting_choice() -> Self {
        Self {
            phase: Phase::AwaitingChoice,
            is_anonymous: true,
        }
    }

    pub fn awaiting_message(is_anonymous: bool) -> Self {
        Self {
            phase: Phase::AwaitingMessage,
            is_anonymous,
        }
    }
}

/// Storage of conversation states, one per chat.
pub trait SessionStore: Send + Sync {
    fn get(&self, chat: ChatId) -> impl Future<Output = Option<ConversationState>> + Send;
    fn set(&self, chat: ChatId, state: ConversationState) -> impl Future<Output = ()> + Send;
    fn clear(&self, chat: ChatId) -> impl Future<Output = ()> + Send;
}

/// Keeps conversation states in teloxide's in-memory dialogue storage.
/// Gone on restart.
pub struct InMemSessionStore {
    storage: Arc<InMemStorage<ConversationState>>,
}

impl InMemSessionStore {
    pub fn new() -> Self {
        Self {
            storage: InMemStorage::new(),
        }
    }
}

impl Default for InMemSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemSessionStore {
    async fn get(&self, chat: ChatId) -> Option<ConversationState> {
        // In-memory reads don't fail.
        self.storage
            .clone()
            .get_dialogue(chat)
            .await
            .ok()
            .flatten()
    }

    async fn set(&self, chat: ChatId, state: ConversationState) {
        if let Err(e) = self.storage.clone().update_dialogue(chat, state).await {
            log::error!("Failed to save conversation state of {}: {}", chat, e);
        }
    }

    async fn clear(&self, chat: ChatId) {
        // The only possible error is that there was nothing to remove.
        let _ = self.storage.clone().remove_dialogue(chat).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_clear() {
        let store = InMemSessionStore::new();
        let chat = ChatId(1);
        assert_eq!(store.get(chat).await, None);

        store.set(chat, ConversationState::awaiting_choice()).await;
        assert_eq!(
            store.get(chat).await,
            Some(ConversationState::awaiting_choice())
        );

        store.set(chat, ConversationState::awaiting_message(false)).await;
        assert_eq!(
            store.get(chat).await,
            Some(ConversationState {
                phase: Phase::AwaitingMessage,
                is_anonymous: false
            })
        );

        store.clear(chat).await;
        assert_eq!(store.get(chat).await, None);
        // Clearing twice is fine.
        store.clear(chat).await;
        assert_eq!(store.get(chat).await, None);
    }

    #[tokio::test]
    async fn chats_are_separate() {
        let store = InMemSessionStore::new();
        store.set(ChatId(1), ConversationState::awaiting_choice()).await;
        store
            .set(ChatId(2), ConversationState::awaiting_message(true))
            .await;

        store.clear(ChatId(1)).await;
        assert_eq!(store.get(ChatId(1)).await, None);
        assert_eq!(
            store.get(ChatId(2)).await,
            Some(ConversationState::awaiting_message(true))
        );
    }
}
