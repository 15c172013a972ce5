//! Per-user PendingInput, held in a teloxide in-memory dialogue storage
//! keyed by the user's id. Nothing here survives a restart.

use std::sync::Arc;
use teloxide::dispatching::dialogue::{InMemStorage, InMemStorageError, Storage};
use teloxide::types::ChatId;
use crate::database::models::StatusValue;

/// The next plain-text message from the user is a comment for this
/// status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingInput {
    pub auditory_id: i64,
    pub status: StatusValue,
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<InMemStorage<PendingInput>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            storage: InMemStorage::new(),
        }
    }

    fn key(user_id: i64) -> ChatId {
        ChatId(user_id)
    }

    /// Stores a pending comment request, replacing any earlier one.
    pub async fn begin(&self, user_id: i64, pending: PendingInput) -> Result<(), InMemStorageError> {
        Arc::clone(&self.storage)
            .update_dialogue(Self::key(user_id), pending)
            .await
    }

    pub async fn peek(&self, user_id: i64) -> Result<Option<PendingInput>, InMemStorageError> {
        Arc::clone(&self.storage).get_dialogue(Self::key(user_id)).await
    }

    /// Removes and returns the pending request, if any.
    pub async fn take(&self, user_id: i64) -> Result<Option<PendingInput>, InMemStorageError> {
        let pending = self.peek(user_id).await?;
        if pending.is_some()
            && Arc::clone(&self.storage)
                .remove_dialogue(Self::key(user_id))
                .await
                .is_err()
        {
            // Consumed concurrently by another update.
            return Ok(None);
        }
        Ok(pending)
    }

    /// Drops the pending request. Returns whether there was one.
    pub async fn cancel(&self, user_id: i64) -> Result<bool, InMemStorageError> {
        Ok(self.take(user_id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(auditory_id: i64, status: StatusValue) -> PendingInput {
        PendingInput { auditory_id, status }
    }

    #[tokio::test]
    async fn test_take_consumes_pending_input() {
        let sessions = SessionStore::new();
        sessions.begin(42, pending(1, StatusValue::Red)).await.expect("begin");

        assert_eq!(sessions.take(42).await.expect("take"), Some(pending(1, StatusValue::Red)));
        assert_eq!(sessions.take(42).await.expect("take"), None);
    }

    #[tokio::test]
    async fn test_new_request_overrides_previous() {
        let sessions = SessionStore::new();
        sessions.begin(42, pending(1, StatusValue::Red)).await.expect("begin");
        sessions.begin(42, pending(2, StatusValue::Yellow)).await.expect("begin");

        assert_eq!(sessions.peek(42).await.expect("peek"), Some(pending(2, StatusValue::Yellow)));
    }

    #[tokio::test]
    async fn test_cancel_reports_whether_anything_was_pending() {
        let sessions = SessionStore::new();
        assert!(!sessions.cancel(42).await.expect("cancel"));

        sessions.begin(42, pending(1, StatusValue::Yellow)).await.expect("begin");
        assert!(sessions.cancel(42).await.expect("cancel"));
        assert_eq!(sessions.peek(42).await.expect("peek"), None);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let sessions = SessionStore::new();
        sessions.begin(1, pending(1, StatusValue::Red)).await.expect("begin");

        assert_eq!(sessions.peek(2).await.expect("peek"), None);
        assert!(!sessions.cancel(2).await.expect("cancel"));
        assert!(sessions.peek(1).await.expect("peek").is_some());
    }
}
