//! Context notes one user keeps about another

use std::sync::Arc;

use crate::models::{FriendContext, UserId};
use crate::storage::filters::ContextFilter;
use crate::storage::traits::{ContextStore, FriendStore};
use crate::{KinshipError, Result};

/// Handler for context annotations
#[derive(Debug, Clone)]
pub struct ContextOperations {
    storage: Arc<dyn FriendStore>,
    max_length: usize,
}

impl ContextOperations {
    pub fn new(storage: Arc<dyn FriendStore>, max_length: usize) -> Self {
        Self {
            storage,
            max_length,
        }
    }

    /// Trimmed text, or a validation error when it is empty or too long
    fn normalize(&self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(KinshipError::Validation(
                "context cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > self.max_length {
            return Err(KinshipError::Validation(format!(
                "context cannot exceed {} characters",
                self.max_length
            )));
        }
        Ok(text.to_string())
    }

    /// Append a note by `user_id` about `friend_id`. Duplicates are kept.
    pub async fn add(
        &self,
        user_id: &UserId,
        friend_id: &UserId,
        text: &str,
    ) -> Result<FriendContext> {
        let text = self.normalize(text)?;
        let context = self
            .storage
            .insert_context(FriendContext::new(user_id.clone(), friend_id.clone(), text))
            .await?;

        tracing::info!(user_id = %user_id, friend_id = %friend_id, "Context added");
        Ok(context)
    }

    /// Remove every note by `user_id` about `friend_id` with exactly this
    /// text, returning how many were removed
    pub async fn remove(&self, user_id: &UserId, friend_id: &UserId, text: &str) -> Result<usize> {
        let removed = self
            .storage
            .delete_contexts_where(ContextFilter::exact(user_id, friend_id, text.trim()))
            .await?;

        tracing::info!(
            user_id = %user_id,
            friend_id = %friend_id,
            removed,
            "Context removed"
        );
        Ok(removed)
    }

    /// Every note about `friend_id`, whoever wrote it, oldest first
    pub async fn list(&self, friend_id: &UserId) -> Result<Vec<FriendContext>> {
        let mut contexts = self
            .storage
            .query_contexts(ContextFilter::about(friend_id))
            .await?;
        contexts.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        tracing::debug!(friend_id = %friend_id, count = contexts.len(), "Listed contexts");
        Ok(contexts)
    }
}
