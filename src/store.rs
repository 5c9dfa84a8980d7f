use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::post::{self, NewPost, Post, PostPatch};

/// Errors surfaced by the post store.
///
/// Absence is not an error here: lookups and updates return `Option`.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Validation failed: {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl PostError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Backing table for posts, keyed by `id`.
///
/// Every call is a single independent request against the table; each
/// implementation applies a call atomically per key.
#[async_trait]
pub trait PostTable: Send + Sync {
    /// Write the whole record, replacing any existing row with the same id
    async fn put(&self, post: &Post) -> anyhow::Result<()>;

    async fn get(&self, id: &str) -> anyhow::Result<Option<Post>>;

    /// Merge the supplied fields into an existing row and stamp `updated_at`.
    ///
    /// Returns `Ok(None)` without writing anything when the row does not exist.
    async fn merge(
        &self,
        id: &str,
        patch: &PostPatch,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Post>>;

    /// Remove the row; removing an absent id succeeds
    async fn delete(&self, id: &str) -> anyhow::Result<()>;

    /// Cheap round trip to check the table is reachable
    async fn ping(&self) -> anyhow::Result<()>;
}

/// Owner of the post lifecycle. Cloning shares the same table handle.
#[derive(Clone)]
pub struct PostStore {
    table: Arc<dyn PostTable>,
}

impl PostStore {
    pub fn new(table: Arc<dyn PostTable>) -> Self {
        Self { table }
    }

    /// Create a post with a fresh random id and `created_at` set to now
    pub async fn create(&self, new_post: NewPost) -> Result<Post, PostError> {
        new_post.validate()?;

        let post = Post {
            id: Uuid::new_v4().to_string(),
            title: new_post.title,
            content: new_post.content,
            status: new_post.status,
            created_at: post::now(),
            updated_at: None,
        };

        self.table.put(&post).await?;

        tracing::debug!("Created post with id: {}", post.id);
        Ok(post)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Post>, PostError> {
        post::require_text("id", id)?;
        Ok(self.table.get(id).await?)
    }

    /// Field-level merge of `patch` into the stored post.
    ///
    /// `updated_at` advances on every call, even for an empty patch. An id
    /// with no stored post yields `Ok(None)` and nothing is written.
    pub async fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, PostError> {
        post::require_text("id", id)?;
        patch.validate()?;

        let merged = self.table.merge(id, &patch, post::now()).await?;

        match &merged {
            Some(_) => tracing::debug!("Updated post with id: {}", id),
            None => tracing::debug!("Update skipped, no post with id: {}", id),
        }
        Ok(merged)
    }

    pub async fn delete(&self, id: &str) -> Result<(), PostError> {
        post::require_text("id", id)?;
        self.table.delete(id).await?;

        tracing::debug!("Deleted post with id: {}", id);
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), PostError> {
        Ok(self.table.ping().await?)
    }
}
