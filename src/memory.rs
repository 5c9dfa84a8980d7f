//! In-memory post table - used for local runs without Spanner and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::post::{Post, PostPatch};
use crate::store::PostTable;

/// Post table held in a HashMap behind an async RwLock.
///
/// Data is lost on process restart.
pub struct InMemoryPostTable {
    rows: RwLock<HashMap<String, Post>>,
}

impl InMemoryPostTable {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPostTable {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostTable for InMemoryPostTable {
    async fn put(&self, post: &Post) -> anyhow::Result<()> {
        let mut rows = self.rows.write().await;
        rows.insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Post>> {
        let rows = self.rows.read().await;
        Ok(rows.get(id).cloned())
    }

    async fn merge(
        &self,
        id: &str,
        patch: &PostPatch,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Post>> {
        // Held for the whole merge so it is atomic per key
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(id).map(|post| {
            post.apply(patch, updated_at);
            post.clone()
        }))
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        let mut rows = self.rows.write().await;
        rows.remove(id);
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
