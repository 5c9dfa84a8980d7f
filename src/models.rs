use serde::{Deserialize, Serialize};

use crate::post::{format_timestamp, NewPost, Post, PostPatch, Status};
use crate::store::PostError;

/// Request body for creating a post
///
/// Fields are optional here so that a missing field is reported as a
/// validation error rather than a JSON shape error.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<Status>,
}

impl TryFrom<CreatePostRequest> for NewPost {
    type Error = PostError;

    fn try_from(req: CreatePostRequest) -> Result<Self, Self::Error> {
        let title = req
            .title
            .ok_or_else(|| PostError::validation("title", "is required"))?;
        let content = req
            .content
            .ok_or_else(|| PostError::validation("content", "is required"))?;
        let status = req
            .status
            .ok_or_else(|| PostError::validation("status", "is required"))?;

        Ok(NewPost {
            title,
            content,
            status,
        })
    }
}

/// Request body for a partial update; omitted fields are left unchanged
#[derive(Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<Status>,
}

impl From<UpdatePostRequest> for PostPatch {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            status: req.status,
        }
    }
}

/// Post as returned by every endpoint that yields one
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub status: Status,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            status: post.status,
            created_at: format_timestamp(&post.created_at),
            updated_at: post.updated_at.as_ref().map(format_timestamp),
        }
    }
}
