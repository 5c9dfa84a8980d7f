use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::PostError;

/// Publication status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Draft,
    InProgress,
    Published,
}

impl Status {
    /// Canonical name, as persisted and serialized
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "DRAFT",
            Status::InProgress => "IN_PROGRESS",
            Status::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Status::Draft),
            "IN_PROGRESS" => Ok(Status::InProgress),
            "PUBLISHED" => Ok(Status::Published),
            other => Err(anyhow::anyhow!(
                "unknown post status '{}', expected one of: DRAFT, IN_PROGRESS, PUBLISHED",
                other
            )),
        }
    }
}

/// A stored post
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Overwrite the fields present in `patch` and stamp `updated_at`.
    /// `id` and `created_at` are never touched.
    pub fn apply(&mut self, patch: &PostPatch, updated_at: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Some(updated_at);
    }
}

/// Fields needed to create a post
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub status: Status,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), PostError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }
}

/// Partial update: `None` means "leave the stored value alone"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<Status>,
}

impl PostPatch {
    pub fn validate(&self) -> Result<(), PostError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(content) = &self.content {
            require_text("content", content)?;
        }
        Ok(())
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), PostError> {
    if value.trim().is_empty() {
        return Err(PostError::validation(field, "must not be blank"));
    }
    Ok(())
}

/// Current server time at the precision the table keeps
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 form used for persisted timestamps; sorts in time order
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}
