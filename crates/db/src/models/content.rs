//! Articles and podcasts.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use masterclass_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub is_published: bool,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateArticle {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub author: Option<String>,
    #[validate(url)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateArticle {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    #[validate(url)]
    pub cover_url: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Podcast {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub audio_url: String,
    pub duration_secs: Option<i32>,
    pub is_published: bool,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePodcast {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    pub description: Option<String>,
    #[validate(url)]
    pub audio_url: String,
    #[validate(range(min = 0))]
    pub duration_secs: Option<i32>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePodcast {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub audio_url: Option<String>,
    #[validate(range(min = 0))]
    pub duration_secs: Option<i32>,
    pub is_published: Option<bool>,
}
