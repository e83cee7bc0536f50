use serde::Serialize;
use sqlx::FromRow;

use crate::models::Comment;

/// A post joined with its category name. Tag names are loaded in a second
/// query and filled in by the store, hence the `sqlx(skip)`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub category: Option<String>,
    #[sqlx(skip)]
    pub tags: Vec<String>,
    pub likes: i64,
}

/// Single-post response: the post plus its comments.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}
