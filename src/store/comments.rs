use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::Comment;

pub async fn create_comment(
    db: &SqlitePool,
    post_id: i64,
    author: &str,
    content: &str,
) -> Result<Comment, AppError> {
    if author.trim().is_empty() {
        return Err(AppError::Validation("author is required".to_string()));
    }
    if content.trim().is_empty() {
        return Err(AppError::Validation("content is required".to_string()));
    }

    // Verify the post exists so a missing parent is a 404, not an FK error.
    let post: Option<(i64,)> = sqlx::query_as("SELECT id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(db)
        .await?;
    if post.is_none() {
        return Err(AppError::NotFound);
    }

    let now = chrono::Utc::now().to_rfc3339();
    let comment: Comment = sqlx::query_as(
        "INSERT INTO comments (post_id, author, content, created_at) \
         VALUES (?, ?, ?, ?) RETURNING id, author, content, created_at",
    )
    .bind(post_id)
    .bind(author)
    .bind(content)
    .bind(&now)
    .fetch_one(db)
    .await?;

    Ok(comment)
}

pub async fn for_post(db: &SqlitePool, post_id: i64) -> Result<Vec<Comment>, AppError> {
    Ok(sqlx::query_as(
        "SELECT id, author, content, created_at FROM comments \
         WHERE post_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(post_id)
    .fetch_all(db)
    .await?)
}
