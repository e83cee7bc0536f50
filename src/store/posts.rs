use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;

use crate::error::AppError;
use crate::models::{Post, PostDetail};
use crate::store::{comments, taxonomy};

/// Optional listing predicates; present filters are ANDed together.
#[derive(Debug, Default)]
pub struct PostFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

const POST_SELECT: &str =
    "SELECT p.id, p.title, p.content, p.created_at, c.name AS category, p.likes \
     FROM posts p LEFT JOIN categories c ON c.id = p.category_id";

/// Escape `%`, `_` and `\` so the term matches as a literal substring, then
/// wrap it in wildcards for LIKE.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub async fn list_posts(db: &SqlitePool, filter: &PostFilter) -> Result<Vec<Post>, AppError> {
    // Precise-match policy: a present-but-empty search term yields nothing,
    // not everything.
    if filter.search.as_deref() == Some("") {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new(format!("{POST_SELECT} WHERE 1=1"));

    if let Some(category) = &filter.category {
        query.push(" AND c.name = ").push_bind(category.clone());
    }
    if let Some(tag) = &filter.tag {
        query
            .push(
                " AND EXISTS (SELECT 1 FROM post_tags pt \
                 JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.name = ",
            )
            .push_bind(tag.clone())
            .push(")");
    }
    if let Some(term) = &filter.search {
        let pattern = like_pattern(term);
        query
            .push(" AND (p.title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR p.content LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    query.push(" ORDER BY p.created_at DESC, p.id DESC");

    let mut posts: Vec<Post> = query.build_query_as().fetch_all(db).await?;

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    let mut tags = tags_for_posts(db, &ids).await?;
    for post in &mut posts {
        post.tags = tags.remove(&post.id).unwrap_or_default();
    }

    Ok(posts)
}

pub async fn get_post(db: &SqlitePool, id: i64) -> Result<PostDetail, AppError> {
    let post = fetch_post(db, id).await?.ok_or(AppError::NotFound)?;
    let comments = comments::for_post(db, id).await?;
    Ok(PostDetail { post, comments })
}

pub async fn create_post(db: &SqlitePool, new: NewPost) -> Result<Post, AppError> {
    if new.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if new.content.trim().is_empty() {
        return Err(AppError::Validation("content is required".to_string()));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let mut tx = db.begin().await?;

    let category_id = match new.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => Some(taxonomy::resolve_category(&mut tx, name).await?),
        None => None,
    };

    let (post_id,): (i64,) = sqlx::query_as(
        "INSERT INTO posts (title, content, category_id, created_at) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(&new.title)
    .bind(&new.content)
    .bind(category_id)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    // Blank tag entries are skipped; duplicate entries collapse onto the
    // same association row.
    for tag_name in new.tags.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let tag_id = taxonomy::resolve_tag(&mut tx, tag_name).await?;
        sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    fetch_post(db, post_id).await?.ok_or(AppError::NotFound)
}

pub async fn delete_post(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    // Comments and tag associations go with the post via ON DELETE CASCADE.
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Counter bump as a single UPDATE; no read-modify-write in Rust.
pub async fn increment_likes(db: &SqlitePool, id: i64) -> Result<i64, AppError> {
    let row: Option<(i64,)> =
        sqlx::query_as("UPDATE posts SET likes = likes + 1 WHERE id = ? RETURNING likes")
            .bind(id)
            .fetch_optional(db)
            .await?;

    row.map(|(likes,)| likes).ok_or(AppError::NotFound)
}

async fn fetch_post(db: &SqlitePool, id: i64) -> Result<Option<Post>, AppError> {
    let post: Option<Post> = sqlx::query_as(&format!("{POST_SELECT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;

    let Some(mut post) = post else {
        return Ok(None);
    };

    post.tags = tags_for_posts(db, &[post.id])
        .await?
        .remove(&post.id)
        .unwrap_or_default();

    Ok(Some(post))
}

async fn tags_for_posts(
    db: &SqlitePool,
    post_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT pt.post_id, t.name FROM post_tags pt \
         JOIN tags t ON t.id = pt.tag_id WHERE pt.post_id IN (",
    );
    let mut ids = query.separated(", ");
    for id in post_ids {
        ids.push_bind(*id);
    }
    query.push(")");

    let rows: Vec<(i64, String)> = query.build_query_as().fetch_all(db).await?;

    let mut by_post: HashMap<i64, Vec<String>> = HashMap::new();
    for (post_id, name) in rows {
        by_post.entry(post_id).or_default().push(name);
    }
    Ok(by_post)
}
