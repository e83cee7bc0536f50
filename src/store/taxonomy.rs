use sqlx::{SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::{Category, Tag};

/// Get-or-create a category by exact name, returning its id.
///
/// Runs as a single upsert so that two concurrent requests naming the same
/// new category converge on one row. The no-op DO UPDATE is what makes
/// RETURNING yield the existing id on conflict.
pub async fn resolve_category(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO categories (name) VALUES (?) \
         ON CONFLICT(name) DO UPDATE SET name = excluded.name \
         RETURNING id",
    )
    .bind(name)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Get-or-create a tag by exact name, returning its id.
pub async fn resolve_tag(conn: &mut SqliteConnection, name: &str) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO tags (name) VALUES (?) \
         ON CONFLICT(name) DO UPDATE SET name = excluded.name \
         RETURNING id",
    )
    .bind(name)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn create_category(db: &SqlitePool, name: &str) -> Result<Category, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    match sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES (?) RETURNING id, name")
        .bind(name)
        .fetch_one(db)
        .await
    {
        Ok(category) => Ok(category),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
            format!("category '{name}' already exists"),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn create_tag(db: &SqlitePool, name: &str) -> Result<Tag, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    match sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES (?) RETURNING id, name")
        .bind(name)
        .fetch_one(db)
        .await
    {
        Ok(tag) => Ok(tag),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(AppError::Conflict(format!("tag '{name}' already exists")))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list_categories(db: &SqlitePool) -> Result<Vec<Category>, AppError> {
    Ok(sqlx::query_as("SELECT id, name FROM categories")
        .fetch_all(db)
        .await?)
}

pub async fn list_tags(db: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    Ok(sqlx::query_as("SELECT id, name FROM tags")
        .fetch_all(db)
        .await?)
}
