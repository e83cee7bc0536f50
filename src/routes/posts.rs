use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::store::posts::{self, NewPost, PostFilter};
use crate::store::comments;
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    category: Option<String>,
    tag: Option<String>,
    search: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

#[derive(Deserialize)]
pub struct PostForm {
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct CommentForm {
    author: Option<String>,
    content: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/{id}", get(get_post).delete(delete_post))
        .route("/api/posts/{id}/like", post(like_post))
        .route("/api/posts/{id}/comments", post(create_comment))
        .route("/api/search", get(search_posts))
}

async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = PostFilter {
        category: query.category,
        tag: query.tag,
        search: query.search,
    };
    let posts = posts::list_posts(&state.db, &filter).await?;
    Ok(Json(posts))
}

async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = PostFilter {
        search: Some(query.q.unwrap_or_default()),
        ..PostFilter::default()
    };
    let posts = posts::list_posts(&state.db, &filter).await?;
    Ok(Json(posts))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let post = posts::get_post(&state.db, id).await?;
    Ok(Json(post))
}

async fn create_post(
    State(state): State<AppState>,
    Json(form): Json<PostForm>,
) -> Result<impl IntoResponse, AppError> {
    let new = NewPost {
        title: form.title.unwrap_or_default(),
        content: form.content.unwrap_or_default(),
        category: form.category,
        tags: form.tags,
    };
    let post = posts::create_post(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    posts::delete_post(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let likes = posts::increment_likes(&state.db, id).await?;
    Ok(Json(json!({ "likes": likes })))
}

async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<CommentForm>,
) -> Result<impl IntoResponse, AppError> {
    let comment = comments::create_comment(
        &state.db,
        id,
        form.author.as_deref().unwrap_or(""),
        form.content.as_deref().unwrap_or(""),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
