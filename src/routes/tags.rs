use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::store::taxonomy;
use crate::AppState;

#[derive(Deserialize)]
pub struct TagForm {
    name: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/tags", get(list_tags).post(create_tag))
}

async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tags = taxonomy::list_tags(&state.db).await?;
    Ok(Json(tags))
}

async fn create_tag(
    State(state): State<AppState>,
    Json(form): Json<TagForm>,
) -> Result<impl IntoResponse, AppError> {
    let tag = taxonomy::create_tag(&state.db, form.name.as_deref().unwrap_or("")).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}
