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
pub struct CategoryForm {
    name: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/categories", get(list_categories).post(create_category))
}

async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = taxonomy::list_categories(&state.db).await?;
    Ok(Json(categories))
}

async fn create_category(
    State(state): State<AppState>,
    Json(form): Json<CategoryForm>,
) -> Result<impl IntoResponse, AppError> {
    let category =
        taxonomy::create_category(&state.db, form.name.as_deref().unwrap_or("")).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
