use axum::{
    extract::State,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use crate::auth::{hash_password, login_user, logout_user, verify_password};
use crate::error::AppError;
use crate::models::User;
use crate::AppState;

#[derive(Deserialize)]
pub struct CredentialsForm {
    username: Option<String>,
    password: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
}

async fn register(
    State(state): State<AppState>,
    Json(form): Json<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    let username = form.username.as_deref().unwrap_or("").trim();
    let password = form.password.as_deref().unwrap_or("");

    if username.is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    let password_hash = hash_password(password)?;
    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?) \
         RETURNING id, username, password_hash, created_at",
    )
    .bind(username)
    .bind(&password_hash)
    .bind(&now)
    .fetch_one(&state.db)
    .await;

    match result {
        Ok(user) => Ok(Json(user)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Validation(
            format!("username '{username}' is already taken"),
        )),
        Err(e) => Err(e.into()),
    }
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    let username = form.username.as_deref().unwrap_or("").trim();
    let password = form.password.as_deref().unwrap_or("");

    let user: Option<User> = sqlx::query_as(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(&state.db)
    .await?;

    let Some(user) = user else {
        return Err(AppError::Unauthorized);
    };
    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    login_user(&session, user.id).await?;
    Ok(Json(user))
}

async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    logout_user(&session).await?;
    Ok(Json(json!({ "ok": true })))
}
