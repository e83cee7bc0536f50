use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}
