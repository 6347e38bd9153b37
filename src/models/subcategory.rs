// src/models/subcategory.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubCategory {
    pub id: i64,
    pub category_id: i64,
    pub category_description: String,
    pub description: String,
    pub estado: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const SELECT_SUBCATEGORY: &str = "SELECT s.id, s.category_id, c.description AS category_description,
        s.description, s.estado, s.created_by, s.created_at, s.updated_by, s.updated_at
 FROM subcategories s
 JOIN categories c ON c.id = s.category_id";
