// src/models/catalog.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Row shape shared by the description-only entities: categories, brands
/// and units of measure.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogRow {
    pub id: i64,
    pub description: String,
    pub estado: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}
