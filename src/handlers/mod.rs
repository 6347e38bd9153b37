pub mod catalog;
pub mod product;
pub mod removal;
pub mod session;
pub mod subcategory;

use serde::Serialize;
use serde_json::{json, Value};
use sqlx::{FromRow, SqlitePool};

pub const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// A row offered in a `<select>`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Choice {
    pub id: i64,
    pub description: String,
}

pub async fn choices(pool: &SqlitePool, table: &str) -> Result<Vec<Choice>, sqlx::Error> {
    sqlx::query_as::<_, Choice>(&format!("SELECT id, description FROM {table} ORDER BY description"))
        .fetch_all(pool)
        .await
}

pub async fn row_exists(pool: &SqlitePool, table: &str, id: i64) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table} WHERE id = ?"))
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// `<option>` entries with the posted value marked as selected.
pub fn options(choices: &[Choice], selected: &str) -> Vec<Value> {
    choices
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "description": c.description,
                "selected": c.id.to_string() == selected.trim(),
            })
        })
        .collect()
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
