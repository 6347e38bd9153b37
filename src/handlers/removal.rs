// src/handlers/removal.rs
//! Confirmation page and removal for every entity. What "removal" means is
//! decided by the entity's [`DeletionPolicy`].
use axum::{
    extract::{Path, State},
    response::Response,
    Extension,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use sqlx::{FromRow, SqlitePool};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::entity::{DeletionPolicy, Entity};
use crate::state::AppState;
use crate::templates;
use crate::web::page::{found, found_with_flash, render};

#[derive(Debug, FromRow, Serialize)]
struct Target {
    id: i64,
    description: String,
}

async fn find(pool: &SqlitePool, entity: Entity, id: i64) -> Result<Option<Target>, sqlx::Error> {
    sqlx::query_as::<_, Target>(&format!("SELECT id, description FROM {} WHERE id = ?", entity.table()))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// What to do when the id does not resolve: hard deletes are a 404,
/// deactivation just goes back to the list.
fn missing(entity: Entity) -> Result<Response, AppError> {
    match entity.deletion_policy() {
        DeletionPolicy::Hard => Err(AppError::not_found(entity.not_found_message())),
        DeletionPolicy::Soft => Ok(found(&entity.list_path())),
    }
}

// GET /inventory/{slug}/{id}/delete/ or /deactivate/ - Confirmation page
pub async fn confirm(
    State(state): State<AppState>,
    Extension(entity): Extension<Entity>,
    Extension(user): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let Some(target) = find(&state.db_pool, entity, id).await? else {
        return missing(entity);
    };

    let verb = match entity.deletion_policy() {
        DeletionPolicy::Hard => "Delete",
        DeletionPolicy::Soft => "Deactivate",
    };
    let context = json!({
        "page_title": format!("{verb} {}", entity.label()),
        "user": user.username,
        "obj": target,
        "verb": entity.removal_segment(),
        "action": entity.removal_path(id),
        "list_path": entity.list_path(),
    });
    render(&state, templates::CONFIRM_REMOVAL, &context)
}

// POST /inventory/{slug}/{id}/delete/ or /deactivate/ - Remove the row
#[instrument(skip_all, fields(entity = entity.model_name(), id = id))]
pub async fn remove(
    State(state): State<AppState>,
    Extension(entity): Extension<Entity>,
    Extension(user): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let result = match entity.deletion_policy() {
        // Dependent rows go with it through ON DELETE CASCADE.
        DeletionPolicy::Hard => {
            sqlx::query(&format!("DELETE FROM {} WHERE id = ?", entity.table()))
                .bind(id)
                .execute(&state.db_pool)
                .await?
        }
        DeletionPolicy::Soft => {
            sqlx::query(&format!("UPDATE {} SET estado = 0, updated_at = ? WHERE id = ?", entity.table()))
                .bind(Utc::now())
                .bind(id)
                .execute(&state.db_pool)
                .await?
        }
    };

    if result.rows_affected() == 0 {
        return missing(entity);
    }

    info!(user = %user.username, "Removed {} ({:?})", entity.model_name(), entity.deletion_policy());
    Ok(found_with_flash(&entity.list_path(), &entity.removed_message()))
}
