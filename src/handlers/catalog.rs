// src/handlers/catalog.rs
//! List, create and edit handlers for the description-only entities:
//! categories, brands and units of measure. The entity comes from the
//! router as an `Extension`.
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    Extension, Form,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::{info, instrument};

use super::is_unique_violation;
use crate::dtos::catalog::CatalogForm;
use crate::dtos::form::{parse_estado, FieldErrors};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::catalog::CatalogRow;
use crate::models::entity::Entity;
use crate::state::AppState;
use crate::templates;
use crate::web::page::{form_invalid, found_with_flash, render, render_with_messages};

async fn find(pool: &SqlitePool, entity: Entity, id: i64) -> Result<Option<CatalogRow>, sqlx::Error> {
    sqlx::query_as::<_, CatalogRow>(&format!(
        "SELECT id, description, estado, created_by, created_at, updated_by, updated_at
         FROM {} WHERE id = ?",
        entity.table()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

async fn description_taken(
    pool: &SqlitePool,
    entity: Entity,
    description: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {} WHERE description = ? AND (? IS NULL OR id <> ?)",
        entity.table()
    ))
    .bind(description)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

fn duplicate(entity: Entity) -> FieldErrors {
    FieldErrors::single(
        "description",
        format!("{} with this description already exists.", entity.label()),
    )
}

fn form_context(entity: Entity, user: &AuthContext, title: String, action: String, form: &CatalogForm) -> Value {
    json!({
        "page_title": title,
        "user": user.username,
        "label": entity.label(),
        "action": action,
        "form": form,
        "active": parse_estado(&form.estado),
        "list_path": entity.list_path(),
    })
}

// GET /inventory/{slug}/ - List all rows
#[instrument(skip_all, fields(entity = entity.model_name()))]
pub async fn list(
    State(state): State<AppState>,
    Extension(entity): Extension<Entity>,
    Extension(user): Extension<AuthContext>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let rows = sqlx::query_as::<_, CatalogRow>(&format!(
        "SELECT id, description, estado, created_by, created_at, updated_by, updated_at
         FROM {} ORDER BY id",
        entity.table()
    ))
    .fetch_all(&state.db_pool)
    .await?;

    let rows: Vec<Value> = rows
        .iter()
        .map(|row| {
            json!({
                "id": row.id,
                "description": row.description,
                "estado": row.estado,
                "edit_path": entity.edit_path(row.id),
                "removal_path": entity.removal_path(row.id),
            })
        })
        .collect();

    let context = json!({
        "page_title": entity.plural_label(),
        "user": user.username,
        "label": entity.label(),
        "new_path": entity.new_path(),
        "removal_label": if entity.removal_segment() == "delete" { "Delete" } else { "Deactivate" },
        "rows": rows,
    });
    render_with_messages(&state, &headers, templates::CATALOG_LIST, context)
}

// GET /inventory/{slug}/new/ - Empty form
pub async fn new_form(
    State(state): State<AppState>,
    Extension(entity): Extension<Entity>,
    Extension(user): Extension<AuthContext>,
) -> Result<Response, AppError> {
    let context = form_context(
        entity,
        &user,
        format!("New {}", entity.label()),
        entity.new_path(),
        &CatalogForm::default(),
    );
    render(&state, templates::CATALOG_FORM, &context)
}

// POST /inventory/{slug}/new/ - Create row
#[instrument(skip_all, fields(entity = entity.model_name()))]
pub async fn create(
    State(state): State<AppState>,
    Extension(entity): Extension<Entity>,
    Extension(user): Extension<AuthContext>,
    headers: HeaderMap,
    Form(form): Form<CatalogForm>,
) -> Result<Response, AppError> {
    let context = form_context(entity, &user, format!("New {}", entity.label()), entity.new_path(), &form);

    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => return form_invalid(&state, &headers, templates::CATALOG_FORM, context, errors),
    };
    if description_taken(&state.db_pool, entity, &input.description, None).await? {
        return form_invalid(&state, &headers, templates::CATALOG_FORM, context, duplicate(entity));
    }

    let id = sqlx::query_scalar::<_, i64>(&format!(
        "INSERT INTO {} (description, estado, created_by, created_at)
         VALUES (?, ?, ?, ?) RETURNING id",
        entity.table()
    ))
    .bind(&input.description)
    .bind(input.estado)
    .bind(user.user_id)
    .bind(Utc::now())
    .fetch_one(&state.db_pool)
    .await;

    let id = match id {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            return form_invalid(&state, &headers, templates::CATALOG_FORM, context, duplicate(entity));
        }
        Err(e) => return Err(e.into()),
    };

    info!(id, user = %user.username, "Created {}", entity.model_name());
    Ok(found_with_flash(&entity.list_path(), &entity.created_message()))
}

// GET /inventory/{slug}/{id}/edit/ - Form with current values
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(entity): Extension<Entity>,
    Extension(user): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let row = find(&state.db_pool, entity, id)
        .await?
        .ok_or_else(|| AppError::not_found(entity.not_found_message()))?;

    let context = form_context(
        entity,
        &user,
        format!("Edit {}", entity.label()),
        entity.edit_path(id),
        &CatalogForm::from(&row),
    );
    render(&state, templates::CATALOG_FORM, &context)
}

// POST /inventory/{slug}/{id}/edit/ - Update row
#[instrument(skip_all, fields(entity = entity.model_name()))]
pub async fn update(
    State(state): State<AppState>,
    Extension(entity): Extension<Entity>,
    Extension(user): Extension<AuthContext>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<CatalogForm>,
) -> Result<Response, AppError> {
    if find(&state.db_pool, entity, id).await?.is_none() {
        return Err(AppError::not_found(entity.not_found_message()));
    }
    let context = form_context(entity, &user, format!("Edit {}", entity.label()), entity.edit_path(id), &form);

    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => return form_invalid(&state, &headers, templates::CATALOG_FORM, context, errors),
    };
    if description_taken(&state.db_pool, entity, &input.description, Some(id)).await? {
        return form_invalid(&state, &headers, templates::CATALOG_FORM, context, duplicate(entity));
    }

    let result = sqlx::query(&format!(
        "UPDATE {} SET description = ?, estado = ?, updated_by = ?, updated_at = ? WHERE id = ?",
        entity.table()
    ))
    .bind(&input.description)
    .bind(input.estado)
    .bind(user.user_id)
    .bind(Utc::now())
    .bind(id)
    .execute(&state.db_pool)
    .await;

    match result {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return form_invalid(&state, &headers, templates::CATALOG_FORM, context, duplicate(entity));
        }
        Err(e) => return Err(e.into()),
    }

    info!(id, user = %user.username, "Updated {}", entity.model_name());
    Ok(found_with_flash(&entity.list_path(), &entity.updated_message()))
}
