// src/handlers/subcategory.rs
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

use super::{choices, is_unique_violation, options, row_exists, INVALID_CHOICE};
use crate::dtos::form::{parse_estado, FieldErrors, NON_FIELD};
use crate::dtos::subcategory::{SubCategoryForm, SubCategoryInput};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::entity::Entity;
use crate::models::subcategory::{SubCategory, SELECT_SUBCATEGORY};
use crate::state::AppState;
use crate::templates;
use crate::web::page::{form_invalid, found_with_flash, render, render_with_messages};

const ENTITY: Entity = Entity::SubCategory;

async fn find(pool: &SqlitePool, id: i64) -> Result<Option<SubCategory>, sqlx::Error> {
    sqlx::query_as::<_, SubCategory>(&format!("{SELECT_SUBCATEGORY} WHERE s.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

fn duplicate() -> FieldErrors {
    FieldErrors::single(
        NON_FIELD,
        "Sub-category with this Category and Description already exists.",
    )
}

/// Reference and uniqueness checks that need the database.
async fn check(pool: &SqlitePool, input: &SubCategoryInput, exclude_id: Option<i64>) -> Result<FieldErrors, sqlx::Error> {
    let mut errors = FieldErrors::default();
    if !row_exists(pool, Entity::Category.table(), input.category_id).await? {
        errors.add("category_id", INVALID_CHOICE);
        return Ok(errors);
    }

    let taken = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM subcategories
         WHERE category_id = ? AND description = ? AND (? IS NULL OR id <> ?)",
    )
    .bind(input.category_id)
    .bind(&input.description)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    if taken > 0 {
        errors = duplicate();
    }
    Ok(errors)
}

async fn form_context(
    state: &AppState,
    user: &AuthContext,
    title: &str,
    action: String,
    form: &SubCategoryForm,
) -> Result<Value, AppError> {
    let categories = choices(&state.db_pool, Entity::Category.table()).await?;
    Ok(json!({
        "page_title": title,
        "user": user.username,
        "action": action,
        "form": form,
        "active": parse_estado(&form.estado),
        "categories": options(&categories, &form.category_id),
        "list_path": ENTITY.list_path(),
    }))
}

/// Re-renders the form with `errors`, or answers an AJAX caller with them.
async fn rejected(
    state: &AppState,
    user: &AuthContext,
    headers: &HeaderMap,
    (title, action): (&str, String),
    form: &SubCategoryForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    let context = form_context(state, user, title, action, form).await?;
    form_invalid(state, headers, templates::SUBCATEGORY_FORM, context, errors)
}

// GET /inventory/subcategories/ - List all sub-categories
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let rows = sqlx::query_as::<_, SubCategory>(&format!("{SELECT_SUBCATEGORY} ORDER BY s.id"))
        .fetch_all(&state.db_pool)
        .await?;

    let rows: Vec<Value> = rows
        .iter()
        .map(|row| {
            json!({
                "id": row.id,
                "category_description": row.category_description,
                "description": row.description,
                "estado": row.estado,
                "edit_path": ENTITY.edit_path(row.id),
                "removal_path": ENTITY.removal_path(row.id),
            })
        })
        .collect();

    let context = json!({
        "page_title": ENTITY.plural_label(),
        "user": user.username,
        "new_path": ENTITY.new_path(),
        "rows": rows,
    });
    render_with_messages(&state, &headers, templates::SUBCATEGORY_LIST, context)
}

// GET /inventory/subcategories/new/ - Empty form
pub async fn new_form(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
) -> Result<Response, AppError> {
    let context = form_context(&state, &user, "New sub-category", ENTITY.new_path(), &SubCategoryForm::default()).await?;
    render(&state, templates::SUBCATEGORY_FORM, &context)
}

// POST /inventory/subcategories/new/ - Create sub-category
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
    headers: HeaderMap,
    Form(form): Form<SubCategoryForm>,
) -> Result<Response, AppError> {
    let page = ("New sub-category", ENTITY.new_path());
    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => return rejected(&state, &user, &headers, page, &form, errors).await,
    };
    let errors = check(&state.db_pool, &input, None).await?;
    if !errors.is_empty() {
        return rejected(&state, &user, &headers, page, &form, errors).await;
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO subcategories (category_id, description, estado, created_by, created_at)
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(input.category_id)
    .bind(&input.description)
    .bind(input.estado)
    .bind(user.user_id)
    .bind(Utc::now())
    .fetch_one(&state.db_pool)
    .await;

    let id = match id {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            return rejected(&state, &user, &headers, page, &form, duplicate()).await;
        }
        Err(e) => return Err(e.into()),
    };

    info!(id, category_id = input.category_id, user = %user.username, "Created subcategory");
    Ok(found_with_flash(&ENTITY.list_path(), &ENTITY.created_message()))
}

// GET /inventory/subcategories/{id}/edit/ - Form with current values
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let row = find(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY.not_found_message()))?;

    let context = form_context(&state, &user, "Edit sub-category", ENTITY.edit_path(id), &SubCategoryForm::from(&row)).await?;
    render(&state, templates::SUBCATEGORY_FORM, &context)
}

// POST /inventory/subcategories/{id}/edit/ - Update sub-category
#[instrument(skip_all, fields(id = id))]
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<SubCategoryForm>,
) -> Result<Response, AppError> {
    if find(&state.db_pool, id).await?.is_none() {
        return Err(AppError::not_found(ENTITY.not_found_message()));
    }
    let page = ("Edit sub-category", ENTITY.edit_path(id));

    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => return rejected(&state, &user, &headers, page, &form, errors).await,
    };
    let errors = check(&state.db_pool, &input, Some(id)).await?;
    if !errors.is_empty() {
        return rejected(&state, &user, &headers, page, &form, errors).await;
    }

    let result = sqlx::query(
        "UPDATE subcategories
         SET category_id = ?, description = ?, estado = ?, updated_by = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(input.category_id)
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
            return rejected(&state, &user, &headers, page, &form, duplicate()).await;
        }
        Err(e) => return Err(e.into()),
    }

    info!(id, user = %user.username, "Updated subcategory");
    Ok(found_with_flash(&ENTITY.list_path(), &ENTITY.updated_message()))
}
