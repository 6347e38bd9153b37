// src/handlers/product.rs
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    Extension, Form,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::{FromRow, SqlitePool};
use tracing::{info, instrument};

use super::{choices, is_unique_violation, options, row_exists, Choice, INVALID_CHOICE};
use crate::dtos::form::{parse_estado, FieldErrors, NON_FIELD};
use crate::dtos::product::{ProductForm, ProductInput};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::entity::Entity;
use crate::models::product::{Product, SELECT_PRODUCT};
use crate::state::AppState;
use crate::templates;
use crate::web::page::{form_invalid, found_with_flash, render, render_with_messages};

const ENTITY: Entity = Entity::Product;

#[derive(Debug, FromRow)]
struct SubCategoryChoice {
    id: i64,
    category_id: i64,
    description: String,
}

async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

const DUPLICATE_CODE: &str = "Product with this Code already exists.";
const DUPLICATE_PAIR: &str = "Product with this Code and Barcode already exists.";

async fn count_taken(
    pool: &SqlitePool,
    filter: &str,
    input: &ProductInput,
    with_barcode: bool,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM products WHERE {filter} AND (? IS NULL OR id <> ?)");
    let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(&input.code);
    if with_barcode {
        query = query.bind(&input.barcode);
    }
    let count = query.bind(exclude_id).bind(exclude_id).fetch_one(pool).await?;
    Ok(count > 0)
}

/// Code is unique on its own and, with the barcode, as a pair.
async fn uniqueness(pool: &SqlitePool, input: &ProductInput, exclude_id: Option<i64>) -> Result<FieldErrors, sqlx::Error> {
    let mut errors = FieldErrors::default();
    if count_taken(pool, "code = ?", input, false, exclude_id).await? {
        errors.add("code", DUPLICATE_CODE);
    }
    if count_taken(pool, "code = ? AND barcode = ?", input, true, exclude_id).await? {
        errors.add(NON_FIELD, DUPLICATE_PAIR);
    }
    Ok(errors)
}

/// Errors for a unique violation raised by the write itself.
async fn conflict(pool: &SqlitePool, input: &ProductInput, exclude_id: Option<i64>) -> Result<FieldErrors, sqlx::Error> {
    let errors = uniqueness(pool, input, exclude_id).await?;
    if errors.is_empty() {
        return Ok(FieldErrors::single("code", DUPLICATE_CODE));
    }
    Ok(errors)
}

/// Reference and uniqueness checks that need the database.
async fn check(pool: &SqlitePool, input: &ProductInput, exclude_id: Option<i64>) -> Result<FieldErrors, sqlx::Error> {
    let mut errors = FieldErrors::default();
    let references = [
        ("brand_id", Entity::Brand, input.brand_id),
        ("unit_id", Entity::UnitOfMeasure, input.unit_id),
        ("subcategory_id", Entity::SubCategory, input.subcategory_id),
    ];
    for (field, entity, id) in references {
        if !row_exists(pool, entity.table(), id).await? {
            errors.add(field, INVALID_CHOICE);
        }
    }
    if !errors.is_empty() {
        return Ok(errors);
    }
    uniqueness(pool, input, exclude_id).await
}

/// Form page context, including every category and sub-category so the
/// page can narrow the sub-category select to the chosen category.
async fn form_context(
    state: &AppState,
    user: &AuthContext,
    title: &str,
    action: String,
    form: &ProductForm,
) -> Result<Value, AppError> {
    let pool = &state.db_pool;
    let brands = choices(pool, Entity::Brand.table()).await?;
    let units = choices(pool, Entity::UnitOfMeasure.table()).await?;
    let categories: Vec<Choice> = choices(pool, Entity::Category.table()).await?;
    let subcategories = sqlx::query_as::<_, SubCategoryChoice>(
        "SELECT id, category_id, description FROM subcategories ORDER BY description",
    )
    .fetch_all(pool)
    .await?;

    let selected_sub = form.subcategory_id.trim();
    let selected_category = subcategories
        .iter()
        .find(|s| s.id.to_string() == selected_sub)
        .map(|s| s.category_id.to_string())
        .unwrap_or_default();

    let subcategories: Vec<Value> = subcategories
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "category_id": s.category_id,
                "description": s.description,
                "selected": s.id.to_string() == selected_sub,
            })
        })
        .collect();

    Ok(json!({
        "page_title": title,
        "user": user.username,
        "action": action,
        "form": form,
        "active": parse_estado(&form.estado),
        "brands": options(&brands, &form.brand_id),
        "units": options(&units, &form.unit_id),
        "categories": options(&categories, &selected_category),
        "subcategories": subcategories,
        "list_path": ENTITY.list_path(),
    }))
}

/// Re-renders the form with `errors`, or answers an AJAX caller with them.
async fn rejected(
    state: &AppState,
    user: &AuthContext,
    headers: &HeaderMap,
    (title, action): (&str, String),
    form: &ProductForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    let context = form_context(state, user, title, action, form).await?;
    form_invalid(state, headers, templates::PRODUCT_FORM, context, errors)
}

// GET /inventory/products/ - List all products
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let products = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} ORDER BY p.id"))
        .fetch_all(&state.db_pool)
        .await?;

    let rows: Vec<Value> = products
        .iter()
        .map(|p| {
            let mut row = json!(p);
            if let Some(map) = row.as_object_mut() {
                map.insert("edit_path".into(), json!(ENTITY.edit_path(p.id)));
                map.insert("removal_path".into(), json!(ENTITY.removal_path(p.id)));
            }
            row
        })
        .collect();

    let context = json!({
        "page_title": ENTITY.plural_label(),
        "user": user.username,
        "new_path": ENTITY.new_path(),
        "rows": rows,
    });
    render_with_messages(&state, &headers, templates::PRODUCT_LIST, context)
}

// GET /inventory/products/new/ - Empty form
pub async fn new_form(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
) -> Result<Response, AppError> {
    let form = ProductForm { price: "0".into(), stock: "0".into(), ..ProductForm::default() };
    let context = form_context(&state, &user, "New product", ENTITY.new_path(), &form).await?;
    render(&state, templates::PRODUCT_FORM, &context)
}

// POST /inventory/products/new/ - Create product
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let page = ("New product", ENTITY.new_path());
    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => return rejected(&state, &user, &headers, page, &form, errors).await,
    };
    let errors = check(&state.db_pool, &input, None).await?;
    if !errors.is_empty() {
        return rejected(&state, &user, &headers, page, &form, errors).await;
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (code, barcode, description, price, stock, last_purchase,
                               brand_id, unit_id, subcategory_id, estado, created_by, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&input.code)
    .bind(&input.barcode)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.stock)
    .bind(input.last_purchase)
    .bind(input.brand_id)
    .bind(input.unit_id)
    .bind(input.subcategory_id)
    .bind(input.estado)
    .bind(user.user_id)
    .bind(Utc::now())
    .fetch_one(&state.db_pool)
    .await;

    let id = match id {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            let errors = conflict(&state.db_pool, &input, None).await?;
            return rejected(&state, &user, &headers, page, &form, errors).await;
        }
        Err(e) => return Err(e.into()),
    };

    info!(id, code = %input.code, user = %user.username, "Created product");
    Ok(found_with_flash(&ENTITY.list_path(), &ENTITY.created_message()))
}

// GET /inventory/products/{id}/edit/ - Form with current values
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let product = find(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY.not_found_message()))?;

    let mut context = form_context(&state, &user, "Edit product", ENTITY.edit_path(id), &ProductForm::from(&product)).await?;
    if let Some(map) = context.as_object_mut() {
        map.insert("obj".into(), json!(product));
    }
    render(&state, templates::PRODUCT_FORM, &context)
}

// POST /inventory/products/{id}/edit/ - Update product
#[instrument(skip_all, fields(id = id))]
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    if find(&state.db_pool, id).await?.is_none() {
        return Err(AppError::not_found(ENTITY.not_found_message()));
    }
    let page = ("Edit product", ENTITY.edit_path(id));

    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => return rejected(&state, &user, &headers, page, &form, errors).await,
    };
    let errors = check(&state.db_pool, &input, Some(id)).await?;
    if !errors.is_empty() {
        return rejected(&state, &user, &headers, page, &form, errors).await;
    }

    let result = sqlx::query(
        "UPDATE products
         SET code = ?, barcode = ?, description = ?, price = ?, stock = ?, last_purchase = ?,
             brand_id = ?, unit_id = ?, subcategory_id = ?, estado = ?, updated_by = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&input.code)
    .bind(&input.barcode)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.stock)
    .bind(input.last_purchase)
    .bind(input.brand_id)
    .bind(input.unit_id)
    .bind(input.subcategory_id)
    .bind(input.estado)
    .bind(user.user_id)
    .bind(Utc::now())
    .bind(id)
    .execute(&state.db_pool)
    .await;

    match result {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            let errors = conflict(&state.db_pool, &input, Some(id)).await?;
            return rejected(&state, &user, &headers, page, &form, errors).await;
        }
        Err(e) => return Err(e.into()),
    }

    info!(id, user = %user.username, "Updated product");
    Ok(found_with_flash(&ENTITY.list_path(), &ENTITY.updated_message()))
}
