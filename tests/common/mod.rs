//! Common test utilities and helpers
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use invapp::accounts::{self, NewUser};
use invapp::auth::jwt::sign_token;
use invapp::config::AppConfig;
use invapp::models::entity::Permission;
use invapp::state::AppState;

pub const JWT_SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    /// Superuser token.
    pub admin: String,
    pub admin_id: i64,
}

impl TestApp {
    pub fn pool(&self) -> &SqlitePool {
        &self.state.db_pool
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Creates a staff account holding exactly `permissions`, returns its token.
    pub async fn user_with(&self, username: &str, permissions: &[Permission]) -> String {
        let id = create_user(self.pool(), username, false).await;
        for permission in permissions {
            accounts::grant_permission(self.pool(), id, *permission).await.unwrap();
        }
        token_for(id, username)
    }
}

/// Setup test application backed by a private in-memory database
pub async fn setup_test_app() -> TestApp {
    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "JWT_SECRET" => Some(JWT_SECRET.to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .unwrap();

    let state = invapp::init_state(&config).await.unwrap();
    let router = invapp::build_app(state.clone());

    let admin_id = create_user(&state.db_pool, "admin", true).await;
    let admin = token_for(admin_id, "admin");

    TestApp { router, state, admin, admin_id }
}

pub async fn create_user(pool: &SqlitePool, username: &str, is_superuser: bool) -> i64 {
    let user = NewUser { username, password: "password123", is_superuser };
    accounts::create_user(pool, &user, 4).await.unwrap()
}

pub fn token_for(user_id: i64, username: &str) -> String {
    sign_token(user_id, username, JWT_SECRET, 1).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn ajax_post_form(uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_with_cookie(uri: &str, token: Option<&str>, cookie: &str) -> Request<Body> {
    let mut request = get(uri, token);
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::FOUND, "expected a redirect");
    response.headers()[header::LOCATION].to_str().unwrap().to_string()
}

/// `name=value` pair of the named `Set-Cookie` header, if present.
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_string)
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn insert_described(pool: &SqlitePool, table: &str, description: &str, user_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!(
        "INSERT INTO {table} (description, created_by, created_at) VALUES (?, ?, ?) RETURNING id"
    ))
    .bind(description)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_category(pool: &SqlitePool, description: &str, user_id: i64) -> i64 {
    insert_described(pool, "categories", description, user_id).await
}

pub async fn insert_brand(pool: &SqlitePool, description: &str, user_id: i64) -> i64 {
    insert_described(pool, "brands", description, user_id).await
}

pub async fn insert_unit(pool: &SqlitePool, description: &str, user_id: i64) -> i64 {
    insert_described(pool, "units_of_measure", description, user_id).await
}

pub async fn insert_subcategory(pool: &SqlitePool, category_id: i64, description: &str, user_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO subcategories (category_id, description, created_by, created_at)
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(category_id)
    .bind(description)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub struct ProductRefs {
    pub brand_id: i64,
    pub unit_id: i64,
    pub category_id: i64,
    pub subcategory_id: i64,
}

/// One brand, unit, category and sub-category to hang products on.
pub async fn product_refs(app: &TestApp) -> ProductRefs {
    let pool = app.pool();
    let brand_id = insert_brand(pool, "Acme", app.admin_id).await;
    let unit_id = insert_unit(pool, "Bottle", app.admin_id).await;
    let category_id = insert_category(pool, "Beverages", app.admin_id).await;
    let subcategory_id = insert_subcategory(pool, category_id, "Water", app.admin_id).await;
    ProductRefs { brand_id, unit_id, category_id, subcategory_id }
}

pub async fn insert_product(pool: &SqlitePool, refs: &ProductRefs, code: &str, barcode: &str, user_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (code, barcode, description, brand_id, unit_id, subcategory_id,
                               created_by, created_at)
         VALUES (?, ?, 'Sample product', ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(code)
    .bind(barcode)
    .bind(refs.brand_id)
    .bind(refs.unit_id)
    .bind(refs.subcategory_id)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}
