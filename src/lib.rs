// src/lib.rs
pub mod accounts;
pub mod auth;
pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod templates;
pub mod web;

use axum::Router;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::middleware::auth::resolve_identity;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to apply migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("failed to compile templates: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("failed to create bootstrap account: {0}")]
    Account(#[from] AppError),
}

/// Opens the database, applies migrations, compiles templates and creates
/// the bootstrap superuser when one is configured.
pub async fn init_state(config: &AppConfig) -> Result<AppState, StartupError> {
    let db_pool = database::create_pool(&config.database_url).await?;
    database::run_migrations(&db_pool).await?;
    let templates = templates::build()?;

    if let Some(admin) = &config.admin {
        accounts::ensure_superuser(&db_pool, &admin.username, &admin.password, config.bcrypt_cost).await?;
    }

    Ok(AppState::new(db_pool, templates, config))
}

pub fn build_app(state: AppState) -> Router {
    routes::create_router()
        .layer(axum::middleware::from_fn_with_state(state.clone(), resolve_identity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
