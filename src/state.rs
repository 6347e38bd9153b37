// src/state.rs
use std::sync::Arc;

use handlebars::Handlebars;
use sqlx::SqlitePool;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub templates: Arc<Handlebars<'static>>,
    pub session: Arc<SessionSettings>,
}

/// Signing material for session tokens.
pub struct SessionSettings {
    pub jwt_secret: String,
    pub ttl_hours: i64,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, templates: Handlebars<'static>, config: &AppConfig) -> Self {
        Self {
            db_pool,
            templates: Arc::new(templates),
            session: Arc::new(SessionSettings {
                jwt_secret: config.jwt_secret.clone(),
                ttl_hours: config.session_hours,
            }),
        }
    }
}
