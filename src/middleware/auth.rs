// src/middleware/auth.rs
use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{OriginalUri, Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::accounts;
use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::models::entity::Permission;
use crate::state::AppState;
use crate::web::cookies::{self, SESSION_COOKIE};
use crate::web::page::found;
use crate::web::{LOGIN_PATH, NO_PRIVILEGES_PATH};

/// The authenticated caller, handed to every guarded handler.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub is_superuser: bool,
    pub permissions: Arc<HashSet<String>>,
}

impl AuthContext {
    pub fn has_perm(&self, permission: Permission) -> bool {
        self.is_superuser || self.permissions.contains(&permission.to_string())
    }
}

/// Who is calling, as resolved from the session token.
#[derive(Clone, Debug)]
pub enum Identity {
    Anonymous,
    User(AuthContext),
}

/// Session token from `Authorization: Bearer` or the session cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);
    bearer.or_else(|| cookies::get(headers, SESSION_COOKIE))
}

async fn load_identity(state: &AppState, token: &str) -> Result<Identity, AppError> {
    let claims = match verify_token(token, &state.session.jwt_secret) {
        Ok(c) => c,
        Err(_) => return Ok(Identity::Anonymous),
    };

    let Some(user) = accounts::find_active_user(&state.db_pool, claims.sub).await? else {
        debug!(user_id = claims.sub, "Session token for unknown or inactive user");
        return Ok(Identity::Anonymous);
    };
    let permissions = accounts::permissions_for(&state.db_pool, user.id).await?;

    Ok(Identity::User(AuthContext {
        user_id: user.id,
        username: user.username,
        is_superuser: user.is_superuser,
        permissions: Arc::new(permissions),
    }))
}

/// Resolves the caller once per request and stores it as an [`Identity`]
/// extension. Never rejects; the route guards decide what anonymous
/// callers may reach.
pub async fn resolve_identity(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let identity = match session_token(req.headers()) {
        Some(token) => match load_identity(&state, &token).await {
            Ok(identity) => identity,
            Err(e) => return e.into_response(),
        },
        None => Identity::Anonymous,
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Wraps `route` so only callers holding `permission` reach it.
pub fn require<S>(permission: Permission, route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn(move |req: Request, next: Next| {
        enforce(Some(permission), req, next)
    }))
}

/// Wraps `route` so only authenticated callers reach it.
pub fn require_login<S>(route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn(|req: Request, next: Next| enforce(None, req, next)))
}

async fn enforce(permission: Option<Permission>, mut req: Request, next: Next) -> Response {
    let identity = req
        .extensions()
        .get::<Identity>()
        .cloned()
        .unwrap_or(Identity::Anonymous);

    let user = match identity {
        Identity::Anonymous => return login_redirect(&req),
        Identity::User(user) => user,
    };

    if let Some(permission) = permission {
        if !user.has_perm(permission) {
            warn!(user = %user.username, %permission, path = %req.uri().path(), "Permission denied");
            return found(NO_PRIVILEGES_PATH);
        }
    }

    req.extensions_mut().insert(user);
    next.run(req).await
}

fn login_redirect(req: &Request) -> Response {
    // Nested routers strip their prefix from `uri()`; the original keeps it.
    let uri = req
        .extensions()
        .get::<OriginalUri>()
        .map(|o| &o.0)
        .unwrap_or_else(|| req.uri());
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    found(&login_url(target))
}

pub fn login_url(redirect_to: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect_to", redirect_to)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}
