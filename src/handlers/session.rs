// src/handlers/session.rs
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::Response,
    Extension, Form,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::accounts;
use crate::auth::jwt::sign_token;
use crate::auth::password::verify_password;
use crate::dtos::form::{FieldErrors, NON_FIELD};
use crate::dtos::session::{LoginForm, LoginQuery};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;
use crate::templates;
use crate::web::cookies::{self, SESSION_COOKIE};
use crate::web::page::{found, render, render_with_messages};
use crate::web::{HOME_PATH, LOGIN_PATH};

const BAD_CREDENTIALS: &str = "Please enter a correct username and password.";

/// Only local absolute paths are followed after login. Browsers drop tabs
/// and newlines and read `\` as `/`, so `/\t/host` would leave the site.
pub fn safe_redirect(target: &str) -> &str {
    let mut chars = target.chars();
    let local = chars.next() == Some('/')
        && !matches!(chars.next(), Some('/' | '\\'))
        && !target.contains('\\')
        && !target.chars().any(|c| c.is_control() || c.is_whitespace());
    if local {
        target
    } else {
        HOME_PATH
    }
}

// GET /login/ - Login form
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Response, AppError> {
    let form = LoginForm { redirect_to: query.redirect_to, ..LoginForm::default() };
    render(&state, templates::LOGIN, &json!({ "page_title": "Log in", "form": form }))
}

// POST /login/ - Verify credentials and start a session
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = accounts::find_by_username(&state.db_pool, form.username.trim()).await?;

    let authenticated = match &user {
        Some(u) if u.is_active => verify_password(&form.password, &u.password_hash)?,
        _ => false,
    };
    let user = match user {
        Some(user) if authenticated => user,
        _ => {
            warn!("Failed login attempt");
            let errors = FieldErrors::single(NON_FIELD, BAD_CREDENTIALS);
            let context = json!({ "page_title": "Log in", "form": form, "errors": errors });
            return render(&state, templates::LOGIN, &context);
        }
    };

    let token = sign_token(user.id, &user.username, &state.session.jwt_secret, state.session.ttl_hours)?;
    let mut response = found(safe_redirect(&form.redirect_to));
    if let Some(cookie) = cookies::set(SESSION_COOKIE, &token, state.session.ttl_hours * 3600) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    info!(user_id = user.id, "User logged in");
    Ok(response)
}

// GET|POST /logout/ - End the session
pub async fn logout() -> Response {
    let mut response = found(LOGIN_PATH);
    if let Some(cookie) = cookies::clear(SESSION_COOKIE) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

// GET / - Home page
pub async fn home(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let context = json!({ "page_title": "Home", "user": user.username });
    render_with_messages(&state, &headers, templates::HOME, context)
}

// GET /no-privileges/ - Shown when a signed-in user lacks a permission
pub async fn no_privileges(
    State(state): State<AppState>,
    Extension(user): Extension<AuthContext>,
) -> Result<Response, AppError> {
    let context = json!({ "page_title": "Insufficient privileges", "user": user.username });
    render(&state, templates::NO_PRIVILEGES, &context)
}

pub async fn health_check() -> &'static str {
    "OK"
}
