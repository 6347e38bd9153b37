use axum::{routing::get, Router};
use crate::handlers::session::{health_check, home, login, login_page, logout, no_privileges};
use crate::middleware::auth::require_login;
use crate::state::AppState;
use crate::web::{HOME_PATH, LOGIN_PATH, LOGOUT_PATH, NO_PRIVILEGES_PATH};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route(LOGOUT_PATH, get(logout).post(logout))
        .route(HOME_PATH, require_login(get(home)))
        .route(NO_PRIVILEGES_PATH, require_login(get(no_privileges)))
        .route("/health", get(health_check))
}
