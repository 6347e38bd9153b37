pub mod inventory;
pub mod session;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(session::routes())
        .merge(inventory::routes())
}
