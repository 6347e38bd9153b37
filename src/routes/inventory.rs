use axum::{
    routing::{get, MethodRouter},
    Extension, Router,
};
use crate::handlers::{catalog, product, removal, subcategory};
use crate::middleware::auth::require;
use crate::models::entity::{Action, Entity};
use crate::state::AppState;

/// Every entity gets list, new and edit routes plus the removal route its
/// deletion policy calls for, each behind its own permission.
pub fn routes() -> Router<AppState> {
    Entity::ALL
        .into_iter()
        .fold(Router::new(), |router, entity| router.merge(entity_routes(entity)))
}

fn entity_routes(entity: Entity) -> Router<AppState> {
    let router = match entity {
        Entity::Category | Entity::Brand | Entity::UnitOfMeasure => crud(
            entity,
            get(catalog::list),
            get(catalog::new_form).post(catalog::create),
            get(catalog::edit_form).post(catalog::update),
        ),
        Entity::SubCategory => crud(
            entity,
            get(subcategory::list),
            get(subcategory::new_form).post(subcategory::create),
            get(subcategory::edit_form).post(subcategory::update),
        ),
        Entity::Product => crud(
            entity,
            get(product::list),
            get(product::new_form).post(product::create),
            get(product::edit_form).post(product::update),
        ),
    };

    let removal_path = format!("/inventory/{}/{{id}}/{}/", entity.slug(), entity.removal_segment());
    router
        .route(
            &removal_path,
            require(entity.removal_permission(), get(removal::confirm).post(removal::remove)),
        )
        .layer(Extension(entity))
}

fn crud(
    entity: Entity,
    list: MethodRouter<AppState>,
    create: MethodRouter<AppState>,
    edit: MethodRouter<AppState>,
) -> Router<AppState> {
    let base = format!("/inventory/{}", entity.slug());
    Router::new()
        .route(&format!("{base}/"), require(entity.permission(Action::View), list))
        .route(&format!("{base}/new/"), require(entity.permission(Action::Add), create))
        .route(&format!("{base}/{{id}}/edit/"), require(entity.permission(Action::Change), edit))
}
