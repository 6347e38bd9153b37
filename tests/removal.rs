mod common;

use axum::http::StatusCode;
use common::*;
use invapp::models::entity::Entity;

#[derive(Debug, PartialEq, sqlx::FromRow)]
struct BrandRow {
    id: i64,
    description: String,
    estado: bool,
    created_by: i64,
}

async fn brand(app: &TestApp, id: i64) -> BrandRow {
    sqlx::query_as::<_, BrandRow>("SELECT id, description, estado, created_by FROM brands WHERE id = ?")
        .bind(id)
        .fetch_one(app.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn deactivating_a_brand_keeps_the_row() {
    let app = setup_test_app().await;
    let id = insert_brand(app.pool(), "Acme", app.admin_id).await;
    insert_brand(app.pool(), "Globex", app.admin_id).await;
    let before = brand(&app, id).await;

    let path = Entity::Brand.removal_path(id);
    let response = app.send(get(&path, Some(&app.admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Acme"));

    let response = app.send(post_form(&path, Some(&app.admin), "")).await;
    assert_eq!(location(&response), "/inventory/brands/");
    assert!(set_cookie(&response, "flash").is_some());

    let after = brand(&app, id).await;
    assert!(!after.estado);
    assert_eq!(after, BrandRow { estado: false, ..before });
    assert_eq!(count(app.pool(), "brands").await, 2);
}

#[tokio::test]
async fn deactivating_missing_id_goes_back_to_list_untouched() {
    let app = setup_test_app().await;
    insert_brand(app.pool(), "Acme", app.admin_id).await;

    for entity in [Entity::Brand, Entity::UnitOfMeasure, Entity::Product] {
        let path = entity.removal_path(404);
        let response = app.send(get(&path, Some(&app.admin))).await;
        assert_eq!(location(&response), entity.list_path());

        let response = app.send(post_form(&path, Some(&app.admin), "")).await;
        assert_eq!(location(&response), entity.list_path());
        assert!(set_cookie(&response, "flash").is_none());
    }

    let active: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM brands WHERE estado = 1")
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn units_and_products_are_deactivated_not_deleted() {
    let app = setup_test_app().await;
    let refs = product_refs(&app).await;
    let product_id = insert_product(app.pool(), &refs, "P-1", "750", app.admin_id).await;

    let response = app
        .send(post_form(&Entity::Product.removal_path(product_id), Some(&app.admin), ""))
        .await;
    assert_eq!(location(&response), "/inventory/products/");

    let response = app
        .send(post_form(&Entity::UnitOfMeasure.removal_path(refs.unit_id), Some(&app.admin), ""))
        .await;
    assert_eq!(location(&response), "/inventory/units/");

    let product_active: bool = sqlx::query_scalar("SELECT estado FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_one(app.pool())
        .await
        .unwrap();
    let unit_active: bool = sqlx::query_scalar("SELECT estado FROM units_of_measure WHERE id = ?")
        .bind(refs.unit_id)
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert!(!product_active);
    assert!(!unit_active);
    assert_eq!(count(app.pool(), "products").await, 1);
    assert_eq!(count(app.pool(), "units_of_measure").await, 1);
}

#[tokio::test]
async fn soft_deleted_entities_have_no_delete_route() {
    let app = setup_test_app().await;
    let id = insert_brand(app.pool(), "Acme", app.admin_id).await;

    let response = app
        .send(post_form(&format!("/inventory/brands/{id}/delete/"), Some(&app.admin), ""))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(count(app.pool(), "brands").await, 1);
}
