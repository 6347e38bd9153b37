mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::Value;

fn product_body(refs: &ProductRefs, code: &str, barcode: &str) -> String {
    format!(
        "code={code}&barcode={barcode}&description=Still+water&price=10.5&stock=3\
         &last_purchase=2024-05-01&brand_id={}&unit_id={}&subcategory_id={}&estado=true",
        refs.brand_id, refs.unit_id, refs.subcategory_id
    )
}

#[tokio::test]
async fn create_persists_all_fields() {
    let app = setup_test_app().await;
    let refs = product_refs(&app).await;

    let response = app
        .send(post_form("/inventory/products/new/", Some(&app.admin), &product_body(&refs, "P-1", "750")))
        .await;
    assert_eq!(location(&response), "/inventory/products/");

    let (price, stock, last_purchase, created_by): (f64, i64, Option<String>, i64) = sqlx::query_as(
        "SELECT price, stock, last_purchase, created_by FROM products WHERE code = 'P-1'",
    )
    .fetch_one(app.pool())
    .await
    .unwrap();
    assert_eq!(price, 10.5);
    assert_eq!(stock, 3);
    assert_eq!(last_purchase.as_deref(), Some("2024-05-01"));
    assert_eq!(created_by, app.admin_id);
}

#[tokio::test]
async fn duplicate_code_and_barcode_is_rejected() {
    let app = setup_test_app().await;
    let refs = product_refs(&app).await;
    insert_product(app.pool(), &refs, "P-1", "750", app.admin_id).await;

    let response = app
        .send(ajax_post_form("/inventory/products/new/", &app.admin, &product_body(&refs, "P-1", "750")))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["__all__"][0].as_str().unwrap().contains("Code and Barcode"));
    assert!(body["code"][0].as_str().unwrap().contains("already exists"));
    assert_eq!(count(app.pool(), "products").await, 1);
}

#[tokio::test]
async fn code_is_unique_on_its_own() {
    let app = setup_test_app().await;
    let refs = product_refs(&app).await;
    insert_product(app.pool(), &refs, "P-1", "750", app.admin_id).await;

    let response = app
        .send(ajax_post_form("/inventory/products/new/", &app.admin, &product_body(&refs, "P-1", "751")))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["code"][0], "Product with this Code already exists.");
    assert!(body.get("__all__").is_none());
    assert_eq!(count(app.pool(), "products").await, 1);

    // A shared barcode is fine.
    let response = app
        .send(post_form("/inventory/products/new/", Some(&app.admin), &product_body(&refs, "P-2", "750")))
        .await;
    assert_eq!(location(&response), "/inventory/products/");
    assert_eq!(count(app.pool(), "products").await, 2);
}

#[tokio::test]
async fn editing_onto_another_products_code_is_rejected() {
    let app = setup_test_app().await;
    let refs = product_refs(&app).await;
    insert_product(app.pool(), &refs, "P-1", "750", app.admin_id).await;
    let id = insert_product(app.pool(), &refs, "P-2", "751", app.admin_id).await;

    let response = app
        .send(post_form(
            &format!("/inventory/products/{id}/edit/"),
            Some(&app.admin),
            &product_body(&refs, "P-1", "751"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Product with this Code already exists."));

    let code: String = sqlx::query_scalar("SELECT code FROM products WHERE id = ?")
        .bind(id)
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(code, "P-2");
}

#[tokio::test]
async fn missing_references_are_reported_per_field() {
    let app = setup_test_app().await;

    let response = app
        .send(ajax_post_form(
            "/inventory/products/new/",
            &app.admin,
            "code=P-1&barcode=750&description=Water&brand_id=1&unit_id=1&subcategory_id=",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["subcategory_id"][0], "This field is required.");

    let response = app
        .send(ajax_post_form(
            "/inventory/products/new/",
            &app.admin,
            "code=P-1&barcode=750&description=Water&brand_id=1&unit_id=1&subcategory_id=1",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    for field in ["brand_id", "unit_id", "subcategory_id"] {
        assert!(body[field][0].as_str().unwrap().starts_with("Select a valid choice"), "{field}");
    }
}

#[tokio::test]
async fn create_form_offers_categories_and_subcategories() {
    let app = setup_test_app().await;
    let refs = product_refs(&app).await;

    let response = app.send(get("/inventory/products/new/", Some(&app.admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Beverages"));
    assert!(html.contains(&format!("data-category=\"{}\"", refs.category_id)));
    assert!(html.contains("Acme"));
    assert!(html.contains("Bottle"));
}

#[tokio::test]
async fn edit_preselects_current_values_and_updates() {
    let app = setup_test_app().await;
    let refs = product_refs(&app).await;
    let id = insert_product(app.pool(), &refs, "P-1", "750", app.admin_id).await;

    let response = app.send(get(&format!("/inventory/products/{id}/edit/"), Some(&app.admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("value=\"P-1\""));
    assert!(html.contains(&format!("<option value=\"{}\" selected>Beverages", refs.category_id)));

    let response = app
        .send(post_form(
            &format!("/inventory/products/{id}/edit/"),
            Some(&app.admin),
            &product_body(&refs, "P-2", "750"),
        ))
        .await;
    assert_eq!(location(&response), "/inventory/products/");

    let (code, updated_by): (String, Option<i64>) =
        sqlx::query_as("SELECT code, updated_by FROM products WHERE id = ?")
            .bind(id)
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(code, "P-2");
    assert_eq!(updated_by, Some(app.admin_id));
}

#[tokio::test]
async fn edit_of_missing_product_is_not_found() {
    let app = setup_test_app().await;
    let response = app.send(get("/inventory/products/5/edit/", Some(&app.admin))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_shows_related_descriptions() {
    let app = setup_test_app().await;
    let refs = product_refs(&app).await;
    insert_product(app.pool(), &refs, "P-1", "750", app.admin_id).await;

    let response = app.send(get("/inventory/products/", Some(&app.admin))).await;
    let html = body_string(response).await;
    for text in ["P-1", "750", "Acme", "Bottle", "Water"] {
        assert!(html.contains(text), "{text}");
    }
}
