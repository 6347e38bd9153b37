// src/models/product.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub code: String,
    pub barcode: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub last_purchase: Option<NaiveDate>,
    pub brand_id: i64,
    pub brand_description: String,
    pub unit_id: i64,
    pub unit_description: String,
    pub subcategory_id: i64,
    pub subcategory_description: String,
    pub category_id: i64,
    pub estado: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const SELECT_PRODUCT: &str = "SELECT p.id, p.code, p.barcode, p.description, p.price, p.stock,
        p.last_purchase, p.brand_id, b.description AS brand_description,
        p.unit_id, u.description AS unit_description,
        p.subcategory_id, s.description AS subcategory_description, s.category_id,
        p.estado, p.created_by, p.created_at, p.updated_by, p.updated_at
 FROM products p
 JOIN brands b ON b.id = p.brand_id
 JOIN units_of_measure u ON u.id = p.unit_id
 JOIN subcategories s ON s.id = p.subcategory_id";
