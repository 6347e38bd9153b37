// src/dtos/product.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::form::{
    parse_estado, parse_float_or_zero, parse_int_or_zero, parse_optional_date, parse_reference,
    FieldErrors,
};
use crate::models::product::Product;

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ProductForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub barcode: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub last_purchase: String,
    #[serde(default)]
    pub brand_id: String,
    #[serde(default)]
    pub unit_id: String,
    #[serde(default)]
    pub subcategory_id: String,
    #[serde(default)]
    pub estado: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub code: String,
    pub barcode: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub last_purchase: Option<NaiveDate>,
    pub brand_id: i64,
    pub unit_id: i64,
    pub subcategory_id: i64,
    pub estado: bool,
}

impl ProductForm {
    pub fn clean(&self) -> Result<ProductInput, FieldErrors> {
        let trimmed = ProductForm {
            code: self.code.trim().to_string(),
            barcode: self.barcode.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self.clone()
        };
        let mut errors = match trimmed.validate() {
            Ok(()) => FieldErrors::default(),
            Err(e) => e.into(),
        };
        errors.require_text("code", &trimmed.code);
        errors.require_text("barcode", &trimmed.barcode);
        errors.require_text("description", &trimmed.description);

        let price = parse_float_or_zero(&mut errors, "price", &trimmed.price);
        let stock = parse_int_or_zero(&mut errors, "stock", &trimmed.stock);
        let last_purchase = parse_optional_date(&mut errors, "last_purchase", &trimmed.last_purchase);
        let brand_id = parse_reference(&mut errors, "brand_id", &trimmed.brand_id);
        let unit_id = parse_reference(&mut errors, "unit_id", &trimmed.unit_id);
        let subcategory_id = parse_reference(&mut errors, "subcategory_id", &trimmed.subcategory_id);

        match (brand_id, unit_id, subcategory_id) {
            (Some(brand_id), Some(unit_id), Some(subcategory_id)) if errors.is_empty() => {
                Ok(ProductInput {
                    code: trimmed.code,
                    barcode: trimmed.barcode,
                    description: trimmed.description,
                    price,
                    stock,
                    last_purchase,
                    brand_id,
                    unit_id,
                    subcategory_id,
                    estado: parse_estado(&trimmed.estado),
                })
            }
            _ => Err(errors),
        }
    }
}

impl From<&Product> for ProductForm {
    fn from(row: &Product) -> Self {
        Self {
            code: row.code.clone(),
            barcode: row.barcode.clone(),
            description: row.description.clone(),
            price: row.price.to_string(),
            stock: row.stock.to_string(),
            last_purchase: row
                .last_purchase
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            brand_id: row.brand_id.to_string(),
            unit_id: row.unit_id.to_string(),
            subcategory_id: row.subcategory_id.to_string(),
            estado: row.estado.to_string(),
        }
    }
}
