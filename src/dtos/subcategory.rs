// src/dtos/subcategory.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::form::{parse_estado, parse_reference, FieldErrors};
use crate::models::subcategory::SubCategory;

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct SubCategoryForm {
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub description: String,
    #[serde(default)]
    pub estado: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubCategoryInput {
    pub category_id: i64,
    pub description: String,
    pub estado: bool,
}

impl SubCategoryForm {
    pub fn clean(&self) -> Result<SubCategoryInput, FieldErrors> {
        let trimmed = SubCategoryForm {
            category_id: self.category_id.clone(),
            description: self.description.trim().to_string(),
            estado: self.estado.clone(),
        };
        let mut errors = match trimmed.validate() {
            Ok(()) => FieldErrors::default(),
            Err(e) => e.into(),
        };
        errors.require_text("description", &trimmed.description);
        let category_id = parse_reference(&mut errors, "category_id", &trimmed.category_id);
        match category_id {
            Some(category_id) if errors.is_empty() => Ok(SubCategoryInput {
                category_id,
                description: trimmed.description,
                estado: parse_estado(&trimmed.estado),
            }),
            _ => Err(errors),
        }
    }
}

impl From<&SubCategory> for SubCategoryForm {
    fn from(row: &SubCategory) -> Self {
        Self {
            category_id: row.category_id.to_string(),
            description: row.description.clone(),
            estado: row.estado.to_string(),
        }
    }
}
