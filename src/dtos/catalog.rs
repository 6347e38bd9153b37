// src/dtos/catalog.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::form::{parse_estado, FieldErrors};
use crate::models::catalog::CatalogRow;

/// Form posted for categories, brands and units of measure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CatalogForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub description: String,
    #[serde(default)]
    pub estado: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogInput {
    pub description: String,
    pub estado: bool,
}

impl CatalogForm {
    pub fn clean(&self) -> Result<CatalogInput, FieldErrors> {
        let description = self.description.trim().to_string();
        let trimmed = CatalogForm { description, estado: self.estado.clone() };
        if let Err(e) = trimmed.validate() {
            let mut errors = FieldErrors::from(e);
            errors.require_text("description", &trimmed.description);
            return Err(errors);
        }
        Ok(CatalogInput {
            description: trimmed.description,
            estado: parse_estado(&trimmed.estado),
        })
    }
}

impl From<&CatalogRow> for CatalogForm {
    fn from(row: &CatalogRow) -> Self {
        Self {
            description: row.description.clone(),
            estado: row.estado.to_string(),
        }
    }
}
