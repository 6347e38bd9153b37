// src/models/entity.rs
//! Registry of the inventory entities.
//!
//! Everything route-, permission- and message-related that differs between
//! entities is looked up here instead of being repeated in every handler.
use std::fmt;

/// Application label used as the prefix of permission codenames.
pub const APP_LABEL: &str = "inventory";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Category,
    SubCategory,
    Brand,
    UnitOfMeasure,
    Product,
}

/// How rows leave the active inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPolicy {
    /// Row is removed, dependents cascade.
    Hard,
    /// Row stays, `estado` is cleared.
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Add,
    Change,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Add => "add",
            Action::Change => "change",
            Action::Delete => "delete",
        }
    }
}

/// A named grant such as `inventory.change_brand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission {
    pub action: Action,
    pub entity: Entity,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}_{}", APP_LABEL, self.action.as_str(), self.entity.model_name())
    }
}

impl Entity {
    pub const ALL: [Entity; 5] = [
        Entity::Category,
        Entity::SubCategory,
        Entity::Brand,
        Entity::UnitOfMeasure,
        Entity::Product,
    ];

    /// Lower-case model name used in permission codenames.
    pub fn model_name(self) -> &'static str {
        match self {
            Entity::Category => "category",
            Entity::SubCategory => "subcategory",
            Entity::Brand => "brand",
            Entity::UnitOfMeasure => "unitofmeasure",
            Entity::Product => "product",
        }
    }

    /// Path segment under `/inventory`.
    pub fn slug(self) -> &'static str {
        match self {
            Entity::Category => "categories",
            Entity::SubCategory => "subcategories",
            Entity::Brand => "brands",
            Entity::UnitOfMeasure => "units",
            Entity::Product => "products",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Entity::Category => "categories",
            Entity::SubCategory => "subcategories",
            Entity::Brand => "brands",
            Entity::UnitOfMeasure => "units_of_measure",
            Entity::Product => "products",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Entity::Category => "Category",
            Entity::SubCategory => "Sub-category",
            Entity::Brand => "Brand",
            Entity::UnitOfMeasure => "Unit of measure",
            Entity::Product => "Product",
        }
    }

    pub fn plural_label(self) -> &'static str {
        match self {
            Entity::Category => "Categories",
            Entity::SubCategory => "Sub-categories",
            Entity::Brand => "Brands",
            Entity::UnitOfMeasure => "Units of measure",
            Entity::Product => "Products",
        }
    }

    pub fn deletion_policy(self) -> DeletionPolicy {
        match self {
            Entity::Category | Entity::SubCategory => DeletionPolicy::Hard,
            Entity::Brand | Entity::UnitOfMeasure | Entity::Product => DeletionPolicy::Soft,
        }
    }

    pub fn permission(self, action: Action) -> Permission {
        Permission { action, entity: self }
    }

    /// Permission guarding the removal endpoint: deactivation is an edit.
    pub fn removal_permission(self) -> Permission {
        match self.deletion_policy() {
            DeletionPolicy::Hard => self.permission(Action::Delete),
            DeletionPolicy::Soft => self.permission(Action::Change),
        }
    }

    /// Trailing path segment of the removal endpoint.
    pub fn removal_segment(self) -> &'static str {
        match self.deletion_policy() {
            DeletionPolicy::Hard => "delete",
            DeletionPolicy::Soft => "deactivate",
        }
    }

    pub fn list_path(self) -> String {
        format!("/inventory/{}/", self.slug())
    }

    pub fn new_path(self) -> String {
        format!("/inventory/{}/new/", self.slug())
    }

    pub fn edit_path(self, id: i64) -> String {
        format!("/inventory/{}/{}/edit/", self.slug(), id)
    }

    pub fn removal_path(self, id: i64) -> String {
        format!("/inventory/{}/{}/{}/", self.slug(), id, self.removal_segment())
    }

    pub fn created_message(self) -> String {
        format!("{} created successfully", self.label())
    }

    pub fn updated_message(self) -> String {
        format!("{} updated successfully", self.label())
    }

    pub fn removed_message(self) -> String {
        match self.deletion_policy() {
            DeletionPolicy::Hard => format!("{} deleted successfully", self.label()),
            DeletionPolicy::Soft => format!("{} deactivated", self.label()),
        }
    }

    pub fn not_found_message(self) -> String {
        format!("{} not found", self.label())
    }
}
