pub mod catalog;
pub mod entity;
pub mod product;
pub mod subcategory;
pub mod user;
