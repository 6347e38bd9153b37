pub mod catalog;
pub mod form;
pub mod product;
pub mod session;
pub mod subcategory;
