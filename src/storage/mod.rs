pub mod catalog;
pub mod json_backend;
pub mod table;

use crate::errors::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

pub use catalog::{Catalog, CatalogData};
pub use json_backend::JsonStorage;
pub use table::Table;
