mod builtin;
mod catalog;
mod error;
mod validation;

pub use builtin::builtin_tools;
pub use catalog::ToolCatalog;
pub use error::CatalogError;
pub use validation::{ValidationError, validate_arguments};
