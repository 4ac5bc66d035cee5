use crate::domain::outcome::ErrorKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("tool '{name}' is already registered")]
    DuplicateTool { name: String },
    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },
}

impl CatalogError {
    /// Only lookups surface in outcomes; duplicates are a startup error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::UnknownTool
    }
}
