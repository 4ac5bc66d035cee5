use super::error::CatalogError;
use crate::domain::types::ToolDescriptor;
use std::collections::HashMap;
use std::slice;
use tracing::debug;

/// Registry of tool descriptors, in registration order.
///
/// Tools are registered single-threaded while the process starts. Once the
/// catalog is handed to a dispatcher it is only ever read, so no lock guards
/// it.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), CatalogError> {
        if self.index.contains_key(descriptor.name()) {
            return Err(CatalogError::DuplicateTool {
                name: descriptor.name().to_string(),
            });
        }
        debug!(
            tool = descriptor.name(),
            category = ?descriptor.category(),
            params = descriptor.params().len(),
            "Registered tool"
        );
        self.index
            .insert(descriptor.name().to_string(), self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&ToolDescriptor, CatalogError> {
        self.index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| CatalogError::UnknownTool {
                name: name.to_string(),
            })
    }

    /// All descriptors in registration order. The iterator is cheap to clone
    /// and restart.
    pub fn list(&self) -> slice::Iter<'_, ToolDescriptor> {
        self.tools.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl<'a> IntoIterator for &'a ToolCatalog {
    type Item = &'a ToolDescriptor;
    type IntoIter = slice::Iter<'a, ToolDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.list()
    }
}
