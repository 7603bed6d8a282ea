//! Registry of named schemas collected during parsing.

use std::collections::HashMap;

use crate::schema::types::Schema;

/// Collects named schemas (records, enums, and fixed types) by fully
/// qualified name as they are parsed, so later schema texts can refer to
/// them by name. Aliases are registered alongside the declared name.
///
/// A registry can be shared across [`parse_with_registry`] calls to
/// resolve names across schema texts.
///
/// [`parse_with_registry`]: crate::schema::parse_with_registry
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a schema by fully qualified name or alias.
    pub fn get(&self, fullname: &str) -> Option<&Schema> {
        self.schemas.get(fullname)
    }

    /// Check whether a name is registered.
    pub fn contains(&self, fullname: &str) -> bool {
        self.schemas.contains_key(fullname)
    }

    /// Iterate the registered names, aliases included. Order is not
    /// defined.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub(crate) fn insert(&mut self, fullname: String, schema: Schema) {
        self.schemas.insert(fullname, schema);
    }

    pub(crate) fn remove(&mut self, fullname: &str) {
        self.schemas.remove(fullname);
    }

    pub(crate) fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }
}
