use stat_verify_core::{
    CatalogGroup, ComputationProvider, ExecutionError, ResultSchema, ShapeDescriptor,
    TestIdentifier,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::catalog::{CatalogEntry, STANDARD_CATALOG};

/// Everything the engine knows about one test
#[derive(Clone)]
pub struct RegistryEntry {
    pub identifier: TestIdentifier,
    pub shape: ShapeDescriptor,
    pub schema: ResultSchema,
    pub groups: Vec<CatalogGroup>,
    pub provider: Option<Arc<dyn ComputationProvider>>,
}

impl RegistryEntry {
    pub fn is_implemented(&self) -> bool {
        self.provider.is_some()
    }

    pub fn in_group(&self, group: CatalogGroup) -> bool {
        self.groups.contains(&group)
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("identifier", &self.identifier)
            .field("shape", &self.shape)
            .field("schema", &self.schema)
            .field("groups", &self.groups)
            .field("implemented", &self.is_implemented())
            .finish()
    }
}

impl From<&CatalogEntry> for RegistryEntry {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            identifier: TestIdentifier::new(entry.identifier),
            shape: entry.shape,
            schema: entry.schema,
            groups: entry.groups.to_vec(),
            provider: entry
                .provider
                .map(|provider| Arc::new(provider) as Arc<dyn ComputationProvider>),
        }
    }
}

/// Identifier → (shape, schema, provider) table.
///
/// Built once with the consuming builder methods and read-only afterwards, so
/// it can be shared freely between threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TestRegistry {
    entries: HashMap<TestIdentifier, RegistryEntry>,
}

impl TestRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the standard catalog
    pub fn standard() -> Self {
        Self::from_catalog(STANDARD_CATALOG)
    }

    pub fn from_catalog(catalog: &[CatalogEntry]) -> Self {
        catalog
            .iter()
            .fold(Self::empty(), |registry, entry| registry.insert(entry.into()))
    }

    /// Bind a provider to an identifier, replacing any previous entry
    pub fn register(
        self,
        identifier: impl Into<TestIdentifier>,
        shape: ShapeDescriptor,
        schema: ResultSchema,
        provider: impl ComputationProvider + 'static,
    ) -> Self {
        self.insert(RegistryEntry {
            identifier: identifier.into(),
            shape,
            schema,
            groups: Vec::new(),
            provider: Some(Arc::new(provider) as Arc<dyn ComputationProvider>),
        })
    }

    /// Declare a test without a provider; executing it reports `NotImplemented`
    pub fn declare(
        self,
        identifier: impl Into<TestIdentifier>,
        shape: ShapeDescriptor,
        schema: ResultSchema,
    ) -> Self {
        self.insert(RegistryEntry {
            identifier: identifier.into(),
            shape,
            schema,
            groups: Vec::new(),
            provider: None,
        })
    }

    pub fn insert(mut self, entry: RegistryEntry) -> Self {
        self.entries.insert(entry.identifier.clone(), entry);
        self
    }

    /// Entry for `identifier`; unknown names are an error, never a default
    pub fn lookup(&self, identifier: &str) -> Result<&RegistryEntry, ExecutionError> {
        self.entries
            .get(identifier)
            .ok_or_else(|| ExecutionError::UnknownTest(TestIdentifier::new(identifier)))
    }

    pub fn get(&self, identifier: &str) -> Option<&RegistryEntry> {
        self.entries.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// All entries ordered by identifier
    pub fn entries(&self) -> Vec<&RegistryEntry> {
        let mut entries: Vec<&RegistryEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        entries
    }

    pub fn in_group(&self, group: CatalogGroup) -> Vec<&RegistryEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.in_group(group))
            .collect()
    }

    pub fn identifiers(&self) -> Vec<&TestIdentifier> {
        self.entries().into_iter().map(|e| &e.identifier).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
