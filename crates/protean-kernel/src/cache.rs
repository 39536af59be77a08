//! Schema cache: type identifier -> schema and subtype schemas.
//!
//! The cache is the resolver's source of truth for what a type currently
//! looks like. Registration replaces entries wholesale with fresh `Arc`s,
//! so a reload is observable as a reference-identity change — which is
//! exactly the signal the resolver's per-instance cache keys on.
//!
//! Both accessors must reflect the same generation within a single
//! resolution; the resolver guarantees that by fetching each exactly once
//! per call.

use crate::schema::Schema;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Maps a type identifier to its primary schema and ordered subtype
/// schemas. Order of subtypes is significant: it drives field precedence
/// and capability composition.
pub trait SchemaCache: Send + Sync {
    fn get(&self, type_id: &str) -> Option<Arc<Schema>>;
    fn subtypes(&self, type_id: &str) -> Arc<[Arc<Schema>]>;
}

#[derive(Debug, Clone)]
struct TypeSchemata {
    schema: Option<Arc<Schema>>,
    subtypes: Arc<[Arc<Schema>]>,
}

/// In-memory [`SchemaCache`] with explicit invalidation.
#[derive(Debug)]
pub struct InMemorySchemaCache {
    entries: RwLock<BTreeMap<String, TypeSchemata>>,
    /// Shared empty subtype list: unknown types always hand back the same
    /// reference, so the resolver's identity check stays stable.
    no_subtypes: Arc<[Arc<Schema>]>,
}

impl Default for InMemorySchemaCache {
    fn default() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            no_subtypes: Vec::new().into(),
        }
    }
}

impl InMemorySchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary schema for a type. Returns the shared handle.
    pub fn set_schema(&self, type_id: impl Into<String>, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let entry = entries
            .entry(type_id.into())
            .or_insert_with(|| TypeSchemata {
                schema: None,
                subtypes: Arc::clone(&self.no_subtypes),
            });
        entry.schema = Some(Arc::clone(&schema));
        schema
    }

    /// Replace the subtype list for a type, preserving the given order.
    pub fn set_subtypes(&self, type_id: impl Into<String>, subtypes: Vec<Schema>) {
        let subtypes: Arc<[Arc<Schema>]> =
            subtypes.into_iter().map(Arc::new).collect::<Vec<_>>().into();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let entry = entries
            .entry(type_id.into())
            .or_insert_with(|| TypeSchemata {
                schema: None,
                subtypes: Arc::clone(&self.no_subtypes),
            });
        entry.subtypes = subtypes;
    }

    /// Drop everything cached for one type. The next registration creates
    /// fresh identities, invalidating downstream resolution caches.
    pub fn invalidate(&self, type_id: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(type_id);
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}

impl SchemaCache for InMemorySchemaCache {
    fn get(&self, type_id: &str) -> Option<Arc<Schema>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(type_id).and_then(|entry| entry.schema.clone())
    }

    fn subtypes(&self, type_id: &str) -> Arc<[Arc<Schema>]> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(type_id)
            .map(|entry| Arc::clone(&entry.subtypes))
            .unwrap_or_else(|| Arc::clone(&self.no_subtypes))
    }
}
