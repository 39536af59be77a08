//! The content aggregate.
//!
//! Composition instead of inheritance: a `Content` holds its metadata
//! block as a value object and exposes the typing surface the resolver
//! consumes. Collaborators — schema cache, security policy, catalog,
//! paste validator — are injected by whoever operates on the content,
//! never reached for ambiently.
//!
//! The resolver cache slot is transient by contract: it never serializes,
//! a clone starts cold, and a poisoned lock degrades to recomputation.

use crate::metadata::MetadataBlock;
use crate::security::SecurityPolicy;
use chrono::{DateTime, Utc};
use protean_kernel::{
    CapabilityCarrier, CapabilitySet, KernelError, ResolvedCapabilities, SchemaCache, default_for,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    id: String,
    uid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    direct_capabilities: Option<Arc<CapabilitySet>>,
    static_capabilities: Arc<CapabilitySet>,
    values: BTreeMap<String, Value>,
    metadata: MetadataBlock,
    #[serde(skip)]
    resolution: RwLock<Option<Arc<ResolvedCapabilities>>>,
}

impl Content {
    /// New content with a fresh UID and a metadata block stamped now.
    /// The type identifier is set later by the factory or add view.
    pub fn new(id: impl Into<String>, static_capabilities: CapabilitySet) -> Self {
        Self {
            id: id.into(),
            uid: Uuid::new_v4(),
            type_id: None,
            direct_capabilities: None,
            static_capabilities: Arc::new(static_capabilities),
            values: BTreeMap::new(),
            metadata: MetadataBlock::new(),
            resolution: RwLock::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Globally unique identifier, assigned at construction.
    pub fn uid(&self) -> Uuid {
        self.uid
    }

    pub fn set_type_id(&mut self, type_id: impl Into<String>) {
        self.type_id = Some(type_id.into());
    }

    pub fn clear_type_id(&mut self) {
        self.type_id = None;
    }

    /// Assign (or clear) the instance-level capability set. A new `Arc`
    /// identity is created on every assignment, which invalidates any
    /// cached resolution.
    pub fn set_direct_capabilities(&mut self, capabilities: Option<CapabilitySet>) {
        self.direct_capabilities = capabilities.map(Arc::new);
    }

    pub fn metadata(&self) -> &MetadataBlock {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataBlock {
        &mut self.metadata
    }

    /// Directly stored field values (no schema fallback).
    pub fn direct_value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn remove_value(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Attribute lookup: the stored value if present, otherwise a fresh
    /// copy of the schema-declared default.
    pub fn value(&self, name: &str, schemas: &dyn SchemaCache) -> Result<Value, KernelError> {
        if let Some(value) = self.values.get(name) {
            return Ok(value.clone());
        }
        default_for(schemas, self.type_id.as_deref(), name)
    }

    /// Update creators and the modification date. Called from the
    /// reindex-on-modify hook.
    pub fn notify_modified(&mut self, policy: &dyn SecurityPolicy) {
        self.metadata.notify_modified(policy);
    }
}

impl CapabilityCarrier for Content {
    fn modified_at(&self) -> DateTime<Utc> {
        self.metadata.modified()
    }

    fn type_id(&self) -> Option<&str> {
        self.type_id.as_deref()
    }

    fn direct_capabilities(&self) -> Option<Arc<CapabilitySet>> {
        self.direct_capabilities.clone()
    }

    fn static_capabilities(&self) -> Arc<CapabilitySet> {
        Arc::clone(&self.static_capabilities)
    }

    fn cached_resolution(&self) -> Option<Arc<ResolvedCapabilities>> {
        // A poisoned slot just means some writer panicked mid-swap on
        // another thread; recomputing is always safe.
        self.resolution
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn store_resolution(&self, entry: Arc<ResolvedCapabilities>) {
        let mut slot = self.resolution.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(entry);
    }
}

impl Clone for Content {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            uid: self.uid,
            type_id: self.type_id.clone(),
            direct_capabilities: self.direct_capabilities.clone(),
            static_capabilities: Arc::clone(&self.static_capabilities),
            values: self.values.clone(),
            metadata: self.metadata.clone(),
            // The cache is transient; a clone starts cold.
            resolution: RwLock::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protean_kernel::{CapabilityTag, InMemorySchemaCache, Schema};
    use serde_json::json;

    fn schemas() -> InMemorySchemaCache {
        let cache = InMemorySchemaCache::new();
        cache.set_schema(
            "document",
            Schema::builder(CapabilityTag::new("content.document"))
                .field("title", json!(""))
                .field("attachments", json!([]))
                .build()
                .expect("schema builds"),
        );
        cache
    }

    fn document() -> Content {
        let mut content = Content::new("doc-1", CapabilitySet::from_names(["kind.item"]));
        content.set_type_id("document");
        content
    }

    #[test]
    fn stored_values_win_over_schema_defaults() {
        let cache = schemas();
        let mut content = document();
        assert_eq!(content.value("title", &cache).expect("default"), json!(""));
        content.set_value("title", json!("About"));
        assert_eq!(
            content.value("title", &cache).expect("stored"),
            json!("About")
        );
    }

    #[test]
    fn default_mutation_does_not_leak_across_instances() {
        let cache = schemas();
        let a = document();
        let b = document();
        let mut from_a = a.value("attachments", &cache).expect("default");
        from_a
            .as_array_mut()
            .expect("array default")
            .push(json!("leaked"));
        assert_eq!(b.value("attachments", &cache).expect("default"), json!([]));
    }

    #[test]
    fn unknown_attribute_is_not_found() {
        let cache = schemas();
        let content = document();
        assert!(matches!(
            content.value("nope", &cache),
            Err(KernelError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn clone_starts_with_a_cold_resolution_cache() {
        let content = document();
        content.store_resolution(test_entry());
        assert!(content.cached_resolution().is_some());
        let cloned = content.clone();
        assert!(cloned.cached_resolution().is_none());
        assert_eq!(cloned.uid(), content.uid());
    }

    #[test]
    fn serialization_drops_the_resolution_slot() {
        let content = document();
        content.store_resolution(test_entry());
        let wire = serde_json::to_value(&content).expect("content serializes");
        assert!(wire.get("resolution").is_none());
        let back: Content = serde_json::from_value(wire).expect("content deserializes");
        assert!(back.cached_resolution().is_none());
        assert_eq!(back.type_id(), Some("document"));
    }

    fn test_entry() -> Arc<ResolvedCapabilities> {
        use protean_kernel::{CapabilityResolver, InMemoryTypeRegistry, TypeInfo};
        let types = Arc::new(InMemoryTypeRegistry::new());
        types.register(TypeInfo::new("document", "Document"));
        let cache = Arc::new(schemas());
        let resolver = CapabilityResolver::new(types, cache);
        let carrier = document();
        resolver.resolve(&carrier);
        carrier.cached_resolution().expect("resolution cached")
    }
}
