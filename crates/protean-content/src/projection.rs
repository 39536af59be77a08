//! Field enumeration and permission-gated projection.
//!
//! Fields for a type are distributed across the primary schema and its
//! subtype schemas; enumeration merges them in declaration order with the
//! primary schema winning name collisions. Projection turns a content
//! instance into a name -> value map, optionally dropping every field the
//! acting principal may not read.
//!
//! Gating rules: an untagged field requires the baseline view permission;
//! a tagged field whose permission name is not registered is treated as
//! always viewable — when permission metadata is malformed, availability
//! beats strictness.

use crate::content::Content;
use crate::security::{SecurityPolicy, VIEW_PERMISSION};
use protean_kernel::{CapabilityCarrier, PermissionRegistry, Schema, SchemaCache};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A field name bound to the schema that declares it.
#[derive(Debug, Clone)]
pub struct BoundField {
    pub schema: Arc<Schema>,
    pub name: String,
}

impl BoundField {
    /// The declared default, deep-copied.
    pub fn default(&self) -> Option<Value> {
        self.schema.field(&self.name).map(|field| field.default.clone())
    }
}

/// Projects content instances through their schemas, with all three
/// collaborators injected at construction.
pub struct FieldProjector {
    schemas: Arc<dyn SchemaCache>,
    permissions: Arc<dyn PermissionRegistry>,
    policy: Arc<dyn SecurityPolicy>,
}

impl FieldProjector {
    pub fn new(
        schemas: Arc<dyn SchemaCache>,
        permissions: Arc<dyn PermissionRegistry>,
        policy: Arc<dyn SecurityPolicy>,
    ) -> Self {
        Self {
            schemas,
            permissions,
            policy,
        }
    }

    /// All fields of the content's type: primary schema first, then each
    /// subtype in registry order, deduplicated by name.
    pub fn fields(&self, content: &Content) -> Vec<BoundField> {
        let Some(type_id) = content.type_id() else {
            return Vec::new();
        };

        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        let mut collect = |schema: Arc<Schema>| {
            for name in schema.field_names_in_order() {
                if seen.insert(name.clone()) {
                    out.push(BoundField {
                        schema: Arc::clone(&schema),
                        name,
                    });
                }
            }
        };

        if let Some(schema) = self.schemas.get(type_id) {
            collect(schema);
        }
        for subtype in self.schemas.subtypes(type_id).iter() {
            collect(Arc::clone(subtype));
        }
        out
    }

    pub fn field(&self, content: &Content, name: &str) -> Option<BoundField> {
        self.fields(content).into_iter().find(|f| f.name == name)
    }

    pub fn field_names(&self, content: &Content) -> Vec<String> {
        self.fields(content).into_iter().map(|f| f.name).collect()
    }

    /// The field's current value: the stored one, else a deep-copied
    /// default, else JSON null for a field with no declared default.
    pub fn value(&self, content: &Content, field: &BoundField) -> Value {
        if let Some(value) = content.direct_value(&field.name) {
            return value.clone();
        }
        field.default().unwrap_or(Value::Null)
    }

    /// May the acting principal read this field?
    pub fn can_view(&self, content: &Content, field: &BoundField) -> bool {
        let tagged = field.schema.merged_read_permissions();
        let Some(permission_name) = tagged.get(&field.name) else {
            return self.policy.check_permission(VIEW_PERMISSION, content);
        };
        match self.permissions.lookup(permission_name) {
            Some(permission) => self.policy.check_permission(&permission.title, content),
            // Unregistered permission metadata: favor availability.
            None => true,
        }
    }

    /// Name -> value projection. With `check_constraints`, fields the
    /// principal may not view are silently omitted.
    pub fn project(&self, content: &Content, check_constraints: bool) -> BTreeMap<String, Value> {
        let mut out = BTreeMap::new();
        for field in self.fields(content) {
            if check_constraints && !self.can_view(content, &field) {
                continue;
            }
            out.insert(field.name.clone(), self.value(content, &field));
        }
        out
    }

    /// Raw attribute guard: should `name` be reachable on `content` at
    /// all? Empty names (views, traversal machinery), untyped content,
    /// missing schemas, and untagged names are all reachable; only a
    /// resolvable tagged permission gets enforced.
    pub fn is_attribute_viewable(&self, content: &Content, name: &str) -> bool {
        if name.is_empty() {
            return true;
        }
        let Some(schema) = content.type_id().and_then(|tid| self.schemas.get(tid)) else {
            return true;
        };
        let tagged = schema.merged_read_permissions();
        let Some(permission_name) = tagged.get(name) else {
            return true;
        };
        match self.permissions.lookup(permission_name) {
            Some(permission) => self.policy.check_permission(&permission.title, content),
            None => true,
        }
    }
}
