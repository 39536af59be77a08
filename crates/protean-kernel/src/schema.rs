//! Schemas: ordered field definitions with tagged read permissions.
//!
//! A schema describes a content type's data shape: an ordered list of
//! fields, each with a declared default, plus a capability tag that the
//! schema contributes to instances of its type. Schemas may extend base
//! schemas; field lookup prefers the derived schema, and read-permission
//! tagged values merge across the base chain with the derived schema
//! overriding.
//!
//! Field defaults are represented as `serde_json::Value`. Cloning a value
//! is a deep copy, which is exactly what default resolution needs: a
//! shared mutable default handed out by reference would let one
//! instance's in-place edit corrupt every other instance.

use crate::capability::CapabilityTag;
use crate::error::KernelError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A single field descriptor: name and declared default value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub default: Value,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

/// An ordered field schema with optional base schemas.
///
/// Immutable once built; shared via `Arc` so the resolver cache can use
/// reference identity to detect a schema generation change.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    tag: Option<CapabilityTag>,
    bases: Vec<Arc<Schema>>,
    fields: Vec<FieldDef>,
    read_permissions: BTreeMap<String, String>,
}

impl Schema {
    pub fn builder(tag: impl Into<Option<CapabilityTag>>) -> SchemaBuilder {
        SchemaBuilder {
            tag: tag.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            read_permissions: BTreeMap::new(),
        }
    }

    /// The capability tag this schema contributes, if any.
    pub fn tag(&self) -> Option<&CapabilityTag> {
        self.tag.as_ref()
    }

    pub fn bases(&self) -> &[Arc<Schema>] {
        &self.bases
    }

    /// Fields declared directly on this schema, in declaration order.
    pub fn own_fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by name: own fields first, then bases in order.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        if let Some(field) = self.fields.iter().find(|f| f.name == name) {
            return Some(field);
        }
        self.bases.iter().find_map(|base| base.field(name))
    }

    /// All field names in declaration order: base schemas first (in base
    /// order), then own fields, deduplicated by name.
    pub fn field_names_in_order(&self) -> Vec<String> {
        let mut seen = std::collections::BTreeSet::new();
        let mut out = Vec::new();
        self.collect_field_names(&mut seen, &mut out);
        out
    }

    fn collect_field_names(
        &self,
        seen: &mut std::collections::BTreeSet<String>,
        out: &mut Vec<String>,
    ) {
        for base in &self.bases {
            base.collect_field_names(seen, out);
        }
        for field in &self.fields {
            if seen.insert(field.name.clone()) {
                out.push(field.name.clone());
            }
        }
    }

    /// Merged field-name -> permission-name map across the base chain.
    ///
    /// Precedence matches [`Schema::field`]: the derived schema overrides
    /// every base, and among sibling bases the earlier one wins. Bases
    /// therefore merge least specific (last) first, each earlier base
    /// overriding, then the own tagged values on top.
    pub fn merged_read_permissions(&self) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();
        for base in self.bases.iter().rev() {
            merged.extend(base.merged_read_permissions());
        }
        merged.extend(
            self.read_permissions
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged
    }

    /// The read permission tagged for `name`, if any: own tagged values
    /// first, then bases in order, same precedence as [`Schema::field`].
    pub fn read_permission(&self, name: &str) -> Option<String> {
        if let Some(permission) = self.read_permissions.get(name) {
            return Some(permission.clone());
        }
        self.bases.iter().find_map(|base| base.read_permission(name))
    }
}

/// Builder for [`Schema`]; rejects duplicate field declarations.
pub struct SchemaBuilder {
    tag: Option<CapabilityTag>,
    bases: Vec<Arc<Schema>>,
    fields: Vec<FieldDef>,
    read_permissions: BTreeMap<String, String>,
}

impl SchemaBuilder {
    pub fn base(mut self, base: Arc<Schema>) -> Self {
        self.bases.push(base);
        self
    }

    pub fn field(mut self, name: impl Into<String>, default: Value) -> Self {
        self.fields.push(FieldDef::new(name, default));
        self
    }

    /// Tag a field with the name of the permission required to read it.
    pub fn read_permission(
        mut self,
        field: impl Into<String>,
        permission: impl Into<String>,
    ) -> Self {
        self.read_permissions.insert(field.into(), permission.into());
        self
    }

    pub fn build(self) -> Result<Schema, KernelError> {
        let mut seen = std::collections::BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(KernelError::DuplicateField {
                    schema: self
                        .tag
                        .as_ref()
                        .map(|t| t.name().to_string())
                        .unwrap_or_else(|| "<untagged>".to_string()),
                    field: field.name.clone(),
                });
            }
        }
        Ok(Schema {
            tag: self.tag,
            bases: self.bases,
            fields: self.fields,
            read_permissions: self.read_permissions,
        })
    }
}
