//! Type and permission registries.
//!
//! Both registries are collaborator contracts: the resolver and the
//! projection layer consult them but never require them to be populated.
//! A miss always degrades (static resolution, field treated as viewable)
//! rather than raising.
//!
//! The in-memory implementations are registration-order independent
//! (`BTreeMap` keyed by identifier) and safe to share behind `Arc`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Metadata for a registered content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    pub type_id: String,
    pub title: String,
    /// Permission name required to construct this type in a container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_permission: Option<String>,
    /// Whether the type may be constructed anywhere at all.
    pub global_allow: bool,
}

impl TypeInfo {
    pub fn new(type_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            title: title.into(),
            add_permission: None,
            global_allow: true,
        }
    }

    pub fn with_add_permission(mut self, permission: impl Into<String>) -> Self {
        self.add_permission = Some(permission.into());
        self
    }

    pub fn with_global_allow(mut self, allowed: bool) -> Self {
        self.global_allow = allowed;
        self
    }
}

/// A registered, enforceable permission. The title is what the security
/// policy understands; the name is the registration key schemas tag
/// fields with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub name: String,
    pub title: String,
}

impl Permission {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
        }
    }
}

/// Resolves a type identifier to its metadata.
pub trait TypeRegistry: Send + Sync {
    fn lookup(&self, type_id: &str) -> Option<Arc<TypeInfo>>;
}

/// Resolves a permission name to an enforceable permission.
pub trait PermissionRegistry: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Arc<Permission>>;
}

#[derive(Debug, Default)]
pub struct InMemoryTypeRegistry {
    types: RwLock<BTreeMap<String, Arc<TypeInfo>>>,
}

impl InMemoryTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, info: TypeInfo) -> Arc<TypeInfo> {
        let info = Arc::new(info);
        let mut types = self.types.write().unwrap_or_else(|e| e.into_inner());
        types.insert(info.type_id.clone(), Arc::clone(&info));
        info
    }

    pub fn unregister(&self, type_id: &str) {
        let mut types = self.types.write().unwrap_or_else(|e| e.into_inner());
        types.remove(type_id);
    }
}

impl TypeRegistry for InMemoryTypeRegistry {
    fn lookup(&self, type_id: &str) -> Option<Arc<TypeInfo>> {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        types.get(type_id).cloned()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPermissionRegistry {
    permissions: RwLock<BTreeMap<String, Arc<Permission>>>,
}

impl InMemoryPermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, permission: Permission) -> Arc<Permission> {
        let permission = Arc::new(permission);
        let mut permissions = self
            .permissions
            .write()
            .unwrap_or_else(|e| e.into_inner());
        permissions.insert(permission.name.clone(), Arc::clone(&permission));
        permission
    }
}

impl PermissionRegistry for InMemoryPermissionRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<Permission>> {
        let permissions = self.permissions.read().unwrap_or_else(|e| e.into_inner());
        permissions.get(name).cloned()
    }
}
