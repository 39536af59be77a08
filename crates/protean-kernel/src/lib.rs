//! # Protean Kernel
//!
//! Dynamic content typing: capability resolution with an
//! invalidation-aware cache, and schema-backed field defaults.
//!
//! This crate is **framework-agnostic**: it does not prescribe where
//! schemas come from, how content persists, or how permissions are
//! enforced. Those are collaborator contracts, injected at construction.
//!
//! ## Architecture
//!
//! ```text
//! CapabilitySet          ← Ordered tags, first-match-wins
//!     │
//! Schema                 ← Fields, defaults, tagged read permissions
//!     │
//! SchemaCache            ← type_id → schema + ordered subtypes
//! TypeRegistry           ← type_id → TypeInfo
//! PermissionRegistry     ← permission name → Permission
//!     │
//! CapabilityResolver     ← composes schema/subtype/base tags,
//!                          caches per carrier, invalidates on
//!                          mtime change or input identity change
//!     │
//! default_for            ← attribute miss → deep-copied field default
//! ```

pub mod cache;
pub mod capability;
pub mod defaults;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod schema;

pub use cache::{InMemorySchemaCache, SchemaCache};
pub use capability::{CapabilitySet, CapabilityTag};
pub use defaults::{RESERVED_PREFIX, default_for};
pub use error::KernelError;
pub use registry::{
    InMemoryPermissionRegistry, InMemoryTypeRegistry, Permission, PermissionRegistry, TypeInfo,
    TypeRegistry,
};
pub use resolver::{CapabilityCarrier, CapabilityResolver, ResolvedCapabilities};
pub use schema::{FieldDef, Schema, SchemaBuilder};
