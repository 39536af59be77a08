//! # Protean Content
//!
//! The content aggregate and everything that operates on it: Dublin Core
//! metadata, permission-gated field projection, paste validation, and
//! the reindex-on-modify hook.
//!
//! Where a classic content framework stacks these up as mixin base
//! classes, this crate composes them: `Content` holds a `MetadataBlock`
//! value object and implements the kernel's `CapabilityCarrier` seam;
//! the security policy, paste validator, schema cache, and catalog are
//! all injected trait objects.

pub mod content;
pub mod error;
pub mod metadata;
pub mod paste;
pub mod projection;
pub mod reindex;
pub mod security;

pub use content::Content;
pub use error::ContentError;
pub use metadata::{MetadataBlock, ceiling_date, floor_date};
pub use paste::{PasteValidator, TypeConstraintValidator};
pub use projection::{BoundField, FieldProjector};
pub use reindex::{Catalog, Modified, reindex_on_modify};
pub use security::{SecurityPolicy, VIEW_PERMISSION};
