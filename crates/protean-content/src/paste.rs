//! Paste/construction validation.
//!
//! When an object is copied into a container, the target may refuse the
//! paste: the copied object's type must still be constructible there.
//! The strategy is injected into whatever container logic performs the
//! paste; this crate only decides, it does not move objects.

use crate::content::Content;
use crate::error::ContentError;
use protean_kernel::{CapabilityCarrier, PermissionRegistry, TypeRegistry};
use std::sync::Arc;

/// Decides whether pasting `source` into `target` is allowed.
pub trait PasteValidator: Send + Sync {
    fn validate(&self, source: &Content, target: &Content) -> Result<(), ContentError>;
}

/// Asks the type registry whether the source type may be constructed in
/// the target. Untyped sources and unregistered types are allowed —
/// missing metadata never blocks basic object operation.
pub struct TypeConstraintValidator {
    types: Arc<dyn TypeRegistry>,
    permissions: Arc<dyn PermissionRegistry>,
    policy: Arc<dyn crate::security::SecurityPolicy>,
}

impl TypeConstraintValidator {
    pub fn new(
        types: Arc<dyn TypeRegistry>,
        permissions: Arc<dyn PermissionRegistry>,
        policy: Arc<dyn crate::security::SecurityPolicy>,
    ) -> Self {
        Self {
            types,
            permissions,
            policy,
        }
    }
}

impl PasteValidator for TypeConstraintValidator {
    fn validate(&self, source: &Content, target: &Content) -> Result<(), ContentError> {
        let Some(type_id) = source.type_id() else {
            return Ok(());
        };
        let Some(info) = self.types.lookup(type_id) else {
            return Ok(());
        };

        if !info.global_allow {
            return Err(ContentError::PasteNotAllowed {
                type_id: type_id.to_string(),
            });
        }

        if let Some(add_permission) = &info.add_permission
            && let Some(permission) = self.permissions.lookup(add_permission)
            && !self.policy.check_permission(&permission.title, target)
        {
            return Err(ContentError::PasteNotAllowed {
                type_id: type_id.to_string(),
            });
        }

        Ok(())
    }
}
