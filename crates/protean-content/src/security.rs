//! Security policy seam.
//!
//! Enforcement lives outside this crate: the policy answers boolean
//! permission questions against a content context and names the current
//! user. Authorization denial is never an error here — a denied field is
//! simply omitted from projections.

use crate::content::Content;

/// Baseline permission title required to read an untagged field.
pub const VIEW_PERMISSION: &str = "View";

/// External security manager contract.
pub trait SecurityPolicy: Send + Sync {
    /// May the current principal exercise `permission_title` on `content`?
    fn check_permission(&self, permission_title: &str, content: &Content) -> bool;

    /// Identifier of the acting principal, if any.
    fn current_user_id(&self) -> Option<String>;
}
